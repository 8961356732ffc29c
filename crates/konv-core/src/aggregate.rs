//! Turn settled items into one deliverable: a single link or a server-side bundle.

use std::time::Duration;

use crate::batch::{BatchOutcome, Item};
use crate::service::{ConversionService, ServiceError};
use crate::url_model;

/// Why a bundle could not be produced even though items succeeded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BundleError {
    /// A successful item's link has no final path segment to name it by.
    #[error("cannot derive output filename from download link {0:?}")]
    MissingFilename(String),
    #[error("bundle request failed: {0}")]
    Request(#[from] ServiceError),
}

/// Output filenames of the Done items, in item order.
pub fn bundle_filenames(items: &[Item]) -> Result<Vec<String>, BundleError> {
    items
        .iter()
        .filter_map(Item::download_url)
        .map(|url| {
            url_model::output_filename(url).ok_or_else(|| BundleError::MissingFilename(url.to_string()))
        })
        .collect()
}

/// Decide the batch outcome from settled items.
///
/// 0 successes → `NoSuccessfulItems`; 1 → that item's link; 2+ → one bundle
/// request (bounded by `timeout`) listing every output filename in item order.
pub async fn aggregate<S>(service: &S, items: &[Item], timeout: Duration) -> BatchOutcome
where
    S: ConversionService + ?Sized,
{
    let links: Vec<&str> = items.iter().filter_map(Item::download_url).collect();
    match links.as_slice() {
        [] => BatchOutcome::NoSuccessfulItems,
        [only] => BatchOutcome::SingleDownload((*only).to_string()),
        _ => match request_bundle(service, items, timeout).await {
            Ok(url) => {
                tracing::info!(files = links.len(), url = %url, "bundle ready");
                BatchOutcome::BundleDownload(url)
            }
            Err(e) => {
                tracing::warn!(files = links.len(), error = %e, "bundle unavailable");
                BatchOutcome::BundleUnavailable(e)
            }
        },
    }
}

async fn request_bundle<S>(service: &S, items: &[Item], timeout: Duration) -> Result<String, BundleError>
where
    S: ConversionService + ?Sized,
{
    let filenames = bundle_filenames(items)?;
    tracing::debug!(?filenames, "requesting bundle");
    match tokio::time::timeout(timeout, service.bundle(&filenames)).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(ServiceError::timed_out(timeout).into()),
    }
}
