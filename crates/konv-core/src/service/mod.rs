//! Remote conversion service: request contract and the curl-backed client.
//!
//! The orchestrator only talks to [`ConversionService`]; [`CurlService`] is the
//! production implementation (libcurl on blocking threads), tests plug in fakes.

mod classify;
mod client;
mod error;
mod response;

pub use self::classify::classify_curl_error;
pub use self::client::{CurlService, CONVERT_PATH, STATS_PATH, ZIP_PATH};
pub use self::error::{ServiceError, TransportKind};

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;

use crate::options::BatchOptions;
use crate::source::SourceFile;

/// Upload-side signal emitted by the transport while a convert request is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadSignal {
    /// Request body bytes sent so far.
    Progress { sent: u64, total: u64 },
    /// The request body has been fully sent; the service is now processing.
    Sent,
}

/// Requests the orchestrator issues against the conversion service.
#[async_trait]
pub trait ConversionService: Send + Sync {
    /// Upload `file` for conversion with `options`.
    ///
    /// Upload progress and body completion are reported on `signals` (send
    /// failures are ignored; the receiver may already be gone). Resolves to the
    /// download reference of the converted output.
    async fn convert(
        &self,
        file: &SourceFile,
        options: &BatchOptions,
        signals: UnboundedSender<UploadSignal>,
    ) -> Result<String, ServiceError>;

    /// Ask the service to bundle previously produced outputs (by basename)
    /// into one archive. Resolves to the archive's download reference.
    async fn bundle(&self, filenames: &[String]) -> Result<String, ServiceError>;
}
