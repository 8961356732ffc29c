//! Output filename extraction from a download reference.

use url::Url;

/// Extracts the server-assigned output filename (last path segment) from a
/// download reference. Accepts absolute URLs and server-relative paths.
///
/// Returns `None` if the reference cannot be parsed or the path is empty/root.
pub fn output_filename(download_url: &str) -> Option<String> {
    let parsed = match Url::parse(download_url) {
        Ok(u) => u,
        // Server-relative link: only the path matters, any base will do.
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse("http://localhost/").ok()?.join(download_url).ok()?
        }
        Err(_) => return None,
    };
    let segment = parsed.path().split('/').filter(|s| !s.is_empty()).last()?;
    if segment == "." || segment == ".." {
        return None;
    }
    Some(segment.to_string())
}
