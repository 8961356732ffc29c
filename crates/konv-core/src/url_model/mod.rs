//! Download references returned by the service.
//!
//! The service hands back server-relative links (`/downloads/<name>`). The zip
//! endpoint identifies outputs by exactly that final path segment, and the CLI
//! needs absolute links to print.

mod path;

pub use path::output_filename;

use url::Url;

/// Resolves a download reference against the service root.
///
/// Absolute references are returned unchanged; unparseable ones are returned
/// verbatim so the caller never loses the link.
pub fn resolve_link(base: &Url, link: &str) -> String {
    match Url::parse(link) {
        Ok(u) => u.to_string(),
        Err(url::ParseError::RelativeUrlWithoutBase) => base
            .join(link)
            .map(String::from)
            .unwrap_or_else(|_| link.to_string()),
        Err(_) => link.to_string(),
    }
}
