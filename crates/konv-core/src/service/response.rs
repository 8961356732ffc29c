//! Interpret HTTP status + JSON body returned by the conversion service.

use serde::Deserialize;

use super::error::ServiceError;

/// Longest plain-text body echoed back in a protocol error.
const MAX_ERROR_BODY: usize = 200;

/// Body shared by the convert and zip endpoints.
#[derive(Debug, Deserialize)]
struct Reply {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    download_url: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatsReply {
    total_conversions: u64,
}

/// Turn a convert/zip response into the download reference it carries.
///
/// `fallback` is the message used when a failure body gives no description.
pub(crate) fn parse_download_reply(
    code: u32,
    body: &[u8],
    fallback: &str,
) -> Result<String, ServiceError> {
    let reply: Option<Reply> = serde_json::from_slice(body).ok();

    if !(200..300).contains(&code) {
        let message = reply
            .and_then(|r| r.error)
            .filter(|e| !e.trim().is_empty())
            .or_else(|| plain_text(body))
            .unwrap_or_else(|| format!("HTTP error: {}", code));
        return Err(ServiceError::Protocol {
            status: code,
            message,
        });
    }

    let reply = reply.ok_or_else(|| {
        ServiceError::Semantic(format!(
            "malformed response: {}",
            plain_text(body).unwrap_or_else(|| "<empty body>".to_string())
        ))
    })?;

    let success = reply
        .status
        .as_deref()
        .is_some_and(|s| s.eq_ignore_ascii_case("success"));
    match reply.download_url.filter(|u| !u.trim().is_empty()) {
        Some(url) if success => Ok(url),
        _ => Err(ServiceError::Semantic(
            reply
                .error
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| fallback.to_string()),
        )),
    }
}

/// Turn a stats response into the total conversion counter.
pub(crate) fn parse_stats_reply(code: u32, body: &[u8]) -> Result<u64, ServiceError> {
    if !(200..300).contains(&code) {
        return Err(ServiceError::Protocol {
            status: code,
            message: plain_text(body).unwrap_or_else(|| format!("HTTP error: {}", code)),
        });
    }
    serde_json::from_slice::<StatsReply>(body)
        .map(|s| s.total_conversions)
        .map_err(|e| ServiceError::Semantic(format!("malformed stats response: {}", e)))
}

fn plain_text(body: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Some(text.chars().take(MAX_ERROR_BODY).collect())
}
