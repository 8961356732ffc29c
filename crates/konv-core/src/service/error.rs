//! Failure of a single request to the conversion service.

use std::fmt;
use std::time::Duration;

/// Why no response was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Connect or transfer exceeded its time bound.
    Timeout,
    /// Connection refused/reset, DNS failure, send/recv failure.
    Connection,
    /// Transfer stopped before completion (callback abort, worker lost).
    Aborted,
    /// Anything else reported by the transport (bad URL, unreadable file, ...).
    Other,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransportKind::Timeout => "timeout",
            TransportKind::Connection => "connection",
            TransportKind::Aborted => "aborted",
            TransportKind::Other => "transport",
        })
    }
}

/// Error returned by a convert or bundle request.
///
/// All variants are equally terminal for the item; the variant is kept so the
/// cause can be reported and logged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// No response obtained.
    #[error("network error ({kind}): {message}")]
    Transport { kind: TransportKind, message: String },
    /// Response with a non-success HTTP status.
    #[error("HTTP error {status}: {message}")]
    Protocol { status: u32, message: String },
    /// Success status, but the body reports failure (or cannot be understood).
    #[error("{0}")]
    Semantic(String),
}

impl ServiceError {
    pub fn transport(kind: TransportKind, message: impl Into<String>) -> Self {
        ServiceError::Transport {
            kind,
            message: message.into(),
        }
    }

    /// The request did not settle within `limit`.
    pub fn timed_out(limit: Duration) -> Self {
        ServiceError::transport(
            TransportKind::Timeout,
            format!("no response within {}s", limit.as_secs()),
        )
    }

    /// Short cause label for logs: `transport`, `protocol` or `semantic`.
    pub fn cause(&self) -> &'static str {
        match self {
            ServiceError::Transport { .. } => "transport",
            ServiceError::Protocol { .. } => "protocol",
            ServiceError::Semantic(_) => "semantic",
        }
    }
}
