//! Classify curl failures into transport error kinds.

use super::error::{ServiceError, TransportKind};

/// Classify a curl error for diagnostics.
pub fn classify_curl_error(e: &curl::Error) -> TransportKind {
    if e.is_operation_timedout() {
        return TransportKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
    {
        return TransportKind::Connection;
    }
    if e.is_aborted_by_callback() || e.is_partial_file() {
        return TransportKind::Aborted;
    }
    TransportKind::Other
}

impl From<curl::Error> for ServiceError {
    fn from(e: curl::Error) -> Self {
        ServiceError::transport(classify_curl_error(&e), e.to_string())
    }
}

impl From<curl::FormError> for ServiceError {
    fn from(e: curl::FormError) -> Self {
        ServiceError::transport(TransportKind::Other, format!("multipart form: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // curl-sys error codes: 7 couldn't connect, 28 timed out, 42 aborted by callback, 3 bad URL.
    #[test]
    fn timeout_and_connection() {
        assert_eq!(classify_curl_error(&curl::Error::new(28)), TransportKind::Timeout);
        assert_eq!(classify_curl_error(&curl::Error::new(7)), TransportKind::Connection);
    }

    #[test]
    fn aborted_and_other() {
        assert_eq!(classify_curl_error(&curl::Error::new(42)), TransportKind::Aborted);
        assert_eq!(classify_curl_error(&curl::Error::new(3)), TransportKind::Other);
    }

    #[test]
    fn from_curl_keeps_message() {
        let e: ServiceError = curl::Error::new(7).into();
        match e {
            ServiceError::Transport { kind, message } => {
                assert_eq!(kind, TransportKind::Connection);
                assert!(!message.is_empty());
            }
            other => panic!("expected transport error, got {:?}", other),
        }
    }
}
