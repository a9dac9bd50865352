//! Maps fetch failures onto retryable kinds.

use super::policy::ErrorKind;
use crate::fetch::FetchError;

/// Classifies an HTTP status for retry purposes.
pub fn classify_http_status(status: u32) -> ErrorKind {
    match status {
        429 | 503 => ErrorKind::Throttled,
        500..=599 => ErrorKind::Http5xx(status as u16),
        _ => ErrorKind::Other,
    }
}

/// Classifies a curl transport error for retry purposes.
pub fn classify_curl_error(err: &curl::Error) -> ErrorKind {
    if err.is_operation_timedout() {
        ErrorKind::Timeout
    } else if err.is_couldnt_connect()
        || err.is_couldnt_resolve_host()
        || err.is_couldnt_resolve_proxy()
        || err.is_recv_error()
        || err.is_send_error()
        || err.is_got_nothing()
    {
        ErrorKind::Connection
    } else {
        ErrorKind::Other
    }
}

/// Classifies any fetch error. Local i/o failures and malformed URLs are
/// never retried.
pub fn classify(err: &FetchError) -> ErrorKind {
    match err {
        FetchError::Http(code) => classify_http_status(*code),
        FetchError::Curl(e) => classify_curl_error(e),
        FetchError::BadUrl(_) | FetchError::Io(_) => ErrorKind::Other,
    }
}
