//! Classify transport failures into retry policy error kinds.

use crate::retry::policy::ErrorKind;
use crate::transport::TransportError;

/// Classify an HTTP status code for retry decisions.
///
/// 429 and 503 are explicit slow-down signals, the rest of 5xx is assumed
/// to be a transient server condition, and any other non-success status
/// (the 4xx range in practice) will not change by retrying.
pub fn classify_http_status(status: u16) -> ErrorKind {
    match status {
        429 | 503 => ErrorKind::Throttled,
        500..=599 => ErrorKind::Http5xx(status),
        _ => ErrorKind::Other,
    }
}

/// Classify a transport error into an `ErrorKind`.
pub fn classify(e: &TransportError) -> ErrorKind {
    match e {
        TransportError::Timeout(_) => ErrorKind::Timeout,
        TransportError::Connection(_) => ErrorKind::Connection,
        TransportError::Http(status) => classify_http_status(*status),
        TransportError::Rejected(_) => ErrorKind::Other,
    }
}
