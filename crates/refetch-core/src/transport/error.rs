//! Transport error type for retry classification.

use std::error::Error;
use std::fmt;

/// Error returned by a single transport round trip.
///
/// Kept structured so the retry layer can classify it (transient vs not)
/// before anything is erased into anyhow.
#[derive(Debug)]
pub enum TransportError {
    /// The attempt timed out before a complete response arrived (connect or read).
    Timeout(Box<dyn Error + Send + Sync>),
    /// Network-level failure (connection refused/reset, DNS, interrupted body).
    Connection(Box<dyn Error + Send + Sync>),
    /// The exchange completed but the response carried a non-success HTTP status.
    Http(u16),
    /// The request was rejected outright and will not succeed by retrying
    /// (malformed request, unsupported scheme, client misconfiguration).
    Rejected(Box<dyn Error + Send + Sync>),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Timeout(e) => write!(f, "timed out: {}", e),
            TransportError::Connection(e) => write!(f, "connection failed: {}", e),
            TransportError::Http(code) => write!(f, "HTTP {}", code),
            TransportError::Rejected(e) => write!(f, "request rejected: {}", e),
        }
    }
}

impl Error for TransportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TransportError::Timeout(e)
            | TransportError::Connection(e)
            | TransportError::Rejected(e) => Some(e.as_ref()),
            TransportError::Http(_) => None,
        }
    }
}
