//! Transport abstraction: one request/response round trip.
//!
//! The fetcher never talks to the network directly; it goes through a
//! `Transport` so the retry loop can be exercised against fakes and the
//! HTTP client can be swapped without touching retry semantics.

mod error;
mod http;

pub use error::TransportError;
pub use http::{HttpTransport, HttpTransportBuilder};

use crate::target::Target;
use std::future::Future;

/// Response envelope for one completed HTTP exchange, whatever the status.
#[derive(Debug, Clone)]
pub struct RawResponse {
    status: u16,
    body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: Vec<u8>) -> Self {
        Self { status, body }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// True if the status is in the 2xx success range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One request/response round trip against a target.
///
/// Implementations perform no retries and no decoding, and must be safe to
/// call repeatedly and from concurrent tasks. A completed exchange with a
/// non-2xx status is returned as `Ok`; status policy belongs to the caller.
/// Per-attempt timeouts are the transport's job and surface as
/// `TransportError::Timeout`.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        target: &Target,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range_is_2xx() {
        assert!(RawResponse::new(200, Vec::new()).is_success());
        assert!(RawResponse::new(204, Vec::new()).is_success());
        assert!(RawResponse::new(299, Vec::new()).is_success());
        assert!(!RawResponse::new(199, Vec::new()).is_success());
        assert!(!RawResponse::new(301, Vec::new()).is_success());
        assert!(!RawResponse::new(404, Vec::new()).is_success());
        assert!(!RawResponse::new(500, Vec::new()).is_success());
    }
}
