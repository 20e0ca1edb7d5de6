//! Decoder abstraction: pure conversion of response bytes into a typed value.

use serde::de::DeserializeOwned;
use std::error::Error;
use std::fmt;

/// A response body arrived but could not be converted to the target shape.
///
/// The fetcher never retries this: a malformed payload will not change by
/// waiting and requesting again.
#[derive(Debug)]
pub struct DecodeError(Box<dyn Error + Send + Sync>);

impl DecodeError {
    pub fn new(source: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self(source.into())
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "decode failed: {}", self.0)
    }
}

impl Error for DecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.0.as_ref())
    }
}

/// Converts a raw response body into a caller-specified shape.
///
/// Implementations must be pure and deterministic for identical input bytes.
pub trait Decoder: Send + Sync {
    fn decode<V: DeserializeOwned>(&self, bytes: &[u8]) -> Result<V, DecodeError>;
}

/// JSON decoding via serde_json.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl Decoder for JsonDecoder {
    fn decode<V: DeserializeOwned>(&self, bytes: &[u8]) -> Result<V, DecodeError> {
        serde_json::from_slice(bytes).map_err(DecodeError::new)
    }
}
