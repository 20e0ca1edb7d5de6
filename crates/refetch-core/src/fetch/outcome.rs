//! Terminal fetch results: the only surface callers observe.

use crate::decode::DecodeError;
use crate::target::TargetError;
use crate::transport::TransportError;
use std::error::Error;
use std::fmt;

/// Call input rejected before any attempt was made.
#[derive(Debug)]
pub enum ArgumentError {
    /// The target identifier failed validation.
    Target(TargetError),
    /// `max_attempts` was zero; at least one attempt is required.
    ZeroAttempts,
}

impl fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentError::Target(e) => write!(f, "{}", e),
            ArgumentError::ZeroAttempts => write!(f, "max_attempts must be at least 1"),
        }
    }
}

impl Error for ArgumentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ArgumentError::Target(e) => Some(e),
            ArgumentError::ZeroAttempts => None,
        }
    }
}

/// Terminal failure taxonomy for one fetch call.
///
/// Raw transport errors never reach the caller directly; they are wrapped
/// here once the call has run out of options.
#[derive(Debug)]
pub enum FetchError {
    /// Malformed call input; no attempt was made, no retry consumed.
    InvalidArgument(ArgumentError),
    /// Every attempt failed transiently; carries the last transport error.
    Exhausted(TransportError),
    /// A response arrived but could not be decoded. Never retried.
    Decode(DecodeError),
    /// Non-transient failure; terminated the call on first occurrence.
    Fatal(TransportError),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::InvalidArgument(e) => write!(f, "invalid argument: {}", e),
            FetchError::Exhausted(e) => write!(f, "attempts exhausted, last error: {}", e),
            FetchError::Decode(e) => write!(f, "{}", e),
            FetchError::Fatal(e) => write!(f, "fatal: {}", e),
        }
    }
}

impl Error for FetchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FetchError::InvalidArgument(e) => Some(e),
            FetchError::Exhausted(e) | FetchError::Fatal(e) => Some(e),
            FetchError::Decode(e) => Some(e),
        }
    }
}

/// Result of one fetch call: decoded success, terminal failure, or
/// caller-initiated abandonment.
///
/// `attempts` counts completed attempts. A call cancelled while a request
/// is still in flight does not count that request as completed.
#[derive(Debug)]
pub enum FetchOutcome<V> {
    Success { value: V, attempts: u32 },
    Failure { error: FetchError, attempts: u32 },
    Cancelled { attempts: u32 },
}

impl<V> FetchOutcome<V> {
    pub fn attempts(&self) -> u32 {
        match self {
            FetchOutcome::Success { attempts, .. }
            | FetchOutcome::Failure { attempts, .. }
            | FetchOutcome::Cancelled { attempts } => *attempts,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success { .. })
    }

    /// Decoded value, if the call succeeded.
    pub fn ok(self) -> Option<V> {
        match self {
            FetchOutcome::Success { value, .. } => Some(value),
            _ => None,
        }
    }
}
