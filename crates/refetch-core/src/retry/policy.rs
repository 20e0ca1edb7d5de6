use std::time::Duration;

/// High-level classification of a transport failure for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Attempt timed out (connect/read).
    Timeout,
    /// Server asked us to slow down (e.g. 429, 503).
    Throttled,
    /// Network-level failure (connection reset, DNS, etc.).
    Connection,
    /// HTTP status that is retryable but not strictly throttling (5xx).
    Http5xx(u16),
    /// Any other failure; retrying will not help.
    Other,
}

impl ErrorKind {
    /// True for failures plausibly resolved by waiting and retrying.
    pub fn is_transient(self) -> bool {
        !matches!(self, ErrorKind::Other)
    }
}

/// Inter-attempt delay schedule.
///
/// `Fixed` waits the policy delay between every attempt and is the default
/// (the compatibility behavior). `Exponential` doubles the base delay per
/// attempt up to a cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    Fixed,
    Exponential { max_delay: Duration },
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this error.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Retry parameters for one fetch call. Immutable for the call's lifetime.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first). Must be >= 1.
    pub max_attempts: u32,
    /// Delay between attempts (the base delay under exponential backoff).
    pub delay: Duration,
    /// Delay schedule; fixed unless configured otherwise.
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(1000),
            backoff: Backoff::Fixed,
        }
    }
}

impl RetryPolicy {
    /// Fixed-delay policy with explicit bounds.
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
            backoff: Backoff::Fixed,
        }
    }

    /// Exponential variant: `base_delay * 2^(attempt-1)`, capped at `max_delay`.
    pub fn exponential(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            delay: base_delay,
            backoff: Backoff::Exponential { max_delay },
        }
    }

    /// Inter-attempt delay after a failed `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed => self.delay,
            Backoff::Exponential { max_delay } => {
                let exp = 1u32 << attempt.saturating_sub(1).min(16);
                self.delay.saturating_mul(exp).min(max_delay)
            }
        }
    }

    /// Decide what to do after a failed `attempt` (1 = first attempt).
    ///
    /// The error kind is consulted before the attempt budget: a non-transient
    /// kind never retries, regardless of remaining attempts. Transient kinds
    /// retry until `max_attempts` is consumed. The returned delay applies
    /// between attempts only, never after the last one.
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        if !kind.is_transient() {
            return RetryDecision::NoRetry;
        }
        if attempt >= self.max_attempts {
            return RetryDecision::NoRetry;
        }
        RetryDecision::RetryAfter(self.delay_for(attempt))
    }
}
