//! Call control for cancel/deadline: shared cancel tokens observed at
//! suspension points.
//!
//! A `CancelToken` can be cloned out of a `FetchControl` and triggered from
//! another task (e.g. a shutdown path or a user interrupt). The fetch loop
//! selects against it while parked on network I/O or an inter-attempt delay
//! and abandons all remaining attempts once it fires.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// Cloneable cancellation handle. All clones observe the same token.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    cancelled: AtomicBool,
    notify: Notify,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            cancelled: AtomicBool::new(false),
            notify: Notify::new(),
        }
    }
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent; wakes every task parked in
    /// `cancelled()`.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Release);
        self.inner.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Resolves once the token is cancelled; immediately if it already is.
    pub async fn cancelled(&self) {
        // Register interest before checking the flag so a cancel() landing
        // in between cannot be missed.
        let notified = self.inner.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if self.is_cancelled() {
            return;
        }
        notified.await;
    }
}

/// Per-call control surface: cancellation plus an optional overall deadline.
///
/// The deadline bounds the whole call (all attempts and delays); once
/// exceeded it acts exactly like a cancellation trigger, preempting any
/// in-flight request or pending retry.
#[derive(Debug, Clone, Default)]
pub struct FetchControl {
    cancel: CancelToken,
    deadline: Option<Duration>,
}

impl FetchControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Handle that cancels this call when triggered.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cancelled_resolves_immediately_when_already_cancelled() {
        let token = CancelToken::new();
        token.cancel();
        assert!(token.is_cancelled());
        // Must not hang.
        token.cancelled().await;
    }

    #[tokio::test]
    async fn cancel_wakes_a_parked_waiter() {
        let token = CancelToken::new();
        let waiter = token.clone();
        let handle = tokio::spawn(async move { waiter.cancelled().await });
        tokio::time::sleep(Duration::from_millis(20)).await;
        token.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("waiter must wake")
            .unwrap();
    }

    #[tokio::test]
    async fn clones_share_the_same_token() {
        let token = CancelToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn control_carries_deadline() {
        let control = FetchControl::new().with_deadline(Duration::from_secs(5));
        assert_eq!(control.deadline(), Some(Duration::from_secs(5)));
        assert!(FetchControl::new().deadline().is_none());
    }
}
