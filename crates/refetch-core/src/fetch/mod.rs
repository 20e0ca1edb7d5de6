//! Resilient fetch loop: bounded attempts, transient-failure retry, decode.
//!
//! One call moves through attempting and waiting states until it lands on a
//! terminal outcome. Each failure is classified before any retry-count
//! check, so a fatal classification short-circuits remaining attempts. The
//! network await and the inter-attempt delay are the only suspension
//! points; cancellation and the optional call deadline are observed there.

mod outcome;


pub use outcome::{ArgumentError, FetchError, FetchOutcome};

use crate::control::{CancelToken, FetchControl};
use crate::decode::{Decoder, JsonDecoder};
use crate::retry::{classify, RetryDecision, RetryPolicy};
use crate::target::Target;
use crate::transport::{Transport, TransportError};
use serde::de::DeserializeOwned;
use tokio::time::Instant;

/// Retrying remote-data fetcher over an injected transport and decoder.
///
/// Owns no per-call state; one instance can serve any number of concurrent
/// `fetch` calls, each with its own attempt counter.
#[derive(Debug, Clone)]
pub struct Fetcher<T, D = JsonDecoder> {
    transport: T,
    decoder: D,
}

impl<T: Transport> Fetcher<T> {
    /// Fetcher decoding JSON bodies.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            decoder: JsonDecoder,
        }
    }
}

impl<T: Transport, D: Decoder> Fetcher<T, D> {
    pub fn with_decoder(transport: T, decoder: D) -> Self {
        Self { transport, decoder }
    }

    /// Fetch `target` and decode the response body into `V`.
    ///
    /// Transient transport failures are retried per `policy`, waiting the
    /// configured delay between attempts; fatal failures, decode failures
    /// and argument errors terminate immediately. The outcome is always
    /// returned as data, never raised.
    pub async fn fetch<V>(&self, target: &str, policy: &RetryPolicy) -> FetchOutcome<V>
    where
        V: DeserializeOwned,
    {
        self.fetch_with_control(target, policy, &FetchControl::new())
            .await
    }

    /// Like `fetch`, but cancellable through `control` and bounded by its
    /// optional deadline. Cancellation at any suspension point abandons
    /// remaining attempts and yields `FetchOutcome::Cancelled`.
    pub async fn fetch_with_control<V>(
        &self,
        target: &str,
        policy: &RetryPolicy,
        control: &FetchControl,
    ) -> FetchOutcome<V>
    where
        V: DeserializeOwned,
    {
        let target = match Target::parse(target) {
            Ok(t) => t,
            Err(e) => {
                return FetchOutcome::Failure {
                    error: FetchError::InvalidArgument(ArgumentError::Target(e)),
                    attempts: 0,
                }
            }
        };
        if policy.max_attempts == 0 {
            return FetchOutcome::Failure {
                error: FetchError::InvalidArgument(ArgumentError::ZeroAttempts),
                attempts: 0,
            };
        }

        let cancel = control.cancel_token();
        let deadline = control.deadline().map(|d| Instant::now() + d);

        let mut attempt = 1u32;
        loop {
            let result = tokio::select! {
                biased;
                _ = interrupted(&cancel, deadline) => {
                    tracing::debug!(url = %target, attempt, "cancelled while awaiting response");
                    return FetchOutcome::Cancelled { attempts: attempt - 1 };
                }
                r = self.transport.send(&target) => r,
            };

            let error = match result {
                Ok(response) if response.is_success() => {
                    match self.decoder.decode::<V>(response.body()) {
                        Ok(value) => {
                            tracing::debug!(url = %target, attempt, "fetch succeeded");
                            return FetchOutcome::Success {
                                value,
                                attempts: attempt,
                            };
                        }
                        Err(e) => {
                            tracing::warn!(url = %target, attempt, error = %e, "undecodable response body");
                            return FetchOutcome::Failure {
                                error: FetchError::Decode(e),
                                attempts: attempt,
                            };
                        }
                    }
                }
                Ok(response) => TransportError::Http(response.status()),
                Err(e) => e,
            };

            let kind = classify(&error);
            match policy.decide(attempt, kind) {
                RetryDecision::NoRetry => {
                    let error = if kind.is_transient() {
                        tracing::warn!(url = %target, attempts = attempt, error = %error, "attempts exhausted");
                        FetchError::Exhausted(error)
                    } else {
                        tracing::warn!(url = %target, attempt, error = %error, "fatal failure, not retrying");
                        FetchError::Fatal(error)
                    };
                    return FetchOutcome::Failure {
                        error,
                        attempts: attempt,
                    };
                }
                RetryDecision::RetryAfter(delay) => {
                    tracing::warn!(
                        url = %target,
                        attempt,
                        error = %error,
                        delay_ms = delay.as_millis() as u64,
                        "transient failure, retrying"
                    );
                    tokio::select! {
                        biased;
                        _ = interrupted(&cancel, deadline) => {
                            tracing::debug!(url = %target, attempt, "cancelled during retry delay");
                            return FetchOutcome::Cancelled { attempts: attempt };
                        }
                        _ = tokio::time::sleep(delay) => {}
                    }
                    attempt += 1;
                }
            }
        }
    }
}

/// Resolves when the call must stop: cancel token fired or deadline passed.
async fn interrupted(cancel: &CancelToken, deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::select! {
            _ = cancel.cancelled() => {}
            _ = tokio::time::sleep_until(at) => {}
        },
        None => cancel.cancelled().await,
    }
}
