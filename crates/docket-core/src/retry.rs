//! Bounded retry with exponential backoff.
//!
//! Every retry loop in the pipeline (extraction, OCR, index readiness)
//! goes through this combinator so that attempt bounds and delays are
//! declared in one place instead of duplicated at each call site.

use std::fmt;
use std::time::Duration;

/// Tracing target for retry operations.
const TRACING_TARGET: &str = "docket_core::retry";

/// Retry policy: maximum retries and base delay for exponential backoff.
///
/// `max_retries` counts retries, not attempts; a policy with
/// `max_retries = 2` runs the operation at most three times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the initial attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each subsequent retry.
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Creates a new retry policy.
    pub const fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Policy for text extraction and OCR: 2 retries starting at 500ms.
    pub const fn extraction() -> Self {
        Self::new(2, Duration::from_millis(500))
    }

    /// Returns the delay before the retry following `attempt` (0-based).
    fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(1u32 << attempt.min(16))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(2, Duration::from_millis(500))
    }
}

/// Runs `operation` until it succeeds, the error is not retryable, or the
/// policy's retry bound is exhausted.
///
/// The final error is returned unchanged; intermediate failures are logged
/// with the operation name and attempt number.
pub async fn retry_with_backoff<T, E, F, Fut, P>(
    policy: RetryPolicy,
    operation: &str,
    mut is_retryable: P,
    mut run: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
    P: FnMut(&E) -> bool,
{
    let mut attempt = 0u32;

    loop {
        match run().await {
            Ok(value) => return Ok(value),
            Err(error) if attempt < policy.max_retries && is_retryable(&error) => {
                let delay = policy.delay_for(attempt);
                attempt += 1;

                tracing::warn!(
                    target: TRACING_TARGET,
                    operation = %operation,
                    attempt = %attempt,
                    max_retries = %policy.max_retries,
                    delay_ms = %delay.as_millis(),
                    error = %error,
                    "Operation failed, retrying after backoff"
                );

                tokio::time::sleep(delay).await;
            }
            Err(error) => return Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy::new(max_retries, Duration::from_millis(1))
    }

    #[tokio::test]
    async fn succeeds_without_retrying() {
        let calls = AtomicU32::new(0);

        let result: Result<u32, String> =
            retry_with_backoff(fast_policy(2), "noop", |_| true, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(42) }
            })
            .await;

        assert_eq!(result, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_until_success() {
        let calls = AtomicU32::new(0);

        let result: Result<u32, String> =
            retry_with_backoff(fast_policy(3), "flaky", |_| true, || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err("transient".to_string())
                    } else {
                        Ok(7)
                    }
                }
            })
            .await;

        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausts_retry_bound() {
        let calls = AtomicU32::new(0);

        let result: Result<u32, String> =
            retry_with_backoff(fast_policy(2), "broken", |_| true, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("permanent".to_string()) }
            })
            .await;

        assert_eq!(result, Err("permanent".to_string()));
        // Initial attempt plus two retries.
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn respects_retryability_predicate() {
        let calls = AtomicU32::new(0);

        let result: Result<u32, String> =
            retry_with_backoff(fast_policy(5), "fatal", |_| false, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("do not retry".to_string()) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
