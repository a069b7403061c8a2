//! Retry policy with exponential backoff
//!
//! Wraps store operations with bounded retries to ride out transient
//! failures (connectivity loss, replica elections). Which errors count
//! as transient is decided by a classifier predicate supplied per call
//! site, so the policy itself stays free of driver types.

use rand::Rng;
use std::future::Future;
use std::time::Duration;

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempt cap, including the initial attempt
    pub max_attempts: u32,
    /// Delay before the first retry
    pub base_delay: Duration,
    /// Maximum delay (caps exponential growth)
    pub max_delay: Duration,
    /// Jitter factor (0.0-1.0) for randomizing delays to prevent thundering herd
    pub jitter_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(4),
            max_delay: Duration::from_secs(10),
            jitter_factor: 0.2,
        }
    }
}

impl RetryPolicy {
    /// Calculate delay for a given attempt number using exponential backoff with jitter
    fn calculate_delay(&self, attempt: u32) -> Duration {
        let base = self.base_delay.as_millis() as u64;
        // Exponential: base * 2^(attempt-1)
        let exponential = base.saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)));
        let capped = exponential.min(self.max_delay.as_millis() as u64);

        // Add jitter: ±jitter_factor around the delay
        let jitter_range = (capped as f64 * self.jitter_factor) as i64;
        let millis = if jitter_range > 0 {
            let jitter = rand::thread_rng().gen_range(-jitter_range..=jitter_range);
            (capped as i64 + jitter).max(0) as u64
        } else {
            capped
        };

        Duration::from_millis(millis)
    }

    /// Run `operation`, retrying transient failures up to the attempt cap.
    ///
    /// Errors the classifier rejects propagate immediately; the last
    /// transient error surfaces once the cap is exhausted.
    pub async fn execute<T, E, F, Fut, C>(
        &self,
        operation_name: &str,
        is_transient: C,
        operation: F,
    ) -> Result<T, E>
    where
        E: std::fmt::Display,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        C: Fn(&E) -> bool,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::info!(
                            attempt,
                            operation = operation_name,
                            "store operation succeeded after retry"
                        );
                    }
                    return Ok(value);
                }
                Err(e) => {
                    if !is_transient(&e) {
                        tracing::error!(
                            error = %e,
                            operation = operation_name,
                            "store operation failed with non-retryable error"
                        );
                        return Err(e);
                    }

                    if attempt >= max_attempts {
                        tracing::error!(
                            attempts = attempt,
                            error = %e,
                            operation = operation_name,
                            "store operation failed after all retry attempts"
                        );
                        return Err(e);
                    }

                    let delay = self.calculate_delay(attempt);
                    tracing::warn!(
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        operation = operation_name,
                        "store operation failed, retrying..."
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
