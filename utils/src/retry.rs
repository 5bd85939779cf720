//! Exponential-backoff retry for transient failures.
//!
//! A higher-order combinator rather than a decorator: the caller hands an
//! async closure and a [`RetryPolicy`], and gets back the operation's
//! result or a typed exhaustion error. Used for read operations only —
//! transaction submission is never retried here.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;

/// Backoff parameters for [`retry_with_backoff`].
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the second attempt.
    pub base_delay: Duration,
    /// Cap applied to every computed delay.
    pub max_delay: Duration,
    /// Multiplier between consecutive delays.
    pub factor: u32,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            max_delay: Duration::from_secs(60),
            factor: 2,
        }
    }

    /// Delay before the attempt following failure number `attempt` (1-based).
    fn delay_for(&self, attempt: u32) -> Duration {
        let exp = self.factor.saturating_pow(attempt.saturating_sub(1));
        self.base_delay
            .saturating_mul(exp)
            .min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(2))
    }
}

#[derive(Debug, Error)]
#[error("operation '{operation}' failed after {attempts} attempts: {last_error}")]
pub struct RetryExhausted {
    pub operation: String,
    pub attempts: u32,
    pub last_error: String,
}

/// Run `op` until it succeeds or the policy is exhausted.
///
/// Each failure is logged at warn level with the upcoming delay; the final
/// failure is returned as [`RetryExhausted`] carrying the last error text.
pub async fn retry_with_backoff<T, E, F, Fut>(
    policy: RetryPolicy,
    operation: &str,
    mut op: F,
) -> Result<T, RetryExhausted>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut last_error = String::new();

    for attempt in 1..=policy.max_attempts {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                last_error = e.to_string();
                if attempt == policy.max_attempts {
                    tracing::error!(
                        operation,
                        attempts = attempt,
                        error = %last_error,
                        "retry budget exhausted"
                    );
                    break;
                }
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    operation,
                    attempt,
                    max_attempts = policy.max_attempts,
                    error = %last_error,
                    "attempt failed, retrying in {:.1}s",
                    delay.as_secs_f64()
                );
                tokio::time::sleep(delay).await;
            }
        }
    }

    Err(RetryExhausted {
        operation: operation.to_string(),
        attempts: policy.max_attempts,
        last_error,
    })
}
