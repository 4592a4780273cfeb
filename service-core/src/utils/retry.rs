//! Opt-in retry with exponential backoff for outbound HTTP calls.
//!
//! Only errors that report themselves as retryable (rate limiting) are
//! retried; everything else propagates on the first failure. The delay before
//! retry `n` (0-based) is `base_delay * 2^n`.

use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

/// Configuration for retry behavior.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (not including the initial attempt).
    pub max_retries: u32,
    /// Delay before the first retry; doubles on every further retry.
    pub base_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryConfig {
    /// Create a new retry config with the specified max retries.
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    /// Create a config with no retries.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Calculate backoff duration for a given attempt.
    pub fn backoff_duration(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }
}

/// Errors that can tell the retry loop whether another attempt may succeed.
pub trait RetryableError {
    fn is_retryable(&self) -> bool;
}

/// Execute `f`, retrying retryable failures with `tokio::time::sleep` between attempts.
///
/// # Example
/// ```ignore
/// let users = retry_with_backoff(&RetryConfig::default(), "list_users", || async {
///     client.request(Method::GET, "/user_management/users", None, &query).await
/// })
/// .await?;
/// ```
pub async fn retry_with_backoff<F, Fut, T, E>(
    config: &RetryConfig,
    operation_name: &str,
    f: F,
) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: RetryableError + std::fmt::Display,
{
    retry_with_backoff_using(config, operation_name, tokio::time::sleep, f).await
}

/// Like [`retry_with_backoff`] with a caller-supplied sleep function.
pub async fn retry_with_backoff_using<F, Fut, T, E, S, SFut>(
    config: &RetryConfig,
    operation_name: &str,
    mut sleep: S,
    f: F,
) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: RetryableError + std::fmt::Display,
    S: FnMut(Duration) -> SFut,
    SFut: Future<Output = ()>,
{
    let mut attempt = 0;

    loop {
        match f().await {
            Ok(result) => {
                if attempt > 0 {
                    info!(
                        operation = operation_name,
                        attempt = attempt + 1,
                        "Call succeeded after retry"
                    );
                }
                return Ok(result);
            }
            Err(err) => {
                if !err.is_retryable() {
                    return Err(err);
                }

                if attempt >= config.max_retries {
                    warn!(
                        operation = operation_name,
                        attempt = attempt + 1,
                        error = %err,
                        "Call failed after max retries"
                    );
                    return Err(err);
                }

                let backoff = config.backoff_duration(attempt);
                warn!(
                    operation = operation_name,
                    attempt = attempt + 1,
                    error = %err,
                    backoff_ms = backoff.as_millis() as u64,
                    "Call rate limited, retrying after backoff"
                );

                sleep(backoff).await;
                attempt += 1;
            }
        }
    }
}
