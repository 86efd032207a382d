//! Upstream request retry logic
//!
//! Implements the retry loop shared by all network operations against
//! the upstream API.
//!
//! **Algorithm:**
//! 1. Attempt operation
//! 2. If successful, return result
//! 3. If rate limited (429): sleep the advertised `Retry-After` (or the
//!    policy default), then retry. Rate-limit waits do not consume the
//!    backoff budget.
//! 4. If transient (5xx, network reset): sleep the next exponential
//!    backoff step and retry, up to the budget.
//! 5. Any other error: return immediately (no retry)
//! 6. Budget exhausted: return the last error

use crate::services::unsplash_client::UnsplashError;
use std::time::Duration;

/// How a failed attempt is handled by the retry loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryClass {
    /// Sleep the advertised delay and retry; does not consume the budget
    RateLimited(Option<Duration>),
    /// Retry with exponential backoff, consuming the budget
    Transient,
    /// Surface immediately
    Fatal,
}

/// Retry schedule owned by one client instance
///
/// Defaults match the upstream contract: 3 retries beyond the initial
/// attempt, 1s/2s/4s backoff, 60s rate-limit wait when the upstream
/// does not advertise one. Tests inject millisecond-scale values.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum retries beyond the initial attempt
    pub max_retries: u32,
    /// Exponential backoff schedule, indexed by consumed-budget count
    pub backoff: Vec<Duration>,
    /// Rate-limit wait when no `Retry-After` header is present
    pub default_retry_after: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff: vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(4),
            ],
            default_retry_after: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Backoff delay for the given consumed-budget count
    fn backoff_delay(&self, consumed: u32) -> Duration {
        self.backoff
            .get(consumed as usize)
            .or(self.backoff.last())
            .copied()
            .unwrap_or(Duration::from_secs(1))
    }
}

/// Retry an upstream operation according to the policy.
///
/// # Arguments
/// * `operation_name` - Name for logging (e.g. "search_photos")
/// * `policy` - Retry schedule
/// * `operation` - Async closure performing one attempt
///
/// # Returns
/// Result from the operation, or the last error once the budget is
/// exhausted.
pub async fn retry_request<F, Fut, T>(
    operation_name: &str,
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, UnsplashError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, UnsplashError>>,
{
    let mut attempt = 0u32;
    let mut consumed = 0u32;

    loop {
        attempt += 1;

        if attempt > 1 {
            tracing::debug!(
                operation = operation_name,
                attempt,
                "Retrying upstream operation"
            );
        }

        let err = match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    tracing::debug!(
                        operation = operation_name,
                        attempt,
                        "Upstream operation succeeded after retry"
                    );
                }
                return Ok(result);
            }
            Err(err) => err,
        };

        match err.retry_class() {
            RetryClass::RateLimited(advertised) => {
                let wait = advertised.unwrap_or(policy.default_retry_after);
                tracing::warn!(
                    operation = operation_name,
                    attempt,
                    wait_ms = wait.as_millis() as u64,
                    "Rate limited by upstream, waiting before retry"
                );
                tokio::time::sleep(wait).await;
            }
            RetryClass::Transient => {
                if consumed >= policy.max_retries {
                    tracing::error!(
                        operation = operation_name,
                        attempt,
                        error = %err,
                        "Retry budget exhausted, surfacing last error"
                    );
                    return Err(err);
                }

                let delay = policy.backoff_delay(consumed);
                consumed += 1;
                tracing::warn!(
                    operation = operation_name,
                    attempt,
                    backoff_ms = delay.as_millis() as u64,
                    error = %err,
                    "Transient upstream failure, will retry after backoff"
                );
                tokio::time::sleep(delay).await;
            }
            RetryClass::Fatal => {
                return Err(err);
            }
        }
    }
}
