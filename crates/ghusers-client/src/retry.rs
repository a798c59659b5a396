//! Retry with exponential back-off for remote profile lookups.
//!
//! [`retry_with_backoff`] re-runs an attempt while the caller-supplied
//! classifier reports a transient outcome. Unlike a plain error-retry loop it
//! hands back the **last outcome as-is** once retries are spent, so a final
//! 404 reaches the caller as a response rather than a synthetic error.

use std::future::Future;
use std::time::Duration;

use reqwest::StatusCode;

/// Retry budget and back-off schedule for one fetch.
///
/// Defaults mirror the production policy: six retries waiting 2, 4, 8, 16,
/// 32, and 64 seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first one.
    pub max_retries: u32,
    /// The n-th retry waits `backoff_base_secs * 2^(n-1)` seconds.
    pub backoff_base_secs: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 6,
            backoff_base_secs: 2,
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_retries: u32, backoff_base_secs: u64) -> Self {
        Self {
            max_retries,
            backoff_base_secs,
        }
    }

    /// A policy that makes exactly one attempt.
    #[must_use]
    pub fn none() -> Self {
        Self::new(0, 0)
    }

    /// Delay before the 1-indexed `retry`. Saturates instead of overflowing.
    #[must_use]
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(62);
        Duration::from_secs(self.backoff_base_secs.saturating_mul(1u64 << exponent))
    }
}

/// Status and body of one completed HTTP exchange.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Returns `true` for outcomes worth another attempt after a back-off delay.
///
/// **Transient:**
/// - Any transport failure (connect, timeout, reset, body read).
/// - HTTP 404.
/// - HTTP 408 and 5xx.
///
/// Every other status, including success, is final.
pub(crate) fn is_transient(outcome: &Result<RawResponse, reqwest::Error>) -> bool {
    match outcome {
        Err(_) => true,
        Ok(response) => {
            response.status == StatusCode::NOT_FOUND
                || response.status == StatusCode::REQUEST_TIMEOUT
                || response.status.is_server_error()
        }
    }
}

/// Runs `operation` and retries it per `policy` while `is_transient` holds.
///
/// Returns the first non-transient outcome, or the last outcome once
/// `policy.max_retries` additional attempts have been made.
pub(crate) async fn retry_with_backoff<T, C, F, Fut>(
    policy: RetryPolicy,
    is_transient: C,
    mut operation: F,
) -> T
where
    C: Fn(&T) -> bool,
    F: FnMut() -> Fut,
    Fut: Future<Output = T>,
{
    let mut retry = 0u32;
    loop {
        let outcome = operation().await;
        if !is_transient(&outcome) || retry >= policy.max_retries {
            return outcome;
        }
        retry += 1;
        let delay = policy.delay_for(retry);
        tracing::warn!(
            attempt = retry,
            max_retries = policy.max_retries,
            delay_secs = delay.as_secs(),
            "transient profile fetch outcome, retrying after back-off"
        );
        tokio::time::sleep(delay).await;
    }
}
