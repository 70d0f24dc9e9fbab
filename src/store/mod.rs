//! Store access.
//!
//! The storefront persists nothing itself; every collection lives in an
//! external store reached through the per-domain repository traits. This
//! module carries the shared error type and the bounded retry used for
//! idempotent reads.

pub mod memory;

use std::time::Duration;

use thiserror::Error;
use tracing::warn;

use crate::config::StorefrontConfig;

/// Errors surfaced by the external store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The requested record does not exist.
    #[error("record not found")]
    NotFound,

    /// The store could not be reached or the request failed in transit.
    #[error("store request failed: {reason}")]
    Unavailable {
        /// Human-readable failure description from the client.
        reason: String,
    },
}

impl StoreError {
    /// A [`StoreError::Unavailable`] with the given reason.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Whether retrying the same request could succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// Retry budget for idempotent reads.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub attempts: u32,

    /// Backoff before the second attempt. Doubles per retry.
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            initial_backoff: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    /// Builds the policy from storefront configuration.
    #[must_use]
    pub const fn from_config(config: &StorefrontConfig) -> Self {
        Self {
            attempts: config.read_retry_attempts,
            initial_backoff: config.read_retry_backoff(),
        }
    }
}

/// Runs an idempotent read, retrying transient failures with doubling
/// backoff until the policy's attempt budget is spent.
///
/// Only [`StoreError::Unavailable`] is retried; `NotFound` is a definitive
/// answer. Writes must not go through this.
///
/// # Errors
///
/// Returns the last [`StoreError`] once the budget is exhausted, or the
/// first non-transient error immediately.
pub async fn retry_read<T, F, Fut>(policy: RetryPolicy, mut read: F) -> Result<T, StoreError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    let attempts = policy.attempts.max(1);
    let mut backoff = policy.initial_backoff;
    let mut attempt = 1;

    loop {
        match read().await {
            Ok(value) => return Ok(value),
            Err(error) if error.is_transient() && attempt < attempts => {
                warn!(attempt, error = %error, "transient store read failure; retrying");

                tokio::time::sleep(backoff).await;

                backoff = backoff.saturating_mul(2);
                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use testresult::TestResult;

    use super::*;

    fn immediate_policy(attempts: u32) -> RetryPolicy {
        RetryPolicy {
            attempts,
            initial_backoff: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn succeeds_first_try() -> TestResult {
        let calls = AtomicU32::new(0);

        let value = retry_read(immediate_policy(3), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, StoreError>(7) }
        })
        .await?;

        assert_eq!(value, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        Ok(())
    }

    #[tokio::test]
    async fn retries_transient_then_succeeds() -> TestResult {
        let calls = AtomicU32::new(0);

        let value = retry_read(immediate_policy(3), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(StoreError::unavailable("connection reset"))
                } else {
                    Ok(42)
                }
            }
        })
        .await?;

        assert_eq!(value, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        Ok(())
    }

    #[tokio::test]
    async fn exhausted_budget_surfaces_last_error() {
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = retry_read(immediate_policy(2), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(StoreError::unavailable("down")) }
        })
        .await;

        assert!(result.is_err(), "expected failure after budget spent");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn not_found_is_not_retried() {
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = retry_read(immediate_policy(5), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(StoreError::NotFound) }
        })
        .await;

        assert_eq!(result, Err(StoreError::NotFound));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
