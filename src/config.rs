//! Storefront configuration.

use std::time::Duration;

use serde::Deserialize;

use crate::money::Minor;

/// Tunable storefront behaviour, deserializable from the host application's
/// configuration source.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorefrontConfig {
    /// Post-discount subtotal at or above which shipping is free.
    pub free_shipping_threshold: Minor,

    /// Attempts for idempotent store reads before surfacing the failure.
    pub read_retry_attempts: u32,

    /// Initial backoff between read retries, in milliseconds. Doubles per
    /// attempt.
    pub read_retry_backoff_ms: u64,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            free_shipping_threshold: 500_000,
            read_retry_attempts: 3,
            read_retry_backoff_ms: 100,
        }
    }
}

impl StorefrontConfig {
    /// Initial read-retry backoff as a [`Duration`].
    #[must_use]
    pub const fn read_retry_backoff(&self) -> Duration {
        Duration::from_millis(self.read_retry_backoff_ms)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn defaults_applied_for_missing_fields() -> TestResult {
        let config: StorefrontConfig = serde_json::from_str("{}")?;

        assert_eq!(config.free_shipping_threshold, 500_000);
        assert_eq!(config.read_retry_attempts, 3);

        Ok(())
    }

    #[test]
    fn overrides_deserialize() -> TestResult {
        let config: StorefrontConfig =
            serde_json::from_str(r#"{"free_shipping_threshold": 250000}"#)?;

        assert_eq!(config.free_shipping_threshold, 250_000);
        assert_eq!(config.read_retry_backoff(), Duration::from_millis(100));

        Ok(())
    }
}
