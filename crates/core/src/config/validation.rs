//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `corpus` is empty or contains characters outside `[a-z0-9_-]`
    /// - `cache_ttl_secs` is less than 1s or exceeds 7 days
    /// - `query_timeout_ms` is less than 100ms or exceeds 5 minutes
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.corpus.is_empty() {
            return Err(ConfigError::Invalid { field: "corpus".into(), reason: "must not be empty".into() });
        }
        if !self
            .corpus
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
        {
            return Err(ConfigError::Invalid {
                field: "corpus".into(),
                reason: "must contain only [a-z0-9_-]".into(),
            });
        }

        if self.cache_ttl_secs < 1 {
            return Err(ConfigError::Invalid {
                field: "cache_ttl_secs".into(),
                reason: "must be at least 1 second".into(),
            });
        }
        if self.cache_ttl_secs > 7 * 24 * 3600 {
            return Err(ConfigError::Invalid {
                field: "cache_ttl_secs".into(),
                reason: "must not exceed 7 days (604800s)".into(),
            });
        }

        if self.query_timeout_ms < 100 {
            return Err(ConfigError::Invalid {
                field: "query_timeout_ms".into(),
                reason: "must be at least 100ms".into(),
            });
        }
        if self.query_timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "query_timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        Ok(())
    }
}
