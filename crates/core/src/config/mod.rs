//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (FOIARCH_*)
//! 2. TOML config file (if FOIARCH_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (FOIARCH_*)
/// 2. TOML config file (if FOIARCH_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite archive database.
    ///
    /// Set via FOIARCH_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Corpus label that every query is restricted to.
    ///
    /// Set via FOIARCH_CORPUS environment variable.
    #[serde(default = "default_corpus")]
    pub corpus: String,

    /// Time-to-live for memoized query results, in seconds.
    ///
    /// Set via FOIARCH_CACHE_TTL_SECS environment variable.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: i64,

    /// Per-query execution deadline in milliseconds.
    ///
    /// Set via FOIARCH_QUERY_TIMEOUT_MS environment variable.
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,

    /// Whether searches include the per-document listing by default.
    ///
    /// Set via FOIARCH_INCLUDE_LISTING environment variable.
    #[serde(default = "default_true")]
    pub include_listing: bool,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./foiarch.sqlite")
}

fn default_corpus() -> String {
    "pdb".into()
}

fn default_cache_ttl_secs() -> i64 {
    9_800 // 2h43m20s, carried over from the original deployment
}

fn default_query_timeout_ms() -> u64 {
    20_000
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            corpus: default_corpus(),
            cache_ttl_secs: default_cache_ttl_secs(),
            query_timeout_ms: default_query_timeout_ms(),
            include_listing: true,
        }
    }
}

impl AppConfig {
    /// Query deadline as a Duration.
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `FOIARCH_`
    /// 2. TOML file from `FOIARCH_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("FOIARCH_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("FOIARCH_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.db_path, PathBuf::from("./foiarch.sqlite"));
        assert_eq!(config.corpus, "pdb");
        assert_eq!(config.cache_ttl_secs, 9_800);
        assert_eq!(config.query_timeout_ms, 20_000);
        assert!(config.include_listing);
    }

    #[test]
    fn test_query_timeout_duration() {
        let config = AppConfig::default();
        assert_eq!(config.query_timeout(), Duration::from_millis(20_000));
    }
}
