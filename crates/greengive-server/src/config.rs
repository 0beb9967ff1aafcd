//! Server configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use greengive_engine::{
    RetryPolicy, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_CONCURRENCY, DEFAULT_MAX_RANGE_DAYS,
};
use greengive_ext_frankfurter::FrankfurterConfig;

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Longest accepted summary range, in days
    #[serde(default = "default_max_range_days")]
    pub max_range_days: usize,

    /// Dates of one summary resolved at once
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Upstream rate source
    #[serde(default)]
    pub upstream: FrankfurterConfig,

    /// Rate cache
    #[serde(default)]
    pub cache: CacheConfig,

    /// Upstream retries
    #[serde(default)]
    pub retry: RetryConfig,

    /// Fallback dataset
    #[serde(default)]
    pub fallback: FallbackConfig,
}

/// Rate cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Entry time-to-live in seconds
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

/// Retry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Upstream attempts per date
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Wait after the first failure, in milliseconds
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Cap on any single wait, in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

/// Fallback dataset settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackConfig {
    /// JSON time-series file loaded at startup
    #[serde(default = "default_fallback_path")]
    pub path: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_range_days() -> usize {
    DEFAULT_MAX_RANGE_DAYS
}

fn default_max_concurrency() -> usize {
    DEFAULT_MAX_CONCURRENCY
}

fn default_ttl_secs() -> u64 {
    300
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_base_delay_ms() -> u64 {
    1_000
}

fn default_max_delay_ms() -> u64 {
    8_000
}

fn default_fallback_path() -> String {
    "data/sample_fx.json".to_string()
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            path: default_fallback_path(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_range_days: default_max_range_days(),
            max_concurrency: default_max_concurrency(),
            upstream: FrankfurterConfig::default(),
            cache: CacheConfig::default(),
            retry: RetryConfig::default(),
            fallback: FallbackConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &str) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, std::io::Error> {
        toml::from_str(content).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Cache time-to-live.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }

    /// Retry policy for upstream calls.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry.max_attempts,
            Duration::from_millis(self.retry.base_delay_ms),
            Duration::from_millis(self.retry.max_delay_ms),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.max_concurrency, 8);
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));
        assert_eq!(config.retry_policy(), RetryPolicy::default());
        assert_eq!(config.upstream.base_url, "https://api.frankfurter.app");
        assert_eq!(config.fallback.path, "data/sample_fx.json");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ServerConfig::from_toml_str(
            r#"
            port = 9000
            max_concurrency = 2

            [retry]
            base_delay_ms = 250

            [upstream]
            timeout_ms = 1500
            "#,
        )
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.max_concurrency, 2);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry_policy().delay_for_attempt(2), Duration::from_millis(500));
        assert_eq!(config.upstream.timeout_ms, 1500);
        assert_eq!(config.upstream.quote_currency, "USD");
    }

    #[test]
    fn test_invalid_toml() {
        let err = ServerConfig::from_toml_str("port = \"eighty\"").unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }
}
