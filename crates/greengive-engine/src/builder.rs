//! Builder pattern for the resilient rate provider.

use std::sync::Arc;
use std::time::Duration;

use greengive_traits::{FallbackStore, RateSource};

use crate::cache::RateCache;
use crate::error::EngineError;
use crate::provider::ResilientRateProvider;
use crate::retry::RetryPolicy;

/// Builder for constructing a [`ResilientRateProvider`].
pub struct ResilientRateProviderBuilder {
    source: Option<Arc<dyn RateSource>>,
    fallback: Option<Arc<dyn FallbackStore>>,
    cache: Option<RateCache>,
    retry: Option<RetryPolicy>,
}

impl ResilientRateProviderBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            source: None,
            fallback: None,
            cache: None,
            retry: None,
        }
    }

    /// Set the upstream rate source.
    pub fn with_source(mut self, source: Arc<dyn RateSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Set the fallback store.
    pub fn with_fallback(mut self, fallback: Arc<dyn FallbackStore>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Use a specific cache instance.
    pub fn with_cache(mut self, cache: RateCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Use a fresh cache with the given TTL.
    pub fn with_cache_ttl(self, ttl: Duration) -> Self {
        self.with_cache(RateCache::new(ttl))
    }

    /// Set the retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Build the provider.
    pub fn build(self) -> Result<ResilientRateProvider, EngineError> {
        let source = self
            .source
            .ok_or_else(|| EngineError::ConfigError("rate source not configured".into()))?;

        let fallback = self
            .fallback
            .ok_or_else(|| EngineError::ConfigError("fallback store not configured".into()))?;

        Ok(ResilientRateProvider::new(
            source,
            fallback,
            self.cache.unwrap_or_default(),
            self.retry.unwrap_or_default(),
        ))
    }
}

impl Default for ResilientRateProviderBuilder {
    fn default() -> Self {
        Self::new()
    }
}
