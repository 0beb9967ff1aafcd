//! GREENGIVE: the resilient rate provider.
//!
//! Every upstream access goes through [`ResilientRateProvider::get_rate`]:
//!
//! ```text
//! get_rate(date) ─> RateCache ──hit──────────────────────────> Cache
//!                      │ miss
//!                      └─> RateSource × max_attempts ──ok───> Upstream (cached)
//!                             │ exhausted
//!                             └─> FallbackStore ──hit──────> Fallback (degraded)
//!                                    │ miss
//!                                    └─> UpstreamUnavailable
//! ```

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, warn};

use greengive_core::{Date, RateObservation};
use greengive_traits::{FallbackStore, RateSource, TraitError};

use crate::cache::RateCache;
use crate::error::{EngineError, EngineResult};
use crate::retry::RetryPolicy;

/// Where a resolved rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RateOrigin {
    /// Unexpired cache entry; no upstream call was made
    Cache,
    /// Fresh upstream value after `attempts` calls
    Upstream {
        /// Attempts used, including the successful one
        attempts: u32,
    },
    /// Static fallback value after `attempts` failed upstream calls
    Fallback {
        /// Failed upstream attempts
        attempts: u32,
    },
}

impl RateOrigin {
    /// Whether the rate was served from the fallback store.
    pub fn is_degraded(&self) -> bool {
        matches!(self, RateOrigin::Fallback { .. })
    }
}

/// A rate together with its origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedRate {
    /// The observation
    #[serde(flatten)]
    pub observation: RateObservation,
    /// How it was obtained
    pub origin: RateOrigin,
}

/// Cache-first, retrying, fallback-backed access to the upstream rate source.
pub struct ResilientRateProvider {
    source: Arc<dyn RateSource>,
    fallback: Arc<dyn FallbackStore>,
    cache: RateCache,
    retry: RetryPolicy,
}

impl ResilientRateProvider {
    /// Create a new provider. See also [`crate::ResilientRateProviderBuilder`].
    pub fn new(
        source: Arc<dyn RateSource>,
        fallback: Arc<dyn FallbackStore>,
        cache: RateCache,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            source,
            fallback,
            cache,
            retry,
        }
    }

    /// The provider's cache.
    pub fn cache(&self) -> &RateCache {
        &self.cache
    }

    /// The provider's fallback store.
    pub fn fallback(&self) -> &Arc<dyn FallbackStore> {
        &self.fallback
    }

    /// The provider's retry policy.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Resolve the rate for `date`.
    ///
    /// Fails only when the cache misses, every upstream attempt fails and
    /// the fallback store has no entry for the date.
    pub async fn get_rate(&self, date: Date) -> EngineResult<ResolvedRate> {
        if let Some(observation) = self.cache.get(date) {
            debug!(%date, "GREENGIVE: cache hit");
            return Ok(ResolvedRate {
                observation,
                origin: RateOrigin::Cache,
            });
        }

        match self.fetch_with_retry(date).await {
            Ok((observation, attempts)) => {
                self.cache.put(observation);
                Ok(ResolvedRate {
                    observation,
                    origin: RateOrigin::Upstream { attempts },
                })
            }
            Err(last_error) => self.resolve_from_fallback(date, last_error),
        }
    }

    /// Call the source until it succeeds or the policy runs out of attempts.
    ///
    /// Returns the observation and the attempt it succeeded on, or the last
    /// attempt's error.
    async fn fetch_with_retry(&self, date: Date) -> Result<(RateObservation, u32), TraitError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let err = match self.fetch_once(date).await {
                Ok(observation) => return Ok((observation, attempt)),
                Err(e) => e,
            };
            warn!(
                %date,
                attempt,
                max_attempts = self.retry.max_attempts,
                source = self.source.name(),
                source_type = ?self.source.source_type(),
                error = %err,
                "GREENGIVE: attempt failed"
            );
            match self.retry.delay_after(attempt) {
                Some(delay) if !delay.is_zero() => tokio::time::sleep(delay).await,
                Some(_) => {}
                None => return Err(err),
            }
        }
    }

    async fn fetch_once(&self, date: Date) -> Result<RateObservation, TraitError> {
        let raw = self.source.fetch_rate(date).await?;
        if raw.published != date {
            debug!(%date, published = %raw.published, "upstream published rate for an earlier date");
        }
        Ok(RateObservation::from_f64(date, raw.rate)?)
    }

    fn resolve_from_fallback(&self, date: Date, last_error: TraitError) -> EngineResult<ResolvedRate> {
        let attempts = self.retry.max_attempts;
        match self.fallback.lookup(date) {
            Some(observation) => {
                warn!(%date, attempts, "GREENGIVE: all retries failed, serving fallback rate");
                Ok(ResolvedRate {
                    observation,
                    origin: RateOrigin::Fallback { attempts },
                })
            }
            None => {
                error!(%date, attempts, error = %last_error, "GREENGIVE: all retries failed, no fallback rate");
                Err(EngineError::UpstreamUnavailable {
                    date,
                    attempts,
                    last_error: last_error.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{d, MapFallback, ScriptedSource};
    use crate::ResilientRateProviderBuilder;
    use rust_decimal_macros::dec;
    use std::time::Duration;

    fn provider(source: Arc<ScriptedSource>, fallback: MapFallback) -> ResilientRateProvider {
        ResilientRateProviderBuilder::new()
            .with_source(source)
            .with_fallback(Arc::new(fallback))
            .with_retry_policy(RetryPolicy::immediate(3))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_fresh_fetch_is_cached() {
        let source = Arc::new(ScriptedSource::new(&[(d("2025-07-01"), 1.05)]));
        let provider = provider(source.clone(), MapFallback::empty());

        let first = provider.get_rate(d("2025-07-01")).await.unwrap();
        assert_eq!(first.observation.rate, dec!(1.05));
        assert_eq!(first.origin, RateOrigin::Upstream { attempts: 1 });

        let second = provider.get_rate(d("2025-07-01")).await.unwrap();
        assert_eq!(second.origin, RateOrigin::Cache);
        assert_eq!(second.observation, first.observation);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_expired_entry_refetches() {
        let source = Arc::new(ScriptedSource::new(&[(d("2025-07-01"), 1.05)]));
        let provider = ResilientRateProviderBuilder::new()
            .with_source(source.clone())
            .with_fallback(Arc::new(MapFallback::empty()))
            .with_cache_ttl(Duration::from_millis(20))
            .with_retry_policy(RetryPolicy::immediate(3))
            .build()
            .unwrap();

        provider.get_rate(d("2025-07-01")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        let again = provider.get_rate(d("2025-07-01")).await.unwrap();

        assert_eq!(again.origin, RateOrigin::Upstream { attempts: 1 });
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_recovers_on_later_attempt() {
        let source = Arc::new(ScriptedSource::new(&[(d("2025-07-01"), 1.05)]).failing_first(2));
        let provider = provider(source.clone(), MapFallback::empty());

        let resolved = provider.get_rate(d("2025-07-01")).await.unwrap();
        assert_eq!(resolved.origin, RateOrigin::Upstream { attempts: 3 });
        assert_eq!(source.calls(), 3);
        assert!(provider.cache().get(d("2025-07-01")).is_some());
    }

    #[tokio::test]
    async fn test_fallback_after_exhaustion() {
        let source = Arc::new(ScriptedSource::always_failing());
        let fallback = MapFallback::with(&[(d("2025-07-01"), dec!(1.0441))]);
        let provider = provider(source.clone(), fallback);

        let resolved = provider.get_rate(d("2025-07-01")).await.unwrap();
        assert_eq!(resolved.observation.rate, dec!(1.0441));
        assert_eq!(resolved.origin, RateOrigin::Fallback { attempts: 3 });
        assert!(resolved.origin.is_degraded());
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test]
    async fn test_fallback_values_are_not_cached() {
        let source = Arc::new(ScriptedSource::always_failing());
        let fallback = MapFallback::with(&[(d("2025-07-01"), dec!(1.0441))]);
        let provider = provider(source.clone(), fallback);

        provider.get_rate(d("2025-07-01")).await.unwrap();
        provider.get_rate(d("2025-07-01")).await.unwrap();
        assert!(provider.cache().is_empty());
        assert_eq!(source.calls(), 6);
    }

    #[tokio::test]
    async fn test_total_failure_reports_attempts() {
        let source = Arc::new(ScriptedSource::always_failing());
        let provider = provider(source.clone(), MapFallback::empty());

        let err = provider.get_rate(d("2025-07-01")).await.unwrap_err();
        match err {
            EngineError::UpstreamUnavailable {
                date,
                attempts,
                last_error,
            } => {
                assert_eq!(date, d("2025-07-01"));
                assert_eq!(attempts, 3);
                assert!(last_error.contains("scripted failure #3"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test]
    async fn test_invalid_payload_counts_as_failed_attempt() {
        let source = Arc::new(ScriptedSource::new(&[
            (d("2025-07-01"), f64::NAN),
            (d("2025-07-02"), -1.0),
            (d("2025-07-03"), 0.0),
        ]));
        let provider = provider(source.clone(), MapFallback::empty());

        for day in ["2025-07-01", "2025-07-02", "2025-07-03"] {
            let err = provider.get_rate(d(day)).await.unwrap_err();
            assert!(matches!(err, EngineError::UpstreamUnavailable { attempts: 3, .. }));
            assert_eq!(source.calls_for(d(day)), 3);
        }
        assert!(provider.cache().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_waits_between_attempts_only() {
        let source = Arc::new(ScriptedSource::always_failing());
        let provider = ResilientRateProviderBuilder::new()
            .with_source(source.clone())
            .with_fallback(Arc::new(MapFallback::empty()))
            .with_retry_policy(RetryPolicy::default())
            .build()
            .unwrap();

        let started = tokio::time::Instant::now();
        let _ = provider.get_rate(d("2025-07-01")).await;
        let elapsed = started.elapsed();

        // 1s after attempt 1, 2s after attempt 2, nothing after attempt 3
        assert!(elapsed >= Duration::from_secs(3), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_secs(4), "elapsed {elapsed:?}");
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_does_not_block_other_dates() {
        let source = Arc::new(ScriptedSource::new(&[(d("2025-07-02"), 1.06)]));
        let provider = Arc::new(
            ResilientRateProviderBuilder::new()
                .with_source(source.clone())
                .with_fallback(Arc::new(MapFallback::with(&[(d("2025-07-01"), dec!(1.05))])))
                .with_retry_policy(RetryPolicy::default())
                .build()
                .unwrap(),
        );

        let slow = {
            let provider = provider.clone();
            tokio::spawn(async move { provider.get_rate(d("2025-07-01")).await })
        };
        let started = tokio::time::Instant::now();
        let fast = provider.get_rate(d("2025-07-02")).await.unwrap();
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(fast.origin, RateOrigin::Upstream { attempts: 1 });

        let slow = slow.await.unwrap().unwrap();
        assert_eq!(slow.origin, RateOrigin::Fallback { attempts: 3 });
    }

    #[test]
    fn test_resolved_rate_serialization() {
        let resolved = ResolvedRate {
            observation: RateObservation::new(d("2025-07-01"), dec!(1.05)).unwrap(),
            origin: RateOrigin::Upstream { attempts: 2 },
        };
        let json = serde_json::to_value(resolved).unwrap();
        assert_eq!(json["date"], "2025-07-01");
        assert_eq!(json["origin"]["kind"], "upstream");
        assert_eq!(json["origin"]["attempts"], 2);
    }
}
