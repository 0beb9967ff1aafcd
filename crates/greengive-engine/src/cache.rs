//! Time-bounded in-memory rate cache.

use std::time::{Duration, Instant};

use dashmap::DashMap;

use greengive_core::{Date, RateObservation};

/// Default time-to-live for cached rates.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Rate cache keyed by date, entries expiring after a fixed TTL.
///
/// Reads and writes for the same date are serialized by the map's shard
/// lock, so a reader sees either the old entry or the new one in full.
pub struct RateCache {
    entries: DashMap<Date, CacheEntry>,
    ttl: Duration,
}

struct CacheEntry {
    observation: RateObservation,
    fetched_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() >= ttl
    }
}

impl RateCache {
    /// Create a new rate cache.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Time-to-live applied to every entry.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get an unexpired rate.
    pub fn get(&self, date: Date) -> Option<RateObservation> {
        self.entries
            .get(&date)
            .filter(|entry| !entry.is_expired(self.ttl))
            .map(|entry| entry.observation)
    }

    /// Store a rate, replacing any prior entry for its date.
    pub fn put(&self, observation: RateObservation) {
        self.entries.insert(
            observation.date,
            CacheEntry {
                observation,
                fetched_at: Instant::now(),
            },
        );
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove expired entries.
    pub fn purge_expired(&self) {
        let ttl = self.ttl;
        self.entries.retain(|_, entry| !entry.is_expired(ttl));
    }

    /// Clear all entries.
    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl Default for RateCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}
