//! Rate source traits.
//!
//! These traits define the two places a rate can come from:
//! - [`RateSource`]: the upstream provider, one date per call, may fail
//! - [`FallbackStore`]: a read-only local dataset consulted once the
//!   upstream is exhausted

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::TraitError;
use greengive_core::{Date, RateObservation};

/// Source type for rate data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceType {
    /// Snapshot/request-response (REST APIs)
    Snapshot,
    /// In-process (tests, static data)
    Memory,
}

// =============================================================================
// RATE SOURCE
// =============================================================================

/// Unvalidated rate as reported by an upstream source.
///
/// The rate is kept as `f64` so the caller can reject NaN, infinities and
/// non-positive values before it becomes a [`RateObservation`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRate {
    /// Date the rate was requested for
    pub date: Date,
    /// Publication date reported by the upstream (may precede `date` on
    /// weekends and holidays)
    pub published: Date,
    /// Quote currency units per base currency unit
    pub rate: f64,
    /// Source of the rate
    pub source: String,
}

/// Trait for upstream providers of one day's rate.
///
/// Implementations must bound each call with their own deadline.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Source type.
    fn source_type(&self) -> SourceType;

    /// Human-readable source name for logs.
    fn name(&self) -> &str;

    /// Fetch the rate for a single date.
    async fn fetch_rate(&self, date: Date) -> Result<RawRate, TraitError>;
}

// =============================================================================
// FALLBACK STORE
// =============================================================================

/// Trait for read-only local rate datasets.
///
/// Loaded once, immutable afterwards; a missing date is not an error.
pub trait FallbackStore: Send + Sync {
    /// Look up the stored rate for a date.
    fn lookup(&self, date: Date) -> Option<RateObservation>;

    /// Number of stored dates.
    fn len(&self) -> usize;

    /// Whether the store holds no dates.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
