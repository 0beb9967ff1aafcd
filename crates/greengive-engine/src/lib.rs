//! # GreenGive Engine
//!
//! The resilience layer and statistics engine for GreenGive.
//!
//! This crate provides:
//! - [`RateCache`]: Date-keyed rate cache with a fixed time-to-live
//! - [`RetryPolicy`]: Bounded attempts with exponential backoff
//! - [`ResilientRateProvider`]: Cache-first, retrying, fallback-backed rate access
//! - [`StatisticsEngine`]: Start/end/mean rates and percentage changes
//! - [`SummaryService`]: Range resolution feeding the statistics engine
//!
//! ## Architecture
//!
//! ```text
//! SummaryService ─> ResilientRateProvider ─┬─> RateCache
//!       │                                  ├─> RateSource (retry/backoff)
//!       │                                  └─> FallbackStore
//!       └─> StatisticsEngine ─> SummaryResult
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let provider = ResilientRateProviderBuilder::new()
//!     .with_source(Arc::new(frankfurter))
//!     .with_fallback(Arc::new(fallback_store))
//!     .with_retry_policy(RetryPolicy::default())
//!     .build()?;
//!
//! let service = SummaryService::new(Arc::new(provider));
//! let report = service.summarize(request).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
pub mod cache;
pub mod error;
pub mod provider;
pub mod retry;
pub mod statistics;
pub mod summary;

#[cfg(test)]
mod testing;

// Re-exports
pub use builder::ResilientRateProviderBuilder;
pub use cache::{RateCache, DEFAULT_CACHE_TTL};
pub use error::{EngineError, EngineResult};
pub use provider::{RateOrigin, ResilientRateProvider, ResolvedRate};
pub use retry::{RetryPolicy, DEFAULT_MAX_ATTEMPTS};
pub use statistics::{
    Breakdown, DailyChange, StatisticsEngine, SummaryResult, UnknownBreakdown, STAT_DECIMALS,
};
pub use summary::{
    SummaryReport, SummaryRequest, SummaryService, DEFAULT_MAX_CONCURRENCY, DEFAULT_MAX_RANGE_DAYS,
};
