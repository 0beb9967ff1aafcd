//! Range summaries: resolve every day of a range, then summarize.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use greengive_core::{Date, DateRange, RateSeries};

use crate::error::{EngineError, EngineResult};
use crate::provider::ResilientRateProvider;
use crate::statistics::{Breakdown, StatisticsEngine, SummaryResult};

/// Default number of dates resolved at once within one request.
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Default upper bound on the number of days in one request.
pub const DEFAULT_MAX_RANGE_DAYS: usize = 366;

/// A summary request over an inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryRequest {
    /// Days to cover
    pub range: DateRange,
    /// Whether to include the per-day breakdown
    pub breakdown: Breakdown,
}

impl SummaryRequest {
    /// Build a request from its parts.
    pub fn new(start: Date, end: Date, breakdown: Breakdown) -> EngineResult<Self> {
        Ok(Self {
            range: DateRange::new(start, end)?,
            breakdown,
        })
    }
}

/// Summary statistics plus the dates that had to be served from fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryReport {
    /// The computed statistics
    pub result: SummaryResult,
    /// Dates resolved from the fallback store, ascending
    pub degraded_dates: Vec<Date>,
}

impl SummaryReport {
    /// Whether any date was served from fallback.
    pub fn is_degraded(&self) -> bool {
        !self.degraded_dates.is_empty()
    }
}

/// Composes the resilient provider and the statistics engine.
pub struct SummaryService {
    provider: Arc<ResilientRateProvider>,
    max_range_days: usize,
    max_concurrency: usize,
}

impl SummaryService {
    /// Create a service with the default range bound.
    pub fn new(provider: Arc<ResilientRateProvider>) -> Self {
        Self {
            provider,
            max_range_days: DEFAULT_MAX_RANGE_DAYS,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }

    /// Override the maximum number of days per request.
    pub fn with_max_range_days(mut self, max_range_days: usize) -> Self {
        self.max_range_days = max_range_days.max(1);
        self
    }

    /// Override how many dates of one request are resolved at once.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// The underlying provider.
    pub fn provider(&self) -> &Arc<ResilientRateProvider> {
        &self.provider
    }

    /// Resolve every day of the range and summarize it.
    ///
    /// Dates are resolved concurrently, at most `max_concurrency` at a time,
    /// and each resolution runs to completion. If any date fails, the earliest failing date's error is
    /// returned and no partial result is produced.
    pub async fn summarize(&self, request: SummaryRequest) -> EngineResult<SummaryReport> {
        let range = request.range;
        if range.num_days() > self.max_range_days {
            return Err(EngineError::InvalidRange(format!(
                "{}..={} spans {} days, at most {} allowed",
                range.start(),
                range.end(),
                range.num_days(),
                self.max_range_days
            )));
        }

        let resolved: Vec<_> = stream::iter(range.days().map(|date| self.provider.get_rate(date)))
            .buffered(self.max_concurrency)
            .collect()
            .await;

        let mut observations = Vec::with_capacity(resolved.len());
        let mut degraded_dates = Vec::new();
        for outcome in resolved {
            let rate = outcome?;
            if rate.origin.is_degraded() {
                degraded_dates.push(rate.observation.date);
            }
            observations.push(rate.observation);
        }

        let series = RateSeries::for_range(range, observations)?;
        let result = StatisticsEngine::summarize(&series, request.breakdown)?;

        if degraded_dates.is_empty() {
            info!(start = %range.start(), end = %range.end(), days = series.len(), "summary computed");
        } else {
            warn!(
                start = %range.start(),
                end = %range.end(),
                degraded = degraded_dates.len(),
                "summary computed with fallback rates"
            );
        }

        Ok(SummaryReport {
            result,
            degraded_dates,
        })
    }
}
