//! Fake sources shared by the engine's unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;

use greengive_core::{Date, RateObservation};
use greengive_traits::{FallbackStore, RateSource, RawRate, SourceType, TraitError};

/// Rate source answering from a fixed table, failing its first `fail_first` calls.
pub(crate) struct ScriptedSource {
    rates: HashMap<Date, f64>,
    fail_first: u32,
    latency: Duration,
    calls: AtomicU32,
    calls_by_date: Mutex<HashMap<Date, u32>>,
    in_flight: AtomicU32,
    max_in_flight: AtomicU32,
}

impl ScriptedSource {
    pub(crate) fn new(rates: &[(Date, f64)]) -> Self {
        Self {
            rates: rates.iter().copied().collect(),
            fail_first: 0,
            latency: Duration::ZERO,
            calls: AtomicU32::new(0),
            calls_by_date: Mutex::new(HashMap::new()),
            in_flight: AtomicU32::new(0),
            max_in_flight: AtomicU32::new(0),
        }
    }

    pub(crate) fn always_failing() -> Self {
        Self::new(&[]).failing_first(u32::MAX)
    }

    pub(crate) fn failing_first(mut self, n: u32) -> Self {
        self.fail_first = n;
        self
    }

    /// Hold every call open for `latency` before answering.
    pub(crate) fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Highest number of calls observed in progress at once.
    pub(crate) fn max_in_flight(&self) -> u32 {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub(crate) fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn calls_for(&self, date: Date) -> u32 {
        self.calls_by_date
            .lock()
            .unwrap()
            .get(&date)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl RateSource for ScriptedSource {
    fn source_type(&self) -> SourceType {
        SourceType::Memory
    }

    fn name(&self) -> &str {
        "scripted"
    }

    async fn fetch_rate(&self, date: Date) -> Result<RawRate, TraitError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        *self.calls_by_date.lock().unwrap().entry(date).or_insert(0) += 1;

        let now_in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now_in_flight, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if call <= self.fail_first {
            return Err(TraitError::ConnectionFailed(format!("scripted failure #{call}")));
        }
        let rate = self
            .rates
            .get(&date)
            .copied()
            .ok_or_else(|| TraitError::NotFound(date.to_string()))?;
        Ok(RawRate {
            date,
            published: date,
            rate,
            source: "scripted".to_string(),
        })
    }
}

/// Fallback store over a plain map.
pub(crate) struct MapFallback(HashMap<Date, RateObservation>);

impl MapFallback {
    pub(crate) fn empty() -> Self {
        Self(HashMap::new())
    }

    pub(crate) fn with(entries: &[(Date, Decimal)]) -> Self {
        Self(
            entries
                .iter()
                .map(|&(date, rate)| (date, RateObservation::new(date, rate).unwrap()))
                .collect(),
        )
    }
}

impl FallbackStore for MapFallback {
    fn lookup(&self, date: Date) -> Option<RateObservation> {
        self.0.get(&date).copied()
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

pub(crate) fn d(s: &str) -> Date {
    Date::parse(s).unwrap()
}
