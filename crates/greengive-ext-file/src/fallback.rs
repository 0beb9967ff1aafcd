//! File-based fallback stores.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use greengive_core::{Date, RateObservation};
use greengive_traits::error::TraitError;
use greengive_traits::rate_source::FallbackStore;

// =============================================================================
// JSON FALLBACK STORE
// =============================================================================

/// Time-series document as published by Frankfurter range queries.
#[derive(Debug, Deserialize)]
struct TimeSeriesFile {
    base: Option<String>,
    rates: BTreeMap<Date, HashMap<String, f64>>,
}

/// Fallback store loaded once from a JSON time-series file.
#[derive(Debug)]
pub struct JsonFallbackStore {
    file_path: Option<PathBuf>,
    rates: BTreeMap<Date, RateObservation>,
}

impl JsonFallbackStore {
    /// Load a store from a file.
    ///
    /// A missing or malformed file is an error: a provider started without
    /// its fallback dataset is not in a safe state.
    pub fn from_file(
        file_path: impl AsRef<Path>,
        base_currency: &str,
        quote_currency: &str,
    ) -> Result<Self, TraitError> {
        let file_path = file_path.as_ref();
        let content = std::fs::read_to_string(file_path).map_err(|e| {
            TraitError::IoError(format!("cannot read {}: {e}", file_path.display()))
        })?;
        let mut store = Self::from_json_str(&content, base_currency, quote_currency)?;
        store.file_path = Some(file_path.to_path_buf());
        Ok(store)
    }

    /// Parse a store from JSON text.
    pub fn from_json_str(
        content: &str,
        base_currency: &str,
        quote_currency: &str,
    ) -> Result<Self, TraitError> {
        let file: TimeSeriesFile =
            serde_json::from_str(content).map_err(|e| TraitError::ParseError(e.to_string()))?;

        if let Some(base) = &file.base {
            if !base.eq_ignore_ascii_case(base_currency) {
                return Err(TraitError::InvalidPayload(format!(
                    "dataset base currency is {base}, expected {base_currency}"
                )));
            }
        }

        let mut rates = BTreeMap::new();
        for (date, quotes) in file.rates {
            let rate = quotes
                .iter()
                .find(|(currency, _)| currency.eq_ignore_ascii_case(quote_currency))
                .map(|(_, rate)| *rate)
                .ok_or_else(|| {
                    TraitError::InvalidPayload(format!("{date} has no {quote_currency} rate"))
                })?;
            let observation = RateObservation::from_f64(date, rate)
                .map_err(|e| TraitError::InvalidPayload(format!("{date}: {e}")))?;
            rates.insert(date, observation);
        }

        Ok(Self {
            file_path: None,
            rates,
        })
    }

    /// File the store was loaded from, if any.
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Earliest and latest stored dates.
    pub fn coverage(&self) -> Option<(Date, Date)> {
        let first = self.rates.keys().next()?;
        let last = self.rates.keys().next_back()?;
        Some((*first, *last))
    }
}

impl FallbackStore for JsonFallbackStore {
    fn lookup(&self, date: Date) -> Option<RateObservation> {
        self.rates.get(&date).copied()
    }

    fn len(&self) -> usize {
        self.rates.len()
    }
}

// =============================================================================
// IN-MEMORY FALLBACK STORE
// =============================================================================

/// Fallback store built from observations in code.
#[derive(Debug, Default)]
pub struct InMemoryFallbackStore {
    rates: BTreeMap<Date, RateObservation>,
}

impl InMemoryFallbackStore {
    /// Create a store from observations; later duplicates replace earlier ones.
    pub fn new(observations: impl IntoIterator<Item = RateObservation>) -> Self {
        Self {
            rates: observations.into_iter().map(|obs| (obs.date, obs)).collect(),
        }
    }
}

impl FallbackStore for InMemoryFallbackStore {
    fn lookup(&self, date: Date) -> Option<RateObservation> {
        self.rates.get(&date).copied()
    }

    fn len(&self) -> usize {
        self.rates.len()
    }
}

// =============================================================================
// EMPTY FALLBACK STORE
// =============================================================================

/// Fallback store with no entries.
pub struct EmptyFallbackStore;

impl FallbackStore for EmptyFallbackStore {
    fn lookup(&self, _date: Date) -> Option<RateObservation> {
        None
    }

    fn len(&self) -> usize {
        0
    }
}
