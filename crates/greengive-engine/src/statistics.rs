//! Summary statistics over a rate series.
//!
//! All percentage and mean figures are rounded to [`STAT_DECIMALS`] places
//! with half-away-from-zero rounding.

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use greengive_core::{Date, RateSeries};

use crate::error::{EngineError, EngineResult};

/// Decimal places kept in every rounded statistic.
pub const STAT_DECIMALS: u32 = 4;

/// Whether to compute the per-day breakdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakdown {
    /// One entry per observation
    Day,
    /// No breakdown; the field is omitted from the result
    #[default]
    None,
}

/// Unrecognised breakdown name.
#[derive(Debug, Clone, Error)]
#[error("unknown breakdown '{0}', expected 'day' or 'none'")]
pub struct UnknownBreakdown(pub String);

impl FromStr for Breakdown {
    type Err = UnknownBreakdown;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Breakdown::Day),
            "none" => Ok(Breakdown::None),
            other => Err(UnknownBreakdown(other.to_string())),
        }
    }
}

impl fmt::Display for Breakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Breakdown::Day => write!(f, "day"),
            Breakdown::None => write!(f, "none"),
        }
    }
}

/// One day of the breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyChange {
    /// Observation date
    pub date: Date,
    /// Rate on that date
    pub rate: Decimal,
    /// Percentage change against the preceding day (0 for the first day)
    pub pct_change: Decimal,
}

/// Statistics derived from a rate series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResult {
    /// Rate on the first day
    pub start_rate: Decimal,
    /// Rate on the last day
    pub end_rate: Decimal,
    /// Percentage change from first to last day
    pub total_pct_change: Decimal,
    /// Arithmetic mean of every rate
    pub mean_rate: Decimal,
    /// Per-day changes; `None` when not requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_breakdown: Option<Vec<DailyChange>>,
}

/// Stateless calculator turning a series into a [`SummaryResult`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StatisticsEngine;

impl StatisticsEngine {
    /// Summarize a series.
    ///
    /// # Errors
    ///
    /// `EmptySeries` for a zero-length series, `InvalidRate` if any rate is
    /// zero or negative.
    pub fn summarize(series: &RateSeries, breakdown: Breakdown) -> EngineResult<SummaryResult> {
        let (first, last) = match (series.first(), series.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(EngineError::EmptySeries),
        };

        if let Some(bad) = series.iter().find(|obs| !obs.is_valid()) {
            return Err(EngineError::InvalidRate(format!(
                "non-positive rate {} on {}",
                bad.rate, bad.date
            )));
        }

        let total_pct_change = pct_change(first.rate, last.rate)?;

        let sum = series
            .iter()
            .try_fold(Decimal::ZERO, |acc, obs| acc.checked_add(obs.rate))
            .ok_or_else(|| overflow("sum of rates"))?;
        let mean_rate = sum
            .checked_div(Decimal::from(series.len()))
            .map(round)
            .ok_or_else(|| overflow("mean rate"))?;

        let daily_breakdown = match breakdown {
            Breakdown::None => None,
            Breakdown::Day => Some(daily_changes(series)?),
        };

        Ok(SummaryResult {
            start_rate: first.rate,
            end_rate: last.rate,
            total_pct_change,
            mean_rate,
            daily_breakdown,
        })
    }
}

fn daily_changes(series: &RateSeries) -> EngineResult<Vec<DailyChange>> {
    let mut changes = Vec::with_capacity(series.len());
    let mut prev: Option<Decimal> = None;
    for obs in series {
        let pct_change = match prev {
            None => Decimal::ZERO,
            Some(prev_rate) => pct_change(prev_rate, obs.rate)?,
        };
        changes.push(DailyChange {
            date: obs.date,
            rate: obs.rate,
            pct_change,
        });
        prev = Some(obs.rate);
    }
    Ok(changes)
}

/// `(to - from) / from * 100`, rounded.
fn pct_change(from: Decimal, to: Decimal) -> EngineResult<Decimal> {
    if from.is_zero() {
        return Err(EngineError::InvalidRate(
            "percentage change from a zero rate is undefined".into(),
        ));
    }
    to.checked_sub(from)
        .and_then(|delta| delta.checked_div(from))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(round)
        .ok_or_else(|| overflow(&format!("percentage change from {from} to {to}")))
}

fn overflow(what: &str) -> EngineError {
    EngineError::InvalidRate(format!("{what} exceeds decimal range"))
}

fn round(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(STAT_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use greengive_core::RateObservation;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn series(rates: &[Decimal]) -> RateSeries {
        let start = Date::from_ymd(2025, 7, 1).unwrap();
        RateSeries::new(
            rates
                .iter()
                .enumerate()
                .map(|(i, &rate)| RateObservation {
                    date: start.add_days(i as i64),
                    rate,
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_reference_example_with_breakdown() {
        let s = series(&[dec!(1.05), dec!(1.055), dec!(1.045)]);
        let result = StatisticsEngine::summarize(&s, Breakdown::Day).unwrap();

        assert_eq!(result.start_rate, dec!(1.05));
        assert_eq!(result.end_rate, dec!(1.045));
        assert_eq!(result.total_pct_change, dec!(-0.4762));
        assert_eq!(result.mean_rate, dec!(1.05));

        let pct: Vec<Decimal> = result
            .daily_breakdown
            .unwrap()
            .into_iter()
            .map(|day| day.pct_change)
            .collect();
        assert_eq!(pct, [dec!(0.0), dec!(0.4762), dec!(-0.9479)]);
    }

    #[test]
    fn test_reference_example_without_breakdown() {
        let s = series(&[dec!(1.05), dec!(1.055), dec!(1.045)]);
        let with = StatisticsEngine::summarize(&s, Breakdown::Day).unwrap();
        let without = StatisticsEngine::summarize(&s, Breakdown::None).unwrap();

        assert!(without.daily_breakdown.is_none());
        assert_eq!(without.start_rate, with.start_rate);
        assert_eq!(without.end_rate, with.end_rate);
        assert_eq!(without.total_pct_change, with.total_pct_change);
        assert_eq!(without.mean_rate, with.mean_rate);
    }

    #[test]
    fn test_breakdown_none_omits_field() {
        let s = series(&[dec!(1.05), dec!(1.055)]);
        let json = serde_json::to_value(StatisticsEngine::summarize(&s, Breakdown::None).unwrap())
            .unwrap();
        assert!(json.get("daily_breakdown").is_none());
        assert_eq!(json["mean_rate"], serde_json::json!(1.0525));

        let json = serde_json::to_value(StatisticsEngine::summarize(&s, Breakdown::Day).unwrap())
            .unwrap();
        assert_eq!(json["daily_breakdown"].as_array().unwrap().len(), 2);
        assert_eq!(json["daily_breakdown"][1]["date"], "2025-07-02");
    }

    #[test]
    fn test_single_observation() {
        let s = series(&[dec!(1.1)]);
        let result = StatisticsEngine::summarize(&s, Breakdown::Day).unwrap();
        assert_eq!(result.total_pct_change, Decimal::ZERO);
        assert_eq!(result.mean_rate, dec!(1.1));
        assert_eq!(result.daily_breakdown.unwrap().len(), 1);
    }

    #[test]
    fn test_empty_series() {
        let err = StatisticsEngine::summarize(&RateSeries::default(), Breakdown::None).unwrap_err();
        assert!(matches!(err, EngineError::EmptySeries));
    }

    #[test]
    fn test_zero_start_rate_is_invalid() {
        let s = series(&[Decimal::ZERO, dec!(1.05)]);
        let err = StatisticsEngine::summarize(&s, Breakdown::None).unwrap_err();
        assert!(matches!(err, EngineError::InvalidRate(_)));
    }

    #[test]
    fn test_negative_rate_anywhere_is_invalid() {
        let s = series(&[dec!(1.05), dec!(-1.0), dec!(1.05)]);
        let err = StatisticsEngine::summarize(&s, Breakdown::None).unwrap_err();
        assert!(matches!(err, EngineError::InvalidRate(_)));
    }

    fn series_f64(rates: &[f64]) -> RateSeries {
        let start = Date::from_ymd(2025, 7, 1).unwrap();
        RateSeries::new(
            rates
                .iter()
                .enumerate()
                .map(|(i, &rate)| RateObservation::from_f64(start.add_days(i as i64), rate).unwrap())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_huge_change_is_invalid_rate() {
        let err = StatisticsEngine::summarize(&series_f64(&[1.0, 1e27]), Breakdown::None).unwrap_err();
        assert!(matches!(err, EngineError::InvalidRate(_)));

        let err = StatisticsEngine::summarize(&series_f64(&[1.0, 1e27]), Breakdown::Day).unwrap_err();
        assert!(matches!(err, EngineError::InvalidRate(_)));
    }

    #[test]
    fn test_sum_overflow_is_invalid_rate() {
        let err =
            StatisticsEngine::summarize(&series_f64(&[5e28, 5e28]), Breakdown::None).unwrap_err();
        assert!(matches!(err, EngineError::InvalidRate(_)));
    }

    #[test]
    fn test_midpoint_rounds_away_from_zero() {
        assert_eq!(round(dec!(0.12345)), dec!(0.1235));
        assert_eq!(round(dec!(-0.12345)), dec!(-0.1235));
        assert_eq!(round(dec!(0.12355)), dec!(0.1236));
    }

    #[test]
    fn test_breakdown_parsing() {
        assert_eq!("day".parse::<Breakdown>().unwrap(), Breakdown::Day);
        assert_eq!("none".parse::<Breakdown>().unwrap(), Breakdown::None);
        assert!("week".parse::<Breakdown>().is_err());
        assert_eq!(Breakdown::default(), Breakdown::None);
        assert_eq!(Breakdown::Day.to_string(), "day");
    }

    proptest! {
        #[test]
        fn prop_mean_is_rounded_arithmetic_mean(raw in prop::collection::vec(5_000i64..20_000, 1..60)) {
            let rates: Vec<Decimal> = raw.iter().map(|&v| Decimal::new(v, 4)).collect();
            let result = StatisticsEngine::summarize(&series(&rates), Breakdown::None).unwrap();
            let sum: Decimal = rates.iter().copied().sum();
            prop_assert_eq!(result.mean_rate, round(sum / Decimal::from(rates.len())));
        }

        #[test]
        fn prop_daily_changes_follow_previous_day(raw in prop::collection::vec(5_000i64..20_000, 1..60)) {
            let rates: Vec<Decimal> = raw.iter().map(|&v| Decimal::new(v, 4)).collect();
            let result = StatisticsEngine::summarize(&series(&rates), Breakdown::Day).unwrap();
            let days = result.daily_breakdown.unwrap();

            prop_assert_eq!(days.len(), rates.len());
            prop_assert_eq!(days[0].pct_change, Decimal::ZERO);
            for i in 1..rates.len() {
                let expected = round((rates[i] - rates[i - 1]) / rates[i - 1] * dec!(100));
                prop_assert_eq!(days[i].pct_change, expected);
                prop_assert_eq!(days[i].rate, rates[i]);
            }
        }

        #[test]
        fn prop_total_change_uses_endpoints(raw in prop::collection::vec(5_000i64..20_000, 1..60)) {
            let rates: Vec<Decimal> = raw.iter().map(|&v| Decimal::new(v, 4)).collect();
            let result = StatisticsEngine::summarize(&series(&rates), Breakdown::None).unwrap();
            let (start, end) = (rates[0], rates[rates.len() - 1]);
            prop_assert_eq!(result.start_rate, start);
            prop_assert_eq!(result.end_rate, end);
            prop_assert_eq!(result.total_pct_change, round((end - start) / start * dec!(100)));
        }
    }
}
