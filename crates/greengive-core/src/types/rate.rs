//! Rate observation type.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Date;
use crate::error::{CoreError, CoreResult};

/// One day's EUR→USD exchange rate.
///
/// Immutable once produced. Build from raw upstream values through
/// [`RateObservation::from_f64`], which rejects anything that is not a
/// positive finite number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RateObservation {
    /// Calendar date the rate applies to
    pub date: Date,
    /// Units of quote currency per unit of base currency
    pub rate: Decimal,
}

impl RateObservation {
    /// Creates an observation from a decimal rate.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidRate` if the rate is zero or negative.
    pub fn new(date: Date, rate: Decimal) -> CoreResult<Self> {
        if rate <= Decimal::ZERO {
            return Err(CoreError::invalid_rate(rate, "rate must be positive"));
        }
        Ok(Self { date, rate })
    }

    /// Creates an observation from a raw floating-point rate.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidRate` if the value is NaN, infinite,
    /// non-positive, or outside the decimal range.
    pub fn from_f64(date: Date, rate: f64) -> CoreResult<Self> {
        if !rate.is_finite() {
            return Err(CoreError::invalid_rate(rate, "rate must be finite"));
        }
        if rate <= 0.0 {
            return Err(CoreError::invalid_rate(rate, "rate must be positive"));
        }
        let rate = Decimal::try_from(rate)
            .map_err(|e| CoreError::invalid_rate(rate, e.to_string()))?;
        Self::new(date, rate)
    }

    /// Whether the rate satisfies the positivity invariant.
    ///
    /// Observations deserialized from untrusted data bypass [`Self::new`].
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.rate > Decimal::ZERO
    }
}

impl fmt::Display for RateObservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.date, self.rate)
    }
}
