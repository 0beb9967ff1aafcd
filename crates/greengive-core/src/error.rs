//! Error types for GreenGive core types.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Validation errors raised while building core types.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Invalid or unparseable calendar date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// Rate that is not a positive finite number.
    #[error("Invalid rate: {value} - {reason}")]
    InvalidRate {
        /// The offending value, rendered for display.
        value: String,
        /// Reason for invalidity.
        reason: String,
    },

    /// Date range whose start is after its end.
    #[error("Invalid range: {message}")]
    InvalidRange {
        /// Description of the range error.
        message: String,
    },

    /// Observations that do not form a valid series.
    #[error("Invalid series: {reason}")]
    InvalidSeries {
        /// Description of what's invalid.
        reason: String,
    },
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an invalid rate error.
    #[must_use]
    pub fn invalid_rate(value: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidRate {
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid range error.
    #[must_use]
    pub fn invalid_range(message: impl Into<String>) -> Self {
        Self::InvalidRange {
            message: message.into(),
        }
    }

    /// Creates an invalid series error.
    #[must_use]
    pub fn invalid_series(reason: impl Into<String>) -> Self {
        Self::InvalidSeries {
            reason: reason.into(),
        }
    }
}
