//! Engine error types.

use thiserror::Error;

use greengive_core::{CoreError, Date};

/// Engine error type.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Upstream exhausted and no fallback entry for the date
    #[error("upstream unavailable for {date} after {attempts} attempts: {last_error}")]
    UpstreamUnavailable {
        /// Date that could not be resolved
        date: Date,
        /// Number of upstream attempts made
        attempts: u32,
        /// Description of the last attempt's failure
        last_error: String,
    },

    /// Statistics requested over an empty series
    #[error("rate series is empty")]
    EmptySeries,

    /// Non-positive rate reached the statistics stage
    #[error("invalid rate: {0}")]
    InvalidRate(String),

    /// Malformed or oversized date range
    #[error("invalid range: {0}")]
    InvalidRange(String),

    /// Fallback dataset could not be read or parsed at startup
    #[error("fallback load failure: {0}")]
    FallbackLoadFailure(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<CoreError> for EngineError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidRange { message } => EngineError::InvalidRange(message),
            CoreError::InvalidRate { .. } => EngineError::InvalidRate(e.to_string()),
            other => EngineError::Internal(other.to_string()),
        }
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
