//! Error types for trait operations.

use thiserror::Error;

/// Failure of a single rate source call.
///
/// Every variant is treated as transient by the resilient provider: the call
/// is retried and, once attempts run out, the fallback store is consulted.
#[derive(Debug, Error)]
pub enum TraitError {
    /// Connection to external service failed
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Operation timed out
    #[error("timeout")]
    Timeout,

    /// Upstream answered with a non-success status
    #[error("upstream returned status {0}")]
    UpstreamStatus(u16),

    /// Requested resource not found
    #[error("not found: {0}")]
    NotFound(String),

    /// Parse/deserialization error
    #[error("parse error: {0}")]
    ParseError(String),

    /// Payload decoded but failed validation
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<greengive_core::CoreError> for TraitError {
    fn from(e: greengive_core::CoreError) -> Self {
        TraitError::InvalidPayload(e.to_string())
    }
}
