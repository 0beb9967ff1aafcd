//! API error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use greengive_engine::EngineError;

/// API error type.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad request (invalid input).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Upstream exhausted with no fallback.
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Corrupt rate data reached the statistics stage.
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error details
    pub error: ErrorBody,
}

/// Error body details.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable code
    pub code: String,
    /// Human-readable message
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::UpstreamUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "UPSTREAM_UNAVAILABLE")
            }
            ApiError::DataIntegrity(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATA_INTEGRITY"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = Json(ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
            },
        });

        (status, body).into_response()
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::InvalidRange(_) => ApiError::BadRequest(err.to_string()),
            EngineError::UpstreamUnavailable { .. } => ApiError::UpstreamUnavailable(err.to_string()),
            EngineError::EmptySeries | EngineError::InvalidRate(_) => {
                ApiError::DataIntegrity(err.to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<greengive_core::CoreError> for ApiError {
    fn from(err: greengive_core::CoreError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
