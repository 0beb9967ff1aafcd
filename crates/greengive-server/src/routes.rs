//! Route definitions.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use greengive_engine::SummaryService;

use crate::handlers::{self, AppState};

/// Create the API router.
///
/// # Arguments
/// * `service` - The summary service
pub fn create_router(service: Arc<SummaryService>) -> Router {
    let state = Arc::new(AppState { service });

    Router::new()
        // Health
        .route("/health", get(handlers::health))
        .route("/api/v1/health", get(handlers::health))
        // Summary
        .route("/summary", get(handlers::summary))
        .route("/api/v1/summary", get(handlers::summary))
        // Single-date rates
        .route("/api/v1/rates/{date}", get(handlers::get_rate))
        .with_state(state)
}
