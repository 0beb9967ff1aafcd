//! Request handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::header::{HeaderName, HeaderValue};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use greengive_core::Date;
use greengive_engine::{Breakdown, ResolvedRate, SummaryRequest, SummaryResult, SummaryService};
use greengive_traits::FallbackStore;

use crate::error::{ApiError, ApiResult};

/// Response header set on every summary: `true` when any date came from fallback.
pub const DEGRADED_HEADER: &str = "x-greengive-degraded";

/// Application state.
pub struct AppState {
    /// The summary service (and, through it, the rate provider)
    pub service: Arc<SummaryService>,
}

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
    fallback_entries: usize,
    cached_entries: usize,
}

/// Health check handler.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let provider = state.service.provider();
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        fallback_entries: provider.fallback().len(),
        cached_entries: provider.cache().len(),
    })
}

/// Query parameters for a summary.
///
/// Fields are optional so that missing values produce the JSON error body
/// rather than the extractor's plain-text rejection.
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    /// First day (YYYY-MM-DD)
    pub start_date: Option<String>,
    /// Last day, inclusive (YYYY-MM-DD)
    pub end_date: Option<String>,
    /// `day` or `none`
    pub breakdown: Option<String>,
}

fn required_date(value: Option<&str>, name: &str) -> ApiResult<Date> {
    let value = value.ok_or_else(|| ApiError::BadRequest(format!("missing {name}")))?;
    Date::parse(value).map_err(|e| ApiError::BadRequest(format!("{name}: {e}")))
}

/// Summary handler.
pub async fn summary(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SummaryQuery>,
) -> ApiResult<([(HeaderName, HeaderValue); 1], Json<SummaryResult>)> {
    let start = required_date(query.start_date.as_deref(), "start_date")?;
    let end = required_date(query.end_date.as_deref(), "end_date")?;
    let breakdown = match query.breakdown.as_deref() {
        Some(value) => value
            .parse::<Breakdown>()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?,
        None => Breakdown::default(),
    };

    let request = SummaryRequest::new(start, end, breakdown)?;
    let report = state.service.summarize(request).await?;

    let degraded = if report.is_degraded() {
        debug!(dates = ?report.degraded_dates, "summary served with fallback data");
        HeaderValue::from_static("true")
    } else {
        HeaderValue::from_static("false")
    };

    Ok((
        [(HeaderName::from_static(DEGRADED_HEADER), degraded)],
        Json(report.result),
    ))
}

/// Resolve a single date, exposing where the rate came from.
pub async fn get_rate(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> ApiResult<Json<ResolvedRate>> {
    let date = Date::parse(&date)?;
    let resolved = state.service.provider().get_rate(date).await?;
    Ok(Json(resolved))
}
