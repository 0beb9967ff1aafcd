//! # GreenGive Ext Frankfurter
//!
//! [`RateSource`] backed by the Frankfurter API (`https://api.frankfurter.app`).
//!
//! One request per date: `GET {base_url}/{YYYY-MM-DD}?from=EUR&to=USD`.
//! Every call is bounded by the client timeout.

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use greengive_core::Date;
use greengive_traits::{RateSource, RawRate, SourceType, TraitError};

/// Public Frankfurter endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.frankfurter.app";

/// Frankfurter source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrankfurterConfig {
    /// API root, without trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Currency rates are quoted from
    #[serde(default = "default_base_currency")]
    pub base_currency: String,

    /// Currency rates are quoted in
    #[serde(default = "default_quote_currency")]
    pub quote_currency: String,

    /// Per-call deadline in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_base_currency() -> String {
    "EUR".to_string()
}

fn default_quote_currency() -> String {
    "USD".to_string()
}

fn default_timeout_ms() -> u64 {
    5_000
}

impl Default for FrankfurterConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            base_currency: default_base_currency(),
            quote_currency: default_quote_currency(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Single-date response body.
#[derive(Debug, Deserialize)]
struct RateResponse {
    date: Date,
    rates: HashMap<String, f64>,
}

/// Frankfurter rate source.
pub struct FrankfurterSource {
    client: Client,
    config: FrankfurterConfig,
}

impl FrankfurterSource {
    /// Create a new source.
    pub fn new(config: FrankfurterConfig) -> Result<Self, TraitError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(concat!("greengive/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TraitError::Internal(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    fn url_for(&self, date: Date) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), date)
    }

    fn parse_body(&self, date: Date, body: &str) -> Result<RawRate, TraitError> {
        let response: RateResponse =
            serde_json::from_str(body).map_err(|e| TraitError::ParseError(e.to_string()))?;

        let rate = response
            .rates
            .get(&self.config.quote_currency)
            .copied()
            .ok_or_else(|| {
                TraitError::ParseError(format!(
                    "response has no {} rate",
                    self.config.quote_currency
                ))
            })?;

        Ok(RawRate {
            date,
            published: response.date,
            rate,
            source: "frankfurter".to_string(),
        })
    }
}

fn map_request_error(e: reqwest::Error) -> TraitError {
    if e.is_timeout() {
        TraitError::Timeout
    } else if e.is_connect() {
        TraitError::ConnectionFailed(e.to_string())
    } else {
        TraitError::ConnectionFailed(format!("HTTP request failed: {e}"))
    }
}

#[async_trait]
impl RateSource for FrankfurterSource {
    fn source_type(&self) -> SourceType {
        SourceType::Snapshot
    }

    fn name(&self) -> &str {
        "frankfurter"
    }

    async fn fetch_rate(&self, date: Date) -> Result<RawRate, TraitError> {
        let url = self.url_for(date);
        debug!(%url, "fetching rate");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("from", self.config.base_currency.as_str()),
                ("to", self.config.quote_currency.as_str()),
            ])
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TraitError::UpstreamStatus(status.as_u16()));
        }

        let body = response.text().await.map_err(map_request_error)?;
        self.parse_body(date, &body)
    }
}
