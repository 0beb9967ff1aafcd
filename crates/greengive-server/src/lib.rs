//! # GreenGive Server
//!
//! REST server for EUR/USD rate summaries.
//!
//! ## Endpoints
//!
//! - `GET /health`, `GET /api/v1/health`
//! - `GET /summary`, `GET /api/v1/summary` with `start_date`, `end_date` and `breakdown`
//! - `GET /api/v1/rates/{date}`
//!
//! ## Usage
//!
//! ```ignore
//! use greengive_server::Server;
//!
//! let server = Server::new(config, service);
//! server.start().await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use greengive_engine::{EngineError, SummaryService};
use greengive_ext_file::{create_file_fallback, JsonFallbackStore};
use greengive_traits::FallbackStore;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};

/// Load the configured fallback dataset.
///
/// The server does not start without it: a missing or malformed file is a
/// [`EngineError::FallbackLoadFailure`].
pub fn load_fallback(config: &ServerConfig) -> Result<JsonFallbackStore, EngineError> {
    let path = &config.fallback.path;
    let store = create_file_fallback(
        path,
        &config.upstream.base_currency,
        &config.upstream.quote_currency,
    )
    .map_err(|e| EngineError::FallbackLoadFailure(format!("{path}: {e}")))?;

    match store.coverage() {
        Some((first, last)) => info!(
            "Loaded {} fallback rates ({first}..={last}) from {path}",
            store.len()
        ),
        None => info!("Fallback dataset {path} is empty"),
    }
    Ok(store)
}

/// The GreenGive server.
pub struct Server {
    config: ServerConfig,
    service: Arc<SummaryService>,
}

impl Server {
    /// Create a new server.
    pub fn new(config: ServerConfig, service: Arc<SummaryService>) -> Self {
        Self { config, service }
    }

    /// Build the router.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        routes::create_router(self.service.clone())
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Start the server; returns after Ctrl-C.
    pub async fn start(&self) -> Result<(), std::io::Error> {
        let addr = SocketAddr::new(
            self.config.host.parse().unwrap_or([0, 0, 0, 0].into()),
            self.config.port,
        );

        info!("Starting GreenGive server on {}", addr);

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutting down..."),
        Err(e) => {
            error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    }
}
