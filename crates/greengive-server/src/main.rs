//! GreenGive server entry point.

use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use greengive_engine::{ResilientRateProviderBuilder, SummaryService};
use greengive_ext_frankfurter::FrankfurterSource;
use greengive_server::{load_fallback, Server, ServerConfig};

/// EUR/USD rate summary REST server
#[derive(Parser, Debug)]
#[command(name = "greengive-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(default_value = "config/greengive.toml")]
    config: String,

    /// Override the configured port
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_filter = if args.verbose {
        "debug,tower_http=debug"
    } else {
        "info,greengive=debug"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("GreenGive FX Summary Server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = if std::path::Path::new(&args.config).exists() {
        info!("Loading configuration from {}", args.config);
        ServerConfig::from_file(&args.config)?
    } else {
        info!("Using default configuration");
        ServerConfig::default()
    };
    if let Some(port) = args.port {
        config.port = port;
    }

    // Fallback dataset is required
    let fallback = load_fallback(&config)?;

    let source = FrankfurterSource::new(config.upstream.clone())?;

    let provider = ResilientRateProviderBuilder::new()
        .with_source(Arc::new(source))
        .with_fallback(Arc::new(fallback))
        .with_cache_ttl(config.cache_ttl())
        .with_retry_policy(config.retry_policy())
        .build()?;

    let service = SummaryService::new(Arc::new(provider))
        .with_max_range_days(config.max_range_days)
        .with_max_concurrency(config.max_concurrency);

    let server = Server::new(config, Arc::new(service));
    server.start().await?;

    Ok(())
}
