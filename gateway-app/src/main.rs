//! # Gateway Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize logging
//! - Initialize the repository adapter
//! - Create the gateway service
//! - Start the HTTP server

mod config;

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use gateway_hex::{GatewayService, inbound::HttpServer};
use gateway_repo::{build_repo, security::ApiKeyValidator};

use config::{Config, LogFormat};

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,gateway_app=debug,gateway_hex=debug".into());

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().flatten_event(true))
            .init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(config.log_format);

    tracing::info!("Starting gateway server on port {}", config.port);
    tracing::debug!(
        keys = config.api_keys.len(),
        rate_limit_per_minute = config.rate_limit_per_minute,
        "loaded configuration"
    );

    // Build repository (handles connection and schema creation)
    let repo = build_repo(&config.database_url).await?;
    let service = GatewayService::new(repo);
    let credentials = Arc::new(ApiKeyValidator::from_keys(&config.api_keys));

    let server = HttpServer::with_rate_limit(service, credentials, config.rate_limit_per_minute);
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    tracing::info!("Server stopped");
    Ok(())
}
