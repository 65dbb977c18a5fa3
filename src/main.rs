//! Weather Station: welcome endpoint for the configuration UI.
//!
//! This is the application entry point. It initializes tracing, resolves
//! configuration from the optional TOML file and the host environment, sets up
//! the Axum router with the tenant gate, and starts the HTTP server.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use weather_station::config::{AppConfig, DEFAULT_LOG_FILTER, ENV_TENANT_ID};
use weather_station::http::start_server;
use weather_station::{create_router, AppState};

/// Weather Station: tenant-gated welcome endpoint
#[derive(Parser, Debug)]
#[command(name = "weather-station", version, about)]
struct Args {
    /// Path to configuration file (default: config/default.toml if present)
    #[arg(short, long)]
    config: Option<String>,

    /// Log level filter (e.g., "weather_station=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration before tracing so the log format can be honored
    let config = AppConfig::resolve(args.config.as_deref())?;

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(&log_filter));
    if config.logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    let environment = config.environment();
    tracing::info!(
        environment = %environment,
        host = %config.http.host,
        port = config.http.port,
        "Loaded configuration"
    );

    if environment.is_production() {
        tracing::info!(
            tenant = config.auth.tenant_id.as_deref().unwrap_or_default(),
            has_app_registration = config.auth.has_credentials(),
            "Tenant gate enabled"
        );
        if !config.auth.has_credentials() {
            tracing::warn!(
                "App registration incomplete; the platform identity module needs client id, secret and {}",
                ENV_TENANT_ID
            );
        }
    } else {
        tracing::warn!("Running locally - authentication is not enforced");
    }

    let http_config = config.http.clone();
    let state = AppState::new(config);
    let app = create_router(state);

    start_server(app, &http_config).await?;

    Ok(())
}
