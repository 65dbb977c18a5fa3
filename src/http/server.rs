//! HTTP server startup logic.

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum_server::Handle;

use crate::config::{HttpServerConfig, SHUTDOWN_GRACE_SECS};

use super::shutdown;

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    #[error("Invalid http.host or http.port: {0}")]
    Address(String),
}

/// Parse the listen address from configuration.
pub fn listen_addr(config: &HttpServerConfig) -> Result<SocketAddr, ServerError> {
    format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e: std::net::AddrParseError| ServerError::Address(e.to_string()))
}

/// Start the HTTP server.
///
/// This function blocks until the server shuts down.
pub async fn start_server(app: Router, config: &HttpServerConfig) -> Result<(), ServerError> {
    let addr = listen_addr(config)?;
    let handle = Handle::new();

    tracing::info!(%addr, "Starting HTTP server");

    shutdown::setup_shutdown_handler(handle.clone(), Duration::from_secs(SHUTDOWN_GRACE_SECS));

    axum_server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
