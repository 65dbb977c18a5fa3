//! Health check endpoint for the hosting platform.
//!
//! Provides a liveness probe that returns 200 OK when the process is running.
//! It sits outside the tenant gate so probes work without a signed-in user.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::config::Environment;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub environment: Environment,
    pub version: &'static str,
}

/// Health check handler.
///
/// This is a liveness probe - it only checks that the process can respond to HTTP.
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        environment: state.policy.environment(),
        version: env!("CARGO_PKG_VERSION"),
    })
}
