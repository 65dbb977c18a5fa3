//! Weather Station: tenant-gated welcome endpoint.
//!
//! Runs as a custom handler behind a managed functions host. The host forwards
//! `GET /api/hello` to this process; in production a middleware layer admits
//! only principals from the configured tenant before the handler runs.

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::AppError;
pub use routes::create_router;
pub use state::AppState;
