//! HTTP server module.
//!
//! The Functions host terminates TLS and forwards plain HTTP to this process,
//! so the server only binds a plain listener. It includes graceful shutdown
//! on SIGTERM/SIGINT, draining in-flight requests before exit.

mod server;
mod shutdown;

pub use server::{start_server, ServerError};
