//! HTTP route handlers.
//!
//! Application routes sit behind the tenant gate; the health probe does not.
//! Unknown paths fall through to axum's default 404 and unsupported methods on
//! a known path get 405 from the method router.
//!
//! Request tracing is enabled via middleware that assigns a request ID to each
//! incoming request, allowing correlation of all logs within a request.

pub mod health;
pub mod hello;

use axum::{middleware, routing::get, Router};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::{CACHE_CONTROL_HEALTH, CACHE_CONTROL_HELLO, HEALTH_ROUTE, HELLO_ROUTE};
use crate::middleware::{request_id_layer, tenant_gate_layer};
use crate::state::AppState;

/// Creates the Axum router with all routes, cache headers and middleware.
pub fn create_router(state: AppState) -> Router {
    // Welcome endpoint - gated. The cache header is a route layer, so only
    // matched GETs carry it: 401s from the gate and 405s from the method
    // router do not.
    let app_routes = Router::new()
        .route(HELLO_ROUTE, get(hello::hello))
        .route_layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_HELLO),
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            tenant_gate_layer,
        ));

    // Health check - no caching, always fresh for liveness probes
    let health_routes = Router::new()
        .route(HEALTH_ROUTE, get(health::health))
        .route_layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_HEALTH),
        ));

    Router::new()
        .merge(app_routes)
        .merge(health_routes)
        .with_state(state)
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
