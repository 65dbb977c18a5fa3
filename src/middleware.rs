//! Request middleware: request correlation and the tenant gate.
//!
//! `request_id_layer` wraps each request in a tracing span keyed by a request
//! ID (reused from `X-Request-Id` when the caller or platform supplied a valid
//! UUID) and echoes the ID back on the response.
//!
//! `tenant_gate_layer` applies the environment-gated `TenantPolicy` before any
//! handler runs. Rejected requests are answered with 401 here and never reach
//! the handler.

use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::Instrument;
use uuid::Uuid;

use crate::auth::{Access, AuthError};
use crate::error::AppError;
use crate::state::AppState;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Extension type for accessing request ID in handlers if needed.
#[derive(Clone, Debug)]
pub struct RequestId(pub Uuid);

/// Extension carrying the gate's decision for the current request.
///
/// Set on the request for handlers and on the response so the completion log
/// can name the caller.
#[derive(Clone, Debug)]
pub struct CurrentAccess(pub Access);

impl CurrentAccess {
    /// Caller name for logs
    pub fn principal_name(&self) -> &str {
        match &self.0 {
            Access::Anonymous => "anonymous",
            Access::Authenticated(principal) => principal.display_name(),
        }
    }
}

/// Middleware that assigns a request ID and creates a request span.
///
/// This should be the outermost middleware layer so the span wraps
/// all request processing, including the tenant gate.
pub async fn request_id_layer(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
        .unwrap_or_else(Uuid::new_v4);
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %path,
        duration_ms = tracing::field::Empty,
        principal = tracing::field::Empty,
    );

    let start = Instant::now();
    request.extensions_mut().insert(RequestId(request_id));

    async move {
        let mut response = next.run(request).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        let span = tracing::Span::current();
        span.record("duration_ms", duration_ms);
        if let Some(access) = response.extensions().get::<CurrentAccess>() {
            span.record("principal", access.principal_name());
        }
        tracing::info!(
            status = response.status().as_u16(),
            duration_ms,
            "Request completed"
        );

        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        response
    }
    .instrument(span)
    .await
}

/// Middleware that admits only callers allowed by the tenant policy.
pub async fn tenant_gate_layer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match state.policy.authorize(request.headers()) {
        Ok(access) => {
            if let Access::Authenticated(principal) = &access {
                tracing::debug!(
                    principal = %principal.display_name(),
                    idp = principal.identity_provider.as_deref().unwrap_or("unknown"),
                    "Principal admitted"
                );
            }
            let access = CurrentAccess(access);
            request.extensions_mut().insert(access.clone());
            let mut response = next.run(request).await;
            response.extensions_mut().insert(access);
            response
        }
        Err(err) => {
            match &err {
                AuthError::MissingPrincipal => {
                    tracing::warn!("Rejected request without client principal");
                }
                AuthError::TenantMismatch { actual, .. } => {
                    tracing::warn!(
                        tenant = actual.as_deref().unwrap_or("none"),
                        "Rejected principal from foreign tenant"
                    );
                }
            }
            AppError::from(err).into_response()
        }
    }
}
