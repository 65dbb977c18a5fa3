//! Shared application state for request handlers.

use std::sync::Arc;

use crate::auth::TenantPolicy;
use crate::config::AppConfig;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Immutable after startup; nothing here is written per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub policy: Arc<TenantPolicy>,
}

impl AppState {
    /// Creates a new application state, deriving the tenant policy from `config`.
    pub fn new(config: AppConfig) -> Self {
        let policy = TenantPolicy::from_config(&config);
        Self {
            config: Arc::new(config),
            policy: Arc::new(policy),
        }
    }
}
