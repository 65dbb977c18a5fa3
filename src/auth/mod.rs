//! Tenant restriction for hosted instances.
//!
//! Token validation itself happens at the platform boundary. This module
//! re-checks the forwarded principal so that only users from the application's
//! own tenant reach a handler:
//! - Local: every caller is allowed, no principal required
//! - Production: a principal from the configured tenant is required

pub mod principal;

use http::HeaderMap;

use crate::config::{AppConfig, Environment};

pub use principal::ClientPrincipal;

/// Reasons a request is turned away by the tenant gate
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Unauthorized - Please log in to access this application")]
    MissingPrincipal,

    #[error("Unauthorized - Only users from tenant {expected} are allowed to access this application")]
    TenantMismatch {
        expected: String,
        /// Tenant the caller presented, if any
        actual: Option<String>,
    },
}

/// Outcome of a successful check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Local environment, nothing was checked
    Anonymous,
    /// Production caller from the configured tenant
    Authenticated(ClientPrincipal),
}

/// Environment-gated tenant policy
#[derive(Debug, Clone)]
pub struct TenantPolicy {
    environment: Environment,
    tenant_id: Option<String>,
}

impl TenantPolicy {
    pub fn new(environment: Environment, tenant_id: Option<String>) -> Self {
        Self {
            environment,
            tenant_id: tenant_id
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
        }
    }

    /// Build the policy from resolved configuration
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.environment(), config.auth.tenant_id.clone())
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Check if requests are gated at all
    pub fn is_enforced(&self) -> bool {
        self.environment.is_production()
    }

    /// Decide whether a request with these headers may reach a handler.
    pub fn authorize(&self, headers: &HeaderMap) -> Result<Access, AuthError> {
        if !self.is_enforced() {
            return Ok(Access::Anonymous);
        }

        let principal = ClientPrincipal::from_headers(headers).ok_or(AuthError::MissingPrincipal)?;

        // Validation rejects production without a tenant; an empty expected
        // tenant here must still deny everyone.
        let expected = self.tenant_id.as_deref().unwrap_or_default();
        if expected.is_empty() || !principal.is_member_of(expected) {
            return Err(AuthError::TenantMismatch {
                expected: expected.to_string(),
                actual: principal.tenant_id,
            });
        }

        Ok(Access::Authenticated(principal))
    }
}
