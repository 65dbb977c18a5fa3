//! Configuration loading and constants.
//!
//! Loads application configuration from an optional TOML file, then applies the
//! environment variables set by the Functions host and the deployment (listen
//! port, instance marker, identity parameters). `AppConfig` is the root
//! configuration struct containing all settings.

use std::fmt;
use std::path::Path;

use const_format::formatcp;
use serde::{Deserialize, Serialize};

// =============================================================================
// Routes and Responses
// =============================================================================

/// Path of the welcome endpoint (the host forwards `/api/<function>` unchanged)
pub const HELLO_ROUTE: &str = "/api/hello";

/// Path of the liveness probe
pub const HEALTH_ROUTE: &str = "/health";

/// Fixed body returned by the welcome endpoint
pub const WELCOME_MESSAGE: &str = "Hello, World! Welcome to the Weather Station Configuration UI.";

// =============================================================================
// HTTP Response Cache Control
// =============================================================================

/// Welcome response - constant, but only for authorized callers
pub const HTTP_CACHE_HELLO_MAX_AGE: u32 = 60;

pub const CACHE_CONTROL_HELLO: &str =
    formatcp!("private, max-age={}", HTTP_CACHE_HELLO_MAX_AGE);

/// Probes must always reach the process
pub const CACHE_CONTROL_HEALTH: &str = "no-store";

// =============================================================================
// Environment Variables
// =============================================================================

/// Port the Functions host expects a custom handler to listen on
pub const ENV_CUSTOM_HANDLER_PORT: &str = "FUNCTIONS_CUSTOMHANDLER_PORT";

/// Set by the platform on every hosted instance; absent when running locally
pub const ENV_INSTANCE_ID: &str = "WEBSITE_INSTANCE_ID";

pub const ENV_CLIENT_ID: &str = "AZURE_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "AZURE_CLIENT_SECRET";
pub const ENV_TENANT_ID: &str = "AZURE_TENANT_ID";

// =============================================================================
// Default Paths and Strings
// =============================================================================

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "weather_station=info,tower_http=info";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";
pub const DEFAULT_HTTP_PORT: u16 = 7071;

/// Seconds to wait for in-flight requests on shutdown
pub const SHUTDOWN_GRACE_SECS: u64 = 30;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Identity parameters and environment override
    #[serde(default)]
    pub auth: AuthConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HTTP_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_HTTP_PORT
    }
}

/// Where the process is running, which decides whether the tenant gate applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Developer machine or local Functions host: no authentication
    Local,
    /// Hosted instance: every request must come from the configured tenant
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity provider registration used by the platform's auth module.
///
/// Only `tenant_id` is consulted in-process; client id and secret are carried
/// so startup can report whether the registration is complete.
#[derive(Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// Explicit environment; detected from the host when unset
    pub environment: Option<Environment>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub tenant_id: Option<String>,
}

impl AuthConfig {
    /// Check if the full app registration is configured
    pub fn has_credentials(&self) -> bool {
        self.client_id.is_some() && self.client_secret.is_some() && self.tenant_id.is_some()
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("environment", &self.environment)
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "[redacted]"),
            )
            .field("tenant_id", &self.tenant_id)
            .finish()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }

    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Resolve configuration for startup: file (if any), then process
    /// environment, then validation.
    ///
    /// An explicit path must exist. Without one, a missing default file falls
    /// back to built-in defaults.
    pub fn resolve(explicit_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = match explicit_path {
            Some(path) => Self::load(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::load(DEFAULT_CONFIG_PATH)?,
            None => {
                tracing::debug!(path = DEFAULT_CONFIG_PATH, "No config file, using defaults");
                Self::default()
            }
        };

        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Overlay values from the environment. `lookup` returns the value of a
    /// variable, or `None` when unset.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(port) = var(ENV_CUSTOM_HANDLER_PORT) {
            match port.trim().parse() {
                Ok(port) => self.http.port = port,
                Err(_) => {
                    tracing::warn!(value = %port, "Ignoring invalid {}", ENV_CUSTOM_HANDLER_PORT)
                }
            }
        }

        if self.auth.environment.is_none() {
            self.auth.environment = Some(if var(ENV_INSTANCE_ID).is_some() {
                Environment::Production
            } else {
                Environment::Local
            });
        }

        if let Some(client_id) = var(ENV_CLIENT_ID) {
            self.auth.client_id = Some(client_id);
        }
        if let Some(client_secret) = var(ENV_CLIENT_SECRET) {
            self.auth.client_secret = Some(client_secret);
        }
        if let Some(tenant_id) = var(ENV_TENANT_ID) {
            self.auth.tenant_id = Some(tenant_id);
        }

        // File and environment values alike; the policy compares exact ids
        self.auth.tenant_id = self
            .auth
            .tenant_id
            .take()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
    }

    /// The effective environment; `Local` until detection has run.
    pub fn environment(&self) -> Environment {
        self.auth.environment.unwrap_or(Environment::Local)
    }

    /// Validate settings that would otherwise fail at request time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.environment().is_production()
            && self
                .auth
                .tenant_id
                .as_deref()
                .map_or(true, |t| t.trim().is_empty())
        {
            return Err(ConfigError::Validation(format!(
                "Running in production but no tenant configured. Set {} or [auth] tenant_id",
                ENV_TENANT_ID
            )));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}
