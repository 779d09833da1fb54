use lumen_core::orchestration::DEFAULT_TIMEZONE;
use lumen_core::scope::ScopeMode;
use lumen_powerbi::PowerBiConfig;

use crate::auth::jwt::JwtConfig;

/// Orchestration settings shared by every request.
#[derive(Debug, Clone)]
pub struct OrchestrationConfig {
    /// Timezone stored when a create request leaves it blank.
    pub default_timezone: String,
    /// Whether orchestrations are private to their creator or shared
    /// across the creator's company.
    pub scope_mode: ScopeMode,
}

impl Default for OrchestrationConfig {
    fn default() -> Self {
        Self {
            default_timezone: DEFAULT_TIMEZONE.to_string(),
            scope_mode: ScopeMode::default(),
        }
    }
}

impl OrchestrationConfig {
    /// | Env Var                          | Default        |
    /// |----------------------------------|----------------|
    /// | `ORCHESTRATION_DEFAULT_TIMEZONE` | `America/Lima` |
    /// | `ORCHESTRATION_SCOPE`            | `user`         |
    ///
    /// # Panics
    ///
    /// Panics if `ORCHESTRATION_SCOPE` is neither `user` nor `company`.
    pub fn from_env() -> Self {
        let default_timezone = std::env::var("ORCHESTRATION_DEFAULT_TIMEZONE")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_TIMEZONE.into());

        let scope_mode = match std::env::var("ORCHESTRATION_SCOPE") {
            Ok(raw) => raw
                .parse()
                .unwrap_or_else(|e| panic!("ORCHESTRATION_SCOPE: {e}")),
            Err(_) => ScopeMode::default(),
        };

        Self {
            default_timezone,
            scope_mode,
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Grace period for in-flight requests after a shutdown signal (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    pub orchestration: OrchestrationConfig,
    pub powerbi: PowerBiConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    ///
    /// See [`JwtConfig::from_env`], [`OrchestrationConfig::from_env`] and
    /// [`PowerBiConfig::from_env`] for the nested settings.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt: JwtConfig::from_env(),
            orchestration: OrchestrationConfig::from_env(),
            powerbi: PowerBiConfig::from_env(),
        }
    }
}
