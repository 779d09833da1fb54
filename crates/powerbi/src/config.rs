use std::fmt;

use crate::error::PowerBiError;

/// Azure AD authority used for the client-credentials grant.
pub const DEFAULT_AUTHORITY_URL: &str = "https://login.microsoftonline.com";
/// Power BI REST API root.
pub const DEFAULT_API_URL: &str = "https://api.powerbi.com/v1.0/myorg";
/// OAuth scope granting access to the Power BI REST API.
pub const POWER_BI_SCOPE: &str = "https://analysis.windows.net/powerbi/api/.default";
/// Default per-request timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Power BI service-principal and endpoint configuration.
///
/// Credentials are optional at load time so the server can start without
/// them; the broker reports a configuration error per request instead.
#[derive(Clone)]
pub struct PowerBiConfig {
    pub tenant_id: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    /// Workspace used for report lookups and token scoping. Falls back to
    /// the group id in the stored report URL when unset.
    pub workspace_id: Option<String>,
    pub authority_url: String,
    pub api_url: String,
    pub request_timeout_secs: u64,
}

/// Borrowed, fully-present service-principal credentials.
#[derive(Clone, Copy)]
pub struct ServicePrincipal<'a> {
    pub tenant_id: &'a str,
    pub client_id: &'a str,
    pub client_secret: &'a str,
}

impl PowerBiConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                    | Default                              |
    /// |----------------------------|--------------------------------------|
    /// | `PBI_TENANT_ID`            | --                                   |
    /// | `PBI_CLIENT_ID`            | --                                   |
    /// | `PBI_CLIENT_SECRET`        | --                                   |
    /// | `PBI_WORKSPACE_ID`         | --                                   |
    /// | `PBI_AUTHORITY_URL`        | `https://login.microsoftonline.com`  |
    /// | `PBI_API_URL`              | `https://api.powerbi.com/v1.0/myorg` |
    /// | `PBI_REQUEST_TIMEOUT_SECS` | `15`                                 |
    ///
    /// # Panics
    ///
    /// Panics if `PBI_REQUEST_TIMEOUT_SECS` is set but not a valid `u64`.
    pub fn from_env() -> Self {
        let var = |name: &str| {
            std::env::var(name)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let request_timeout_secs: u64 = var("PBI_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|| DEFAULT_REQUEST_TIMEOUT_SECS.to_string())
            .parse()
            .expect("PBI_REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            tenant_id: var("PBI_TENANT_ID"),
            client_id: var("PBI_CLIENT_ID"),
            client_secret: var("PBI_CLIENT_SECRET"),
            workspace_id: var("PBI_WORKSPACE_ID"),
            authority_url: var("PBI_AUTHORITY_URL").unwrap_or_else(|| DEFAULT_AUTHORITY_URL.into()),
            api_url: var("PBI_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into()),
            request_timeout_secs,
        }
    }

    /// The service principal, or a configuration error naming what is missing.
    pub fn service_principal(&self) -> Result<ServicePrincipal<'_>, PowerBiError> {
        match (&self.tenant_id, &self.client_id, &self.client_secret) {
            (Some(tenant_id), Some(client_id), Some(client_secret)) => Ok(ServicePrincipal {
                tenant_id,
                client_id,
                client_secret,
            }),
            _ => Err(PowerBiError::Configuration(
                "Missing Power BI service principal config \
                 (PBI_TENANT_ID, PBI_CLIENT_ID, PBI_CLIENT_SECRET)"
                    .into(),
            )),
        }
    }
}

impl fmt::Debug for PowerBiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PowerBiConfig")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "<redacted>"))
            .field("workspace_id", &self.workspace_id)
            .field("authority_url", &self.authority_url)
            .field("api_url", &self.api_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}
