//! Two-hop embed-credential exchange.
//!
//! Hop 1 trades the service principal for an Azure AD access token (OAuth
//! client-credentials grant). Hop 2 uses that token to look the report up
//! and request a view-only embed token scoped to the report, its dataset
//! and the target workspace. The hops are sequential: a failed hop 1 never
//! reaches Power BI.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{PowerBiConfig, ServicePrincipal, POWER_BI_SCOPE};
use crate::error::{describe_status, describe_transport, EmbedStage, PowerBiError};
use crate::locator::ReportLocator;

/// Access level requested for every embed token.
const ACCESS_LEVEL_VIEW: &str = "view";

/// Short-lived, report-scoped viewer credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedCredential {
    pub report_id: String,
    pub embed_url: String,
    pub embed_token: String,
    /// Expiry reported by Power BI, passed through unparsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration: Option<String>,
}

/// Azure AD token endpoint response (only the field we use).
#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: String,
}

/// Report metadata returned by `GET /groups/{ws}/reports/{id}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportDescriptor {
    id: String,
    dataset_id: String,
    #[serde(default)]
    embed_url: Option<String>,
}

#[derive(Debug, Serialize)]
struct IdRef<'a> {
    id: &'a str,
}

/// Body of `POST /GenerateToken`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateTokenRequest<'a> {
    access_level: &'static str,
    reports: [IdRef<'a>; 1],
    datasets: [IdRef<'a>; 1],
    target_workspaces: [IdRef<'a>; 1],
}

#[derive(Debug, Deserialize)]
struct GenerateTokenResponse {
    token: String,
    #[serde(default)]
    expiration: Option<String>,
}

/// Issues embed credentials on behalf of the configured service principal.
///
/// Built once at startup and shared; the inner [`reqwest::Client`] pools
/// connections across requests.
pub struct EmbedBroker {
    client: reqwest::Client,
    config: PowerBiConfig,
}

impl EmbedBroker {
    /// Build a broker whose HTTP client enforces
    /// `config.request_timeout_secs` on every hop.
    pub fn new(config: PowerBiConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// Issue a fresh embed credential for the report stored at `stored_url`.
    ///
    /// Locator and configuration problems are reported before any network
    /// call. Nothing is cached between calls.
    pub async fn issue_embed_credential(
        &self,
        stored_url: &str,
    ) -> Result<EmbedCredential, PowerBiError> {
        let locator = ReportLocator::parse(stored_url).ok_or_else(|| {
            PowerBiError::Configuration("Invalid Power BI report URL: no report id found".into())
        })?;
        let principal = self.config.service_principal()?;
        let workspace_id = self.resolve_workspace(&locator)?;

        let access_token = self.request_access_token(principal).await?;
        let report = self
            .lookup_report(&access_token, &workspace_id, &locator.report_id)
            .await?;
        let generated = self
            .generate_token(&access_token, &workspace_id, &report)
            .await?;

        tracing::info!(
            report_id = %locator.report_id,
            workspace_id = %workspace_id,
            "Issued Power BI embed token"
        );

        let embed_url = report
            .embed_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| locator.canonical_embed_url());

        Ok(EmbedCredential {
            report_id: locator.report_id,
            embed_url,
            embed_token: generated.token,
            expiration: generated.expiration,
        })
    }

    fn resolve_workspace(&self, locator: &ReportLocator) -> Result<String, PowerBiError> {
        self.config
            .workspace_id
            .clone()
            .or_else(|| locator.group_id.clone())
            .ok_or_else(|| {
                PowerBiError::Configuration(
                    "Missing Power BI workspace: set PBI_WORKSPACE_ID or store a URL with a group id"
                        .into(),
                )
            })
    }

    // ---- hop 1 ----

    async fn request_access_token(
        &self,
        principal: ServicePrincipal<'_>,
    ) -> Result<String, PowerBiError> {
        let url = format!(
            "{}/{}/oauth2/v2.0/token",
            self.config.authority_url.trim_end_matches('/'),
            principal.tenant_id
        );
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", principal.client_id),
            ("client_secret", principal.client_secret),
            ("scope", POWER_BI_SCOPE),
        ];

        let response = self
            .client
            .post(url)
            .form(&form)
            .send()
            .await
            .map_err(|e| PowerBiError::UpstreamAuth(describe_transport(&e)))?;
        let body = read_success(response)
            .await
            .map_err(PowerBiError::UpstreamAuth)?;

        let token: AccessTokenResponse = serde_json::from_str(&body).map_err(|e| {
            PowerBiError::UpstreamAuth(format!("malformed token response: {e}: {body}"))
        })?;
        Ok(token.access_token)
    }

    // ---- hop 2 ----

    async fn lookup_report(
        &self,
        access_token: &str,
        workspace_id: &str,
        report_id: &str,
    ) -> Result<ReportDescriptor, PowerBiError> {
        let url = format!(
            "{}/groups/{workspace_id}/reports/{report_id}",
            self.api_base()
        );
        let request = self.client.get(url).bearer_auth(access_token);
        self.send_embed(EmbedStage::ReportLookup, request).await
    }

    async fn generate_token(
        &self,
        access_token: &str,
        workspace_id: &str,
        report: &ReportDescriptor,
    ) -> Result<GenerateTokenResponse, PowerBiError> {
        let body = GenerateTokenRequest {
            access_level: ACCESS_LEVEL_VIEW,
            reports: [IdRef { id: &report.id }],
            datasets: [IdRef {
                id: &report.dataset_id,
            }],
            target_workspaces: [IdRef { id: workspace_id }],
        };
        let url = format!("{}/GenerateToken", self.api_base());
        let request = self.client.post(url).bearer_auth(access_token).json(&body);
        self.send_embed(EmbedStage::GenerateToken, request).await
    }

    /// Send a hop-2 request and decode its JSON body, classifying every
    /// failure as [`PowerBiError::UpstreamEmbed`] for `stage`.
    async fn send_embed<T: serde::de::DeserializeOwned>(
        &self,
        stage: EmbedStage,
        request: reqwest::RequestBuilder,
    ) -> Result<T, PowerBiError> {
        let embed_err = |detail: String| PowerBiError::UpstreamEmbed { stage, detail };

        let response = request
            .send()
            .await
            .map_err(|e| embed_err(describe_transport(&e)))?;
        let body = read_success(response).await.map_err(embed_err)?;

        serde_json::from_str(&body)
            .map_err(|e| embed_err(format!("malformed response: {e}: {body}")))
    }

    fn api_base(&self) -> &str {
        self.config.api_url.trim_end_matches('/')
    }
}

/// Read the body of a response, returning it on 2xx and a description
/// carrying status and body otherwise.
async fn read_success(response: reqwest::Response) -> Result<String, String> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| describe_transport(&e))?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(describe_status(status, &body))
    }
}
