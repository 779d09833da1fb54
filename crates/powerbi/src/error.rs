use std::fmt;

/// Which request of the embed hop failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedStage {
    /// `GET /groups/{workspace}/reports/{report}`.
    ReportLookup,
    /// `POST /GenerateToken`.
    GenerateToken,
}

impl fmt::Display for EmbedStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbedStage::ReportLookup => f.write_str("Report lookup"),
            EmbedStage::GenerateToken => f.write_str("Embed token request"),
        }
    }
}

/// Errors from the embed-credential flow.
///
/// `Configuration` is local and raised before any network traffic.
/// The upstream variants carry the provider's response body verbatim for
/// operators; callers decide how much of it to show.
#[derive(Debug, thiserror::Error)]
pub enum PowerBiError {
    /// The stored URL names no report, or service-principal / workspace
    /// settings are missing.
    #[error("Power BI configuration error: {0}")]
    Configuration(String),

    /// The access-token request failed (status, body, transport or timeout).
    #[error("Token request failed: {0}")]
    UpstreamAuth(String),

    /// The report lookup or embed-token request failed.
    #[error("{stage} failed: {detail}")]
    UpstreamEmbed { stage: EmbedStage, detail: String },
}

impl PowerBiError {
    /// Returns `true` for failures reported by (or while reaching) Power BI
    /// or Azure AD.
    pub fn is_upstream(&self) -> bool {
        !matches!(self, PowerBiError::Configuration(_))
    }
}

/// Describe a transport-level failure. Timeouts are named explicitly so the
/// log line says why no status code is present.
pub(crate) fn describe_transport(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("request timed out: {err}")
    } else {
        format!("request failed: {err}")
    }
}

/// Describe a non-success HTTP response.
pub(crate) fn describe_status(status: reqwest::StatusCode, body: &str) -> String {
    format!("HTTP {}: {body}", status.as_u16())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embed_error_names_stage() {
        let err = PowerBiError::UpstreamEmbed {
            stage: EmbedStage::GenerateToken,
            detail: "HTTP 403: denied".into(),
        };
        assert_eq!(err.to_string(), "Embed token request failed: HTTP 403: denied");
        assert!(err.is_upstream());
    }

    #[test]
    fn configuration_is_not_upstream() {
        assert!(!PowerBiError::Configuration("x".into()).is_upstream());
    }

    #[test]
    fn status_description_keeps_body() {
        let detail = describe_status(reqwest::StatusCode::UNAUTHORIZED, "{\"error\":\"invalid_client\"}");
        assert_eq!(detail, "HTTP 401: {\"error\":\"invalid_client\"}");
    }
}
