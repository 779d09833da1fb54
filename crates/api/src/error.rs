use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use lumen_core::error::CoreError;
use lumen_powerbi::PowerBiError;
use serde_json::json;

/// Message shown to clients for any upstream Power BI or Azure AD failure.
/// The upstream detail is logged, never returned.
pub const UPSTREAM_UNAVAILABLE_MESSAGE: &str = "Power BI service temporarily unavailable";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`PowerBiError`] for the embed
/// flow, and adds HTTP-specific variants. Implements [`IntoResponse`] to
/// produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `lumen_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A failure issuing an embed credential.
    #[error(transparent)]
    PowerBi(#[from] PowerBiError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal_error()
                }
            },

            // --- Power BI ---
            AppError::PowerBi(err) => classify_powerbi_error(err),

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal_error()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal_error() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Configuration problems are the caller's (or operator's) to fix and are
/// shown as-is. Upstream failures are logged with the provider's body and
/// reported generically.
fn classify_powerbi_error(err: &PowerBiError) -> (StatusCode, &'static str, String) {
    if err.is_upstream() {
        tracing::error!(error = %err, "Power BI upstream failure");
        return (
            StatusCode::BAD_GATEWAY,
            "UPSTREAM_UNAVAILABLE",
            UPSTREAM_UNAVAILABLE_MESSAGE.to_string(),
        );
    }
    let message = match err {
        PowerBiError::Configuration(msg) => msg.clone(),
        other => other.to_string(),
    };
    tracing::warn!(error = %message, "Power BI configuration error");
    (StatusCode::BAD_REQUEST, "CONFIGURATION_ERROR", message)
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            internal_error()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use lumen_powerbi::EmbedStage;

    use super::*;

    #[test]
    fn not_found_names_entity_and_id() {
        let response = AppError::Core(CoreError::NotFound {
            entity: "Orchestration",
            id: 7,
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn configuration_error_is_bad_request() {
        let response =
            AppError::PowerBi(PowerBiError::Configuration("no report id".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn upstream_errors_are_bad_gateway() {
        let auth = AppError::PowerBi(PowerBiError::UpstreamAuth("HTTP 401".into()));
        let embed = AppError::PowerBi(PowerBiError::UpstreamEmbed {
            stage: EmbedStage::GenerateToken,
            detail: "HTTP 403".into(),
        });
        assert_eq!(auth.into_response().status(), StatusCode::BAD_GATEWAY);
        assert_eq!(embed.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn validation_error_is_bad_request() {
        let response = AppError::Core(CoreError::Validation("bad cron".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
