//! Handlers for the `/reports` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use lumen_core::error::CoreError;
use lumen_db::models::report::{CreateReport, ReportSummary};
use lumen_db::repositories::ReportRepo;
use serde::Deserialize;

use crate::error::AppResult;
use crate::extract::ValidJson;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /reports`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportRequest {
    pub name: Option<String>,
    #[serde(alias = "embed_url")]
    pub embed_url: Option<String>,
}

/// GET /api/v1/reports
///
/// Admins see every report of their company; other users see the reports
/// granted to them.
pub async fn list_reports(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let reports = if user.is_admin() {
        ReportRepo::list_for_company(&state.pool, user.company_id).await?
    } else {
        ReportRepo::list_granted(&state.pool, user.user_id).await?
    };

    Ok(Json(DataResponse { data: reports }))
}

/// POST /api/v1/reports
///
/// Register a report owned by the caller and grant it to them.
pub async fn create_report(
    user: AuthUser,
    State(state): State<AppState>,
    ValidJson(input): ValidJson<CreateReportRequest>,
) -> AppResult<impl IntoResponse> {
    let name = input.name.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
    let embed_url = input
        .embed_url
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let (Some(name), Some(embed_url)) = (name, embed_url) else {
        return Err(CoreError::Validation(
            "Missing fields: name and embedUrl are required".into(),
        )
        .into());
    };

    let report = ReportRepo::create(&state.pool, user.user_id, &CreateReport { name, embed_url })
        .await?;

    tracing::info!(report_id = report.id, user_id = user.user_id, "Report created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: ReportSummary {
                id: report.id,
                name: report.name,
                embed_url: report.embed_url,
            },
        }),
    ))
}
