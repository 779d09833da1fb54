//! Handler for issuing Power BI embed credentials.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use lumen_core::error::CoreError;
use lumen_core::types::DbId;
use lumen_db::repositories::ReportRepo;

use crate::error::{AppError, AppResult};
use crate::extract::ValidPath;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/powerbi/embed/{report_id}
///
/// Resolve a report the caller may view and exchange the service principal
/// for a fresh, view-only embed token. Nothing is cached.
pub async fn embed_credential(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    ValidPath(report_id): ValidPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let report = ReportRepo::find_visible(
        &state.pool,
        report_id,
        user.user_id,
        user.company_id,
        user.is_admin(),
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "Report",
        id: report_id,
    }))?;

    let credential = state.broker.issue_embed_credential(&report.embed_url).await?;

    tracing::info!(report_id, user_id = user.user_id, "Embed credential issued");

    Ok(Json(DataResponse { data: credential }))
}
