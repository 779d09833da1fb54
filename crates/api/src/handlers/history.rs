//! Handler for the login history.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use lumen_db::repositories::LoginLogRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/history
///
/// The most recent logins within the admin's company, newest first.
pub async fn list_logins(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let entries = LoginLogRepo::list_for_company(&state.pool, admin.company_id).await?;
    Ok(Json(DataResponse { data: entries }))
}
