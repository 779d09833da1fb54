//! Admin-only handlers: company users, report picker, and per-user
//! report grants.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use lumen_core::error::CoreError;
use lumen_core::types::DbId;
use lumen_db::repositories::{ReportRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::extract::{ValidJson, ValidPath};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Grants of one user, as returned by the permission endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPermissions {
    pub user_id: DbId,
    pub report_ids: Vec<DbId>,
}

/// Request body for `PUT /admin/permissions/{user_id}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplacePermissionsRequest {
    #[serde(default, alias = "report_ids")]
    pub report_ids: Vec<DbId>,
}

fn user_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "User", id })
}

/// GET /api/v1/admin/users
pub async fn list_users(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let users = UserRepo::list_for_company(&state.pool, admin.company_id).await?;
    Ok(Json(DataResponse { data: users }))
}

/// GET /api/v1/admin/reports
pub async fn list_reports(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let reports = ReportRepo::list_names_for_company(&state.pool, admin.company_id).await?;
    Ok(Json(DataResponse { data: reports }))
}

/// GET /api/v1/admin/permissions/{user_id}
///
/// Users of other companies are reported as not found.
pub async fn get_permissions(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ValidPath(user_id): ValidPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let member = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .is_some_and(|u| u.company_id == admin.company_id);
    if !member {
        return Err(user_not_found(user_id));
    }

    let report_ids = ReportRepo::granted_ids(&state.pool, user_id, admin.company_id).await?;

    Ok(Json(DataResponse {
        data: UserPermissions {
            user_id,
            report_ids,
        },
    }))
}

/// PUT /api/v1/admin/permissions/{user_id}
///
/// Replace every grant of the user. Report ids outside the admin's company
/// are ignored.
pub async fn replace_permissions(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ValidPath(user_id): ValidPath<DbId>,
    ValidJson(input): ValidJson<ReplacePermissionsRequest>,
) -> AppResult<impl IntoResponse> {
    let replaced =
        ReportRepo::replace_grants(&state.pool, user_id, admin.company_id, &input.report_ids)
            .await?;
    if !replaced {
        return Err(user_not_found(user_id));
    }

    let report_ids = ReportRepo::granted_ids(&state.pool, user_id, admin.company_id).await?;

    tracing::info!(
        target_user_id = user_id,
        user_id = admin.user_id,
        grants = report_ids.len(),
        "Report permissions replaced"
    );

    Ok(Json(DataResponse {
        data: UserPermissions {
            user_id,
            report_ids,
        },
    }))
}
