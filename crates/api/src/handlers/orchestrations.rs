//! Handlers for the `/orchestrations` resource.
//!
//! Every handler requires the admin role and acts within the caller's
//! [`OwnerScope`](lumen_core::scope::OwnerScope). A record outside the scope
//! is reported exactly like a missing one.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use lumen_core::error::CoreError;
use lumen_core::orchestration::{
    parse_status, validate_destinations, validate_details, DestinationsInput, OrchestrationDraft,
};
use lumen_core::types::DbId;
use lumen_db::models::orchestration::OrchestrationView;
use lumen_db::repositories::OrchestrationRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::extract::{ValidJson, ValidPath};
use crate::middleware::rbac::RequireAdmin;
use crate::response::{Acknowledged, DataResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /orchestrations`.
///
/// All fields are optional here so that missing values are reported as
/// validation errors with a readable message.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrchestrationRequest {
    pub name: Option<String>,
    #[serde(alias = "report_id")]
    pub report_id: Option<DbId>,
    pub destinations: Option<DestinationsInput>,
    pub cron: Option<String>,
    pub timezone: Option<String>,
}

/// Request body for `PUT /orchestrations/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateDetailsRequest {
    pub name: Option<String>,
    pub cron: Option<String>,
}

/// Request body for `PUT /orchestrations/{id}/destinations`.
#[derive(Debug, Deserialize)]
pub struct UpdateDestinationsRequest {
    pub destinations: Option<DestinationsInput>,
}

/// Request body for `PUT /orchestrations/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Orchestration",
        id,
    })
}

fn found(id: DbId, row: Option<OrchestrationView>) -> AppResult<OrchestrationView> {
    row.ok_or_else(|| not_found(id))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/orchestrations
///
/// List the orchestrations in the caller's scope, newest first.
pub async fn list_orchestrations(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let scope = state.owner_scope(&admin);
    let items = OrchestrationRepo::list(&state.pool, &scope).await?;

    Ok(Json(DataResponse { data: items }))
}

/// POST /api/v1/orchestrations
///
/// Create an orchestration for a report in the caller's scope. New records
/// start `active`.
pub async fn create_orchestration(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ValidJson(input): ValidJson<CreateOrchestrationRequest>,
) -> AppResult<impl IntoResponse> {
    let draft = OrchestrationDraft {
        name: input.name,
        report_id: input.report_id,
        destinations: input.destinations,
        cron: input.cron,
        timezone: input.timezone,
    };
    let new = draft.validate(&state.config.orchestration.default_timezone)?;

    let scope = state.owner_scope(&admin);
    let created = OrchestrationRepo::create(&state.pool, &scope, &new)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Report",
            id: new.report_id,
        }))?;

    tracing::info!(
        orchestration_id = created.id,
        report_id = created.report_id,
        user_id = admin.user_id,
        "Orchestration created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// PUT /api/v1/orchestrations/{id}
///
/// Update name and/or cron schedule.
pub async fn update_details(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ValidPath(id): ValidPath<DbId>,
    ValidJson(input): ValidJson<UpdateDetailsRequest>,
) -> AppResult<impl IntoResponse> {
    let patch = validate_details(input.name, input.cron)?;

    let scope = state.owner_scope(&admin);
    let updated = found(
        id,
        OrchestrationRepo::update_details(&state.pool, &scope, id, &patch).await?,
    )?;

    tracing::info!(orchestration_id = id, user_id = admin.user_id, "Orchestration updated");

    Ok(Json(DataResponse { data: updated }))
}

/// PUT /api/v1/orchestrations/{id}/destinations
pub async fn update_destinations(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ValidPath(id): ValidPath<DbId>,
    ValidJson(input): ValidJson<UpdateDestinationsRequest>,
) -> AppResult<impl IntoResponse> {
    let destinations = validate_destinations(input.destinations)?;

    let scope = state.owner_scope(&admin);
    let updated = found(
        id,
        OrchestrationRepo::update_destinations(&state.pool, &scope, id, &destinations).await?,
    )?;

    tracing::info!(
        orchestration_id = id,
        user_id = admin.user_id,
        "Orchestration destinations replaced"
    );

    Ok(Json(DataResponse { data: updated }))
}

/// PUT /api/v1/orchestrations/{id}/status
///
/// Switch between `active` and `paused`. Setting the current status again
/// succeeds and returns the unchanged record.
pub async fn update_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ValidPath(id): ValidPath<DbId>,
    ValidJson(input): ValidJson<UpdateStatusRequest>,
) -> AppResult<impl IntoResponse> {
    let status = parse_status(input.status.as_deref())?;

    let scope = state.owner_scope(&admin);
    let updated = found(
        id,
        OrchestrationRepo::set_status(&state.pool, &scope, id, status).await?,
    )?;

    tracing::info!(
        orchestration_id = id,
        user_id = admin.user_id,
        status = %status,
        "Orchestration status set"
    );

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/orchestrations/{id}
pub async fn delete_orchestration(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let scope = state.owner_scope(&admin);
    if !OrchestrationRepo::delete(&state.pool, &scope, id).await? {
        return Err(not_found(id));
    }

    tracing::info!(orchestration_id = id, user_id = admin.user_id, "Orchestration deleted");

    Ok(Json(DataResponse {
        data: Acknowledged::OK,
    }))
}
