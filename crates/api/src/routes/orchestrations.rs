//! Route definitions for the `/orchestrations` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::orchestrations;
use crate::state::AppState;

/// Routes mounted at `/orchestrations`.
///
/// ```text
/// GET    /                     -> list_orchestrations
/// POST   /                     -> create_orchestration
/// PUT    /{id}                 -> update_details
/// DELETE /{id}                 -> delete_orchestration
/// PUT    /{id}/destinations    -> update_destinations
/// PUT    /{id}/status          -> update_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(orchestrations::list_orchestrations).post(orchestrations::create_orchestration),
        )
        .route(
            "/{id}",
            put(orchestrations::update_details).delete(orchestrations::delete_orchestration),
        )
        .route("/{id}/destinations", put(orchestrations::update_destinations))
        .route("/{id}/status", put(orchestrations::update_status))
}
