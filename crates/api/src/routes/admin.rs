//! Route definitions for the `/admin` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET /users                     -> list_users
/// GET /reports                   -> list_reports
/// GET /permissions/{user_id}     -> get_permissions
/// PUT /permissions/{user_id}     -> replace_permissions
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users))
        .route("/reports", get(admin::list_reports))
        .route(
            "/permissions/{user_id}",
            get(admin::get_permissions).put(admin::replace_permissions),
        )
}
