pub mod admin;
pub mod auth;
pub mod health;
pub mod history;
pub mod orchestrations;
pub mod powerbi;
pub mod reports;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                 login (public)
/// /auth/register                              register (public)
///
/// /reports                                    list, create (requires auth)
///
/// /orchestrations                             list, create (admin only)
/// /orchestrations/{id}                        update details, delete
/// /orchestrations/{id}/destinations           replace destinations (PUT)
/// /orchestrations/{id}/status                 set status (PUT)
///
/// /powerbi/embed/{report_id}                  embed credential (requires auth)
///
/// /admin/users                                company users (admin only)
/// /admin/reports                              company report names
/// /admin/permissions/{user_id}                get, replace grants
///
/// /history                                    recent logins (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/reports", reports::router())
        .nest("/orchestrations", orchestrations::router())
        .nest("/powerbi", powerbi::router())
        .nest("/admin", admin::router())
        .nest("/history", history::router())
}
