//! Route definitions for the `/history` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::history;
use crate::state::AppState;

/// Routes mounted at `/history`.
///
/// ```text
/// GET /    -> list_logins
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(history::list_logins))
}
