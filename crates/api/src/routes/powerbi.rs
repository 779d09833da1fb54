//! Route definitions for the `/powerbi` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::powerbi;
use crate::state::AppState;

/// Routes mounted at `/powerbi`.
///
/// ```text
/// GET /embed/{report_id}    -> embed_credential
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/embed/{report_id}", get(powerbi::embed_credential))
}
