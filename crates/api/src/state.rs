use std::sync::Arc;

use lumen_core::scope::OwnerScope;
use lumen_powerbi::EmbedBroker;

use crate::config::ServerConfig;
use crate::middleware::auth::AuthUser;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the pool is reference-counted and everything else sits
/// behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: lumen_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Power BI embed-credential broker, built once at startup.
    pub broker: Arc<EmbedBroker>,
}

impl AppState {
    /// The orchestration scope for `user` under the configured scope mode.
    pub fn owner_scope(&self, user: &AuthUser) -> OwnerScope {
        OwnerScope::new(
            user.user_id,
            user.company_id,
            self.config.orchestration.scope_mode,
        )
    }
}
