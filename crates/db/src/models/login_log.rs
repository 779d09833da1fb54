use lumen_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// One successful login, as shown in the admin history view.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LoginHistoryEntry {
    pub id: DbId,
    pub occurred_at: Timestamp,
    pub user_email: String,
}
