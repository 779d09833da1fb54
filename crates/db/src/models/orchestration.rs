//! Orchestration (scheduled report distribution) model.

use lumen_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// An orchestration joined with its report's display name.
///
/// This is the wire shape returned by every orchestration endpoint. The
/// schedule is exposed as `cron`; `status` is `"active"` or `"paused"`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct OrchestrationView {
    pub id: DbId,
    pub name: String,
    pub destinations: String,
    pub cron: String,
    pub timezone: String,
    pub status: String,
    pub report_id: DbId,
    pub report_name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
