//! Report models and DTOs.
//!
//! A report is a stored pointer to an external Power BI report. Only the
//! `embed_url` is kept; the provider locator is parsed from it on demand.

use lumen_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `reports` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Report {
    pub id: DbId,
    pub company_id: DbId,
    pub role_id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub embed_url: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Report projection returned by listing endpoints.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReportSummary {
    pub id: DbId,
    pub name: String,
    pub embed_url: String,
}

/// Id and name only, for admin pickers.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReportName {
    pub id: DbId,
    pub name: String,
}

/// DTO for creating a report owned by the calling user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReport {
    pub name: String,
    pub embed_url: String,
}
