//! Repository for the `reports` and `report_permissions` tables.

use lumen_core::types::DbId;
use sqlx::PgPool;

use crate::models::report::{CreateReport, Report, ReportName, ReportSummary};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, company_id, role_id, user_id, name, embed_url, created_at, updated_at";

/// Provides report CRUD and per-user report grants.
pub struct ReportRepo;

impl ReportRepo {
    /// Create a report owned by `user_id` and grant it to the same user.
    ///
    /// Company and role are copied from the owner's row. Both inserts run
    /// in one transaction.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateReport,
    ) -> Result<Report, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO reports (company_id, role_id, user_id, name, embed_url) \
             SELECT company_id, role_id, id, $1, $2 FROM users WHERE id = $3 \
             RETURNING {COLUMNS}"
        );
        let report = sqlx::query_as::<_, Report>(&query)
            .bind(&input.name)
            .bind(&input.embed_url)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO report_permissions (user_id, report_id) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(report.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(report)
    }

    /// Find a report the caller may view.
    ///
    /// Admins see every report in their company; other users only see
    /// reports granted to them. Returns `None` for anything else.
    pub async fn find_visible(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        company_id: DbId,
        is_admin: bool,
    ) -> Result<Option<Report>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reports r \
             WHERE r.id = $1 \
               AND r.company_id = $2 \
               AND ($3 OR EXISTS ( \
                   SELECT 1 FROM report_permissions rp \
                   WHERE rp.report_id = r.id AND rp.user_id = $4))"
        );
        sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .bind(company_id)
            .bind(is_admin)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// All reports of a company, alphabetically.
    pub async fn list_for_company(
        pool: &PgPool,
        company_id: DbId,
    ) -> Result<Vec<ReportSummary>, sqlx::Error> {
        sqlx::query_as::<_, ReportSummary>(
            "SELECT id, name, embed_url FROM reports \
             WHERE company_id = $1 \
             ORDER BY name ASC, id ASC",
        )
        .bind(company_id)
        .fetch_all(pool)
        .await
    }

    /// Reports granted to a user, alphabetically.
    pub async fn list_granted(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<ReportSummary>, sqlx::Error> {
        sqlx::query_as::<_, ReportSummary>(
            "SELECT r.id, r.name, r.embed_url \
             FROM reports r \
             JOIN report_permissions rp ON rp.report_id = r.id \
             WHERE rp.user_id = $1 \
             ORDER BY r.name ASC, r.id ASC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Report ids and names of a company, for admin pickers.
    pub async fn list_names_for_company(
        pool: &PgPool,
        company_id: DbId,
    ) -> Result<Vec<ReportName>, sqlx::Error> {
        sqlx::query_as::<_, ReportName>(
            "SELECT id, name FROM reports WHERE company_id = $1 ORDER BY name ASC, id ASC",
        )
        .bind(company_id)
        .fetch_all(pool)
        .await
    }

    /// Report ids granted to `user_id`, provided the user belongs to
    /// `company_id`. Users of other companies yield an empty list.
    pub async fn granted_ids(
        pool: &PgPool,
        user_id: DbId,
        company_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT rp.report_id \
             FROM report_permissions rp \
             JOIN users u ON u.id = rp.user_id \
             WHERE rp.user_id = $1 AND u.company_id = $2 \
             ORDER BY rp.report_id ASC",
        )
        .bind(user_id)
        .bind(company_id)
        .fetch_all(pool)
        .await
    }

    /// Replace every grant of `user_id` with `report_ids`.
    ///
    /// Only reports of `company_id` are granted; ids from other companies
    /// are silently skipped. Returns `false` (and changes nothing) when the
    /// user does not belong to `company_id`.
    pub async fn replace_grants(
        pool: &PgPool,
        user_id: DbId,
        company_id: DbId,
        report_ids: &[DbId],
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let member = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = $1 AND company_id = $2)",
        )
        .bind(user_id)
        .bind(company_id)
        .fetch_one(&mut *tx)
        .await?;

        if !member {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("DELETE FROM report_permissions WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        if !report_ids.is_empty() {
            sqlx::query(
                "INSERT INTO report_permissions (user_id, report_id) \
                 SELECT $1, r.id FROM reports r \
                 WHERE r.company_id = $2 AND r.id = ANY($3) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(user_id)
            .bind(company_id)
            .bind(report_ids)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(true)
    }
}
