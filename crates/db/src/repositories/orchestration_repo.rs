//! Repository for the `orchestrations` table.
//!
//! Every statement carries the caller's [`OwnerScope`] in its `WHERE`
//! clause: the scope check and the read or mutation happen in one atomic
//! statement. A row outside the scope is indistinguishable from a row that
//! does not exist, and both surface as `None` / `false`.
//!
//! Mutations are written as `WITH updated AS (UPDATE ... RETURNING *)`
//! joined back to `reports` so the returned record carries the report name
//! without a second round trip.

use lumen_core::orchestration::{DetailsPatch, NewOrchestration, OrchestrationStatus};
use lumen_core::scope::OwnerScope;
use lumen_core::types::DbId;
use sqlx::PgPool;

use crate::models::orchestration::OrchestrationView;

/// Projection over an `updated`/`inserted` CTE alias `o` joined to `r`.
const VIEW_COLUMNS: &str = "\
    o.id, o.name, o.destinations, o.cron, o.timezone, o.status, \
    o.report_id, r.name AS report_name, o.created_at, o.updated_at";

/// Scope predicate over alias `o`. `$company` and `$user` are positional
/// parameters supplied by each query.
fn scope_predicate(company_param: u8, user_param: u8) -> String {
    format!(
        "o.company_id = ${company_param} \
         AND (${user_param}::BIGINT IS NULL OR o.user_id = ${user_param})"
    )
}

/// Provides scoped CRUD operations for orchestrations.
pub struct OrchestrationRepo;

impl OrchestrationRepo {
    /// List all orchestrations visible to `scope`, newest first.
    pub async fn list(
        pool: &PgPool,
        scope: &OwnerScope,
    ) -> Result<Vec<OrchestrationView>, sqlx::Error> {
        let query = format!(
            "SELECT {VIEW_COLUMNS} \
             FROM orchestrations o \
             JOIN reports r ON r.id = o.report_id \
             WHERE {scope} \
             ORDER BY o.created_at DESC, o.id DESC",
            scope = scope_predicate(1, 2),
        );
        sqlx::query_as::<_, OrchestrationView>(&query)
            .bind(scope.company_id)
            .bind(scope.user_filter())
            .fetch_all(pool)
            .await
    }

    /// Find a single orchestration within `scope`.
    pub async fn find(
        pool: &PgPool,
        scope: &OwnerScope,
        id: DbId,
    ) -> Result<Option<OrchestrationView>, sqlx::Error> {
        let query = format!(
            "SELECT {VIEW_COLUMNS} \
             FROM orchestrations o \
             JOIN reports r ON r.id = o.report_id \
             WHERE o.id = $1 AND {scope}",
            scope = scope_predicate(2, 3),
        );
        sqlx::query_as::<_, OrchestrationView>(&query)
            .bind(id)
            .bind(scope.company_id)
            .bind(scope.user_filter())
            .fetch_optional(pool)
            .await
    }

    /// Create an orchestration for the report `input.report_id`.
    ///
    /// The report lookup and the insert are one statement: when the report
    /// is not in the caller's scope, `selected_report` is empty, nothing is
    /// inserted, and `None` is returned. Owner, company and role are taken
    /// from the caller's `users` row, never from the request.
    pub async fn create(
        pool: &PgPool,
        scope: &OwnerScope,
        input: &NewOrchestration,
    ) -> Result<Option<OrchestrationView>, sqlx::Error> {
        let query = format!(
            "WITH selected_report AS ( \
                 SELECT r.id AS report_id, r.name AS report_name, \
                        u.company_id, u.role_id, u.id AS user_id \
                 FROM reports r \
                 JOIN users u ON u.id = $1 \
                 WHERE r.id = $2 \
                   AND u.company_id = $3 \
                   AND r.company_id = u.company_id \
                   AND ($4::BIGINT IS NULL OR r.user_id = $4) \
             ), \
             inserted AS ( \
                 INSERT INTO orchestrations \
                     (company_id, role_id, user_id, report_id, name, destinations, cron, timezone, status) \
                 SELECT company_id, role_id, user_id, report_id, $5, $6, $7, $8, $9 \
                 FROM selected_report \
                 RETURNING * \
             ) \
             SELECT o.id, o.name, o.destinations, o.cron, o.timezone, o.status, \
                    o.report_id, r.report_name, o.created_at, o.updated_at \
             FROM inserted o \
             JOIN selected_report r ON r.report_id = o.report_id"
        );
        sqlx::query_as::<_, OrchestrationView>(&query)
            .bind(scope.user_id)
            .bind(input.report_id)
            .bind(scope.company_id)
            .bind(scope.user_filter())
            .bind(&input.name)
            .bind(&input.destinations)
            .bind(&input.cron)
            .bind(&input.timezone)
            .bind(OrchestrationStatus::INITIAL.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Update name and/or schedule. Fields left as `None` are unchanged.
    ///
    /// Returns `None` if no row with `id` exists within `scope`.
    pub async fn update_details(
        pool: &PgPool,
        scope: &OwnerScope,
        id: DbId,
        patch: &DetailsPatch,
    ) -> Result<Option<OrchestrationView>, sqlx::Error> {
        let query = scoped_update(
            "name = COALESCE($4, name), \
             cron = COALESCE($5, cron)",
        );
        sqlx::query_as::<_, OrchestrationView>(&query)
            .bind(id)
            .bind(scope.company_id)
            .bind(scope.user_filter())
            .bind(&patch.name)
            .bind(&patch.cron)
            .fetch_optional(pool)
            .await
    }

    /// Replace the destinations of an orchestration.
    ///
    /// Returns `None` if no row with `id` exists within `scope`.
    pub async fn update_destinations(
        pool: &PgPool,
        scope: &OwnerScope,
        id: DbId,
        destinations: &str,
    ) -> Result<Option<OrchestrationView>, sqlx::Error> {
        let query = scoped_update("destinations = $4");
        sqlx::query_as::<_, OrchestrationView>(&query)
            .bind(id)
            .bind(scope.company_id)
            .bind(scope.user_filter())
            .bind(destinations)
            .fetch_optional(pool)
            .await
    }

    /// Set the status. Setting the current status again is a no-op that
    /// still returns the (unchanged) record.
    ///
    /// Returns `None` if no row with `id` exists within `scope`.
    pub async fn set_status(
        pool: &PgPool,
        scope: &OwnerScope,
        id: DbId,
        status: OrchestrationStatus,
    ) -> Result<Option<OrchestrationView>, sqlx::Error> {
        let query = scoped_update("status = $4");
        sqlx::query_as::<_, OrchestrationView>(&query)
            .bind(id)
            .bind(scope.company_id)
            .bind(scope.user_filter())
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete an orchestration.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, scope: &OwnerScope, id: DbId) -> Result<bool, sqlx::Error> {
        let query = format!(
            "DELETE FROM orchestrations o WHERE o.id = $1 AND {scope}",
            scope = scope_predicate(2, 3),
        );
        let result = sqlx::query(&query)
            .bind(id)
            .bind(scope.company_id)
            .bind(scope.user_filter())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Build a scoped `UPDATE` whose `SET` clause uses parameters from `$4` on.
///
/// `$1` is the orchestration id, `$2` the company id and `$3` the optional
/// user filter.
fn scoped_update(set_clause: &str) -> String {
    format!(
        "WITH updated AS ( \
             UPDATE orchestrations o SET {set_clause} \
             WHERE o.id = $1 AND {scope} \
             RETURNING o.* \
         ) \
         SELECT {VIEW_COLUMNS} \
         FROM updated o \
         JOIN reports r ON r.id = o.report_id",
        scope = scope_predicate(2, 3),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_predicate_binds_company_and_user() {
        let predicate = scope_predicate(2, 3);
        assert!(predicate.contains("o.company_id = $2"));
        assert!(predicate.contains("$3::BIGINT IS NULL OR o.user_id = $3"));
    }

    #[test]
    fn scoped_update_constrains_same_statement() {
        let sql = scoped_update("status = $4");
        let update_start = sql.find("UPDATE orchestrations").unwrap();
        let returning = sql.find("RETURNING").unwrap();
        let where_clause = &sql[update_start..returning];
        assert!(where_clause.contains("o.id = $1"));
        assert!(where_clause.contains("o.company_id = $2"));
        assert!(where_clause.contains("o.user_id = $3"));
    }
}
