//! Repository for the `login_logs` table.

use lumen_core::types::DbId;
use sqlx::PgPool;

use crate::models::login_log::LoginHistoryEntry;

/// Maximum number of entries returned by [`LoginLogRepo::list_for_company`].
pub const HISTORY_LIMIT: i64 = 200;

/// Records and lists successful logins.
pub struct LoginLogRepo;

impl LoginLogRepo {
    /// Record a successful login for `user_id`.
    pub async fn record(
        pool: &PgPool,
        company_id: DbId,
        role_id: DbId,
        user_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO login_logs (company_id, role_id, user_id) VALUES ($1, $2, $3)")
            .bind(company_id)
            .bind(role_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// The most recent logins within a company, newest first.
    pub async fn list_for_company(
        pool: &PgPool,
        company_id: DbId,
    ) -> Result<Vec<LoginHistoryEntry>, sqlx::Error> {
        sqlx::query_as::<_, LoginHistoryEntry>(
            "SELECT ll.id, ll.logged_in_at AS occurred_at, u.email AS user_email \
             FROM login_logs ll \
             JOIN users u ON u.id = ll.user_id \
             WHERE ll.company_id = $1 \
             ORDER BY ll.logged_in_at DESC, ll.id DESC \
             LIMIT $2",
        )
        .bind(company_id)
        .bind(HISTORY_LIMIT)
        .fetch_all(pool)
        .await
    }
}
