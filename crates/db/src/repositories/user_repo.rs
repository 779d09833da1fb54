//! Repository for the `users` table.

use lumen_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, User, UserCredentials, UserSummary};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, company_id, role_id, name, email, password_hash, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (company_id, role_id, name, email, password_hash)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(input.company_id)
            .bind(input.role_id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email together with company and role names.
    pub async fn find_credentials_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<UserCredentials>, sqlx::Error> {
        sqlx::query_as::<_, UserCredentials>(
            "SELECT u.id, u.company_id, u.role_id, u.name, u.email, u.password_hash, \
                    c.company_name, r.name AS role \
             FROM users u \
             JOIN companies c ON c.id = u.company_id \
             JOIN roles r ON r.id = u.role_id \
             WHERE u.email = $1",
        )
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    /// Returns `true` if a user with this email already exists.
    pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(pool)
            .await
    }

    /// List the users of a company, alphabetically.
    pub async fn list_for_company(
        pool: &PgPool,
        company_id: DbId,
    ) -> Result<Vec<UserSummary>, sqlx::Error> {
        sqlx::query_as::<_, UserSummary>(
            "SELECT u.id, u.name, u.email, r.name AS role \
             FROM users u \
             JOIN roles r ON r.id = u.role_id \
             WHERE u.company_id = $1 \
             ORDER BY u.name ASC, u.id ASC",
        )
        .bind(company_id)
        .fetch_all(pool)
        .await
    }
}
