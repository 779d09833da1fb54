//! Handlers for the `/auth` resource (login, register).

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use lumen_core::error::CoreError;
use lumen_core::roles::ROLE_VIEWER;
use lumen_core::types::DbId;
use lumen_db::models::user::CreateUser;
use lumen_db::repositories::{CompanyRepo, LoginLogRepo, RoleRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::extract::ValidJson;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(alias = "company_id")]
    pub company_id: Option<DbId>,
}

/// Successful authentication response returned by login and register.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
}

/// Public user info embedded in [`AuthResponse`].
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub company_id: DbId,
    pub company_name: String,
    pub role: String,
}

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized("Invalid credentials".into()))
}

fn required(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Every successful login is recorded
/// in the login history.
pub async fn login(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let (Some(email), Some(password)) = (required(input.email), input.password) else {
        return Err(CoreError::Validation(
            "Missing fields: email and password are required".into(),
        )
        .into());
    };

    let user = UserRepo::find_credentials_by_email(&state.pool, &email)
        .await?
        .ok_or_else(invalid_credentials)?;

    let password_valid = verify_password(&password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(user_id = user.id, "Login rejected: wrong password");
        return Err(invalid_credentials());
    }

    LoginLogRepo::record(&state.pool, user.company_id, user.role_id, user.id).await?;

    let response = auth_response(
        &state,
        UserInfo {
            id: user.id,
            name: user.name,
            email: user.email,
            company_id: user.company_id,
            company_name: user.company_name,
            role: user.role,
        },
    )?;

    tracing::info!(user_id = response.user.id, "User logged in");

    Ok(Json(DataResponse { data: response }))
}

/// POST /api/v1/auth/register
///
/// Create a `viewer` account in an existing company and sign it in.
pub async fn register(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    let (Some(name), Some(email), Some(password), Some(company_id)) = (
        required(input.name),
        required(input.email),
        input.password,
        input.company_id,
    ) else {
        return Err(CoreError::Validation(
            "Missing fields: name, email, password and companyId are required".into(),
        )
        .into());
    };

    validate_password_strength(&password, MIN_PASSWORD_LENGTH).map_err(CoreError::Validation)?;

    if UserRepo::email_exists(&state.pool, &email).await? {
        return Err(CoreError::Conflict("Email already registered".into()).into());
    }

    let company = CompanyRepo::find_by_id(&state.pool, company_id)
        .await?
        .ok_or_else(|| CoreError::Validation(format!("Unknown company {company_id}")))?;

    let role = RoleRepo::find_by_name(&state.pool, ROLE_VIEWER)
        .await?
        .ok_or_else(|| AppError::InternalError(format!("Role '{ROLE_VIEWER}' is not seeded")))?;

    let password_hash = hash_password(&password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            company_id: company.id,
            role_id: role.id,
            name,
            email,
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, company_id = company.id, "User registered");

    let response = auth_response(
        &state,
        UserInfo {
            id: user.id,
            name: user.name,
            email: user.email,
            company_id: company.id,
            company_name: company.company_name,
            role: role.name,
        },
    )?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: response })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn auth_response(state: &AppState, user: UserInfo) -> AppResult<AuthResponse> {
    let jwt = &state.config.jwt;
    let access_token = generate_access_token(user.id, &user.role, user.company_id, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(AuthResponse {
        access_token,
        expires_in: jwt.access_token_expiry_mins * 60,
        user,
    })
}
