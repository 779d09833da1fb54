//! Shared helpers for HTTP integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use lumen_api::auth::jwt::{generate_access_token, JwtConfig};
use lumen_api::auth::password::hash_password;
use lumen_api::config::{OrchestrationConfig, ServerConfig};
use lumen_api::router::build_app_router;
use lumen_api::state::AppState;
use lumen_core::roles::ROLE_ADMIN;
use lumen_core::scope::ScopeMode;
use lumen_core::types::DbId;
use lumen_db::models::company::CreateCompany;
use lumen_db::models::report::CreateReport;
use lumen_db::models::user::CreateUser;
use lumen_db::repositories::{CompanyRepo, ReportRepo, RoleRepo, UserRepo};
use lumen_powerbi::config::{DEFAULT_API_URL, DEFAULT_AUTHORITY_URL};
use lumen_powerbi::{EmbedBroker, PowerBiConfig};
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "test_password_123!";

/// Power BI settings with no service principal: any embed request fails
/// with a configuration error before touching the network.
pub fn unconfigured_powerbi() -> PowerBiConfig {
    PowerBiConfig {
        tenant_id: None,
        client_id: None,
        client_secret: None,
        workspace_id: None,
        authority_url: DEFAULT_AUTHORITY_URL.to_string(),
        api_url: DEFAULT_API_URL.to_string(),
        request_timeout_secs: 5,
    }
}

/// Power BI settings pointing both hops at a mock server.
pub fn mock_powerbi(server_url: &str) -> PowerBiConfig {
    PowerBiConfig {
        tenant_id: Some("tenant-1".to_string()),
        client_id: Some("client-1".to_string()),
        client_secret: Some("secret-1".to_string()),
        workspace_id: None,
        authority_url: server_url.to_string(),
        api_url: server_url.to_string(),
        request_timeout_secs: 5,
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(scope_mode: ScopeMode, powerbi: PowerBiConfig) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
        orchestration: OrchestrationConfig {
            scope_mode,
            ..OrchestrationConfig::default()
        },
        powerbi,
    }
}

/// Build the full application router (same middleware stack as production).
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_with(pool, test_config(ScopeMode::User, unconfigured_powerbi()))
}

pub fn build_app_with(pool: PgPool, config: ServerConfig) -> Router {
    let broker = EmbedBroker::new(config.powerbi.clone()).unwrap();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        broker: Arc::new(broker),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the status and return the decoded JSON body.
pub async fn expect_json(response: Response<Body>, status: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

/// A seeded user and a valid bearer token for them.
pub struct TestUser {
    pub id: DbId,
    pub company_id: DbId,
    pub token: String,
}

pub async fn seed_company(pool: &PgPool, name: &str) -> DbId {
    CompanyRepo::create(
        pool,
        &CreateCompany {
            company_name: name.to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

/// Create a user whose password is [`TEST_PASSWORD`] and mint a token.
pub async fn seed_user(pool: &PgPool, company_id: DbId, email: &str, role: &str) -> TestUser {
    let role_id = RoleRepo::find_by_name(pool, role).await.unwrap().unwrap().id;
    let user = UserRepo::create(
        pool,
        &CreateUser {
            company_id,
            role_id,
            name: email.split('@').next().unwrap_or(email).to_string(),
            email: email.to_string(),
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
        },
    )
    .await
    .unwrap();

    let config = test_config(ScopeMode::User, unconfigured_powerbi());
    let token = generate_access_token(user.id, role, company_id, &config.jwt).unwrap();

    TestUser {
        id: user.id,
        company_id,
        token,
    }
}

pub async fn seed_admin(pool: &PgPool, company_id: DbId, email: &str) -> TestUser {
    seed_user(pool, company_id, email, ROLE_ADMIN).await
}

pub async fn seed_report(pool: &PgPool, owner: DbId, name: &str, embed_url: &str) -> DbId {
    ReportRepo::create(
        pool,
        owner,
        &CreateReport {
            name: name.to_string(),
            embed_url: embed_url.to_string(),
        },
    )
    .await
    .unwrap()
    .id
}
