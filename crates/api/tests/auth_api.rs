//! HTTP-level tests for login and registration.

mod common;

use axum::http::StatusCode;
use common::{expect_json, get_auth, post_json, seed_admin, seed_company, TEST_PASSWORD};
use lumen_db::repositories::LoginLogRepo;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_returns_token_and_records_history(pool: PgPool) {
    let acme = seed_company(&pool, "acme").await;
    let admin = seed_admin(&pool, acme, "admin@acme.test").await;
    let app = common::build_test_app(pool.clone());

    let body = serde_json::json!({ "email": "admin@acme.test", "password": TEST_PASSWORD });
    let json = expect_json(post_json(app.clone(), "/api/v1/auth/login", body).await, StatusCode::OK).await;

    let data = &json["data"];
    assert!(data["access_token"].is_string());
    assert_eq!(data["expires_in"], 3600);
    assert_eq!(data["user"]["id"], admin.id);
    assert_eq!(data["user"]["role"], "admin");
    assert_eq!(data["user"]["company_name"], "acme");

    let history = LoginLogRepo::list_for_company(&pool, acme).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].user_email, "admin@acme.test");

    // The issued token works against a protected route.
    let token = data["access_token"].as_str().unwrap();
    let response = get_auth(app, "/api/v1/orchestrations", token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn wrong_password_and_unknown_email_are_401(pool: PgPool) {
    let acme = seed_company(&pool, "acme").await;
    seed_admin(&pool, acme, "admin@acme.test").await;
    let app = common::build_test_app(pool.clone());

    let wrong = serde_json::json!({ "email": "admin@acme.test", "password": "nope-nope" });
    let response = post_json(app.clone(), "/api/v1/auth/login", wrong).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let ghost = serde_json::json!({ "email": "ghost@acme.test", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", ghost).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    assert!(LoginLogRepo::list_for_company(&pool, acme).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_with_missing_fields_is_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "email": "admin@acme.test" });
    let json = expect_json(post_json(app, "/api/v1/auth/login", body).await, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_creates_viewer(pool: PgPool) {
    let acme = seed_company(&pool, "acme").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "name": "Vera",
        "email": "vera@acme.test",
        "password": "long-enough-password",
        "companyId": acme,
    });
    let json = expect_json(post_json(app.clone(), "/api/v1/auth/register", body.clone()).await, StatusCode::CREATED).await;

    assert_eq!(json["data"]["user"]["role"], "viewer");
    assert_eq!(json["data"]["user"]["company_id"], acme);

    // Viewers cannot reach admin-only routes.
    let token = json["data"]["access_token"].as_str().unwrap();
    let response = get_auth(app.clone(), "/api/v1/orchestrations", token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Same email again.
    let json = expect_json(post_json(app, "/api/v1/auth/register", body).await, StatusCode::CONFLICT).await;
    assert_eq!(json["error"], "Email already registered");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_rejects_short_password_and_unknown_company(pool: PgPool) {
    let acme = seed_company(&pool, "acme").await;
    let app = common::build_test_app(pool);

    let short = serde_json::json!({
        "name": "Vera", "email": "vera@acme.test", "password": "short", "companyId": acme,
    });
    let response = post_json(app.clone(), "/api/v1/auth/register", short).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let unknown = serde_json::json!({
        "name": "Vera", "email": "vera@acme.test", "password": "long-enough-password", "companyId": 999_999,
    });
    let response = post_json(app, "/api/v1/auth/register", unknown).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
