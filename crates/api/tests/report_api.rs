//! HTTP-level tests for reports, admin grants and login history.

mod common;

use axum::http::StatusCode;
use common::{
    expect_json, get_auth, post_json, post_json_auth, put_json_auth, seed_admin, seed_company,
    seed_report, seed_user, TEST_PASSWORD,
};
use lumen_core::roles::ROLE_VIEWER;
use serde_json::json;
use sqlx::PgPool;

const EMBED_URL: &str = "https://app.powerbi.com/reportEmbed?reportId=R&groupId=G";

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_report_grants_it_to_creator(pool: PgPool) {
    let acme = seed_company(&pool, "acme").await;
    let admin = seed_admin(&pool, acme, "admin@acme.test").await;
    let app = common::build_test_app(pool);

    let created = expect_json(
        post_json_auth(
            app.clone(),
            "/api/v1/reports",
            json!({ "name": "Sales", "embedUrl": EMBED_URL }),
            &admin.token,
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(created["data"]["name"], "Sales");
    assert_eq!(created["data"]["embed_url"], EMBED_URL);

    let listed = expect_json(get_auth(app.clone(), "/api/v1/reports", &admin.token).await, StatusCode::OK).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);

    let response = post_json_auth(app, "/api/v1/reports", json!({ "name": "No URL" }), &admin.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn viewer_lists_only_granted_reports(pool: PgPool) {
    let acme = seed_company(&pool, "acme").await;
    let admin = seed_admin(&pool, acme, "admin@acme.test").await;
    let viewer = seed_user(&pool, acme, "viewer@acme.test", ROLE_VIEWER).await;
    let sales = seed_report(&pool, admin.id, "Sales", EMBED_URL).await;
    seed_report(&pool, admin.id, "Finance", EMBED_URL).await;
    let app = common::build_test_app(pool);

    let listed = expect_json(get_auth(app.clone(), "/api/v1/reports", &viewer.token).await, StatusCode::OK).await;
    assert_eq!(listed["data"], json!([]));

    let granted = expect_json(
        put_json_auth(
            app.clone(),
            &format!("/api/v1/admin/permissions/{}", viewer.id),
            json!({ "reportIds": [sales] }),
            &admin.token,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(granted["data"]["reportIds"], json!([sales]));

    let listed = expect_json(get_auth(app.clone(), "/api/v1/reports", &viewer.token).await, StatusCode::OK).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);
    assert_eq!(listed["data"][0]["name"], "Sales");

    let admin_view = expect_json(get_auth(app, "/api/v1/reports", &admin.token).await, StatusCode::OK).await;
    let names: Vec<&str> = admin_view["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Finance", "Sales"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_endpoints_stay_inside_company(pool: PgPool) {
    let acme = seed_company(&pool, "acme").await;
    let globex = seed_company(&pool, "globex").await;
    let admin = seed_admin(&pool, acme, "admin@acme.test").await;
    let viewer = seed_user(&pool, acme, "viewer@acme.test", ROLE_VIEWER).await;
    let outsider = seed_admin(&pool, globex, "admin@globex.test").await;
    seed_report(&pool, admin.id, "Sales", EMBED_URL).await;
    let app = common::build_test_app(pool);

    let users = expect_json(get_auth(app.clone(), "/api/v1/admin/users", &admin.token).await, StatusCode::OK).await;
    let emails: Vec<&str> = users["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["email"].as_str().unwrap())
        .collect();
    assert_eq!(emails, vec!["admin@acme.test", "viewer@acme.test"]);
    assert!(users.to_string().find("password").is_none());

    let reports = expect_json(get_auth(app.clone(), "/api/v1/admin/reports", &outsider.token).await, StatusCode::OK).await;
    assert_eq!(reports["data"], json!([]));

    let response = get_auth(
        app.clone(),
        &format!("/api/v1/admin/permissions/{}", viewer.id),
        &outsider.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/admin/permissions/{}", viewer.id),
        json!({ "reportIds": [] }),
        &outsider.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get_auth(app, "/api/v1/admin/users", &viewer.token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn history_lists_company_logins(pool: PgPool) {
    let acme = seed_company(&pool, "acme").await;
    let globex = seed_company(&pool, "globex").await;
    let admin = seed_admin(&pool, acme, "admin@acme.test").await;
    seed_admin(&pool, globex, "admin@globex.test").await;
    let app = common::build_test_app(pool);

    for email in ["admin@acme.test", "admin@globex.test", "admin@acme.test"] {
        let response = post_json(
            app.clone(),
            "/api/v1/auth/login",
            json!({ "email": email, "password": TEST_PASSWORD }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let history = expect_json(get_auth(app, "/api/v1/history", &admin.token).await, StatusCode::OK).await;
    let entries = history["data"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e["user_email"] == "admin@acme.test"));
}
