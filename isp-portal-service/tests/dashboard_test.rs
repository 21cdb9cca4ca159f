mod common;

use axum::http::StatusCode;
use common::{TestApp, ACTIVE_CLIENT_ID};

#[tokio::test]
async fn profile_requires_login() {
    let mut app = TestApp::spawn().await;

    let response = app.get("/api/profile").await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "no authenticated client");
}

#[tokio::test]
async fn profile_view_for_active_client() {
    let mut app = TestApp::spawn().await;
    app.login_active().await;

    let response = app.get("/api/profile").await;

    assert_eq!(response.status, StatusCode::OK);
    let view = &response.body;
    assert_eq!(view["client"]["id"], ACTIVE_CLIENT_ID);
    assert!(view["client"].get("password_hash").is_none());
    assert_eq!(view["package_status"], "Active");
    assert_eq!(view["current_package"]["profile_name"], "home-10m");
    assert_eq!(view["usage"]["today"], 3000);
    assert_eq!(view["usage"]["total"], 3000);
    assert_eq!(view["auto_renew"], true);
    assert_eq!(view["payments"].as_array().map(Vec::len), Some(10));
    assert_eq!(view["sessions"].as_array().map(Vec::len), Some(1));
    assert_eq!(view["tickets"].as_array().map(Vec::len), Some(0));
    assert_eq!(view["degraded_sections"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn payment_history_includes_reversed_entries() {
    let mut app = TestApp::spawn().await;
    app.login_active().await;

    let response = app.get("/api/payments?limit=50").await;

    assert_eq!(response.status, StatusCode::OK);
    let payments = response.body.as_array().cloned().unwrap_or_default();
    assert_eq!(payments.len(), 12);
    assert!(payments.iter().any(|p| p["status"] == "reversed"));
    assert_eq!(payments[0]["transaction_ref"], "TXN-000001");
}

#[tokio::test]
async fn history_limit_is_clamped() {
    let mut app = TestApp::spawn().await;
    app.login_active().await;

    let response = app.get("/api/payments?limit=0").await;
    assert_eq!(response.body.as_array().map(Vec::len), Some(1));

    let response = app.get("/api/payments").await;
    assert_eq!(response.body.as_array().map(Vec::len), Some(10));

    let response = app.get("/api/sessions?limit=3").await;
    assert_eq!(response.body.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn removed_account_logs_the_session_out() {
    let mut app = TestApp::spawn().await;
    app.login_active().await;
    assert!(app.store.remove_client(ACTIVE_CLIENT_ID).await);

    let response = app.get("/api/profile").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "no authenticated client");

    let response = app.get("/api/tickets").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
