#![allow(
    clippy::unwrap_used,
    clippy::panic,
    clippy::missing_panics_doc,
    missing_debug_implementations,
    unreachable_pub
)]
use reqwest::StatusCode;
use serde_json::json;

mod common;

#[tokio::test]
async fn register_with_valid_payload_returns_generic_message() {
    let app = common::TestApp::spawn().await;
    let username = common::generate_username("reg_user");

    let payload = json!({
        "username": username,
        "displayName": "test-display",
        "password": "P4ssword",
    });

    let resp = app
        .client
        .post(format!("{}/api/1.0/users", app.server_url))
        .json(&payload)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "User saved");
}

#[tokio::test]
async fn register_stores_password_hashed() {
    let app = common::TestApp::spawn().await;
    let username = common::generate_username("hash_user");

    common::register_user(&app, &username).await;

    let stored: String = sqlx::query_scalar("SELECT password_hash FROM users WHERE username = $1")
        .bind(&username)
        .fetch_one(&app.pool)
        .await
        .unwrap();

    assert_ne!(stored, "P4ssword");
    assert!(stored.starts_with("$argon2"), "expected an argon2 hash, got {stored}");
}

#[tokio::test]
async fn register_with_empty_payload_reports_all_fields() {
    let app = common::TestApp::spawn().await;

    let resp = app
        .client
        .post(format!("{}/api/1.0/users", app.server_url))
        .json(&json!({}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Validation Error");
    assert_eq!(body["validationErrors"]["username"], "Username cannot be null");
    assert_eq!(body["validationErrors"]["displayName"], "Display name cannot be null");
    assert_eq!(body["validationErrors"]["password"], "Password cannot be null");
}

#[tokio::test]
async fn register_with_short_username_reports_size_message() {
    let app = common::TestApp::spawn().await;

    let payload = json!({
        "username": "abc",
        "displayName": "test-display",
        "password": "P4ssword",
    });

    let resp = app
        .client
        .post(format!("{}/api/1.0/users", app.server_url))
        .json(&payload)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(
        body["validationErrors"]["username"],
        "It must have minimum 4 and maximum 255 characters"
    );
}

#[tokio::test]
async fn register_with_weak_password_reports_pattern_message() {
    let app = common::TestApp::spawn().await;
    let username = common::generate_username("weak_pass");

    let payload = json!({
        "username": username,
        "displayName": "test-display",
        "password": "alllowercase",
    });

    let resp = app
        .client
        .post(format!("{}/api/1.0/users", app.server_url))
        .json(&payload)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(
        body["validationErrors"]["password"],
        "Password must have at least one uppercase, one lowercase letter and one number"
    );

    // Nothing was persisted for the rejected payload
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = $1")
        .bind(&username)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn register_with_taken_username_reports_in_use() {
    let app = common::TestApp::spawn().await;
    let username = common::generate_username("dup_user");

    common::register_user(&app, &username).await;

    let payload = json!({
        "username": username,
        "displayName": "other-display",
        "password": "P4ssword",
    });

    let resp = app
        .client
        .post(format!("{}/api/1.0/users", app.server_url))
        .json(&payload)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["validationErrors"]["username"], "This name is in use");
}
