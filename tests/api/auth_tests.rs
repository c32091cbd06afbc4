//! Authentication API Tests

use axum::http::StatusCode;
use serde_json::json;

use crate::common::{response_json, unique_email, unique_username, TestApp};

/// Registration with valid data returns tokens and the new user
#[tokio::test]
#[ignore = "requires Postgres and Redis"]
async fn test_register_with_valid_data() {
    let app = TestApp::new().await;
    let body = json!({
        "username": unique_username(),
        "email": unique_email(),
        "password": "ValidPassword123!",
    });

    let response = app
        .post_json("/api/v1/auth/register", &body.to_string())
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = response_json(response).await;
    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert_eq!(json["user"]["role"], "member");
    // Own registration response includes the email
    assert!(json["user"]["email"].is_string());
}

/// Registration rejects a malformed email
#[tokio::test]
#[ignore = "requires Postgres and Redis"]
async fn test_register_with_invalid_email_fails() {
    let app = TestApp::new().await;
    let body = json!({
        "username": unique_username(),
        "email": "not-an-email",
        "password": "ValidPassword123!",
    });

    let response = app
        .post_json("/api/v1/auth/register", &body.to_string())
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    // Field-level detail names the offending field
    let json = response_json(response).await;
    assert!(json["errors"]
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e["field"] == "email"));
}

/// Registration rejects a short password
#[tokio::test]
#[ignore = "requires Postgres and Redis"]
async fn test_register_with_short_password_fails() {
    let app = TestApp::new().await;
    let body = json!({
        "username": unique_username(),
        "email": unique_email(),
        "password": "short",
    });

    let response = app
        .post_json("/api/v1/auth/register", &body.to_string())
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Registration cannot self-assign the moderator role
#[tokio::test]
#[ignore = "requires Postgres and Redis"]
async fn test_register_as_moderator_fails() {
    let app = TestApp::new().await;
    let body = json!({
        "username": unique_username(),
        "email": unique_email(),
        "password": "ValidPassword123!",
        "role": "moderator",
    });

    let response = app
        .post_json("/api/v1/auth/register", &body.to_string())
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// A duplicate email is rejected with a conflict
#[tokio::test]
#[ignore = "requires Postgres and Redis"]
async fn test_register_with_duplicate_email_fails() {
    let app = TestApp::new().await;
    let email = unique_email();
    let first = json!({
        "username": unique_username(),
        "email": email,
        "password": "ValidPassword123!",
    });
    let response = app
        .post_json("/api/v1/auth/register", &first.to_string())
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let second = json!({
        "username": unique_username(),
        "email": email,
        "password": "ValidPassword123!",
    });
    let response = app
        .post_json("/api/v1/auth/register", &second.to_string())
        .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// Login with valid credentials returns a token pair
#[tokio::test]
#[ignore = "requires Postgres and Redis"]
async fn test_login_with_valid_credentials() {
    let app = TestApp::new().await;
    let email = unique_email();
    let register = json!({
        "username": unique_username(),
        "email": email,
        "password": "ValidPassword123!",
    });
    app.post_json("/api/v1/auth/register", &register.to_string())
        .await;

    let login = json!({ "email": email, "password": "ValidPassword123!" });
    let response = app.post_json("/api/v1/auth/login", &login.to_string()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert_eq!(json["token_type"], "Bearer");
}

/// Login with a wrong password is rejected
#[tokio::test]
#[ignore = "requires Postgres and Redis"]
async fn test_login_with_invalid_credentials_fails() {
    let app = TestApp::new().await;
    let login = json!({
        "email": unique_email(),
        "password": "WrongPassword123!",
    });

    let response = app.post_json("/api/v1/auth/login", &login.to_string()).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Refreshing rotates the refresh token
#[tokio::test]
#[ignore = "requires Postgres and Redis"]
async fn test_refresh_token_rotation() {
    let app = TestApp::new().await;
    let (_, _, refresh_token) = app.register_user("member").await;

    let body = json!({ "refresh_token": refresh_token });
    let response = app
        .post_json("/api/v1/auth/refresh", &body.to_string())
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    let rotated = json["refresh_token"].as_str().unwrap();
    assert_ne!(rotated, refresh_token);

    // The old token is dead after rotation
    let response = app
        .post_json("/api/v1/auth/refresh", &body.to_string())
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Logout revokes the refresh token
#[tokio::test]
#[ignore = "requires Postgres and Redis"]
async fn test_logout_revokes_refresh_token() {
    let app = TestApp::new().await;
    let (_, _, refresh_token) = app.register_user("member").await;

    let body = json!({ "refresh_token": refresh_token });
    let response = app
        .post_json("/api/v1/auth/logout", &body.to_string())
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .post_json("/api/v1/auth/refresh", &body.to_string())
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Protected endpoints require a bearer token
#[tokio::test]
#[ignore = "requires Postgres and Redis"]
async fn test_protected_endpoint_requires_auth() {
    let app = TestApp::new().await;

    let response = app.get("/api/v1/users/@me").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// A valid access token grants access to protected endpoints
#[tokio::test]
#[ignore = "requires Postgres and Redis"]
async fn test_protected_endpoint_works_with_valid_token() {
    let app = TestApp::new().await;
    let (user_id, access_token, _) = app.register_user("member").await;

    let response = app.get_auth("/api/v1/users/@me", &access_token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["id"], user_id);
}
