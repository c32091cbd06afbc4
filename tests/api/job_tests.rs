//! Job Board API Tests

use axum::http::StatusCode;
use serde_json::json;

use crate::common::{response_json, TestApp};

async fn create_post(app: &TestApp, token: &str) -> String {
    let body = json!({
        "title": "Senior Backend Engineer",
        "description": "Build and operate our payments platform services.",
        "company": "Acme Corp",
        "location": "Berlin",
        "employment_type": "full_time",
        "remote": true,
    });
    let response = app
        .post_json_auth("/api/v1/jobs", &body.to_string(), token)
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    response_json(response).await["id"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Members cannot create job posts
#[tokio::test]
#[ignore = "requires Postgres and Redis"]
async fn test_member_cannot_create_post() {
    let app = TestApp::new().await;
    let (_, token, _) = app.register_user("member").await;

    let body = json!({
        "title": "Senior Backend Engineer",
        "description": "Build and operate our payments platform services.",
        "company": "Acme Corp",
    });
    let response = app
        .post_json_auth("/api/v1/jobs", &body.to_string(), &token)
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// An employer can create a post and it shows up in the open listing
#[tokio::test]
#[ignore = "requires Postgres and Redis"]
async fn test_employer_creates_post_and_lists_it() {
    let app = TestApp::new().await;
    let (_, token, _) = app.register_user("employer").await;

    let post_id = create_post(&app, &token).await;

    let response = app.get_auth("/api/v1/jobs", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let posts = response_json(response).await;
    assert!(posts
        .as_array()
        .unwrap()
        .iter()
        .any(|p| p["id"] == post_id.as_str()));
}

/// Applying twice to the same post conflicts
#[tokio::test]
#[ignore = "requires Postgres and Redis"]
async fn test_duplicate_application_conflicts() {
    let app = TestApp::new().await;
    let (_, employer_token, _) = app.register_user("employer").await;
    let (_, member_token, _) = app.register_user("member").await;
    let post_id = create_post(&app, &employer_token).await;

    let uri = format!("/api/v1/jobs/{}/applications", post_id);
    let body = json!({ "cover_letter": "I would love to join." });

    let response = app
        .post_json_auth(&uri, &body.to_string(), &member_token)
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .post_json_auth(&uri, &body.to_string(), &member_token)
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// The employer walks an application through the status workflow
#[tokio::test]
#[ignore = "requires Postgres and Redis"]
async fn test_application_status_workflow() {
    let app = TestApp::new().await;
    let (_, employer_token, _) = app.register_user("employer").await;
    let (_, member_token, _) = app.register_user("member").await;
    let post_id = create_post(&app, &employer_token).await;

    let response = app
        .post_json_auth(
            &format!("/api/v1/jobs/{}/applications", post_id),
            "{}",
            &member_token,
        )
        .await;
    let application_id = response_json(response).await["id"]
        .as_str()
        .unwrap()
        .to_string();

    let uri = format!("/api/v1/jobs/applications/{}", application_id);

    let response = app
        .patch_json_auth(&uri, &json!({ "status": "in_review" }).to_string(), &employer_token)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["status"], "in_review");

    let response = app
        .patch_json_auth(&uri, &json!({ "status": "accepted" }).to_string(), &employer_token)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Accepted is terminal
    let response = app
        .patch_json_auth(&uri, &json!({ "status": "rejected" }).to_string(), &employer_token)
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// Applicants can withdraw their own application
#[tokio::test]
#[ignore = "requires Postgres and Redis"]
async fn test_withdraw_application() {
    let app = TestApp::new().await;
    let (_, employer_token, _) = app.register_user("employer").await;
    let (_, member_token, _) = app.register_user("member").await;
    let post_id = create_post(&app, &employer_token).await;

    let response = app
        .post_json_auth(
            &format!("/api/v1/jobs/{}/applications", post_id),
            "{}",
            &member_token,
        )
        .await;
    let application_id = response_json(response).await["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .delete_auth(
            &format!("/api/v1/jobs/applications/{}", application_id),
            &member_token,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The withdrawn application shows up in the caller's list
    let response = app
        .get_auth("/api/v1/users/@me/applications", &member_token)
        .await;
    let applications = response_json(response).await;
    assert_eq!(applications[0]["status"], "withdrawn");
}

/// Applying to a closed post is rejected
#[tokio::test]
#[ignore = "requires Postgres and Redis"]
async fn test_apply_to_closed_post_fails() {
    let app = TestApp::new().await;
    let (_, employer_token, _) = app.register_user("employer").await;
    let (_, member_token, _) = app.register_user("member").await;
    let post_id = create_post(&app, &employer_token).await;

    let response = app
        .patch_json_auth(
            &format!("/api/v1/jobs/{}", post_id),
            &json!({ "open": false }).to_string(),
            &employer_token,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .post_json_auth(
            &format!("/api/v1/jobs/{}/applications", post_id),
            "{}",
            &member_token,
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
