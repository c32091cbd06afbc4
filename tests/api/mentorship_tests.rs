//! Mentorship API Tests

use axum::http::StatusCode;
use serde_json::json;

use crate::common::{response_json, TestApp};

async fn create_mentor(app: &TestApp, token: &str, capacity: i32) -> String {
    let body = json!({
        "headline": "Staff engineer, happy to help with career growth",
        "expertise": ["backend", "distributed-systems"],
        "capacity": capacity,
    });
    let response = app
        .post_json_auth("/api/v1/mentors", &body.to_string(), token)
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    response_json(response).await["id"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn request_mentorship(app: &TestApp, token: &str, mentor_id: &str) -> String {
    let body = json!({ "message": "Would you mentor me?" });
    let response = app
        .post_json_auth(
            &format!("/api/v1/mentors/{}/requests", mentor_id),
            &body.to_string(),
            token,
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    response_json(response).await["id"]
        .as_str()
        .unwrap()
        .to_string()
}

/// A user cannot request mentorship from themselves
#[tokio::test]
#[ignore = "requires Postgres and Redis"]
async fn test_self_mentorship_rejected() {
    let app = TestApp::new().await;
    let (_, token, _) = app.register_user("member").await;
    let mentor_id = create_mentor(&app, &token, 3).await;

    let response = app
        .post_json_auth(
            &format!("/api/v1/mentors/{}/requests", mentor_id),
            "{}",
            &token,
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Accepting a request consumes mentor capacity
#[tokio::test]
#[ignore = "requires Postgres and Redis"]
async fn test_accept_consumes_capacity() {
    let app = TestApp::new().await;
    let (_, mentor_token, _) = app.register_user("member").await;
    let (_, mentee_token, _) = app.register_user("member").await;
    let mentor_id = create_mentor(&app, &mentor_token, 1).await;

    let request_id = request_mentorship(&app, &mentee_token, &mentor_id).await;

    let response = app
        .post_json_auth(
            &format!("/api/v1/mentorship/requests/{}/accept", request_id),
            "{}",
            &mentor_token,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["status"], "accepted");

    let response = app
        .get_auth(&format!("/api/v1/mentors/{}", mentor_id), &mentor_token)
        .await;
    let profile = response_json(response).await;
    assert_eq!(profile["mentee_count"], 1);

    // Capacity 1 is now exhausted for further mentees
    let (_, other_token, _) = app.register_user("member").await;
    let response = app
        .post_json_auth(
            &format!("/api/v1/mentors/{}/requests", mentor_id),
            "{}",
            &other_token,
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// A mentor who stopped accepting cannot take on a pending request
#[tokio::test]
#[ignore = "requires Postgres and Redis"]
async fn test_accept_blocked_after_closing_to_mentees() {
    let app = TestApp::new().await;
    let (_, mentor_token, _) = app.register_user("member").await;
    let (_, mentee_token, _) = app.register_user("member").await;
    let mentor_id = create_mentor(&app, &mentor_token, 3).await;
    let request_id = request_mentorship(&app, &mentee_token, &mentor_id).await;

    let response = app
        .patch_json_auth(
            "/api/v1/mentors/@me",
            &json!({ "accepting": false }).to_string(),
            &mentor_token,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .post_json_auth(
            &format!("/api/v1/mentorship/requests/{}/accept", request_id),
            "{}",
            &mentor_token,
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Rejecting is still possible
    let response = app
        .post_json_auth(
            &format!("/api/v1/mentorship/requests/{}/reject", request_id),
            "{}",
            &mentor_token,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["status"], "rejected");
}

/// Only the mentor may respond to a request
#[tokio::test]
#[ignore = "requires Postgres and Redis"]
async fn test_only_mentor_can_respond() {
    let app = TestApp::new().await;
    let (_, mentor_token, _) = app.register_user("member").await;
    let (_, mentee_token, _) = app.register_user("member").await;
    let mentor_id = create_mentor(&app, &mentor_token, 3).await;
    let request_id = request_mentorship(&app, &mentee_token, &mentor_id).await;

    let response = app
        .post_json_auth(
            &format!("/api/v1/mentorship/requests/{}/accept", request_id),
            "{}",
            &mentee_token,
        )
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Messaging requires an accepted mentorship
#[tokio::test]
#[ignore = "requires Postgres and Redis"]
async fn test_messaging_requires_accepted_request() {
    let app = TestApp::new().await;
    let (_, mentor_token, _) = app.register_user("member").await;
    let (_, mentee_token, _) = app.register_user("member").await;
    let mentor_id = create_mentor(&app, &mentor_token, 3).await;
    let request_id = request_mentorship(&app, &mentee_token, &mentor_id).await;

    let uri = format!("/api/v1/mentorship/requests/{}/messages", request_id);
    let message = json!({ "body": "Hi there!" });

    // Still pending
    let response = app
        .post_json_auth(&uri, &message.to_string(), &mentee_token)
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    app.post_json_auth(
        &format!("/api/v1/mentorship/requests/{}/accept", request_id),
        "{}",
        &mentor_token,
    )
    .await;

    let response = app
        .post_json_auth(&uri, &message.to_string(), &mentee_token)
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Outsiders cannot read the conversation
    let (_, outsider_token, _) = app.register_user("member").await;
    let response = app.get_auth(&uri, &outsider_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Completion frees capacity, awards the mentor badge and enables reviews
#[tokio::test]
#[ignore = "requires Postgres and Redis"]
async fn test_completion_enables_review_and_badge() {
    let app = TestApp::new().await;
    let (mentor_user_id, mentor_token, _) = app.register_user("member").await;
    let (_, mentee_token, _) = app.register_user("member").await;
    let mentor_id = create_mentor(&app, &mentor_token, 1).await;
    let request_id = request_mentorship(&app, &mentee_token, &mentor_id).await;

    app.post_json_auth(
        &format!("/api/v1/mentorship/requests/{}/accept", request_id),
        "{}",
        &mentor_token,
    )
    .await;

    // Reviewing before completion is rejected
    let review = json!({ "rating": 5, "comment": "Great mentor" });
    let response = app
        .post_json_auth(
            &format!("/api/v1/mentors/{}/reviews", mentor_id),
            &review.to_string(),
            &mentee_token,
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .post_json_auth(
            &format!("/api/v1/mentorship/requests/{}/complete", request_id),
            "{}",
            &mentor_token,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Capacity is freed
    let response = app
        .get_auth(&format!("/api/v1/mentors/{}", mentor_id), &mentor_token)
        .await;
    assert_eq!(response_json(response).await["mentee_count"], 0);

    // The mentor badge is awarded at the first completion
    let response = app
        .get_auth(
            &format!("/api/v1/users/{}/badges", mentor_user_id),
            &mentor_token,
        )
        .await;
    let badges = response_json(response).await;
    assert!(badges
        .as_array()
        .unwrap()
        .iter()
        .any(|b| b["kind"] == "mentor"));

    // Now the review goes through and moves the average
    let response = app
        .post_json_auth(
            &format!("/api/v1/mentors/{}/reviews", mentor_id),
            &review.to_string(),
            &mentee_token,
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .get_auth(&format!("/api/v1/mentors/{}", mentor_id), &mentor_token)
        .await;
    let profile = response_json(response).await;
    assert_eq!(profile["review_count"], 1);
    assert_eq!(profile["average_rating"], 5.0);
}

/// The mentee can cancel an accepted mentorship, freeing capacity
#[tokio::test]
#[ignore = "requires Postgres and Redis"]
async fn test_mentee_cancels_accepted_request() {
    let app = TestApp::new().await;
    let (_, mentor_token, _) = app.register_user("member").await;
    let (_, mentee_token, _) = app.register_user("member").await;
    let mentor_id = create_mentor(&app, &mentor_token, 1).await;
    let request_id = request_mentorship(&app, &mentee_token, &mentor_id).await;

    app.post_json_auth(
        &format!("/api/v1/mentorship/requests/{}/accept", request_id),
        "{}",
        &mentor_token,
    )
    .await;

    let response = app
        .post_json_auth(
            &format!("/api/v1/mentorship/requests/{}/cancel", request_id),
            "{}",
            &mentee_token,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["status"], "cancelled");

    let response = app
        .get_auth(&format!("/api/v1/mentors/{}", mentor_id), &mentor_token)
        .await;
    assert_eq!(response_json(response).await["mentee_count"], 0);
}
