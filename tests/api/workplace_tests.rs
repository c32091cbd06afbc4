//! Workplace Review API Tests

use axum::http::StatusCode;
use serde_json::json;

use crate::common::{response_json, unique_username, TestApp};

async fn create_workplace(app: &TestApp, token: &str) -> String {
    let body = json!({
        "name": format!("Initech {}", unique_username()),
        "industry": "Software",
    });
    let response = app
        .post_json_auth("/api/v1/workplaces", &body.to_string(), token)
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    response_json(response).await["id"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Reviews move the incremental average rating
#[tokio::test]
#[ignore = "requires Postgres and Redis"]
async fn test_review_updates_average_rating() {
    let app = TestApp::new().await;
    let (_, first_token, _) = app.register_user("member").await;
    let (_, second_token, _) = app.register_user("member").await;
    let workplace_id = create_workplace(&app, &first_token).await;
    let uri = format!("/api/v1/workplaces/{}/reviews", workplace_id);

    let review = json!({
        "rating": 5,
        "body": "Great engineering culture and real work-life balance.",
        "policy_tags": ["remote_friendly", "four_day_week"],
    });
    let response = app
        .post_json_auth(&uri, &review.to_string(), &first_token)
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let review = json!({ "rating": 3, "body": "Decent, but on-call is rough." });
    let response = app
        .post_json_auth(&uri, &review.to_string(), &second_token)
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .get_auth(&format!("/api/v1/workplaces/{}", workplace_id), &first_token)
        .await;
    let workplace = response_json(response).await;
    assert_eq!(workplace["review_count"], 2);
    assert_eq!(workplace["average_rating"], 4.0);
}

/// Concurrent reviews both land in the aggregate
#[tokio::test]
#[ignore = "requires Postgres and Redis"]
async fn test_concurrent_reviews_keep_exact_mean() {
    let app = TestApp::new().await;
    let (_, first_token, _) = app.register_user("member").await;
    let (_, second_token, _) = app.register_user("member").await;
    let workplace_id = create_workplace(&app, &first_token).await;
    let uri = format!("/api/v1/workplaces/{}/reviews", workplace_id);

    let first = json!({ "rating": 5, "body": "Excellent team." }).to_string();
    let second = json!({ "rating": 1, "body": "Burnout factory." }).to_string();

    let (first_response, second_response) = tokio::join!(
        app.post_json_auth(&uri, &first, &first_token),
        app.post_json_auth(&uri, &second, &second_token),
    );
    assert_eq!(first_response.status(), StatusCode::CREATED);
    assert_eq!(second_response.status(), StatusCode::CREATED);

    let response = app
        .get_auth(&format!("/api/v1/workplaces/{}", workplace_id), &first_token)
        .await;
    let workplace = response_json(response).await;
    assert_eq!(workplace["review_count"], 2);
    assert_eq!(workplace["average_rating"], 3.0);
}

/// One review per author per workplace
#[tokio::test]
#[ignore = "requires Postgres and Redis"]
async fn test_duplicate_review_conflicts() {
    let app = TestApp::new().await;
    let (_, token, _) = app.register_user("member").await;
    let workplace_id = create_workplace(&app, &token).await;
    let uri = format!("/api/v1/workplaces/{}/reviews", workplace_id);

    let review = json!({ "rating": 4, "body": "Solid place to work." });
    let response = app.post_json_auth(&uri, &review.to_string(), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.post_json_auth(&uri, &review.to_string(), &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// Unknown policy tags are rejected
#[tokio::test]
#[ignore = "requires Postgres and Redis"]
async fn test_unknown_policy_tag_rejected() {
    let app = TestApp::new().await;
    let (_, token, _) = app.register_user("member").await;
    let workplace_id = create_workplace(&app, &token).await;

    let review = json!({
        "rating": 4,
        "body": "Body text",
        "policy_tags": ["free_snacks"],
    });
    let response = app
        .post_json_auth(
            &format!("/api/v1/workplaces/{}/reviews", workplace_id),
            &review.to_string(),
            &token,
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Only employer accounts may reply, and only once
#[tokio::test]
#[ignore = "requires Postgres and Redis"]
async fn test_single_employer_reply() {
    let app = TestApp::new().await;
    let (_, member_token, _) = app.register_user("member").await;
    let (_, employer_token, _) = app.register_user("employer").await;
    let workplace_id = create_workplace(&app, &member_token).await;

    let review = json!({ "rating": 2, "body": "Management never listens." });
    let response = app
        .post_json_auth(
            &format!("/api/v1/workplaces/{}/reviews", workplace_id),
            &review.to_string(),
            &member_token,
        )
        .await;
    let review_id = response_json(response).await["id"]
        .as_str()
        .unwrap()
        .to_string();

    let uri = format!("/api/v1/workplaces/reviews/{}/reply", review_id);
    let reply = json!({ "body": "Thanks for the feedback, we are working on it." });

    // Members cannot reply
    let response = app
        .post_json_auth(&uri, &reply.to_string(), &member_token)
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .post_json_auth(&uri, &reply.to_string(), &employer_token)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response_json(response).await["employer_reply"].is_string());

    // The reply slot is single-use
    let response = app
        .post_json_auth(&uri, &reply.to_string(), &employer_token)
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// Deleting a review reverses its rating contribution
#[tokio::test]
#[ignore = "requires Postgres and Redis"]
async fn test_delete_review_recomputes_rating() {
    let app = TestApp::new().await;
    let (_, first_token, _) = app.register_user("member").await;
    let (_, second_token, _) = app.register_user("member").await;
    let workplace_id = create_workplace(&app, &first_token).await;
    let uri = format!("/api/v1/workplaces/{}/reviews", workplace_id);

    let review = json!({ "rating": 5, "body": "Excellent." });
    let response = app
        .post_json_auth(&uri, &review.to_string(), &first_token)
        .await;
    let review_id = response_json(response).await["id"]
        .as_str()
        .unwrap()
        .to_string();

    let review = json!({ "rating": 1, "body": "Terrible." });
    app.post_json_auth(&uri, &review.to_string(), &second_token)
        .await;

    let response = app
        .delete_auth(
            &format!("/api/v1/workplaces/reviews/{}", review_id),
            &first_token,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .get_auth(&format!("/api/v1/workplaces/{}", workplace_id), &first_token)
        .await;
    let workplace = response_json(response).await;
    assert_eq!(workplace["review_count"], 1);
    assert_eq!(workplace["average_rating"], 1.0);
}

/// Workplace names are unique case-insensitively
#[tokio::test]
#[ignore = "requires Postgres and Redis"]
async fn test_workplace_name_unique() {
    let app = TestApp::new().await;
    let (_, token, _) = app.register_user("member").await;
    let name = format!("Globex {}", unique_username());

    let body = json!({ "name": name });
    let response = app
        .post_json_auth("/api/v1/workplaces", &body.to_string(), &token)
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json!({ "name": name.to_uppercase() });
    let response = app
        .post_json_auth("/api/v1/workplaces", &body.to_string(), &token)
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
