//! Forum API Tests

use axum::http::StatusCode;
use serde_json::json;

use crate::common::{response_json, TestApp};

/// Creating a thread awards the first-thread badge
#[tokio::test]
#[ignore = "requires Postgres and Redis"]
async fn test_create_thread_awards_first_thread_badge() {
    let app = TestApp::new().await;
    let (user_id, token, _) = app.register_user("member").await;

    let body = json!({
        "title": "How do I prepare for systems interviews?",
        "body": "Looking for advice on preparation strategies.",
    });
    let response = app
        .post_json_auth("/api/v1/forum/threads", &body.to_string(), &token)
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .get_auth(&format!("/api/v1/users/{}/badges", user_id), &token)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let badges = response_json(response).await;
    assert!(badges
        .as_array()
        .unwrap()
        .iter()
        .any(|b| b["kind"] == "first_thread"));
}

/// Commenting bumps the thread's comment count
#[tokio::test]
#[ignore = "requires Postgres and Redis"]
async fn test_comment_increments_thread_count() {
    let app = TestApp::new().await;
    let (_, token, _) = app.register_user("member").await;

    let thread = json!({ "title": "Salary negotiation tips", "body": "Share yours." });
    let response = app
        .post_json_auth("/api/v1/forum/threads", &thread.to_string(), &token)
        .await;
    let thread_id = response_json(response).await["id"]
        .as_str()
        .unwrap()
        .to_string();

    let comment = json!({ "body": "Always get the offer in writing first." });
    let response = app
        .post_json_auth(
            &format!("/api/v1/forum/threads/{}/comments", thread_id),
            &comment.to_string(),
            &token,
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .get_auth(&format!("/api/v1/forum/threads/{}", thread_id), &token)
        .await;
    let thread = response_json(response).await;
    assert_eq!(thread["comment_count"], 1);
}

/// A reply must target a comment in the same thread
#[tokio::test]
#[ignore = "requires Postgres and Redis"]
async fn test_reply_to_comment_in_other_thread_fails() {
    let app = TestApp::new().await;
    let (_, token, _) = app.register_user("member").await;

    let mut ids = Vec::new();
    for title in ["First thread", "Second thread"] {
        let thread = json!({ "title": title, "body": "body" });
        let response = app
            .post_json_auth("/api/v1/forum/threads", &thread.to_string(), &token)
            .await;
        ids.push(
            response_json(response).await["id"]
                .as_str()
                .unwrap()
                .to_string(),
        );
    }

    let comment = json!({ "body": "a comment" });
    let response = app
        .post_json_auth(
            &format!("/api/v1/forum/threads/{}/comments", ids[0]),
            &comment.to_string(),
            &token,
        )
        .await;
    let comment_id = response_json(response).await["id"]
        .as_str()
        .unwrap()
        .to_string();

    // Reply in the second thread pointing at the first thread's comment
    let reply = json!({ "body": "a reply", "parent_id": comment_id });
    let response = app
        .post_json_auth(
            &format!("/api/v1/forum/threads/{}/comments", ids[1]),
            &reply.to_string(),
            &token,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Voting on one's own comment is rejected
#[tokio::test]
#[ignore = "requires Postgres and Redis"]
async fn test_vote_on_own_comment_rejected() {
    let app = TestApp::new().await;
    let (_, token, _) = app.register_user("member").await;

    let thread = json!({ "title": "Self vote thread", "body": "body" });
    let response = app
        .post_json_auth("/api/v1/forum/threads", &thread.to_string(), &token)
        .await;
    let thread_id = response_json(response).await["id"]
        .as_str()
        .unwrap()
        .to_string();

    let comment = json!({ "body": "my own comment" });
    let response = app
        .post_json_auth(
            &format!("/api/v1/forum/threads/{}/comments", thread_id),
            &comment.to_string(),
            &token,
        )
        .await;
    let comment_id = response_json(response).await["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .put_json_auth(
            &format!("/api/v1/forum/comments/{}/vote", comment_id),
            "{}",
            &token,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The comment's score is untouched
    let response = app
        .get_auth(
            &format!("/api/v1/forum/threads/{}/comments", thread_id),
            &token,
        )
        .await;
    let comments = response_json(response).await;
    assert_eq!(comments[0]["score"], 0);
}

/// Voting twice on the same comment conflicts
#[tokio::test]
#[ignore = "requires Postgres and Redis"]
async fn test_double_vote_conflicts() {
    let app = TestApp::new().await;
    let (_, author_token, _) = app.register_user("member").await;
    let (_, voter_token, _) = app.register_user("member").await;

    let thread = json!({ "title": "Vote test thread", "body": "body" });
    let response = app
        .post_json_auth("/api/v1/forum/threads", &thread.to_string(), &author_token)
        .await;
    let thread_id = response_json(response).await["id"]
        .as_str()
        .unwrap()
        .to_string();

    let comment = json!({ "body": "vote on me" });
    let response = app
        .post_json_auth(
            &format!("/api/v1/forum/threads/{}/comments", thread_id),
            &comment.to_string(),
            &author_token,
        )
        .await;
    let comment_id = response_json(response).await["id"]
        .as_str()
        .unwrap()
        .to_string();

    let uri = format!("/api/v1/forum/comments/{}/vote", comment_id);
    let response = app.put_json_auth(&uri, "{}", &voter_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.put_json_auth(&uri, "{}", &voter_token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Removing the vote then voting again is fine
    let response = app.delete_auth(&uri, &voter_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = app.put_json_auth(&uri, "{}", &voter_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

/// Only the author or a moderator may delete a thread
#[tokio::test]
#[ignore = "requires Postgres and Redis"]
async fn test_thread_deletion_requires_author() {
    let app = TestApp::new().await;
    let (_, author_token, _) = app.register_user("member").await;
    let (_, other_token, _) = app.register_user("member").await;

    let thread = json!({ "title": "Delete me", "body": "body" });
    let response = app
        .post_json_auth("/api/v1/forum/threads", &thread.to_string(), &author_token)
        .await;
    let thread_id = response_json(response).await["id"]
        .as_str()
        .unwrap()
        .to_string();

    let uri = format!("/api/v1/forum/threads/{}", thread_id);
    let response = app.delete_auth(&uri, &other_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.delete_auth(&uri, &author_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
