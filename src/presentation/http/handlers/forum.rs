//! Forum Handlers
//!
//! Threads, comments and comment votes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use std::sync::Arc;
use validator::Validate;

use super::parse_id;
use crate::application::dto::request::{CreateCommentRequest, CreateThreadRequest, PageParams};
use crate::application::dto::response::{ForumCommentResponse, ForumThreadResponse};
use crate::application::services::{ForumService, ForumServiceImpl};
use crate::infrastructure::repositories::{
    PgBadgeRepository, PgForumCommentRepository, PgForumThreadRepository,
    PgNotificationRepository, PgUserRepository,
};
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

fn forum_service(state: &AppState) -> impl ForumService {
    let thread_repo = Arc::new(PgForumThreadRepository::new(state.db.clone()));
    let comment_repo = Arc::new(PgForumCommentRepository::new(state.db.clone()));
    let user_repo = Arc::new(PgUserRepository::new(state.db.clone()));
    let badge_repo = Arc::new(PgBadgeRepository::new(state.db.clone()));
    let notification_repo = Arc::new(PgNotificationRepository::new(state.db.clone()));
    ForumServiceImpl::new(
        thread_repo,
        comment_repo,
        user_repo,
        badge_repo,
        notification_repo,
        state.snowflake.clone(),
    )
}

/// Create a forum thread
pub async fn create_thread(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<CreateThreadRequest>,
) -> Result<impl IntoResponse, AppError> {
    body.validate()
        .map_err(validation_error)?;

    let thread = forum_service(&state)
        .create_thread(auth.user_id, body.title, body.body)
        .await?;

    Ok((StatusCode::CREATED, Json(ForumThreadResponse::from(thread))))
}

/// List threads, newest first
pub async fn list_threads(
    State(state): State<AppState>,
    Query(page): Query<PageParams>,
) -> Result<Json<Vec<ForumThreadResponse>>, AppError> {
    let threads = forum_service(&state)
        .list_threads(page.after_id(), page.clamped_limit())
        .await?;

    Ok(Json(
        threads.into_iter().map(ForumThreadResponse::from).collect(),
    ))
}

/// Fetch a thread
pub async fn get_thread(
    State(state): State<AppState>,
    Path(thread_id): Path<String>,
) -> Result<Json<ForumThreadResponse>, AppError> {
    let thread_id = parse_id(&thread_id)?;
    let thread = forum_service(&state).get_thread(thread_id).await?;

    Ok(Json(ForumThreadResponse::from(thread)))
}

/// Delete a thread (author or moderator only)
pub async fn delete_thread(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(thread_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let thread_id = parse_id(&thread_id)?;
    forum_service(&state)
        .delete_thread(auth.user_id, thread_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Comment on a thread, optionally replying to another comment
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(thread_id): Path<String>,
    Json(body): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    body.validate()
        .map_err(validation_error)?;
    let thread_id = parse_id(&thread_id)?;
    let parent_id = body.parent_id.as_deref().map(parse_id).transpose()?;

    let comment = forum_service(&state)
        .create_comment(auth.user_id, thread_id, parent_id, body.body)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ForumCommentResponse::from(comment)),
    ))
}

/// List a thread's comments, oldest first
pub async fn list_comments(
    State(state): State<AppState>,
    Path(thread_id): Path<String>,
    Query(page): Query<PageParams>,
) -> Result<Json<Vec<ForumCommentResponse>>, AppError> {
    let thread_id = parse_id(&thread_id)?;
    let comments = forum_service(&state)
        .list_comments(thread_id, page.after_id(), page.clamped_limit())
        .await?;

    Ok(Json(
        comments
            .into_iter()
            .map(ForumCommentResponse::from)
            .collect(),
    ))
}

/// Delete a comment (author or moderator only)
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(comment_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let comment_id = parse_id(&comment_id)?;
    forum_service(&state)
        .delete_comment(auth.user_id, comment_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Upvote a comment
pub async fn upvote(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(comment_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let comment_id = parse_id(&comment_id)?;
    forum_service(&state)
        .upvote_comment(auth.user_id, comment_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Withdraw the caller's upvote
pub async fn remove_vote(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(comment_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let comment_id = parse_id(&comment_id)?;
    forum_service(&state)
        .remove_vote(auth.user_id, comment_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
