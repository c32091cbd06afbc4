//! Notification Handlers
//!
//! Listing and acknowledging a user's notifications.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Serialize;
use std::sync::Arc;

use super::parse_id;
use crate::application::dto::request::NotificationQueryParams;
use crate::application::dto::response::{NotificationResponse, UnreadCountResponse};
use crate::application::services::{NotificationService, NotificationServiceImpl};
use crate::infrastructure::repositories::PgNotificationRepository;
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

fn notification_service(state: &AppState) -> impl NotificationService {
    let notification_repo = Arc::new(PgNotificationRepository::new(state.db.clone()));
    NotificationServiceImpl::new(notification_repo)
}

/// List the caller's notifications, newest first
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<NotificationQueryParams>,
) -> Result<Json<Vec<NotificationResponse>>, AppError> {
    let after = query.after.as_deref().and_then(|s| s.parse::<i64>().ok());
    let limit = query.limit.unwrap_or(20).clamp(1, 100);

    let notifications = notification_service(&state)
        .list(auth.user_id, query.unread_only, after, limit)
        .await?;

    Ok(Json(
        notifications
            .into_iter()
            .map(NotificationResponse::from)
            .collect(),
    ))
}

/// Count the caller's unread notifications
pub async fn unread_count(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<UnreadCountResponse>, AppError> {
    let unread = notification_service(&state).unread_count(auth.user_id).await?;

    Ok(Json(UnreadCountResponse { unread }))
}

/// Mark a single notification as read
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(notification_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let notification_id = parse_id(&notification_id)?;
    notification_service(&state)
        .mark_read(auth.user_id, notification_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
pub struct MarkAllReadResponse {
    pub marked: i64,
}

/// Mark all of the caller's notifications as read
pub async fn mark_all_read(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<MarkAllReadResponse>, AppError> {
    let marked = notification_service(&state).mark_all_read(auth.user_id).await?;

    Ok(Json(MarkAllReadResponse { marked }))
}
