//! Notification Service
//!
//! Inbox reads and read-state changes. Writes happen synchronously inside
//! the services that produce the events.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Notification, NotificationRepository};
use crate::shared::error::AppError;

/// Notification service errors
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("Notification not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<NotificationError> for AppError {
    fn from(e: NotificationError) -> Self {
        match e {
            NotificationError::NotFound => AppError::NotFound("Notification not found".into()),
            NotificationError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Notification service trait for dependency injection
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// List the caller's notifications, newest first.
    async fn list(
        &self,
        user_id: i64,
        unread_only: bool,
        after: Option<i64>,
        limit: i32,
    ) -> Result<Vec<Notification>, NotificationError>;

    /// Count the caller's unread notifications.
    async fn unread_count(&self, user_id: i64) -> Result<i64, NotificationError>;

    /// Mark one of the caller's notifications read.
    async fn mark_read(
        &self,
        user_id: i64,
        notification_id: i64,
    ) -> Result<(), NotificationError>;

    /// Mark all of the caller's notifications read. Returns the number updated.
    async fn mark_all_read(&self, user_id: i64) -> Result<i64, NotificationError>;
}

/// NotificationService implementation
pub struct NotificationServiceImpl<N>
where
    N: NotificationRepository,
{
    notification_repo: Arc<N>,
}

impl<N> NotificationServiceImpl<N>
where
    N: NotificationRepository,
{
    /// Create a new NotificationServiceImpl
    pub fn new(notification_repo: Arc<N>) -> Self {
        Self { notification_repo }
    }
}

#[async_trait]
impl<N> NotificationService for NotificationServiceImpl<N>
where
    N: NotificationRepository + 'static,
{
    async fn list(
        &self,
        user_id: i64,
        unread_only: bool,
        after: Option<i64>,
        limit: i32,
    ) -> Result<Vec<Notification>, NotificationError> {
        self.notification_repo
            .list_by_user(user_id, unread_only, after, limit)
            .await
            .map_err(|e| NotificationError::Internal(e.to_string()))
    }

    async fn unread_count(&self, user_id: i64) -> Result<i64, NotificationError> {
        self.notification_repo
            .unread_count(user_id)
            .await
            .map_err(|e| NotificationError::Internal(e.to_string()))
    }

    async fn mark_read(
        &self,
        user_id: i64,
        notification_id: i64,
    ) -> Result<(), NotificationError> {
        // Ownership check before touching read state
        let notification = self
            .notification_repo
            .find_by_id(notification_id)
            .await
            .map_err(|e| NotificationError::Internal(e.to_string()))?
            .ok_or(NotificationError::NotFound)?;

        if notification.user_id != user_id {
            return Err(NotificationError::NotFound);
        }

        if notification.is_read() {
            return Ok(());
        }

        self.notification_repo
            .mark_read(notification_id)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => NotificationError::NotFound,
                other => NotificationError::Internal(other.to_string()),
            })
    }

    async fn mark_all_read(&self, user_id: i64) -> Result<i64, NotificationError> {
        self.notification_repo
            .mark_all_read(user_id)
            .await
            .map_err(|e| NotificationError::Internal(e.to_string()))
    }
}

