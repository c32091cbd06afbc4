//! Notification Repository Implementation
//!
//! PostgreSQL implementation of the NotificationRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Notification, NotificationKind, NotificationRepository};
use crate::shared::error::AppError;

/// Database row representation matching the notifications table schema.
#[derive(Debug, sqlx::FromRow)]
struct NotificationRow {
    id: i64,
    user_id: i64,
    kind: String,
    body: String,
    resource_id: Option<i64>,
    read_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl NotificationRow {
    fn into_notification(self) -> Option<Notification> {
        Some(Notification {
            id: self.id,
            user_id: self.user_id,
            kind: NotificationKind::from_str(&self.kind)?,
            body: self.body,
            resource_id: self.resource_id,
            read_at: self.read_at,
            created_at: self.created_at,
        })
    }
}

/// PostgreSQL notification repository implementation.
#[derive(Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    /// Create a new PgNotificationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    /// Find a notification by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Notification>, AppError> {
        let row = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT id, user_id, kind, body, resource_id, read_at, created_at
            FROM notifications
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.and_then(|r| r.into_notification()))
    }

    /// List a user's notifications, newest first, with keyset pagination.
    async fn list_by_user(
        &self,
        user_id: i64,
        unread_only: bool,
        after: Option<i64>,
        limit: i32,
    ) -> Result<Vec<Notification>, AppError> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT id, user_id, kind, body, resource_id, read_at, created_at
            FROM notifications
            WHERE user_id = $1
              AND (NOT $2 OR read_at IS NULL)
              AND ($3::BIGINT IS NULL OR id < $3)
            ORDER BY id DESC
            LIMIT $4
            "#,
        )
        .bind(user_id)
        .bind(unread_only)
        .bind(after)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .filter_map(|r| r.into_notification())
            .collect())
    }

    /// Count a user's unread notifications.
    async fn unread_count(&self, user_id: i64) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND read_at IS NULL",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Create a new notification.
    async fn create(&self, notification: &Notification) -> Result<Notification, AppError> {
        let row = sqlx::query_as::<_, NotificationRow>(
            r#"
            INSERT INTO notifications (id, user_id, kind, body, resource_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, kind, body, resource_id, read_at, created_at
            "#,
        )
        .bind(notification.id)
        .bind(notification.user_id)
        .bind(notification.kind.as_str())
        .bind(&notification.body)
        .bind(notification.resource_id)
        .fetch_one(&self.pool)
        .await?;

        row.into_notification()
            .ok_or_else(|| AppError::Internal("Notification row has invalid kind".to_string()))
    }

    /// Mark one notification read.
    async fn mark_read(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE notifications SET read_at = NOW() WHERE id = $1 AND read_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Unread notification with id {} not found",
                id
            )));
        }

        Ok(())
    }

    /// Mark all of a user's notifications read. Returns the number updated.
    async fn mark_all_read(&self, user_id: i64) -> Result<i64, AppError> {
        let result = sqlx::query(
            "UPDATE notifications SET read_at = NOW() WHERE user_id = $1 AND read_at IS NULL",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() as i64)
    }
}

