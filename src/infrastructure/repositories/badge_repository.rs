//! Badge Repository Implementation
//!
//! PostgreSQL implementation of the BadgeRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Badge, BadgeKind, BadgeRepository};
use crate::shared::error::AppError;

/// Database row representation matching the badges table schema.
#[derive(Debug, sqlx::FromRow)]
struct BadgeRow {
    id: i64,
    user_id: i64,
    kind: String,
    awarded_at: DateTime<Utc>,
}

impl BadgeRow {
    /// Rows with unknown kinds are skipped rather than surfaced as errors.
    fn into_badge(self) -> Option<Badge> {
        Some(Badge {
            id: self.id,
            user_id: self.user_id,
            kind: BadgeKind::from_str(&self.kind)?,
            awarded_at: self.awarded_at,
        })
    }
}

/// PostgreSQL badge repository implementation.
#[derive(Clone)]
pub struct PgBadgeRepository {
    pool: PgPool,
}

impl PgBadgeRepository {
    /// Create a new PgBadgeRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BadgeRepository for PgBadgeRepository {
    /// List a user's badges, newest first.
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Badge>, AppError> {
        let rows = sqlx::query_as::<_, BadgeRow>(
            r#"
            SELECT id, user_id, kind, awarded_at
            FROM badges
            WHERE user_id = $1
            ORDER BY id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().filter_map(|r| r.into_badge()).collect())
    }

    /// Award a badge, idempotently.
    async fn award(&self, badge: &Badge) -> Result<bool, AppError> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO badges (id, user_id, kind)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, kind) DO NOTHING
            "#,
        )
        .bind(badge.id)
        .bind(badge.user_id)
        .bind(badge.kind.as_str())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(inserted > 0)
    }
}

