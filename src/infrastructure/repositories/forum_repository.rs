//! Forum Repository Implementations
//!
//! PostgreSQL implementations of the ForumThreadRepository and
//! ForumCommentRepository traits. Comment writes and vote changes run in
//! transactions so the denormalized counters stay consistent.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{ForumComment, ForumCommentRepository, ForumThread, ForumThreadRepository};
use crate::shared::error::AppError;

/// Database row representation matching the forum_threads table schema.
#[derive(Debug, sqlx::FromRow)]
struct ForumThreadRow {
    id: i64,
    author_id: i64,
    title: String,
    body: String,
    comment_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ForumThreadRow {
    fn into_thread(self) -> ForumThread {
        ForumThread {
            id: self.id,
            author_id: self.author_id,
            title: self.title,
            body: self.body,
            comment_count: self.comment_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Database row representation matching the forum_comments table schema.
#[derive(Debug, sqlx::FromRow)]
struct ForumCommentRow {
    id: i64,
    thread_id: i64,
    author_id: i64,
    parent_id: Option<i64>,
    body: String,
    score: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ForumCommentRow {
    fn into_comment(self) -> ForumComment {
        ForumComment {
            id: self.id,
            thread_id: self.thread_id,
            author_id: self.author_id,
            parent_id: self.parent_id,
            body: self.body,
            score: self.score,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// PostgreSQL forum thread repository implementation.
#[derive(Clone)]
pub struct PgForumThreadRepository {
    pool: PgPool,
}

impl PgForumThreadRepository {
    /// Create a new PgForumThreadRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ForumThreadRepository for PgForumThreadRepository {
    /// Find a thread by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<ForumThread>, AppError> {
        let row = sqlx::query_as::<_, ForumThreadRow>(
            r#"
            SELECT id, author_id, title, body, comment_count, created_at, updated_at
            FROM forum_threads
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_thread()))
    }

    /// List threads with keyset pagination, newest first.
    async fn list(&self, after: Option<i64>, limit: i32) -> Result<Vec<ForumThread>, AppError> {
        let rows = sqlx::query_as::<_, ForumThreadRow>(
            r#"
            SELECT id, author_id, title, body, comment_count, created_at, updated_at
            FROM forum_threads
            WHERE $1::BIGINT IS NULL OR id < $1
            ORDER BY id DESC
            LIMIT $2
            "#,
        )
        .bind(after)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_thread()).collect())
    }

    /// Create a new thread.
    async fn create(&self, thread: &ForumThread) -> Result<ForumThread, AppError> {
        let row = sqlx::query_as::<_, ForumThreadRow>(
            r#"
            INSERT INTO forum_threads (id, author_id, title, body)
            VALUES ($1, $2, $3, $4)
            RETURNING id, author_id, title, body, comment_count, created_at, updated_at
            "#,
        )
        .bind(thread.id)
        .bind(thread.author_id)
        .bind(&thread.title)
        .bind(&thread.body)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_thread())
    }

    /// Delete a thread (cascades to comments and votes).
    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM forum_threads WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Thread with id {} not found",
                id
            )));
        }

        Ok(())
    }

    /// Count threads authored by a user.
    async fn count_by_author(&self, author_id: i64) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM forum_threads WHERE author_id = $1",
        )
        .bind(author_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}

/// PostgreSQL forum comment repository implementation.
#[derive(Clone)]
pub struct PgForumCommentRepository {
    pool: PgPool,
}

impl PgForumCommentRepository {
    /// Create a new PgForumCommentRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ForumCommentRepository for PgForumCommentRepository {
    /// Find a comment by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<ForumComment>, AppError> {
        let row = sqlx::query_as::<_, ForumCommentRow>(
            r#"
            SELECT id, thread_id, author_id, parent_id, body, score, created_at, updated_at
            FROM forum_comments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_comment()))
    }

    /// List a thread's comments, oldest first, with keyset pagination.
    async fn list_by_thread(
        &self,
        thread_id: i64,
        after: Option<i64>,
        limit: i32,
    ) -> Result<Vec<ForumComment>, AppError> {
        let rows = sqlx::query_as::<_, ForumCommentRow>(
            r#"
            SELECT id, thread_id, author_id, parent_id, body, score, created_at, updated_at
            FROM forum_comments
            WHERE thread_id = $1 AND ($2::BIGINT IS NULL OR id > $2)
            ORDER BY id ASC
            LIMIT $3
            "#,
        )
        .bind(thread_id)
        .bind(after)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_comment()).collect())
    }

    /// Create a comment and bump the thread's comment counter atomically.
    async fn create(&self, comment: &ForumComment) -> Result<ForumComment, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ForumCommentRow>(
            r#"
            INSERT INTO forum_comments (id, thread_id, author_id, parent_id, body)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, thread_id, author_id, parent_id, body, score, created_at, updated_at
            "#,
        )
        .bind(comment.id)
        .bind(comment.thread_id)
        .bind(comment.author_id)
        .bind(comment.parent_id)
        .bind(&comment.body)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE forum_threads
            SET comment_count = comment_count + 1, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(comment.thread_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into_comment())
    }

    /// Delete a comment and decrement the thread's comment counter.
    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let thread_id = sqlx::query_scalar::<_, i64>(
            "DELETE FROM forum_comments WHERE id = $1 RETURNING thread_id",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Comment with id {} not found", id)))?;

        sqlx::query(
            r#"
            UPDATE forum_threads
            SET comment_count = GREATEST(comment_count - 1, 0)
            WHERE id = $1
            "#,
        )
        .bind(thread_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Count comments authored by a user.
    async fn count_by_author(&self, author_id: i64) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM forum_comments WHERE author_id = $1",
        )
        .bind(author_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Record an upvote and bump the comment score.
    ///
    /// ON CONFLICT DO NOTHING makes repeat votes a no-op; the score is only
    /// touched when a row was actually inserted.
    async fn add_vote(&self, comment_id: i64, user_id: i64) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO comment_votes (comment_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (comment_id, user_id) DO NOTHING
            "#,
        )
        .bind(comment_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if inserted == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("UPDATE forum_comments SET score = score + 1 WHERE id = $1")
            .bind(comment_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(true)
    }

    /// Remove an upvote and drop the comment score.
    async fn remove_vote(&self, comment_id: i64, user_id: i64) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query(
            "DELETE FROM comment_votes WHERE comment_id = $1 AND user_id = $2",
        )
        .bind(comment_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if removed == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("UPDATE forum_comments SET score = GREATEST(score - 1, 0) WHERE id = $1")
            .bind(comment_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(true)
    }
}

