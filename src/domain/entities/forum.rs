//! Forum thread, comment and vote entities.
//!
//! Maps to the `forum_threads`, `forum_comments` and `comment_votes`
//! tables. Votes are upvote-only and unique per (comment, user), enforced
//! by the table's composite primary key.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// A discussion thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForumThread {
    /// Snowflake ID (primary key)
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub body: String,
    /// Denormalized count, maintained alongside comment writes
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A comment within a thread, optionally replying to another comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForumComment {
    pub id: i64,
    pub thread_id: i64,
    pub author_id: i64,
    /// Parent comment for replies; must belong to the same thread
    pub parent_id: Option<i64>,
    pub body: String,
    /// Upvote count, adjusted atomically with vote inserts/deletes
    pub score: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ForumComment {
    /// Whether this comment is a reply to another comment.
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}

/// An upvote on a comment. Primary key (comment_id, user_id).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentVote {
    pub comment_id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Repository trait for forum thread data access.
#[async_trait]
pub trait ForumThreadRepository: Send + Sync {
    /// Find a thread by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<ForumThread>, AppError>;

    /// List threads with keyset pagination (descending ID order).
    async fn list(&self, after: Option<i64>, limit: i32) -> Result<Vec<ForumThread>, AppError>;

    /// Create a new thread.
    async fn create(&self, thread: &ForumThread) -> Result<ForumThread, AppError>;

    /// Delete a thread (cascades to comments and votes).
    async fn delete(&self, id: i64) -> Result<(), AppError>;

    /// Count threads authored by a user (badge thresholds).
    async fn count_by_author(&self, author_id: i64) -> Result<i64, AppError>;
}

/// Repository trait for forum comment and vote data access.
#[async_trait]
pub trait ForumCommentRepository: Send + Sync {
    /// Find a comment by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<ForumComment>, AppError>;

    /// List a thread's comments, oldest first, with keyset pagination.
    async fn list_by_thread(
        &self,
        thread_id: i64,
        after: Option<i64>,
        limit: i32,
    ) -> Result<Vec<ForumComment>, AppError>;

    /// Create a comment and bump the thread's comment counter.
    async fn create(&self, comment: &ForumComment) -> Result<ForumComment, AppError>;

    /// Delete a comment and decrement the thread's comment counter.
    async fn delete(&self, id: i64) -> Result<(), AppError>;

    /// Count comments authored by a user (badge thresholds).
    async fn count_by_author(&self, author_id: i64) -> Result<i64, AppError>;

    /// Record an upvote and bump the comment score.
    ///
    /// Returns false when the (comment, user) vote already exists.
    async fn add_vote(&self, comment_id: i64, user_id: i64) -> Result<bool, AppError>;

    /// Remove an upvote and drop the comment score.
    ///
    /// Returns false when no such vote existed.
    async fn remove_vote(&self, comment_id: i64, user_id: i64) -> Result<bool, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_is_reply() {
        let mut comment = ForumComment {
            id: 2,
            thread_id: 1,
            author_id: 7,
            parent_id: None,
            body: "First!".into(),
            score: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(!comment.is_reply());

        comment.parent_id = Some(1);
        assert!(comment.is_reply());
    }
}
