//! Forum Service
//!
//! Threads, comments and upvotes, plus the forum-driven badge awards and
//! reply notifications.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{
    Badge, BadgeKind, BadgeRepository, ForumComment, ForumCommentRepository, ForumThread,
    ForumThreadRepository, Notification, NotificationKind, NotificationRepository, UserRepository,
};
use crate::shared::error::AppError;
use crate::shared::snowflake::SnowflakeGenerator;

/// Forum service errors
#[derive(Debug, thiserror::Error)]
pub enum ForumError {
    #[error("Thread not found")]
    ThreadNotFound,

    #[error("Comment not found")]
    CommentNotFound,

    #[error("Parent comment belongs to a different thread")]
    ParentMismatch,

    #[error("Not allowed to delete this content")]
    NotAllowed,

    #[error("Cannot vote on your own comment")]
    SelfVote,

    #[error("Already voted on this comment")]
    AlreadyVoted,

    #[error("No vote to remove")]
    NoVote,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ForumError> for AppError {
    fn from(e: ForumError) -> Self {
        match e {
            ForumError::ThreadNotFound => AppError::NotFound("Thread not found".into()),
            ForumError::CommentNotFound => AppError::NotFound("Comment not found".into()),
            ForumError::ParentMismatch => {
                AppError::BadRequest("Parent comment belongs to a different thread".into())
            }
            ForumError::NotAllowed => {
                AppError::Forbidden("Not allowed to delete this content".into())
            }
            ForumError::SelfVote => {
                AppError::BadRequest("Cannot vote on your own comment".into())
            }
            ForumError::AlreadyVoted => AppError::Conflict("Already voted on this comment".into()),
            ForumError::NoVote => AppError::Conflict("No vote to remove".into()),
            ForumError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Forum service trait for dependency injection
#[async_trait]
pub trait ForumService: Send + Sync {
    /// Create a thread.
    async fn create_thread(
        &self,
        author_id: i64,
        title: String,
        body: String,
    ) -> Result<ForumThread, ForumError>;

    /// Fetch a thread.
    async fn get_thread(&self, id: i64) -> Result<ForumThread, ForumError>;

    /// List threads, newest first.
    async fn list_threads(
        &self,
        after: Option<i64>,
        limit: i32,
    ) -> Result<Vec<ForumThread>, ForumError>;

    /// Delete a thread (author or moderator only).
    async fn delete_thread(&self, caller_id: i64, thread_id: i64) -> Result<(), ForumError>;

    /// Create a comment, optionally replying to another comment.
    async fn create_comment(
        &self,
        author_id: i64,
        thread_id: i64,
        parent_id: Option<i64>,
        body: String,
    ) -> Result<ForumComment, ForumError>;

    /// List a thread's comments, oldest first.
    async fn list_comments(
        &self,
        thread_id: i64,
        after: Option<i64>,
        limit: i32,
    ) -> Result<Vec<ForumComment>, ForumError>;

    /// Delete a comment (author or moderator only).
    async fn delete_comment(&self, caller_id: i64, comment_id: i64) -> Result<(), ForumError>;

    /// Upvote a comment.
    async fn upvote_comment(&self, user_id: i64, comment_id: i64) -> Result<(), ForumError>;

    /// Remove the caller's upvote.
    async fn remove_vote(&self, user_id: i64, comment_id: i64) -> Result<(), ForumError>;
}

/// ForumService implementation
pub struct ForumServiceImpl<T, C, U, B, N>
where
    T: ForumThreadRepository,
    C: ForumCommentRepository,
    U: UserRepository,
    B: BadgeRepository,
    N: NotificationRepository,
{
    thread_repo: Arc<T>,
    comment_repo: Arc<C>,
    user_repo: Arc<U>,
    badge_repo: Arc<B>,
    notification_repo: Arc<N>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<T, C, U, B, N> ForumServiceImpl<T, C, U, B, N>
where
    T: ForumThreadRepository,
    C: ForumCommentRepository,
    U: UserRepository,
    B: BadgeRepository,
    N: NotificationRepository,
{
    /// Create a new ForumServiceImpl
    pub fn new(
        thread_repo: Arc<T>,
        comment_repo: Arc<C>,
        user_repo: Arc<U>,
        badge_repo: Arc<B>,
        notification_repo: Arc<N>,
        id_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            thread_repo,
            comment_repo,
            user_repo,
            badge_repo,
            notification_repo,
            id_generator,
        }
    }

    async fn is_moderator(&self, user_id: i64) -> Result<bool, ForumError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(|e| ForumError::Internal(e.to_string()))?;
        Ok(user.map(|u| u.is_moderator()).unwrap_or(false))
    }

    /// Notification writes are best effort.
    async fn notify(&self, user_id: i64, kind: NotificationKind, body: String, resource_id: i64) {
        let notification = Notification {
            id: self.id_generator.generate(),
            user_id,
            kind,
            body,
            resource_id: Some(resource_id),
            read_at: None,
            created_at: Utc::now(),
        };
        if let Err(e) = self.notification_repo.create(&notification).await {
            tracing::warn!(user_id, %kind, "Failed to write notification: {}", e);
        }
    }

    /// Award a badge when the activity count reaches its threshold.
    /// The award is idempotent and failures never surface to the caller.
    async fn maybe_award(&self, user_id: i64, kind: BadgeKind, count: i64) {
        if count < kind.threshold() {
            return;
        }

        let badge = Badge {
            id: self.id_generator.generate(),
            user_id,
            kind,
            awarded_at: Utc::now(),
        };
        match self.badge_repo.award(&badge).await {
            Ok(true) => {
                self.notify(
                    user_id,
                    NotificationKind::BadgeAwarded,
                    format!("Badge earned: {}", kind.description()),
                    badge.id,
                )
                .await;
            }
            Ok(false) => {}
            Err(e) => tracing::warn!(user_id, %kind, "Failed to award badge: {}", e),
        }
    }
}

#[async_trait]
impl<T, C, U, B, N> ForumService for ForumServiceImpl<T, C, U, B, N>
where
    T: ForumThreadRepository + 'static,
    C: ForumCommentRepository + 'static,
    U: UserRepository + 'static,
    B: BadgeRepository + 'static,
    N: NotificationRepository + 'static,
{
    async fn create_thread(
        &self,
        author_id: i64,
        title: String,
        body: String,
    ) -> Result<ForumThread, ForumError> {
        let now = Utc::now();
        let thread = ForumThread {
            id: self.id_generator.generate(),
            author_id,
            title,
            body,
            comment_count: 0,
            created_at: now,
            updated_at: now,
        };

        let created = self
            .thread_repo
            .create(&thread)
            .await
            .map_err(|e| ForumError::Internal(e.to_string()))?;

        let thread_count = self
            .thread_repo
            .count_by_author(author_id)
            .await
            .map_err(|e| ForumError::Internal(e.to_string()))?;
        self.maybe_award(author_id, BadgeKind::FirstThread, thread_count)
            .await;
        self.maybe_award(author_id, BadgeKind::ForumRegular, thread_count)
            .await;

        Ok(created)
    }

    async fn get_thread(&self, id: i64) -> Result<ForumThread, ForumError> {
        self.thread_repo
            .find_by_id(id)
            .await
            .map_err(|e| ForumError::Internal(e.to_string()))?
            .ok_or(ForumError::ThreadNotFound)
    }

    async fn list_threads(
        &self,
        after: Option<i64>,
        limit: i32,
    ) -> Result<Vec<ForumThread>, ForumError> {
        self.thread_repo
            .list(after, limit)
            .await
            .map_err(|e| ForumError::Internal(e.to_string()))
    }

    async fn delete_thread(&self, caller_id: i64, thread_id: i64) -> Result<(), ForumError> {
        let thread = self.get_thread(thread_id).await?;

        if thread.author_id != caller_id && !self.is_moderator(caller_id).await? {
            return Err(ForumError::NotAllowed);
        }

        self.thread_repo
            .delete(thread_id)
            .await
            .map_err(|e| ForumError::Internal(e.to_string()))
    }

    async fn create_comment(
        &self,
        author_id: i64,
        thread_id: i64,
        parent_id: Option<i64>,
        body: String,
    ) -> Result<ForumComment, ForumError> {
        self.get_thread(thread_id).await?;

        // Replies must target a comment in the same thread
        let parent = match parent_id {
            Some(pid) => {
                let parent = self
                    .comment_repo
                    .find_by_id(pid)
                    .await
                    .map_err(|e| ForumError::Internal(e.to_string()))?
                    .ok_or(ForumError::CommentNotFound)?;
                if parent.thread_id != thread_id {
                    return Err(ForumError::ParentMismatch);
                }
                Some(parent)
            }
            None => None,
        };

        let now = Utc::now();
        let comment = ForumComment {
            id: self.id_generator.generate(),
            thread_id,
            author_id,
            parent_id,
            body,
            score: 0,
            created_at: now,
            updated_at: now,
        };

        let created = self
            .comment_repo
            .create(&comment)
            .await
            .map_err(|e| ForumError::Internal(e.to_string()))?;

        // No self-notification on replies to one's own comment
        if let Some(parent) = parent {
            if parent.author_id != author_id {
                self.notify(
                    parent.author_id,
                    NotificationKind::CommentReply,
                    "Someone replied to your comment".to_string(),
                    created.id,
                )
                .await;
            }
        }

        let comment_count = self
            .comment_repo
            .count_by_author(author_id)
            .await
            .map_err(|e| ForumError::Internal(e.to_string()))?;
        self.maybe_award(author_id, BadgeKind::Commentator, comment_count)
            .await;

        Ok(created)
    }

    async fn list_comments(
        &self,
        thread_id: i64,
        after: Option<i64>,
        limit: i32,
    ) -> Result<Vec<ForumComment>, ForumError> {
        self.get_thread(thread_id).await?;

        self.comment_repo
            .list_by_thread(thread_id, after, limit)
            .await
            .map_err(|e| ForumError::Internal(e.to_string()))
    }

    async fn delete_comment(&self, caller_id: i64, comment_id: i64) -> Result<(), ForumError> {
        let comment = self
            .comment_repo
            .find_by_id(comment_id)
            .await
            .map_err(|e| ForumError::Internal(e.to_string()))?
            .ok_or(ForumError::CommentNotFound)?;

        if comment.author_id != caller_id && !self.is_moderator(caller_id).await? {
            return Err(ForumError::NotAllowed);
        }

        self.comment_repo
            .delete(comment_id)
            .await
            .map_err(|e| ForumError::Internal(e.to_string()))
    }

    async fn upvote_comment(&self, user_id: i64, comment_id: i64) -> Result<(), ForumError> {
        let comment = self
            .comment_repo
            .find_by_id(comment_id)
            .await
            .map_err(|e| ForumError::Internal(e.to_string()))?
            .ok_or(ForumError::CommentNotFound)?;

        if comment.author_id == user_id {
            return Err(ForumError::SelfVote);
        }

        let added = self
            .comment_repo
            .add_vote(comment_id, user_id)
            .await
            .map_err(|e| ForumError::Internal(e.to_string()))?;

        if !added {
            return Err(ForumError::AlreadyVoted);
        }
        Ok(())
    }

    async fn remove_vote(&self, user_id: i64, comment_id: i64) -> Result<(), ForumError> {
        let removed = self
            .comment_repo
            .remove_vote(comment_id, user_id)
            .await
            .map_err(|e| ForumError::Internal(e.to_string()))?;

        if !removed {
            return Err(ForumError::NoVote);
        }
        Ok(())
    }
}

