//! Workplace Service
//!
//! Workplace records and their reviews, with the incrementally maintained
//! rating aggregate and the single employer reply per review.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{
    Badge, BadgeKind, BadgeRepository, Notification, NotificationKind, NotificationRepository,
    PolicyTag, UserRepository, Workplace, WorkplaceRepository, WorkplaceReview,
    WorkplaceReviewRepository,
};
use crate::shared::error::AppError;
use crate::shared::snowflake::SnowflakeGenerator;

/// Workplace service errors
#[derive(Debug, thiserror::Error)]
pub enum WorkplaceError {
    #[error("Workplace not found")]
    WorkplaceNotFound,

    #[error("Review not found")]
    ReviewNotFound,

    #[error("A workplace with this name already exists")]
    NameTaken,

    #[error("You have already reviewed this workplace")]
    AlreadyReviewed,

    #[error("Not allowed to delete this review")]
    NotAllowed,

    #[error("Only employer accounts may reply to reviews")]
    NotEmployer,

    #[error("Review already has an employer reply")]
    AlreadyReplied,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<WorkplaceError> for AppError {
    fn from(e: WorkplaceError) -> Self {
        match e {
            WorkplaceError::WorkplaceNotFound => AppError::NotFound("Workplace not found".into()),
            WorkplaceError::ReviewNotFound => AppError::NotFound("Review not found".into()),
            WorkplaceError::NameTaken => {
                AppError::Conflict("A workplace with this name already exists".into())
            }
            WorkplaceError::AlreadyReviewed => {
                AppError::Conflict("You have already reviewed this workplace".into())
            }
            WorkplaceError::NotAllowed => {
                AppError::Forbidden("Not allowed to delete this review".into())
            }
            WorkplaceError::NotEmployer => {
                AppError::Forbidden("Only employer accounts may reply to reviews".into())
            }
            WorkplaceError::AlreadyReplied => {
                AppError::Conflict("Review already has an employer reply".into())
            }
            WorkplaceError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Workplace service trait for dependency injection
#[async_trait]
pub trait WorkplaceService: Send + Sync {
    /// Register a workplace.
    async fn create_workplace(
        &self,
        name: String,
        website: Option<String>,
        industry: Option<String>,
    ) -> Result<Workplace, WorkplaceError>;

    /// Fetch a workplace.
    async fn get_workplace(&self, id: i64) -> Result<Workplace, WorkplaceError>;

    /// Browse workplaces, newest first.
    async fn list_workplaces(
        &self,
        after: Option<i64>,
        limit: i32,
    ) -> Result<Vec<Workplace>, WorkplaceError>;

    /// Review a workplace.
    #[allow(clippy::too_many_arguments)]
    async fn create_review(
        &self,
        author_id: i64,
        workplace_id: i64,
        rating: i16,
        title: Option<String>,
        body: String,
        policy_tags: Vec<PolicyTag>,
    ) -> Result<WorkplaceReview, WorkplaceError>;

    /// List a workplace's reviews, newest first.
    async fn list_reviews(
        &self,
        workplace_id: i64,
        after: Option<i64>,
        limit: i32,
    ) -> Result<Vec<WorkplaceReview>, WorkplaceError>;

    /// Delete a review (author or moderator only).
    async fn delete_review(&self, caller_id: i64, review_id: i64) -> Result<(), WorkplaceError>;

    /// Attach the single employer reply to a review.
    async fn reply_to_review(
        &self,
        caller_id: i64,
        review_id: i64,
        reply: String,
    ) -> Result<WorkplaceReview, WorkplaceError>;
}

/// WorkplaceService implementation
pub struct WorkplaceServiceImpl<W, R, U, B, N>
where
    W: WorkplaceRepository,
    R: WorkplaceReviewRepository,
    U: UserRepository,
    B: BadgeRepository,
    N: NotificationRepository,
{
    workplace_repo: Arc<W>,
    review_repo: Arc<R>,
    user_repo: Arc<U>,
    badge_repo: Arc<B>,
    notification_repo: Arc<N>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<W, R, U, B, N> WorkplaceServiceImpl<W, R, U, B, N>
where
    W: WorkplaceRepository,
    R: WorkplaceReviewRepository,
    U: UserRepository,
    B: BadgeRepository,
    N: NotificationRepository,
{
    /// Create a new WorkplaceServiceImpl
    pub fn new(
        workplace_repo: Arc<W>,
        review_repo: Arc<R>,
        user_repo: Arc<U>,
        badge_repo: Arc<B>,
        notification_repo: Arc<N>,
        id_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            workplace_repo,
            review_repo,
            user_repo,
            badge_repo,
            notification_repo,
            id_generator,
        }
    }

    async fn require_workplace(&self, id: i64) -> Result<Workplace, WorkplaceError> {
        self.workplace_repo
            .find_by_id(id)
            .await
            .map_err(|e| WorkplaceError::Internal(e.to_string()))?
            .ok_or(WorkplaceError::WorkplaceNotFound)
    }

    async fn require_review(&self, id: i64) -> Result<WorkplaceReview, WorkplaceError> {
        self.review_repo
            .find_by_id(id)
            .await
            .map_err(|e| WorkplaceError::Internal(e.to_string()))?
            .ok_or(WorkplaceError::ReviewNotFound)
    }

    async fn is_moderator(&self, user_id: i64) -> Result<bool, WorkplaceError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(|e| WorkplaceError::Internal(e.to_string()))?;
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
impl<W, R, U, B, N> WorkplaceService for WorkplaceServiceImpl<W, R, U, B, N>
where
    W: WorkplaceRepository + 'static,
    R: WorkplaceReviewRepository + 'static,
    U: UserRepository + 'static,
    B: BadgeRepository + 'static,
    N: NotificationRepository + 'static,
{
    async fn create_workplace(
        &self,
        name: String,
        website: Option<String>,
        industry: Option<String>,
    ) -> Result<Workplace, WorkplaceError> {
        if self
            .workplace_repo
            .find_by_name(&name)
            .await
            .map_err(|e| WorkplaceError::Internal(e.to_string()))?
            .is_some()
        {
            return Err(WorkplaceError::NameTaken);
        }

        let now = Utc::now();
        let workplace = Workplace {
            id: self.id_generator.generate(),
            name,
            website,
            industry,
            average_rating: 0.0,
            review_count: 0,
            created_at: now,
            updated_at: now,
        };

        self.workplace_repo
            .create(&workplace)
            .await
            .map_err(|e| match e {
                AppError::Conflict(_) => WorkplaceError::NameTaken,
                other => WorkplaceError::Internal(other.to_string()),
            })
    }

    async fn get_workplace(&self, id: i64) -> Result<Workplace, WorkplaceError> {
        self.require_workplace(id).await
    }

    async fn list_workplaces(
        &self,
        after: Option<i64>,
        limit: i32,
    ) -> Result<Vec<Workplace>, WorkplaceError> {
        self.workplace_repo
            .list(after, limit)
            .await
            .map_err(|e| WorkplaceError::Internal(e.to_string()))
    }

    async fn create_review(
        &self,
        author_id: i64,
        workplace_id: i64,
        rating: i16,
        title: Option<String>,
        body: String,
        policy_tags: Vec<PolicyTag>,
    ) -> Result<WorkplaceReview, WorkplaceError> {
        self.require_workplace(workplace_id).await?;

        if self
            .review_repo
            .find_by_workplace_and_author(workplace_id, author_id)
            .await
            .map_err(|e| WorkplaceError::Internal(e.to_string()))?
            .is_some()
        {
            return Err(WorkplaceError::AlreadyReviewed);
        }

        let now = Utc::now();
        let review = WorkplaceReview {
            id: self.id_generator.generate(),
            workplace_id,
            author_id,
            rating,
            title,
            body,
            policy_tags,
            employer_reply: None,
            replied_by: None,
            replied_at: None,
            created_at: now,
            updated_at: now,
        };

        let created = self.review_repo.create(&review).await.map_err(|e| match e {
            AppError::Conflict(_) => WorkplaceError::AlreadyReviewed,
            other => WorkplaceError::Internal(other.to_string()),
        })?;

        self.workplace_repo
            .apply_review_rating(workplace_id, rating)
            .await
            .map_err(|e| WorkplaceError::Internal(e.to_string()))?;

        let review_count = self
            .review_repo
            .count_by_author(author_id)
            .await
            .map_err(|e| WorkplaceError::Internal(e.to_string()))?;
        self.maybe_award(author_id, BadgeKind::WorkplaceReviewer, review_count)
            .await;

        Ok(created)
    }

    async fn list_reviews(
        &self,
        workplace_id: i64,
        after: Option<i64>,
        limit: i32,
    ) -> Result<Vec<WorkplaceReview>, WorkplaceError> {
        self.require_workplace(workplace_id).await?;

        self.review_repo
            .list_by_workplace(workplace_id, after, limit)
            .await
            .map_err(|e| WorkplaceError::Internal(e.to_string()))
    }

    async fn delete_review(&self, caller_id: i64, review_id: i64) -> Result<(), WorkplaceError> {
        let review = self.require_review(review_id).await?;

        if review.author_id != caller_id && !self.is_moderator(caller_id).await? {
            return Err(WorkplaceError::NotAllowed);
        }

        self.review_repo
            .delete(review_id)
            .await
            .map_err(|e| WorkplaceError::Internal(e.to_string()))?;

        // Inverse of the aggregate update applied on create
        self.workplace_repo
            .retract_review_rating(review.workplace_id, review.rating)
            .await
            .map_err(|e| WorkplaceError::Internal(e.to_string()))?;

        Ok(())
    }

    async fn reply_to_review(
        &self,
        caller_id: i64,
        review_id: i64,
        reply: String,
    ) -> Result<WorkplaceReview, WorkplaceError> {
        let caller = self
            .user_repo
            .find_by_id(caller_id)
            .await
            .map_err(|e| WorkplaceError::Internal(e.to_string()))?
            .ok_or(WorkplaceError::NotEmployer)?;
        if !caller.is_employer() {
            return Err(WorkplaceError::NotEmployer);
        }

        let review = self.require_review(review_id).await?;
        if review.has_reply() {
            return Err(WorkplaceError::AlreadyReplied);
        }

        self.review_repo
            .set_reply(review_id, caller_id, &reply)
            .await
            .map_err(|e| match e {
                AppError::Conflict(_) => WorkplaceError::AlreadyReplied,
                other => WorkplaceError::Internal(other.to_string()),
            })?;

        self.notify(
            review.author_id,
            NotificationKind::ReviewReply,
            "An employer replied to your workplace review".to_string(),
            review.id,
        )
        .await;

        self.require_review(review_id).await
    }
}

