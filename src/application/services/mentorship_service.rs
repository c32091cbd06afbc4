//! Mentorship Service
//!
//! Mentor profiles, the request lifecycle with capacity bookkeeping,
//! messaging inside accepted mentorships, and mentor reviews.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{
    Badge, BadgeKind, BadgeRepository, MentorProfile, MentorProfileRepository, MentorReview,
    MentorReviewRepository, MentorshipMessage, MentorshipMessageRepository, MentorshipRequest,
    MentorshipRequestRepository, MentorshipStatus, Notification, NotificationKind,
    NotificationRepository,
};
use crate::shared::error::AppError;
use crate::shared::snowflake::SnowflakeGenerator;

/// Fields for creating a mentor profile
#[derive(Debug)]
pub struct MentorProfileFields {
    pub headline: String,
    pub expertise: Vec<String>,
    pub capacity: i32,
    pub accepting: bool,
}

/// Fields for updating a mentor profile (all optional)
#[derive(Debug, Default)]
pub struct UpdateMentorProfileFields {
    pub headline: Option<String>,
    pub expertise: Option<Vec<String>>,
    pub capacity: Option<i32>,
    pub accepting: Option<bool>,
}

/// Mentorship service errors
#[derive(Debug, thiserror::Error)]
pub enum MentorshipError {
    #[error("Mentor not found")]
    MentorNotFound,

    #[error("Request not found")]
    RequestNotFound,

    #[error("Already listed as a mentor")]
    AlreadyMentor,

    #[error("Cannot request mentorship from yourself")]
    SelfMentorship,

    #[error("Mentor is not accepting requests")]
    NotAccepting,

    #[error("Mentor is at capacity")]
    AtCapacity,

    #[error("An active request with this mentor already exists")]
    DuplicateRequest,

    #[error("Capacity cannot drop below the current mentee count")]
    CapacityBelowMentees,

    #[error("Not a participant of this mentorship")]
    NotParticipant,

    #[error("Only the mentor may do this")]
    NotMentor,

    #[error("Only the mentee may do this")]
    NotMentee,

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: MentorshipStatus,
        to: MentorshipStatus,
    },

    #[error("Messaging requires an accepted mentorship")]
    NotAccepted,

    #[error("Reviews require a completed mentorship")]
    NotCompleted,

    #[error("You have already reviewed this mentor")]
    AlreadyReviewed,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<MentorshipError> for AppError {
    fn from(e: MentorshipError) -> Self {
        match e {
            MentorshipError::MentorNotFound => AppError::NotFound("Mentor not found".into()),
            MentorshipError::RequestNotFound => AppError::NotFound("Request not found".into()),
            MentorshipError::AlreadyMentor => {
                AppError::Conflict("Already listed as a mentor".into())
            }
            MentorshipError::SelfMentorship => {
                AppError::BadRequest("Cannot request mentorship from yourself".into())
            }
            MentorshipError::NotAccepting => {
                AppError::Conflict("Mentor is not accepting requests".into())
            }
            MentorshipError::AtCapacity => AppError::Conflict("Mentor is at capacity".into()),
            MentorshipError::DuplicateRequest => {
                AppError::Conflict("An active request with this mentor already exists".into())
            }
            MentorshipError::CapacityBelowMentees => {
                AppError::BadRequest("Capacity cannot drop below the current mentee count".into())
            }
            MentorshipError::NotParticipant => {
                AppError::Forbidden("Not a participant of this mentorship".into())
            }
            MentorshipError::NotMentor => AppError::Forbidden("Only the mentor may do this".into()),
            MentorshipError::NotMentee => AppError::Forbidden("Only the mentee may do this".into()),
            MentorshipError::InvalidTransition { from, to } => AppError::Conflict(format!(
                "Invalid status transition from {} to {}",
                from, to
            )),
            MentorshipError::NotAccepted => {
                AppError::Conflict("Messaging requires an accepted mentorship".into())
            }
            MentorshipError::NotCompleted => {
                AppError::Conflict("Reviews require a completed mentorship".into())
            }
            MentorshipError::AlreadyReviewed => {
                AppError::Conflict("You have already reviewed this mentor".into())
            }
            MentorshipError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Mentorship service trait for dependency injection
#[async_trait]
pub trait MentorshipService: Send + Sync {
    /// List as a mentor.
    async fn create_mentor_profile(
        &self,
        user_id: i64,
        fields: MentorProfileFields,
    ) -> Result<MentorProfile, MentorshipError>;

    /// Update the caller's mentor profile.
    async fn update_mentor_profile(
        &self,
        user_id: i64,
        fields: UpdateMentorProfileFields,
    ) -> Result<MentorProfile, MentorshipError>;

    /// Fetch a mentor profile.
    async fn get_mentor(&self, id: i64) -> Result<MentorProfile, MentorshipError>;

    /// Browse the mentor directory, newest first.
    async fn list_mentors(
        &self,
        after: Option<i64>,
        limit: i32,
    ) -> Result<Vec<MentorProfile>, MentorshipError>;

    /// Ask a mentor for mentorship.
    async fn create_request(
        &self,
        mentee_id: i64,
        mentor_id: i64,
        message: Option<String>,
    ) -> Result<MentorshipRequest, MentorshipError>;

    /// Mentor accepts or rejects a pending request.
    async fn respond_to_request(
        &self,
        caller_id: i64,
        request_id: i64,
        accept: bool,
    ) -> Result<MentorshipRequest, MentorshipError>;

    /// Mentee cancels a pending or accepted request.
    async fn cancel_request(
        &self,
        caller_id: i64,
        request_id: i64,
    ) -> Result<MentorshipRequest, MentorshipError>;

    /// Mentor marks an accepted mentorship as completed.
    async fn complete_request(
        &self,
        caller_id: i64,
        request_id: i64,
    ) -> Result<MentorshipRequest, MentorshipError>;

    /// Requests addressed to the caller's mentor profile.
    async fn list_incoming_requests(
        &self,
        user_id: i64,
    ) -> Result<Vec<MentorshipRequest>, MentorshipError>;

    /// Requests the caller has made as a mentee.
    async fn list_outgoing_requests(
        &self,
        user_id: i64,
    ) -> Result<Vec<MentorshipRequest>, MentorshipError>;

    /// Send a message inside an accepted mentorship.
    async fn send_message(
        &self,
        sender_id: i64,
        request_id: i64,
        body: String,
    ) -> Result<MentorshipMessage, MentorshipError>;

    /// Read a mentorship's messages, oldest first.
    async fn list_messages(
        &self,
        caller_id: i64,
        request_id: i64,
        after: Option<i64>,
        limit: i32,
    ) -> Result<Vec<MentorshipMessage>, MentorshipError>;

    /// Review a mentor after a completed mentorship.
    async fn create_review(
        &self,
        mentee_id: i64,
        mentor_id: i64,
        rating: i16,
        comment: Option<String>,
    ) -> Result<MentorReview, MentorshipError>;

    /// List a mentor's reviews, newest first.
    async fn list_reviews(&self, mentor_id: i64) -> Result<Vec<MentorReview>, MentorshipError>;
}

/// MentorshipService implementation
pub struct MentorshipServiceImpl<MP, MR, MM, RV, B, N>
where
    MP: MentorProfileRepository,
    MR: MentorshipRequestRepository,
    MM: MentorshipMessageRepository,
    RV: MentorReviewRepository,
    B: BadgeRepository,
    N: NotificationRepository,
{
    profile_repo: Arc<MP>,
    request_repo: Arc<MR>,
    message_repo: Arc<MM>,
    review_repo: Arc<RV>,
    badge_repo: Arc<B>,
    notification_repo: Arc<N>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<MP, MR, MM, RV, B, N> MentorshipServiceImpl<MP, MR, MM, RV, B, N>
where
    MP: MentorProfileRepository,
    MR: MentorshipRequestRepository,
    MM: MentorshipMessageRepository,
    RV: MentorReviewRepository,
    B: BadgeRepository,
    N: NotificationRepository,
{
    /// Create a new MentorshipServiceImpl
    pub fn new(
        profile_repo: Arc<MP>,
        request_repo: Arc<MR>,
        message_repo: Arc<MM>,
        review_repo: Arc<RV>,
        badge_repo: Arc<B>,
        notification_repo: Arc<N>,
        id_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            profile_repo,
            request_repo,
            message_repo,
            review_repo,
            badge_repo,
            notification_repo,
            id_generator,
        }
    }

    async fn require_mentor(&self, id: i64) -> Result<MentorProfile, MentorshipError> {
        self.profile_repo
            .find_by_id(id)
            .await
            .map_err(|e| MentorshipError::Internal(e.to_string()))?
            .ok_or(MentorshipError::MentorNotFound)
    }

    async fn require_request(&self, id: i64) -> Result<MentorshipRequest, MentorshipError> {
        self.request_repo
            .find_by_id(id)
            .await
            .map_err(|e| MentorshipError::Internal(e.to_string()))?
            .ok_or(MentorshipError::RequestNotFound)
    }

    /// Resolve a request to (request, mentor profile) and verify the caller
    /// is a participant. Returns whether the caller is the mentor.
    async fn require_participant(
        &self,
        caller_id: i64,
        request_id: i64,
    ) -> Result<(MentorshipRequest, MentorProfile, bool), MentorshipError> {
        let request = self.require_request(request_id).await?;
        let mentor = self.require_mentor(request.mentor_id).await?;

        if caller_id == mentor.user_id {
            Ok((request, mentor, true))
        } else if caller_id == request.mentee_id {
            Ok((request, mentor, false))
        } else {
            Err(MentorshipError::NotParticipant)
        }
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
impl<MP, MR, MM, RV, B, N> MentorshipService for MentorshipServiceImpl<MP, MR, MM, RV, B, N>
where
    MP: MentorProfileRepository + 'static,
    MR: MentorshipRequestRepository + 'static,
    MM: MentorshipMessageRepository + 'static,
    RV: MentorReviewRepository + 'static,
    B: BadgeRepository + 'static,
    N: NotificationRepository + 'static,
{
    async fn create_mentor_profile(
        &self,
        user_id: i64,
        fields: MentorProfileFields,
    ) -> Result<MentorProfile, MentorshipError> {
        if self
            .profile_repo
            .exists_for_user(user_id)
            .await
            .map_err(|e| MentorshipError::Internal(e.to_string()))?
        {
            return Err(MentorshipError::AlreadyMentor);
        }

        let now = Utc::now();
        let profile = MentorProfile {
            id: self.id_generator.generate(),
            user_id,
            headline: fields.headline,
            expertise: fields.expertise,
            capacity: fields.capacity,
            mentee_count: 0,
            accepting: fields.accepting,
            average_rating: 0.0,
            review_count: 0,
            created_at: now,
            updated_at: now,
        };

        self.profile_repo.create(&profile).await.map_err(|e| match e {
            AppError::Conflict(_) => MentorshipError::AlreadyMentor,
            other => MentorshipError::Internal(other.to_string()),
        })
    }

    async fn update_mentor_profile(
        &self,
        user_id: i64,
        fields: UpdateMentorProfileFields,
    ) -> Result<MentorProfile, MentorshipError> {
        let mut profile = self
            .profile_repo
            .find_by_user_id(user_id)
            .await
            .map_err(|e| MentorshipError::Internal(e.to_string()))?
            .ok_or(MentorshipError::MentorNotFound)?;

        if let Some(headline) = fields.headline {
            profile.headline = headline;
        }
        if let Some(expertise) = fields.expertise {
            profile.expertise = expertise;
        }
        if let Some(capacity) = fields.capacity {
            // Capacity can never undercut already-accepted mentees
            if capacity < profile.mentee_count {
                return Err(MentorshipError::CapacityBelowMentees);
            }
            profile.capacity = capacity;
        }
        if let Some(accepting) = fields.accepting {
            profile.accepting = accepting;
        }

        self.profile_repo
            .update(&profile)
            .await
            .map_err(|e| MentorshipError::Internal(e.to_string()))
    }

    async fn get_mentor(&self, id: i64) -> Result<MentorProfile, MentorshipError> {
        self.require_mentor(id).await
    }

    async fn list_mentors(
        &self,
        after: Option<i64>,
        limit: i32,
    ) -> Result<Vec<MentorProfile>, MentorshipError> {
        self.profile_repo
            .list(after, limit)
            .await
            .map_err(|e| MentorshipError::Internal(e.to_string()))
    }

    async fn create_request(
        &self,
        mentee_id: i64,
        mentor_id: i64,
        message: Option<String>,
    ) -> Result<MentorshipRequest, MentorshipError> {
        let mentor = self.require_mentor(mentor_id).await?;

        if mentor.user_id == mentee_id {
            return Err(MentorshipError::SelfMentorship);
        }
        if !mentor.accepting {
            return Err(MentorshipError::NotAccepting);
        }
        if !mentor.has_capacity() {
            return Err(MentorshipError::AtCapacity);
        }

        if self
            .request_repo
            .find_active_by_pair(mentor_id, mentee_id)
            .await
            .map_err(|e| MentorshipError::Internal(e.to_string()))?
            .is_some()
        {
            return Err(MentorshipError::DuplicateRequest);
        }

        let now = Utc::now();
        let request = MentorshipRequest {
            id: self.id_generator.generate(),
            mentor_id,
            mentee_id,
            message,
            status: MentorshipStatus::Pending,
            responded_at: None,
            created_at: now,
            updated_at: now,
        };

        let created = self
            .request_repo
            .create(&request)
            .await
            .map_err(|e| MentorshipError::Internal(e.to_string()))?;

        self.notify(
            mentor.user_id,
            NotificationKind::MentorshipRequested,
            "You have a new mentorship request".to_string(),
            created.id,
        )
        .await;

        Ok(created)
    }

    async fn respond_to_request(
        &self,
        caller_id: i64,
        request_id: i64,
        accept: bool,
    ) -> Result<MentorshipRequest, MentorshipError> {
        let (request, mentor, is_mentor) = self.require_participant(caller_id, request_id).await?;
        if !is_mentor {
            return Err(MentorshipError::NotMentor);
        }

        let target = if accept {
            MentorshipStatus::Accepted
        } else {
            MentorshipStatus::Rejected
        };
        if !request.status.can_transition_to(target) {
            return Err(MentorshipError::InvalidTransition {
                from: request.status,
                to: target,
            });
        }

        // A mentor who has closed their door since the request arrived
        // cannot take on the mentee
        if accept && !mentor.accepting {
            return Err(MentorshipError::NotAccepting);
        }

        if accept {
            let accepted = self
                .request_repo
                .accept(request.id, mentor.id)
                .await
                .map_err(|e| match e {
                    AppError::Conflict(_) => MentorshipError::InvalidTransition {
                        from: request.status,
                        to: target,
                    },
                    other => MentorshipError::Internal(other.to_string()),
                })?;
            if !accepted {
                return Err(MentorshipError::AtCapacity);
            }
        } else {
            self.request_repo
                .update_status(request.id, MentorshipStatus::Rejected)
                .await
                .map_err(|e| MentorshipError::Internal(e.to_string()))?;
        }

        let body = if accept {
            "Your mentorship request was accepted"
        } else {
            "Your mentorship request was declined"
        };
        self.notify(
            request.mentee_id,
            NotificationKind::MentorshipUpdate,
            body.to_string(),
            request.id,
        )
        .await;

        self.require_request(request_id).await
    }

    async fn cancel_request(
        &self,
        caller_id: i64,
        request_id: i64,
    ) -> Result<MentorshipRequest, MentorshipError> {
        let (request, mentor, is_mentor) = self.require_participant(caller_id, request_id).await?;
        if is_mentor {
            return Err(MentorshipError::NotMentee);
        }

        match request.status {
            MentorshipStatus::Pending => {
                self.request_repo
                    .update_status(request.id, MentorshipStatus::Cancelled)
                    .await
                    .map_err(|e| MentorshipError::Internal(e.to_string()))?;
            }
            MentorshipStatus::Accepted => {
                self.request_repo
                    .close_accepted(request.id, mentor.id, MentorshipStatus::Cancelled)
                    .await
                    .map_err(|e| match e {
                        AppError::Conflict(_) => MentorshipError::InvalidTransition {
                            from: request.status,
                            to: MentorshipStatus::Cancelled,
                        },
                        other => MentorshipError::Internal(other.to_string()),
                    })?;
            }
            other => {
                return Err(MentorshipError::InvalidTransition {
                    from: other,
                    to: MentorshipStatus::Cancelled,
                });
            }
        }

        self.notify(
            mentor.user_id,
            NotificationKind::MentorshipUpdate,
            "A mentorship request was cancelled".to_string(),
            request.id,
        )
        .await;

        self.require_request(request_id).await
    }

    async fn complete_request(
        &self,
        caller_id: i64,
        request_id: i64,
    ) -> Result<MentorshipRequest, MentorshipError> {
        let (request, mentor, is_mentor) = self.require_participant(caller_id, request_id).await?;
        if !is_mentor {
            return Err(MentorshipError::NotMentor);
        }

        if !request
            .status
            .can_transition_to(MentorshipStatus::Completed)
        {
            return Err(MentorshipError::InvalidTransition {
                from: request.status,
                to: MentorshipStatus::Completed,
            });
        }

        self.request_repo
            .close_accepted(request.id, mentor.id, MentorshipStatus::Completed)
            .await
            .map_err(|e| match e {
                AppError::Conflict(_) => MentorshipError::InvalidTransition {
                    from: request.status,
                    to: MentorshipStatus::Completed,
                },
                other => MentorshipError::Internal(other.to_string()),
            })?;

        self.notify(
            request.mentee_id,
            NotificationKind::MentorshipUpdate,
            "Your mentorship was marked as completed".to_string(),
            request.id,
        )
        .await;

        let completed = self
            .request_repo
            .count_completed_by_mentor(mentor.id)
            .await
            .map_err(|e| MentorshipError::Internal(e.to_string()))?;
        self.maybe_award(mentor.user_id, BadgeKind::Mentor, completed)
            .await;
        self.maybe_award(mentor.user_id, BadgeKind::SeasonedMentor, completed)
            .await;

        self.require_request(request_id).await
    }

    async fn list_incoming_requests(
        &self,
        user_id: i64,
    ) -> Result<Vec<MentorshipRequest>, MentorshipError> {
        let mentor = self
            .profile_repo
            .find_by_user_id(user_id)
            .await
            .map_err(|e| MentorshipError::Internal(e.to_string()))?
            .ok_or(MentorshipError::MentorNotFound)?;

        self.request_repo
            .list_by_mentor(mentor.id)
            .await
            .map_err(|e| MentorshipError::Internal(e.to_string()))
    }

    async fn list_outgoing_requests(
        &self,
        user_id: i64,
    ) -> Result<Vec<MentorshipRequest>, MentorshipError> {
        self.request_repo
            .list_by_mentee(user_id)
            .await
            .map_err(|e| MentorshipError::Internal(e.to_string()))
    }

    async fn send_message(
        &self,
        sender_id: i64,
        request_id: i64,
        body: String,
    ) -> Result<MentorshipMessage, MentorshipError> {
        let (request, _, _) = self.require_participant(sender_id, request_id).await?;

        if request.status != MentorshipStatus::Accepted {
            return Err(MentorshipError::NotAccepted);
        }

        let message = MentorshipMessage {
            id: self.id_generator.generate(),
            request_id,
            sender_id,
            body,
            created_at: Utc::now(),
        };

        self.message_repo
            .create(&message)
            .await
            .map_err(|e| MentorshipError::Internal(e.to_string()))
    }

    async fn list_messages(
        &self,
        caller_id: i64,
        request_id: i64,
        after: Option<i64>,
        limit: i32,
    ) -> Result<Vec<MentorshipMessage>, MentorshipError> {
        self.require_participant(caller_id, request_id).await?;

        self.message_repo
            .list_by_request(request_id, after, limit)
            .await
            .map_err(|e| MentorshipError::Internal(e.to_string()))
    }

    async fn create_review(
        &self,
        mentee_id: i64,
        mentor_id: i64,
        rating: i16,
        comment: Option<String>,
    ) -> Result<MentorReview, MentorshipError> {
        let mentor = self.require_mentor(mentor_id).await?;

        if !self
            .request_repo
            .completed_exists(mentor_id, mentee_id)
            .await
            .map_err(|e| MentorshipError::Internal(e.to_string()))?
        {
            return Err(MentorshipError::NotCompleted);
        }

        if self
            .review_repo
            .find_by_pair(mentor_id, mentee_id)
            .await
            .map_err(|e| MentorshipError::Internal(e.to_string()))?
            .is_some()
        {
            return Err(MentorshipError::AlreadyReviewed);
        }

        let review = MentorReview {
            id: self.id_generator.generate(),
            mentor_id,
            mentee_id,
            rating,
            comment,
            created_at: Utc::now(),
        };

        let created = self.review_repo.create(&review).await.map_err(|e| match e {
            AppError::Conflict(_) => MentorshipError::AlreadyReviewed,
            other => MentorshipError::Internal(other.to_string()),
        })?;

        self.profile_repo
            .apply_review_rating(mentor.id, rating)
            .await
            .map_err(|e| MentorshipError::Internal(e.to_string()))?;

        Ok(created)
    }

    async fn list_reviews(&self, mentor_id: i64) -> Result<Vec<MentorReview>, MentorshipError> {
        self.require_mentor(mentor_id).await?;

        self.review_repo
            .list_by_mentor(mentor_id)
            .await
            .map_err(|e| MentorshipError::Internal(e.to_string()))
    }
}

