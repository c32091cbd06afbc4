//! Mentorship entities: mentor profiles, requests, messages and reviews.
//!
//! Maps to the `mentor_profiles`, `mentorship_requests`,
//! `mentorship_messages` and `mentor_reviews` tables.
//!
//! The request status machine:
//!
//! ```text
//! PENDING -> ACCEPTED | REJECTED | CANCELLED
//! ACCEPTED -> COMPLETED | CANCELLED
//! ```
//!
//! Accepting a request increments the mentor's `mentee_count`;
//! completing or cancelling an accepted request decrements it. Both
//! adjustments are guarded in SQL so the count stays within
//! `0..=capacity`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// A user's mentor listing. At most one per user (UNIQUE on user_id).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentorProfile {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// Owning user (unique)
    pub user_id: i64,

    /// Short pitch shown in the mentor directory
    pub headline: String,

    /// Expertise tags, e.g. ["rust", "distributed-systems"]
    pub expertise: Vec<String>,

    /// Maximum concurrent mentees
    pub capacity: i32,

    /// Current accepted mentees (capacity bookkeeping)
    pub mentee_count: i32,

    /// Whether new requests are currently welcome
    pub accepting: bool,

    /// Incrementally maintained mean of review ratings
    pub average_rating: f64,

    /// Number of reviews behind `average_rating`
    pub review_count: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MentorProfile {
    /// Whether the mentor can take on another mentee.
    pub fn has_capacity(&self) -> bool {
        self.mentee_count < self.capacity
    }

    /// Whether a new request could currently be accepted.
    pub fn can_accept_request(&self) -> bool {
        self.accepting && self.has_capacity()
    }
}

/// Mentorship request status matching database VARCHAR constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MentorshipStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
    Cancelled,
    Completed,
}

impl MentorshipStatus {
    /// Convert from database string representation.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "accepted" => Self::Accepted,
            "rejected" => Self::Rejected,
            "cancelled" => Self::Cancelled,
            "completed" => Self::Completed,
            _ => Self::Pending,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// Whether the status machine allows moving to `next`.
    pub fn can_transition_to(&self, next: MentorshipStatus) -> bool {
        use MentorshipStatus::*;
        matches!(
            (self, next),
            (Pending, Accepted)
                | (Pending, Rejected)
                | (Pending, Cancelled)
                | (Accepted, Completed)
                | (Accepted, Cancelled)
        )
    }

    /// Statuses still occupying (or about to occupy) mentor attention.
    /// A pair with an active request cannot open another one.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Accepted)
    }

    /// Terminal statuses never change again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Cancelled | Self::Completed)
    }
}

impl std::fmt::Display for MentorshipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A mentee's request to be mentored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentorshipRequest {
    pub id: i64,
    /// Mentor profile being asked
    pub mentor_id: i64,
    /// Requesting user
    pub mentee_id: i64,
    /// Optional introduction from the mentee
    pub message: Option<String>,
    #[serde(default)]
    pub status: MentorshipStatus,
    /// Set when the mentor accepts or rejects
    pub responded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A message inside an accepted mentorship.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentorshipMessage {
    pub id: i64,
    pub request_id: i64,
    pub sender_id: i64,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// A mentee's review of a mentor. At most one per (mentor, mentee) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentorReview {
    pub id: i64,
    pub mentor_id: i64,
    pub mentee_id: i64,
    /// 1-5
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Repository trait for mentor profile data access.
#[async_trait]
pub trait MentorProfileRepository: Send + Sync {
    /// Find a mentor profile by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<MentorProfile>, AppError>;

    /// Find the mentor profile owned by a user.
    async fn find_by_user_id(&self, user_id: i64) -> Result<Option<MentorProfile>, AppError>;

    /// Check whether a user already lists as a mentor.
    async fn exists_for_user(&self, user_id: i64) -> Result<bool, AppError>;

    /// List mentor profiles with keyset pagination (descending ID order).
    async fn list(&self, after: Option<i64>, limit: i32) -> Result<Vec<MentorProfile>, AppError>;

    /// Create a new mentor profile.
    async fn create(&self, profile: &MentorProfile) -> Result<MentorProfile, AppError>;

    /// Update headline/expertise/capacity/accepting.
    async fn update(&self, profile: &MentorProfile) -> Result<MentorProfile, AppError>;

    /// Fold one new review rating into the aggregate. The arithmetic runs
    /// in the database so concurrent reviews cannot lose each other's
    /// contribution.
    async fn apply_review_rating(&self, id: i64, rating: i16) -> Result<(), AppError>;
}

/// Repository trait for mentorship request data access.
#[async_trait]
pub trait MentorshipRequestRepository: Send + Sync {
    /// Find a request by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<MentorshipRequest>, AppError>;

    /// Find the active (pending or accepted) request for a pair, if any.
    async fn find_active_by_pair(
        &self,
        mentor_id: i64,
        mentee_id: i64,
    ) -> Result<Option<MentorshipRequest>, AppError>;

    /// Check whether a pair has a completed mentorship (review eligibility).
    async fn completed_exists(&self, mentor_id: i64, mentee_id: i64) -> Result<bool, AppError>;

    /// List requests addressed to a mentor, newest first.
    async fn list_by_mentor(&self, mentor_id: i64) -> Result<Vec<MentorshipRequest>, AppError>;

    /// List requests made by a mentee, newest first.
    async fn list_by_mentee(&self, mentee_id: i64) -> Result<Vec<MentorshipRequest>, AppError>;

    /// Create a new request.
    async fn create(&self, request: &MentorshipRequest) -> Result<MentorshipRequest, AppError>;

    /// Set a request's status (no capacity side effects).
    async fn update_status(&self, id: i64, status: MentorshipStatus) -> Result<(), AppError>;

    /// Atomically accept: flips PENDING -> ACCEPTED and increments the
    /// mentor's mentee_count, guarded by `mentee_count < capacity`.
    /// Returns false when the capacity guard fails.
    async fn accept(&self, id: i64, mentor_id: i64) -> Result<bool, AppError>;

    /// Atomically close an accepted request (COMPLETED or CANCELLED) and
    /// decrement the mentor's mentee_count.
    async fn close_accepted(
        &self,
        id: i64,
        mentor_id: i64,
        status: MentorshipStatus,
    ) -> Result<(), AppError>;

    /// Count completed mentorships run by a mentor (badge thresholds).
    async fn count_completed_by_mentor(&self, mentor_id: i64) -> Result<i64, AppError>;
}

/// Repository trait for mentorship message data access.
#[async_trait]
pub trait MentorshipMessageRepository: Send + Sync {
    /// List a request's messages, oldest first, with keyset pagination.
    async fn list_by_request(
        &self,
        request_id: i64,
        after: Option<i64>,
        limit: i32,
    ) -> Result<Vec<MentorshipMessage>, AppError>;

    /// Create a new message.
    async fn create(&self, message: &MentorshipMessage) -> Result<MentorshipMessage, AppError>;
}

/// Repository trait for mentor review data access.
#[async_trait]
pub trait MentorReviewRepository: Send + Sync {
    /// Find the unique review for a (mentor, mentee) pair.
    async fn find_by_pair(
        &self,
        mentor_id: i64,
        mentee_id: i64,
    ) -> Result<Option<MentorReview>, AppError>;

    /// List a mentor's reviews, newest first.
    async fn list_by_mentor(&self, mentor_id: i64) -> Result<Vec<MentorReview>, AppError>;

    /// Create a new review.
    async fn create(&self, review: &MentorReview) -> Result<MentorReview, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn mentor(capacity: i32, mentee_count: i32) -> MentorProfile {
        MentorProfile {
            id: 1,
            user_id: 10,
            headline: "Systems mentor".into(),
            expertise: vec!["rust".into()],
            capacity,
            mentee_count,
            accepting: true,
            average_rating: 0.0,
            review_count: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            MentorshipStatus::Pending,
            MentorshipStatus::Accepted,
            MentorshipStatus::Rejected,
            MentorshipStatus::Cancelled,
            MentorshipStatus::Completed,
        ] {
            assert_eq!(MentorshipStatus::from_str(status.as_str()), status);
        }
    }

    #[test_case(MentorshipStatus::Pending, MentorshipStatus::Accepted => true)]
    #[test_case(MentorshipStatus::Pending, MentorshipStatus::Rejected => true)]
    #[test_case(MentorshipStatus::Pending, MentorshipStatus::Cancelled => true)]
    #[test_case(MentorshipStatus::Pending, MentorshipStatus::Completed => false)]
    #[test_case(MentorshipStatus::Accepted, MentorshipStatus::Completed => true)]
    #[test_case(MentorshipStatus::Accepted, MentorshipStatus::Cancelled => true)]
    #[test_case(MentorshipStatus::Accepted, MentorshipStatus::Rejected => false)]
    #[test_case(MentorshipStatus::Completed, MentorshipStatus::Cancelled => false)]
    #[test_case(MentorshipStatus::Rejected, MentorshipStatus::Accepted => false)]
    #[test_case(MentorshipStatus::Cancelled, MentorshipStatus::Pending => false)]
    fn test_status_transitions(from: MentorshipStatus, to: MentorshipStatus) -> bool {
        from.can_transition_to(to)
    }

    #[test]
    fn test_active_and_terminal_partition() {
        use MentorshipStatus::*;
        for status in [Pending, Accepted, Rejected, Cancelled, Completed] {
            assert_ne!(status.is_active(), status.is_terminal());
        }
    }

    #[test]
    fn test_capacity_check() {
        assert!(mentor(3, 2).has_capacity());
        assert!(!mentor(3, 3).has_capacity());

        let mut full = mentor(3, 3);
        full.accepting = true;
        assert!(!full.can_accept_request());

        let mut closed = mentor(3, 0);
        closed.accepting = false;
        assert!(!closed.can_accept_request());
    }
}
