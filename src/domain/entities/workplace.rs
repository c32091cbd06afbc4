//! Workplace and workplace review entities.
//!
//! Maps to the `workplaces` and `workplace_reviews` tables. A workplace's
//! rating aggregate is maintained incrementally as reviews are created and
//! deleted.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// An employer record reviewable by the community.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workplace {
    /// Snowflake ID (primary key)
    pub id: i64,
    /// Company name (unique, case-insensitive)
    pub name: String,
    pub website: Option<String>,
    pub industry: Option<String>,
    /// Incrementally maintained mean of review ratings
    pub average_rating: f64,
    /// Number of reviews behind `average_rating`
    pub review_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Workplace policy tags matching database VARCHAR values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyTag {
    RemoteFriendly,
    ParentalLeave,
    FlexibleHours,
    FourDayWeek,
    VisaSponsorship,
}

impl PolicyTag {
    /// Convert from database string representation.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "remote_friendly" => Some(Self::RemoteFriendly),
            "parental_leave" => Some(Self::ParentalLeave),
            "flexible_hours" => Some(Self::FlexibleHours),
            "four_day_week" => Some(Self::FourDayWeek),
            "visa_sponsorship" => Some(Self::VisaSponsorship),
            _ => None,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RemoteFriendly => "remote_friendly",
            Self::ParentalLeave => "parental_leave",
            Self::FlexibleHours => "flexible_hours",
            Self::FourDayWeek => "four_day_week",
            Self::VisaSponsorship => "visa_sponsorship",
        }
    }
}

impl std::fmt::Display for PolicyTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A rated, policy-tagged review of a workplace.
///
/// At most one review exists per (workplace, author) pair. An employer
/// representative may attach a single reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkplaceReview {
    pub id: i64,
    pub workplace_id: i64,
    pub author_id: i64,
    /// 1-5
    pub rating: i16,
    pub title: Option<String>,
    pub body: String,
    pub policy_tags: Vec<PolicyTag>,
    /// Employer representative's reply text
    pub employer_reply: Option<String>,
    /// User who wrote the reply
    pub replied_by: Option<i64>,
    pub replied_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkplaceReview {
    /// Whether an employer reply is already attached.
    pub fn has_reply(&self) -> bool {
        self.employer_reply.is_some()
    }
}

/// Repository trait for workplace data access.
#[async_trait]
pub trait WorkplaceRepository: Send + Sync {
    /// Find a workplace by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Workplace>, AppError>;

    /// Find a workplace by (case-insensitive) name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Workplace>, AppError>;

    /// List workplaces with keyset pagination (descending ID order).
    async fn list(&self, after: Option<i64>, limit: i32) -> Result<Vec<Workplace>, AppError>;

    /// Create a new workplace.
    async fn create(&self, workplace: &Workplace) -> Result<Workplace, AppError>;

    /// Fold one new review rating into the aggregate. The arithmetic runs
    /// in the database so concurrent reviews cannot lose each other's
    /// contribution.
    async fn apply_review_rating(&self, id: i64, rating: i16) -> Result<(), AppError>;

    /// Remove one review rating from the aggregate, the inverse of
    /// [`apply_review_rating`](Self::apply_review_rating).
    async fn retract_review_rating(&self, id: i64, rating: i16) -> Result<(), AppError>;
}

/// Repository trait for workplace review data access.
#[async_trait]
pub trait WorkplaceReviewRepository: Send + Sync {
    /// Find a review by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<WorkplaceReview>, AppError>;

    /// Find the unique review for a (workplace, author) pair.
    async fn find_by_workplace_and_author(
        &self,
        workplace_id: i64,
        author_id: i64,
    ) -> Result<Option<WorkplaceReview>, AppError>;

    /// List a workplace's reviews, newest first, with keyset pagination.
    async fn list_by_workplace(
        &self,
        workplace_id: i64,
        after: Option<i64>,
        limit: i32,
    ) -> Result<Vec<WorkplaceReview>, AppError>;

    /// Create a new review.
    async fn create(&self, review: &WorkplaceReview) -> Result<WorkplaceReview, AppError>;

    /// Attach the employer reply.
    async fn set_reply(
        &self,
        id: i64,
        replied_by: i64,
        reply: &str,
    ) -> Result<(), AppError>;

    /// Delete a review.
    async fn delete(&self, id: i64) -> Result<(), AppError>;

    /// Count reviews written by a user (badge thresholds).
    async fn count_by_author(&self, author_id: i64) -> Result<i64, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_tag_roundtrip() {
        for tag in [
            PolicyTag::RemoteFriendly,
            PolicyTag::ParentalLeave,
            PolicyTag::FlexibleHours,
            PolicyTag::FourDayWeek,
            PolicyTag::VisaSponsorship,
        ] {
            assert_eq!(PolicyTag::from_str(tag.as_str()), Some(tag));
        }
        assert_eq!(PolicyTag::from_str("free_snacks"), None);
    }
}
