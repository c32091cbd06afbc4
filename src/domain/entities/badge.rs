//! Badge entity and repository trait.
//!
//! Maps to the `badges` table. A badge is awarded once per (user, kind);
//! each kind carries a fixed activity threshold.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Badge kinds matching database VARCHAR values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeKind {
    /// First forum thread
    FirstThread,
    /// 10 forum threads
    ForumRegular,
    /// 25 forum comments
    Commentator,
    /// First completed mentorship
    Mentor,
    /// 5 completed mentorships
    SeasonedMentor,
    /// 3 workplace reviews
    WorkplaceReviewer,
}

impl BadgeKind {
    /// Convert from database string representation.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "first_thread" => Some(Self::FirstThread),
            "forum_regular" => Some(Self::ForumRegular),
            "commentator" => Some(Self::Commentator),
            "mentor" => Some(Self::Mentor),
            "seasoned_mentor" => Some(Self::SeasonedMentor),
            "workplace_reviewer" => Some(Self::WorkplaceReviewer),
            _ => None,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstThread => "first_thread",
            Self::ForumRegular => "forum_regular",
            Self::Commentator => "commentator",
            Self::Mentor => "mentor",
            Self::SeasonedMentor => "seasoned_mentor",
            Self::WorkplaceReviewer => "workplace_reviewer",
        }
    }

    /// Activity count required before the badge is awarded.
    pub fn threshold(&self) -> i64 {
        match self {
            Self::FirstThread => 1,
            Self::ForumRegular => 10,
            Self::Commentator => 25,
            Self::Mentor => 1,
            Self::SeasonedMentor => 5,
            Self::WorkplaceReviewer => 3,
        }
    }

    /// Human-readable description for notifications and profile pages.
    pub fn description(&self) -> &'static str {
        match self {
            Self::FirstThread => "Started a first forum thread",
            Self::ForumRegular => "Started 10 forum threads",
            Self::Commentator => "Wrote 25 forum comments",
            Self::Mentor => "Completed a first mentorship",
            Self::SeasonedMentor => "Completed 5 mentorships",
            Self::WorkplaceReviewer => "Reviewed 3 workplaces",
        }
    }
}

impl std::fmt::Display for BadgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An awarded badge. Unique per (user_id, kind).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Badge {
    pub id: i64,
    pub user_id: i64,
    pub kind: BadgeKind,
    pub awarded_at: DateTime<Utc>,
}

/// Repository trait for badge data access.
#[async_trait]
pub trait BadgeRepository: Send + Sync {
    /// List a user's badges, newest first.
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Badge>, AppError>;

    /// Award a badge. Idempotent via ON CONFLICT DO NOTHING; returns
    /// false when the user already held it.
    async fn award(&self, badge: &Badge) -> Result<bool, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KINDS: [BadgeKind; 6] = [
        BadgeKind::FirstThread,
        BadgeKind::ForumRegular,
        BadgeKind::Commentator,
        BadgeKind::Mentor,
        BadgeKind::SeasonedMentor,
        BadgeKind::WorkplaceReviewer,
    ];

    #[test]
    fn test_kind_roundtrip() {
        for kind in ALL_KINDS {
            assert_eq!(BadgeKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(BadgeKind::from_str("participation_trophy"), None);
    }

    #[test]
    fn test_thresholds_positive() {
        for kind in ALL_KINDS {
            assert!(kind.threshold() >= 1);
        }
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&BadgeKind::SeasonedMentor).unwrap();
        assert_eq!(json, "\"seasoned_mentor\"");
    }
}
