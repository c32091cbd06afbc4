//! Report entity and repository trait.
//!
//! Maps to the `reports` table. Reports point at other records via a
//! (target_type, target_id) pair and are worked by moderators.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// What kind of record a report points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportTargetType {
    JobPost,
    ForumThread,
    ForumComment,
    WorkplaceReview,
    User,
}

impl ReportTargetType {
    /// Convert from database string representation.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "job_post" => Some(Self::JobPost),
            "forum_thread" => Some(Self::ForumThread),
            "forum_comment" => Some(Self::ForumComment),
            "workplace_review" => Some(Self::WorkplaceReview),
            "user" => Some(Self::User),
            _ => None,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::JobPost => "job_post",
            Self::ForumThread => "forum_thread",
            Self::ForumComment => "forum_comment",
            Self::WorkplaceReview => "workplace_review",
            Self::User => "user",
        }
    }
}

impl std::fmt::Display for ReportTargetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Report status matching database VARCHAR constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    #[default]
    Open,
    Resolved,
    Dismissed,
}

impl ReportStatus {
    /// Convert from database string representation.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "resolved" => Self::Resolved,
            "dismissed" => Self::Dismissed,
            _ => Self::Open,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Resolved => "resolved",
            Self::Dismissed => "dismissed",
        }
    }

    /// Only open reports can be resolved or dismissed.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user-filed moderation report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: i64,
    pub reporter_id: i64,
    pub target_type: ReportTargetType,
    pub target_id: i64,
    pub reason: String,
    #[serde(default)]
    pub status: ReportStatus,
    /// Moderator who closed the report
    pub resolved_by: Option<i64>,
    pub resolution_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Repository trait for report data access.
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Find a report by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Report>, AppError>;

    /// List reports, optionally filtered by status, newest first, with
    /// keyset pagination.
    async fn list(
        &self,
        status: Option<ReportStatus>,
        after: Option<i64>,
        limit: i32,
    ) -> Result<Vec<Report>, AppError>;

    /// Create a new report.
    async fn create(&self, report: &Report) -> Result<Report, AppError>;

    /// Close a report as resolved or dismissed.
    async fn resolve(
        &self,
        id: i64,
        status: ReportStatus,
        resolved_by: i64,
        note: Option<&str>,
    ) -> Result<(), AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_type_roundtrip() {
        for ty in [
            ReportTargetType::JobPost,
            ReportTargetType::ForumThread,
            ReportTargetType::ForumComment,
            ReportTargetType::WorkplaceReview,
            ReportTargetType::User,
        ] {
            assert_eq!(ReportTargetType::from_str(ty.as_str()), Some(ty));
        }
        assert_eq!(ReportTargetType::from_str("meme"), None);
    }

    #[test]
    fn test_status_default_and_openness() {
        assert_eq!(ReportStatus::default(), ReportStatus::Open);
        assert!(ReportStatus::Open.is_open());
        assert!(!ReportStatus::Resolved.is_open());
        assert!(!ReportStatus::Dismissed.is_open());
    }
}
