//! Job post and job application entities.
//!
//! Maps to the `job_posts` and `job_applications` tables.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Employment type enum matching database VARCHAR constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    #[default]
    FullTime,
    PartTime,
    Contract,
    Internship,
}

impl EmploymentType {
    /// Convert from database string representation.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "part_time" => Self::PartTime,
            "contract" => Self::Contract,
            "internship" => Self::Internship,
            _ => Self::FullTime,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullTime => "full_time",
            Self::PartTime => "part_time",
            Self::Contract => "contract",
            Self::Internship => "internship",
        }
    }
}

impl std::fmt::Display for EmploymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A job listing created by an employer account.
///
/// Maps to the `job_posts` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - employer_id: BIGINT NOT NULL REFERENCES users(id)
/// - title: VARCHAR(120) NOT NULL
/// - description: TEXT NOT NULL
/// - company: VARCHAR(100) NOT NULL
/// - location: VARCHAR(100) NULL
/// - employment_type: VARCHAR(20) NOT NULL
/// - salary_min / salary_max: INTEGER NULL
/// - remote: BOOLEAN NOT NULL DEFAULT FALSE
/// - open: BOOLEAN NOT NULL DEFAULT TRUE
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPost {
    pub id: i64,
    pub employer_id: i64,
    pub title: String,
    pub description: String,
    pub company: String,
    pub location: Option<String>,
    pub employment_type: EmploymentType,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub remote: bool,
    /// Closed posts no longer accept applications and drop out of listings
    pub open: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobPost {
    /// Whether the post currently accepts applications.
    pub fn accepts_applications(&self) -> bool {
        self.open
    }
}

/// Application status enum matching database VARCHAR constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Submitted,
    InReview,
    Accepted,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    /// Convert from database string representation.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "in_review" => Self::InReview,
            "accepted" => Self::Accepted,
            "rejected" => Self::Rejected,
            "withdrawn" => Self::Withdrawn,
            _ => Self::Submitted,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::InReview => "in_review",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Withdrawn => "withdrawn",
        }
    }

    /// Terminal statuses cannot change again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected | Self::Withdrawn)
    }

    /// Whether the employer may move an application to `next`.
    pub fn employer_can_move_to(&self, next: ApplicationStatus) -> bool {
        match (self, next) {
            (Self::Submitted, Self::InReview) => true,
            (Self::Submitted | Self::InReview, Self::Accepted | Self::Rejected) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A candidate's application to a job post.
///
/// At most one application exists per (job, applicant) pair, enforced by a
/// UNIQUE constraint and a pre-save existence check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobApplication {
    pub id: i64,
    pub job_id: i64,
    pub applicant_id: i64,
    pub cover_letter: Option<String>,
    pub resume_url: Option<String>,
    #[serde(default)]
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Repository trait for job post data access.
#[async_trait]
pub trait JobPostRepository: Send + Sync {
    /// Find a job post by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<JobPost>, AppError>;

    /// List open posts with keyset pagination (descending ID order).
    async fn list_open(&self, after: Option<i64>, limit: i32) -> Result<Vec<JobPost>, AppError>;

    /// List all posts belonging to an employer.
    async fn list_by_employer(&self, employer_id: i64) -> Result<Vec<JobPost>, AppError>;

    /// Create a new job post.
    async fn create(&self, post: &JobPost) -> Result<JobPost, AppError>;

    /// Update an existing job post.
    async fn update(&self, post: &JobPost) -> Result<JobPost, AppError>;

    /// Delete a job post.
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}

/// Repository trait for job application data access.
#[async_trait]
pub trait JobApplicationRepository: Send + Sync {
    /// Find an application by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<JobApplication>, AppError>;

    /// Find the unique application for a (job, applicant) pair.
    async fn find_by_job_and_applicant(
        &self,
        job_id: i64,
        applicant_id: i64,
    ) -> Result<Option<JobApplication>, AppError>;

    /// List applications for a job post, oldest first.
    async fn list_by_job(&self, job_id: i64) -> Result<Vec<JobApplication>, AppError>;

    /// List a user's applications, newest first.
    async fn list_by_applicant(&self, applicant_id: i64) -> Result<Vec<JobApplication>, AppError>;

    /// Create a new application.
    async fn create(&self, application: &JobApplication) -> Result<JobApplication, AppError>;

    /// Update an application's status.
    async fn update_status(&self, id: i64, status: ApplicationStatus) -> Result<(), AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_employment_type_roundtrip() {
        for ty in [
            EmploymentType::FullTime,
            EmploymentType::PartTime,
            EmploymentType::Contract,
            EmploymentType::Internship,
        ] {
            assert_eq!(EmploymentType::from_str(ty.as_str()), ty);
        }
    }

    #[test]
    fn test_application_status_roundtrip() {
        for status in [
            ApplicationStatus::Submitted,
            ApplicationStatus::InReview,
            ApplicationStatus::Accepted,
            ApplicationStatus::Rejected,
            ApplicationStatus::Withdrawn,
        ] {
            assert_eq!(ApplicationStatus::from_str(status.as_str()), status);
        }
    }

    #[test_case(ApplicationStatus::Submitted => false)]
    #[test_case(ApplicationStatus::InReview => false)]
    #[test_case(ApplicationStatus::Accepted => true)]
    #[test_case(ApplicationStatus::Rejected => true)]
    #[test_case(ApplicationStatus::Withdrawn => true)]
    fn test_terminal_statuses(status: ApplicationStatus) -> bool {
        status.is_terminal()
    }

    #[test]
    fn test_employer_transitions() {
        use ApplicationStatus::*;

        assert!(Submitted.employer_can_move_to(InReview));
        assert!(Submitted.employer_can_move_to(Accepted));
        assert!(InReview.employer_can_move_to(Rejected));

        // No moves out of terminal states
        assert!(!Accepted.employer_can_move_to(Rejected));
        assert!(!Withdrawn.employer_can_move_to(InReview));
        // No backwards move
        assert!(!InReview.employer_can_move_to(Submitted));
        // Withdrawal is an applicant action, not an employer one
        assert!(!Submitted.employer_can_move_to(Withdrawn));
    }

    #[test]
    fn test_closed_post_rejects_applications() {
        let mut post = JobPost {
            id: 1,
            employer_id: 2,
            title: "Engineer".into(),
            description: "Build things".into(),
            company: "Acme".into(),
            location: None,
            employment_type: EmploymentType::FullTime,
            salary_min: None,
            salary_max: None,
            remote: true,
            open: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(post.accepts_applications());

        post.open = false;
        assert!(!post.accepts_applications());
    }
}
