//! Request DTOs
//!
//! Data structures for API request bodies and query parameters.

use serde::Deserialize;
use validator::Validate;

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 32, message = "Username must be 2-32 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(length(max = 100, message = "Full name must be at most 100 characters"))]
    pub full_name: Option<String>,

    /// "member" (default) or "employer"; moderators are promoted out of band
    pub role: Option<String>,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Update user request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(max = 100, message = "Full name must be at most 100 characters"))]
    pub full_name: Option<String>,

    #[validate(length(max = 120, message = "Headline must be at most 120 characters"))]
    pub headline: Option<String>,

    #[validate(url(message = "Avatar URL must be a valid URL"))]
    pub avatar_url: Option<String>,
}

/// Create or replace the caller's profile
#[derive(Debug, Deserialize, Validate)]
pub struct UpsertProfileRequest {
    #[validate(length(max = 2000, message = "Bio must be at most 2000 characters"))]
    pub bio: Option<String>,

    #[validate(length(max = 100, message = "Location must be at most 100 characters"))]
    pub location: Option<String>,

    #[validate(url(message = "Website must be a valid URL"))]
    pub website: Option<String>,

    #[serde(default)]
    #[validate(length(max = 30, message = "At most 30 skills"))]
    pub skills: Vec<String>,
}

/// Add education entry request
#[derive(Debug, Deserialize, Validate)]
pub struct AddEducationRequest {
    #[validate(length(min = 1, max = 150, message = "School must be 1-150 characters"))]
    pub school: String,

    #[validate(length(max = 100, message = "Degree must be at most 100 characters"))]
    pub degree: Option<String>,

    #[validate(length(max = 100, message = "Field of study must be at most 100 characters"))]
    pub field_of_study: Option<String>,

    #[validate(range(min = 1900, max = 2100, message = "Start year out of range"))]
    pub start_year: i32,

    #[validate(range(min = 1900, max = 2100, message = "End year out of range"))]
    pub end_year: Option<i32>,
}

/// Add experience entry request
#[derive(Debug, Deserialize, Validate)]
pub struct AddExperienceRequest {
    #[validate(length(min = 1, max = 100, message = "Company must be 1-100 characters"))]
    pub company: String,

    #[validate(length(min = 1, max = 120, message = "Title must be 1-120 characters"))]
    pub title: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    /// ISO date, e.g. "2021-03-01"
    pub start_date: chrono::NaiveDate,

    /// Omit for the current position
    pub end_date: Option<chrono::NaiveDate>,
}

/// Create job post request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateJobPostRequest {
    #[validate(length(min = 3, max = 120, message = "Title must be 3-120 characters"))]
    pub title: String,

    #[validate(length(min = 10, max = 20000, message = "Description must be 10-20000 characters"))]
    pub description: String,

    #[validate(length(min = 1, max = 100, message = "Company must be 1-100 characters"))]
    pub company: String,

    #[validate(length(max = 100, message = "Location must be at most 100 characters"))]
    pub location: Option<String>,

    /// full_time, part_time, contract or internship
    pub employment_type: Option<String>,

    #[validate(range(min = 0, message = "Minimum salary must not be negative"))]
    pub salary_min: Option<i32>,

    #[validate(range(min = 0, message = "Maximum salary must not be negative"))]
    pub salary_max: Option<i32>,

    #[serde(default)]
    pub remote: bool,
}

/// Update job post request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateJobPostRequest {
    #[validate(length(min = 3, max = 120, message = "Title must be 3-120 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 10, max = 20000, message = "Description must be 10-20000 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 100, message = "Location must be at most 100 characters"))]
    pub location: Option<String>,

    pub employment_type: Option<String>,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub remote: Option<bool>,
    pub open: Option<bool>,
}

/// Apply to a job post
#[derive(Debug, Deserialize, Validate)]
pub struct ApplyRequest {
    #[validate(length(max = 10000, message = "Cover letter must be at most 10000 characters"))]
    pub cover_letter: Option<String>,

    #[validate(url(message = "Resume URL must be a valid URL"))]
    pub resume_url: Option<String>,
}

/// Employer moves an application through its statuses
#[derive(Debug, Deserialize)]
pub struct UpdateApplicationStatusRequest {
    /// in_review, accepted or rejected
    pub status: String,
}

/// Create forum thread request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateThreadRequest {
    #[validate(length(min = 3, max = 200, message = "Title must be 3-200 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 40000, message = "Body must be 1-40000 characters"))]
    pub body: String,
}

/// Create forum comment request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = 10000, message = "Body must be 1-10000 characters"))]
    pub body: String,

    /// Reply target; must be a comment in the same thread
    pub parent_id: Option<String>,
}

/// Create mentor profile request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMentorProfileRequest {
    #[validate(length(min = 3, max = 200, message = "Headline must be 3-200 characters"))]
    pub headline: String,

    #[serde(default)]
    #[validate(length(max = 20, message = "At most 20 expertise tags"))]
    pub expertise: Vec<String>,

    #[validate(range(min = 1, max = 50, message = "Capacity must be 1-50"))]
    pub capacity: i32,

    #[serde(default = "default_true")]
    pub accepting: bool,
}

fn default_true() -> bool {
    true
}

/// Update mentor profile request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMentorProfileRequest {
    #[validate(length(min = 3, max = 200, message = "Headline must be 3-200 characters"))]
    pub headline: Option<String>,

    #[validate(length(max = 20, message = "At most 20 expertise tags"))]
    pub expertise: Option<Vec<String>>,

    #[validate(range(min = 1, max = 50, message = "Capacity must be 1-50"))]
    pub capacity: Option<i32>,

    pub accepting: Option<bool>,
}

/// Request mentorship from a mentor
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMentorshipRequest {
    #[validate(length(max = 2000, message = "Message must be at most 2000 characters"))]
    pub message: Option<String>,
}

/// Send a mentorship message
#[derive(Debug, Deserialize, Validate)]
pub struct SendMentorshipMessageRequest {
    #[validate(length(min = 1, max = 5000, message = "Body must be 1-5000 characters"))]
    pub body: String,
}

/// Review a mentor after a completed mentorship
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMentorReviewRequest {
    #[validate(range(min = 1, max = 5, message = "Rating must be 1-5"))]
    pub rating: i16,

    #[validate(length(max = 5000, message = "Comment must be at most 5000 characters"))]
    pub comment: Option<String>,
}

/// Create workplace request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateWorkplaceRequest {
    #[validate(length(min = 1, max = 150, message = "Name must be 1-150 characters"))]
    pub name: String,

    #[validate(url(message = "Website must be a valid URL"))]
    pub website: Option<String>,

    #[validate(length(max = 100, message = "Industry must be at most 100 characters"))]
    pub industry: Option<String>,
}

/// Review a workplace
#[derive(Debug, Deserialize, Validate)]
pub struct CreateWorkplaceReviewRequest {
    #[validate(range(min = 1, max = 5, message = "Rating must be 1-5"))]
    pub rating: i16,

    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 20000, message = "Body must be 1-20000 characters"))]
    pub body: String,

    /// Policy tag names; unknown tags are rejected
    #[serde(default)]
    pub policy_tags: Vec<String>,
}

/// Employer reply to a workplace review
#[derive(Debug, Deserialize, Validate)]
pub struct ReviewReplyRequest {
    #[validate(length(min = 1, max = 10000, message = "Body must be 1-10000 characters"))]
    pub body: String,
}

/// File a moderation report
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReportRequest {
    /// job_post, forum_thread, forum_comment, workplace_review or user
    pub target_type: String,

    pub target_id: String,

    #[validate(length(min = 3, max = 2000, message = "Reason must be 3-2000 characters"))]
    pub reason: String,
}

/// Moderator closes a report
#[derive(Debug, Deserialize, Validate)]
pub struct ResolveReportRequest {
    /// resolved or dismissed
    pub status: String,

    #[validate(length(max = 2000, message = "Note must be at most 2000 characters"))]
    pub note: Option<String>,
}

/// Keyset pagination query parameters
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    /// Return records with IDs past this cursor
    pub after: Option<String>,

    pub limit: Option<i32>,
}

impl PageParams {
    pub const DEFAULT_LIMIT: i32 = 20;
    pub const MAX_LIMIT: i32 = 100;

    /// Parse the cursor into an ID, ignoring malformed values.
    pub fn after_id(&self) -> Option<i64> {
        self.after.as_deref().and_then(|s| s.parse::<i64>().ok())
    }

    /// Clamp the limit into 1..=MAX_LIMIT.
    pub fn clamped_limit(&self) -> i32 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }
}

/// Report listing query parameters
#[derive(Debug, Default, Deserialize)]
pub struct ReportQueryParams {
    /// open, resolved or dismissed
    pub status: Option<String>,

    pub after: Option<String>,
    pub limit: Option<i32>,
}

/// Notification listing query parameters
#[derive(Debug, Default, Deserialize)]
pub struct NotificationQueryParams {
    #[serde(default)]
    pub unread_only: bool,

    pub after: Option<String>,
    pub limit: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_page_params_defaults() {
        let params = PageParams::default();
        assert_eq!(params.after_id(), None);
        assert_eq!(params.clamped_limit(), PageParams::DEFAULT_LIMIT);
    }

    #[test]
    fn test_page_params_clamping() {
        let params = PageParams {
            after: Some("1234".into()),
            limit: Some(9999),
        };
        assert_eq!(params.after_id(), Some(1234));
        assert_eq!(params.clamped_limit(), PageParams::MAX_LIMIT);

        let low = PageParams {
            after: Some("not-a-number".into()),
            limit: Some(0),
        };
        assert_eq!(low.after_id(), None);
        assert_eq!(low.clamped_limit(), 1);
    }

    #[test]
    fn test_register_request_validation() {
        let valid = RegisterRequest {
            username: "newuser".into(),
            email: "new@example.com".into(),
            password: "password123".into(),
            full_name: None,
            role: None,
        };
        assert!(valid.validate().is_ok());

        let bad_email = RegisterRequest {
            username: "newuser".into(),
            email: "not-an-email".into(),
            password: "password123".into(),
            full_name: None,
            role: None,
        };
        assert!(bad_email.validate().is_err());

        let short_password = RegisterRequest {
            username: "newuser".into(),
            email: "new@example.com".into(),
            password: "short".into(),
            full_name: None,
            role: None,
        };
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn test_review_rating_bounds() {
        let ok = CreateMentorReviewRequest {
            rating: 5,
            comment: None,
        };
        assert!(ok.validate().is_ok());

        let out_of_range = CreateMentorReviewRequest {
            rating: 6,
            comment: None,
        };
        assert!(out_of_range.validate().is_err());
    }
}
