//! Response DTOs
//!
//! Data structures for API response bodies. Snowflake IDs are rendered as
//! strings for JavaScript BigInt compatibility; timestamps as ISO 8601.

use serde::Serialize;

use crate::application::services::AuthTokens;
use crate::domain::{
    Badge, Education, Experience, ForumComment, ForumThread, JobApplication, JobPost,
    MentorProfile, MentorReview, MentorshipMessage, MentorshipRequest, Notification, Profile,
    Report, User, Workplace, WorkplaceReview,
};

/// Authentication tokens response
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

impl From<AuthTokens> for TokenResponse {
    fn from(tokens: AuthTokens) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
            token_type: tokens.token_type,
        }
    }
}

/// Registration response (includes user and tokens)
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

/// User response
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub headline: Option<String>,
    pub avatar_url: Option<String>,
    pub role: String,
    pub created_at: String,
}

impl UserResponse {
    /// Email is only included when the user is looking at themselves.
    pub fn from_user(user: User, include_email: bool) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username,
            email: if include_email { Some(user.email) } else { None },
            full_name: user.full_name,
            headline: user.headline,
            avatar_url: user.avatar_url,
            role: user.role.as_str().to_string(),
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Profile response with embedded education and experience
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: String,
    pub user_id: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub skills: Vec<String>,
    pub education: Vec<EducationResponse>,
    pub experience: Vec<ExperienceResponse>,
    pub updated_at: String,
}

impl ProfileResponse {
    pub fn from_parts(
        profile: Profile,
        education: Vec<Education>,
        experience: Vec<Experience>,
    ) -> Self {
        Self {
            id: profile.id.to_string(),
            user_id: profile.user_id.to_string(),
            bio: profile.bio,
            location: profile.location,
            website: profile.website,
            skills: profile.skills,
            education: education.into_iter().map(Into::into).collect(),
            experience: experience.into_iter().map(Into::into).collect(),
            updated_at: profile.updated_at.to_rfc3339(),
        }
    }
}

/// Education entry response
#[derive(Debug, Serialize)]
pub struct EducationResponse {
    pub id: String,
    pub school: String,
    pub degree: Option<String>,
    pub field_of_study: Option<String>,
    pub start_year: i32,
    pub end_year: Option<i32>,
}

impl From<Education> for EducationResponse {
    fn from(e: Education) -> Self {
        Self {
            id: e.id.to_string(),
            school: e.school,
            degree: e.degree,
            field_of_study: e.field_of_study,
            start_year: e.start_year,
            end_year: e.end_year,
        }
    }
}

/// Experience entry response
#[derive(Debug, Serialize)]
pub struct ExperienceResponse {
    pub id: String,
    pub company: String,
    pub title: String,
    pub description: Option<String>,
    pub start_date: String,
    pub end_date: Option<String>,
    pub current: bool,
}

impl From<Experience> for ExperienceResponse {
    fn from(e: Experience) -> Self {
        let current = e.is_current();
        Self {
            id: e.id.to_string(),
            company: e.company,
            title: e.title,
            description: e.description,
            start_date: e.start_date.to_string(),
            end_date: e.end_date.map(|d| d.to_string()),
            current,
        }
    }
}

/// Job post response
#[derive(Debug, Serialize)]
pub struct JobPostResponse {
    pub id: String,
    pub employer_id: String,
    pub title: String,
    pub description: String,
    pub company: String,
    pub location: Option<String>,
    pub employment_type: String,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub remote: bool,
    pub open: bool,
    pub created_at: String,
}

impl From<JobPost> for JobPostResponse {
    fn from(post: JobPost) -> Self {
        Self {
            id: post.id.to_string(),
            employer_id: post.employer_id.to_string(),
            title: post.title,
            description: post.description,
            company: post.company,
            location: post.location,
            employment_type: post.employment_type.as_str().to_string(),
            salary_min: post.salary_min,
            salary_max: post.salary_max,
            remote: post.remote,
            open: post.open,
            created_at: post.created_at.to_rfc3339(),
        }
    }
}

/// Job application response
#[derive(Debug, Serialize)]
pub struct JobApplicationResponse {
    pub id: String,
    pub job_id: String,
    pub applicant_id: String,
    pub cover_letter: Option<String>,
    pub resume_url: Option<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<JobApplication> for JobApplicationResponse {
    fn from(app: JobApplication) -> Self {
        Self {
            id: app.id.to_string(),
            job_id: app.job_id.to_string(),
            applicant_id: app.applicant_id.to_string(),
            cover_letter: app.cover_letter,
            resume_url: app.resume_url,
            status: app.status.as_str().to_string(),
            created_at: app.created_at.to_rfc3339(),
            updated_at: app.updated_at.to_rfc3339(),
        }
    }
}

/// Forum thread response
#[derive(Debug, Serialize)]
pub struct ForumThreadResponse {
    pub id: String,
    pub author_id: String,
    pub title: String,
    pub body: String,
    pub comment_count: i64,
    pub created_at: String,
}

impl From<ForumThread> for ForumThreadResponse {
    fn from(thread: ForumThread) -> Self {
        Self {
            id: thread.id.to_string(),
            author_id: thread.author_id.to_string(),
            title: thread.title,
            body: thread.body,
            comment_count: thread.comment_count,
            created_at: thread.created_at.to_rfc3339(),
        }
    }
}

/// Forum comment response
#[derive(Debug, Serialize)]
pub struct ForumCommentResponse {
    pub id: String,
    pub thread_id: String,
    pub author_id: String,
    pub parent_id: Option<String>,
    pub body: String,
    pub score: i64,
    pub created_at: String,
}

impl From<ForumComment> for ForumCommentResponse {
    fn from(comment: ForumComment) -> Self {
        Self {
            id: comment.id.to_string(),
            thread_id: comment.thread_id.to_string(),
            author_id: comment.author_id.to_string(),
            parent_id: comment.parent_id.map(|id| id.to_string()),
            body: comment.body,
            score: comment.score,
            created_at: comment.created_at.to_rfc3339(),
        }
    }
}

/// Mentor profile response
#[derive(Debug, Serialize)]
pub struct MentorProfileResponse {
    pub id: String,
    pub user_id: String,
    pub headline: String,
    pub expertise: Vec<String>,
    pub capacity: i32,
    pub mentee_count: i32,
    pub accepting: bool,
    pub average_rating: f64,
    pub review_count: i64,
}

impl From<MentorProfile> for MentorProfileResponse {
    fn from(profile: MentorProfile) -> Self {
        Self {
            id: profile.id.to_string(),
            user_id: profile.user_id.to_string(),
            headline: profile.headline,
            expertise: profile.expertise,
            capacity: profile.capacity,
            mentee_count: profile.mentee_count,
            accepting: profile.accepting,
            average_rating: profile.average_rating,
            review_count: profile.review_count,
        }
    }
}

/// Mentorship request response
#[derive(Debug, Serialize)]
pub struct MentorshipRequestResponse {
    pub id: String,
    pub mentor_id: String,
    pub mentee_id: String,
    pub message: Option<String>,
    pub status: String,
    pub responded_at: Option<String>,
    pub created_at: String,
}

impl From<MentorshipRequest> for MentorshipRequestResponse {
    fn from(request: MentorshipRequest) -> Self {
        Self {
            id: request.id.to_string(),
            mentor_id: request.mentor_id.to_string(),
            mentee_id: request.mentee_id.to_string(),
            message: request.message,
            status: request.status.as_str().to_string(),
            responded_at: request.responded_at.map(|t| t.to_rfc3339()),
            created_at: request.created_at.to_rfc3339(),
        }
    }
}

/// Mentorship message response
#[derive(Debug, Serialize)]
pub struct MentorshipMessageResponse {
    pub id: String,
    pub request_id: String,
    pub sender_id: String,
    pub body: String,
    pub created_at: String,
}

impl From<MentorshipMessage> for MentorshipMessageResponse {
    fn from(message: MentorshipMessage) -> Self {
        Self {
            id: message.id.to_string(),
            request_id: message.request_id.to_string(),
            sender_id: message.sender_id.to_string(),
            body: message.body,
            created_at: message.created_at.to_rfc3339(),
        }
    }
}

/// Mentor review response
#[derive(Debug, Serialize)]
pub struct MentorReviewResponse {
    pub id: String,
    pub mentor_id: String,
    pub mentee_id: String,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: String,
}

impl From<MentorReview> for MentorReviewResponse {
    fn from(review: MentorReview) -> Self {
        Self {
            id: review.id.to_string(),
            mentor_id: review.mentor_id.to_string(),
            mentee_id: review.mentee_id.to_string(),
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at.to_rfc3339(),
        }
    }
}

/// Workplace response
#[derive(Debug, Serialize)]
pub struct WorkplaceResponse {
    pub id: String,
    pub name: String,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub average_rating: f64,
    pub review_count: i64,
}

impl From<Workplace> for WorkplaceResponse {
    fn from(workplace: Workplace) -> Self {
        Self {
            id: workplace.id.to_string(),
            name: workplace.name,
            website: workplace.website,
            industry: workplace.industry,
            average_rating: workplace.average_rating,
            review_count: workplace.review_count,
        }
    }
}

/// Workplace review response
#[derive(Debug, Serialize)]
pub struct WorkplaceReviewResponse {
    pub id: String,
    pub workplace_id: String,
    pub author_id: String,
    pub rating: i16,
    pub title: Option<String>,
    pub body: String,
    pub policy_tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employer_reply: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replied_at: Option<String>,
    pub created_at: String,
}

impl From<WorkplaceReview> for WorkplaceReviewResponse {
    fn from(review: WorkplaceReview) -> Self {
        Self {
            id: review.id.to_string(),
            workplace_id: review.workplace_id.to_string(),
            author_id: review.author_id.to_string(),
            rating: review.rating,
            title: review.title,
            body: review.body,
            policy_tags: review
                .policy_tags
                .iter()
                .map(|t| t.as_str().to_string())
                .collect(),
            employer_reply: review.employer_reply,
            replied_at: review.replied_at.map(|t| t.to_rfc3339()),
            created_at: review.created_at.to_rfc3339(),
        }
    }
}

/// Badge response
#[derive(Debug, Serialize)]
pub struct BadgeResponse {
    pub id: String,
    pub kind: String,
    pub description: String,
    pub awarded_at: String,
}

impl From<Badge> for BadgeResponse {
    fn from(badge: Badge) -> Self {
        Self {
            id: badge.id.to_string(),
            kind: badge.kind.as_str().to_string(),
            description: badge.kind.description().to_string(),
            awarded_at: badge.awarded_at.to_rfc3339(),
        }
    }
}

/// Report response
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub id: String,
    pub reporter_id: String,
    pub target_type: String,
    pub target_id: String,
    pub reason: String,
    pub status: String,
    pub resolved_by: Option<String>,
    pub resolution_note: Option<String>,
    pub created_at: String,
}

impl From<Report> for ReportResponse {
    fn from(report: Report) -> Self {
        Self {
            id: report.id.to_string(),
            reporter_id: report.reporter_id.to_string(),
            target_type: report.target_type.as_str().to_string(),
            target_id: report.target_id.to_string(),
            reason: report.reason,
            status: report.status.as_str().to_string(),
            resolved_by: report.resolved_by.map(|id| id.to_string()),
            resolution_note: report.resolution_note,
            created_at: report.created_at.to_rfc3339(),
        }
    }
}

/// Notification response
#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub id: String,
    pub kind: String,
    pub body: String,
    pub resource_id: Option<String>,
    pub read: bool,
    pub created_at: String,
}

impl From<Notification> for NotificationResponse {
    fn from(notification: Notification) -> Self {
        let read = notification.is_read();
        Self {
            id: notification.id.to_string(),
            kind: notification.kind.as_str().to_string(),
            body: notification.body,
            resource_id: notification.resource_id.map(|id| id.to_string()),
            read,
            created_at: notification.created_at.to_rfc3339(),
        }
    }
}

/// Unread notification count
#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    pub unread: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BadgeKind, UserRole};
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_user_response_hides_email_for_others() {
        let user = User {
            id: 42,
            username: "someone".into(),
            email: "private@example.com".into(),
            password_hash: "hash".into(),
            role: UserRole::Member,
            ..User::default()
        };

        let public = UserResponse::from_user(user.clone(), false);
        assert!(public.email.is_none());
        assert_eq!(public.id, "42");

        let own = UserResponse::from_user(user, true);
        assert_eq!(own.email.as_deref(), Some("private@example.com"));
    }

    #[test]
    fn test_badge_response_carries_description() {
        let badge = Badge {
            id: 1,
            user_id: 2,
            kind: BadgeKind::FirstThread,
            awarded_at: Utc::now(),
        };
        let response = BadgeResponse::from(badge);
        assert_eq!(response.kind, "first_thread");
        assert!(!response.description.is_empty());
    }
}
