//! Repository Implementations
//!
//! PostgreSQL implementations of domain repository traits.
//!
//! This module provides concrete implementations of the repository traits
//! defined in the domain layer. Each repository handles data access for
//! a specific entity type.
//!
//! ## Available Repositories
//!
//! - **UserRepository** - User account management
//! - **SessionRepository** - Refresh token sessions
//! - **ProfileRepository** - Professional profiles with education/experience
//! - **JobPostRepository / JobApplicationRepository** - Job board
//! - **ForumThreadRepository / ForumCommentRepository** - Forum with votes
//! - **MentorProfileRepository / MentorshipRequestRepository /
//!   MentorshipMessageRepository / MentorReviewRepository** - Mentorship
//! - **WorkplaceRepository / WorkplaceReviewRepository** - Workplace reviews
//! - **BadgeRepository** - Activity badges
//! - **ReportRepository** - Moderation reports
//! - **NotificationRepository** - User notifications

pub mod badge_repository;
pub mod forum_repository;
pub mod job_repository;
pub mod mentorship_repository;
pub mod notification_repository;
pub mod profile_repository;
pub mod report_repository;
pub mod session_repository;
pub mod user_repository;
pub mod workplace_repository;

pub use badge_repository::PgBadgeRepository;
pub use forum_repository::{PgForumCommentRepository, PgForumThreadRepository};
pub use job_repository::{PgJobApplicationRepository, PgJobPostRepository};
pub use mentorship_repository::{
    PgMentorProfileRepository, PgMentorReviewRepository, PgMentorshipMessageRepository,
    PgMentorshipRequestRepository,
};
pub use notification_repository::PgNotificationRepository;
pub use profile_repository::PgProfileRepository;
pub use report_repository::PgReportRepository;
pub use session_repository::PgSessionRepository;
pub use user_repository::PgUserRepository;
pub use workplace_repository::{PgWorkplaceRepository, PgWorkplaceReviewRepository};
