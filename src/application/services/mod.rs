//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **AuthService**: Registration, JWT tokens, session rotation
//! - **UserService**: Accounts, profiles, education/experience entries
//! - **JobService**: Job posts and the application workflow
//! - **ForumService**: Threads, comments, upvotes
//! - **MentorshipService**: Mentor directory, request lifecycle, messaging, reviews
//! - **WorkplaceService**: Workplaces, reviews, employer replies
//! - **BadgeService**: Badge listings
//! - **ReportService**: Moderation reports
//! - **NotificationService**: Inbox reads and read-state changes

pub mod auth_service;
pub mod user_service;
pub mod job_service;
pub mod forum_service;
pub mod mentorship_service;
pub mod workplace_service;
pub mod badge_service;
pub mod report_service;
pub mod notification_service;

// Re-export auth service types
pub use auth_service::{AuthService, AuthServiceImpl, AuthTokens, AuthError, Claims};

// Re-export user service types
pub use user_service::{UserService, UserServiceImpl, UpdateUserFields, ProfileFields, UserError};

// Re-export job service types
pub use job_service::{
    JobService, JobServiceImpl, CreateJobPostFields, UpdateJobPostFields, JobError,
};

// Re-export forum service types
pub use forum_service::{ForumService, ForumServiceImpl, ForumError};

// Re-export mentorship service types
pub use mentorship_service::{
    MentorshipService, MentorshipServiceImpl, MentorProfileFields, UpdateMentorProfileFields,
    MentorshipError,
};

// Re-export workplace service types
pub use workplace_service::{WorkplaceService, WorkplaceServiceImpl, WorkplaceError};

// Re-export badge service types
pub use badge_service::{BadgeService, BadgeServiceImpl, BadgeError};

// Re-export report service types
pub use report_service::{ReportService, ReportServiceImpl, ReportError};

// Re-export notification service types
pub use notification_service::{NotificationService, NotificationServiceImpl, NotificationError};
