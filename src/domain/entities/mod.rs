//! # Domain Entities
//!
//! Core domain entities for the job-board/community platform.
//! All entities map directly to their corresponding database tables.
//!
//! ## Core Entities
//!
//! - **User**: Account with authentication data and role
//! - **Profile**: One-per-user professional profile with education/experience
//! - **JobPost / JobApplication**: Job listings and candidate applications
//! - **ForumThread / ForumComment / CommentVote**: Community forum with voting
//! - **MentorProfile / MentorshipRequest / MentorshipMessage / MentorReview**:
//!   Mentorship matching, messaging and reviews
//! - **Workplace / WorkplaceReview**: Rated, policy-tagged employer reviews
//!
//! ## Supporting Entities
//!
//! - **Badge**: Threshold-based achievements, unique per (user, kind)
//! - **Report**: Moderation reports against platform content
//! - **Notification**: Synchronous fan-out inbox rows
//! - **Session**: Refresh-token sessions for JWT auth
//!
//! ## Repository Traits
//!
//! Each entity has an associated repository trait defining data access
//! operations. These traits are implemented in the infrastructure layer,
//! following the dependency inversion principle.

mod badge;
mod forum;
mod job;
mod mentorship;
mod notification;
mod profile;
mod report;
mod session;
mod user;
mod workplace;

pub use user::{User, UserRepository, UserRole};

pub use profile::{Education, Experience, Profile, ProfileRepository};

pub use job::{
    ApplicationStatus, EmploymentType, JobApplication, JobApplicationRepository, JobPost,
    JobPostRepository,
};

pub use forum::{
    CommentVote, ForumComment, ForumCommentRepository, ForumThread, ForumThreadRepository,
};

pub use mentorship::{
    MentorProfile, MentorProfileRepository, MentorReview, MentorReviewRepository,
    MentorshipMessage, MentorshipMessageRepository, MentorshipRequest,
    MentorshipRequestRepository, MentorshipStatus,
};

pub use workplace::{
    PolicyTag, Workplace, WorkplaceRepository, WorkplaceReview, WorkplaceReviewRepository,
};

pub use badge::{Badge, BadgeKind, BadgeRepository};

pub use report::{Report, ReportRepository, ReportStatus, ReportTargetType};

pub use notification::{Notification, NotificationKind, NotificationRepository};

pub use session::{Session, SessionRepository};
