//! Notification entity and repository trait.
//!
//! Maps to the `notifications` table. Notifications are written
//! synchronously by services as side effects of domain events; there is
//! no queue.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Notification kinds matching database VARCHAR values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A new application arrived on the employer's post
    ApplicationReceived,
    /// An application's status changed
    ApplicationUpdate,
    /// Someone requested mentorship
    MentorshipRequested,
    /// A mentorship request was answered or closed
    MentorshipUpdate,
    /// Someone replied to a forum comment
    CommentReply,
    /// A badge was awarded
    BadgeAwarded,
    /// An employer replied to a workplace review
    ReviewReply,
}

impl NotificationKind {
    /// Convert from database string representation.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "application_received" => Some(Self::ApplicationReceived),
            "application_update" => Some(Self::ApplicationUpdate),
            "mentorship_requested" => Some(Self::MentorshipRequested),
            "mentorship_update" => Some(Self::MentorshipUpdate),
            "comment_reply" => Some(Self::CommentReply),
            "badge_awarded" => Some(Self::BadgeAwarded),
            "review_reply" => Some(Self::ReviewReply),
            _ => None,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ApplicationReceived => "application_received",
            Self::ApplicationUpdate => "application_update",
            Self::MentorshipRequested => "mentorship_requested",
            Self::MentorshipUpdate => "mentorship_update",
            Self::CommentReply => "comment_reply",
            Self::BadgeAwarded => "badge_awarded",
            Self::ReviewReply => "review_reply",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A notification delivered to a user's inbox.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    /// Recipient
    pub user_id: i64,
    pub kind: NotificationKind,
    pub body: String,
    /// ID of the record the notification is about, if any
    pub resource_id: Option<i64>,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Whether the recipient has read the notification.
    pub fn is_read(&self) -> bool {
        self.read_at.is_some()
    }
}

/// Repository trait for notification data access.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Find a notification by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Notification>, AppError>;

    /// List a user's notifications, newest first, with keyset pagination.
    async fn list_by_user(
        &self,
        user_id: i64,
        unread_only: bool,
        after: Option<i64>,
        limit: i32,
    ) -> Result<Vec<Notification>, AppError>;

    /// Count a user's unread notifications.
    async fn unread_count(&self, user_id: i64) -> Result<i64, AppError>;

    /// Create a new notification.
    async fn create(&self, notification: &Notification) -> Result<Notification, AppError>;

    /// Mark one notification read.
    async fn mark_read(&self, id: i64) -> Result<(), AppError>;

    /// Mark all of a user's notifications read. Returns the number updated.
    async fn mark_all_read(&self, user_id: i64) -> Result<i64, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrip() {
        for kind in [
            NotificationKind::ApplicationReceived,
            NotificationKind::ApplicationUpdate,
            NotificationKind::MentorshipRequested,
            NotificationKind::MentorshipUpdate,
            NotificationKind::CommentReply,
            NotificationKind::BadgeAwarded,
            NotificationKind::ReviewReply,
        ] {
            assert_eq!(NotificationKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(NotificationKind::from_str("carrier_pigeon"), None);
    }

    #[test]
    fn test_is_read() {
        let mut n = Notification {
            id: 1,
            user_id: 2,
            kind: NotificationKind::BadgeAwarded,
            body: "You earned a badge".into(),
            resource_id: None,
            read_at: None,
            created_at: Utc::now(),
        };
        assert!(!n.is_read());

        n.read_at = Some(Utc::now());
        assert!(n.is_read());
    }
}
