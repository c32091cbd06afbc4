//! Badge Service
//!
//! Read side of the badge system. Awards themselves happen inside the
//! forum, mentorship and workplace services as activity crosses the
//! kind thresholds.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Badge, BadgeRepository, UserRepository};
use crate::shared::error::AppError;

/// Badge service errors
#[derive(Debug, thiserror::Error)]
pub enum BadgeError {
    #[error("User not found")]
    UserNotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<BadgeError> for AppError {
    fn from(e: BadgeError) -> Self {
        match e {
            BadgeError::UserNotFound => AppError::NotFound("User not found".into()),
            BadgeError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Badge service trait for dependency injection
#[async_trait]
pub trait BadgeService: Send + Sync {
    /// List a user's badges, newest first.
    async fn list_user_badges(&self, user_id: i64) -> Result<Vec<Badge>, BadgeError>;
}

/// BadgeService implementation
pub struct BadgeServiceImpl<B, U>
where
    B: BadgeRepository,
    U: UserRepository,
{
    badge_repo: Arc<B>,
    user_repo: Arc<U>,
}

impl<B, U> BadgeServiceImpl<B, U>
where
    B: BadgeRepository,
    U: UserRepository,
{
    /// Create a new BadgeServiceImpl
    pub fn new(badge_repo: Arc<B>, user_repo: Arc<U>) -> Self {
        Self {
            badge_repo,
            user_repo,
        }
    }
}

#[async_trait]
impl<B, U> BadgeService for BadgeServiceImpl<B, U>
where
    B: BadgeRepository + 'static,
    U: UserRepository + 'static,
{
    async fn list_user_badges(&self, user_id: i64) -> Result<Vec<Badge>, BadgeError> {
        self.user_repo
            .find_by_id(user_id)
            .await
            .map_err(|e| BadgeError::Internal(e.to_string()))?
            .ok_or(BadgeError::UserNotFound)?;

        self.badge_repo
            .list_by_user(user_id)
            .await
            .map_err(|e| BadgeError::Internal(e.to_string()))
    }
}

