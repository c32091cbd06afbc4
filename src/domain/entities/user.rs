//! User entity and repository trait.
//!
//! Maps to the `users` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Account role enum matching database VARCHAR constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular community member (job seeker, forum participant, mentee)
    #[default]
    Member,
    /// Employer representative (posts jobs, replies to workplace reviews)
    Employer,
    /// Moderator (resolves reports, removes content)
    Moderator,
}

impl UserRole {
    /// Convert from database string representation.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "employer" => Self::Employer,
            "moderator" => Self::Moderator,
            _ => Self::Member,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Employer => "employer",
            Self::Moderator => "moderator",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents a user account on the platform.
///
/// Maps to the `users` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - username: VARCHAR(32) NOT NULL UNIQUE
/// - email: VARCHAR(255) NOT NULL UNIQUE
/// - password_hash: VARCHAR(255) NOT NULL
/// - full_name: VARCHAR(100) NULL
/// - headline: VARCHAR(120) NULL
/// - avatar_url: TEXT NULL
/// - role: VARCHAR(20) NOT NULL DEFAULT 'member'
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - updated_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// Username (2-32 characters, unique)
    pub username: String,

    /// Email address (unique)
    pub email: String,

    /// Argon2 password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Full display name (optional)
    pub full_name: Option<String>,

    /// Short professional headline, e.g. "Backend engineer"
    pub headline: Option<String>,

    /// URL to user's avatar image
    pub avatar_url: Option<String>,

    /// Account role
    #[serde(default)]
    pub role: UserRole,

    /// Account creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Get the user's display name, falling back to username if not set.
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.username)
    }

    /// Check whether the account can post and manage job listings.
    pub fn is_employer(&self) -> bool {
        matches!(self.role, UserRole::Employer)
    }

    /// Check whether the account has moderation privileges.
    pub fn is_moderator(&self) -> bool {
        matches!(self.role, UserRole::Moderator)
    }
}

impl Default for User {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            username: String::new(),
            email: String::new(),
            password_hash: String::new(),
            full_name: None,
            headline: None,
            avatar_url: None,
            role: UserRole::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Repository trait for User data access operations.
///
/// Implementations of this trait handle the actual database interactions.
/// The trait is defined in the domain layer to maintain dependency inversion.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their Snowflake ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Find a user by username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Create a new user in the database.
    async fn create(&self, user: &User) -> Result<User, AppError>;

    /// Update an existing user.
    async fn update(&self, user: &User) -> Result<User, AppError>;

    /// Delete a user by ID.
    async fn delete(&self, id: i64) -> Result<(), AppError>;

    /// Check if an email address is already registered.
    async fn email_exists(&self, email: &str) -> Result<bool, AppError>;

    /// Check if a username is already taken.
    async fn username_exists(&self, username: &str) -> Result<bool, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user() -> User {
        User {
            id: 12345678901234567,
            username: "testuser".to_string(),
            email: "test@example.com".to_string(),
            password_hash: "hashed_password".to_string(),
            role: UserRole::Member,
            ..User::default()
        }
    }

    #[test]
    fn test_user_role_default_is_member() {
        assert_eq!(UserRole::default(), UserRole::Member);
    }

    #[test]
    fn test_user_role_from_str() {
        assert_eq!(UserRole::from_str("employer"), UserRole::Employer);
        assert_eq!(UserRole::from_str("EMPLOYER"), UserRole::Employer);
        assert_eq!(UserRole::from_str("moderator"), UserRole::Moderator);
        assert_eq!(UserRole::from_str("member"), UserRole::Member);
    }

    #[test]
    fn test_user_role_from_str_unknown_defaults_to_member() {
        assert_eq!(UserRole::from_str("unknown"), UserRole::Member);
        assert_eq!(UserRole::from_str(""), UserRole::Member);
    }

    #[test]
    fn test_user_role_as_str_roundtrip() {
        for role in [UserRole::Member, UserRole::Employer, UserRole::Moderator] {
            assert_eq!(UserRole::from_str(role.as_str()), role);
        }
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        let mut user = create_test_user();
        assert_eq!(user.display_name(), "testuser");

        user.full_name = Some("Test User".to_string());
        assert_eq!(user.display_name(), "Test User");
    }

    #[test]
    fn test_role_predicates() {
        let mut user = create_test_user();
        assert!(!user.is_employer());
        assert!(!user.is_moderator());

        user.role = UserRole::Employer;
        assert!(user.is_employer());

        user.role = UserRole::Moderator;
        assert!(user.is_moderator());
    }

    #[test]
    fn test_user_password_hash_not_serialized() {
        let user = create_test_user();

        let serialized = serde_json::to_string(&user).expect("Failed to serialize user");

        assert!(!serialized.contains("password_hash"));
        assert!(!serialized.contains("hashed_password"));
    }

    #[test]
    fn test_user_role_serializes_lowercase() {
        let mut user = create_test_user();
        user.role = UserRole::Employer;

        let serialized = serde_json::to_string(&user).expect("Failed to serialize user");

        assert!(serialized.contains("\"role\":\"employer\""));
    }
}
