//! Profile, education and experience entities.
//!
//! Maps to the `profiles`, `education_entries` and `experience_entries`
//! tables. Each user has at most one profile; education and experience
//! records hang off the profile.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// A user's public professional profile.
///
/// Maps to the `profiles` table; `user_id` carries a UNIQUE constraint so
/// there is at most one profile per user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// Owning user (unique)
    pub user_id: i64,

    /// About-me text
    pub bio: Option<String>,

    /// Free-form location, e.g. "Berlin, Germany"
    pub location: Option<String>,

    /// Personal website or portfolio URL
    pub website: Option<String>,

    /// Skill tags
    pub skills: Vec<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An education entry attached to a profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Education {
    pub id: i64,
    pub profile_id: i64,
    pub school: String,
    pub degree: Option<String>,
    pub field_of_study: Option<String>,
    pub start_year: i32,
    /// None while still enrolled
    pub end_year: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// A work-experience entry attached to a profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experience {
    pub id: i64,
    pub profile_id: i64,
    pub company: String,
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    /// None for the current position
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Experience {
    /// Whether this is the person's current position.
    pub fn is_current(&self) -> bool {
        self.end_date.is_none()
    }
}

/// Repository trait for profile data access, including the owned
/// education and experience entries.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Find a profile by its owning user.
    async fn find_by_user_id(&self, user_id: i64) -> Result<Option<Profile>, AppError>;

    /// Check whether a user already has a profile.
    async fn exists_for_user(&self, user_id: i64) -> Result<bool, AppError>;

    /// Create a new profile.
    async fn create(&self, profile: &Profile) -> Result<Profile, AppError>;

    /// Update an existing profile.
    async fn update(&self, profile: &Profile) -> Result<Profile, AppError>;

    /// Delete a profile (cascades to education/experience).
    async fn delete(&self, id: i64) -> Result<(), AppError>;

    /// Add an education entry.
    async fn add_education(&self, entry: &Education) -> Result<Education, AppError>;

    /// List education entries for a profile, most recent first.
    async fn list_education(&self, profile_id: i64) -> Result<Vec<Education>, AppError>;

    /// Delete an education entry, scoped to its profile.
    async fn delete_education(&self, profile_id: i64, entry_id: i64) -> Result<(), AppError>;

    /// Add an experience entry.
    async fn add_experience(&self, entry: &Experience) -> Result<Experience, AppError>;

    /// List experience entries for a profile, most recent first.
    async fn list_experience(&self, profile_id: i64) -> Result<Vec<Experience>, AppError>;

    /// Delete an experience entry, scoped to its profile.
    async fn delete_experience(&self, profile_id: i64, entry_id: i64) -> Result<(), AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_experience_is_current() {
        let mut exp = Experience {
            id: 1,
            profile_id: 1,
            company: "Acme".into(),
            title: "Engineer".into(),
            description: None,
            start_date: NaiveDate::from_ymd_opt(2021, 3, 1).unwrap(),
            end_date: None,
            created_at: Utc::now(),
        };
        assert!(exp.is_current());

        exp.end_date = NaiveDate::from_ymd_opt(2023, 6, 30);
        assert!(!exp.is_current());
    }
}
