//! User Service
//!
//! Account and professional profile management, including the education
//! and experience entries hanging off a profile.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{
    Education, Experience, Profile, ProfileRepository, User, UserRepository,
};
use crate::shared::error::AppError;
use crate::shared::snowflake::SnowflakeGenerator;

/// Fields a user may change on their own account
#[derive(Debug, Default)]
pub struct UpdateUserFields {
    pub full_name: Option<String>,
    pub headline: Option<String>,
    pub avatar_url: Option<String>,
}

/// Fields for creating or replacing a profile
#[derive(Debug, Default)]
pub struct ProfileFields {
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub skills: Vec<String>,
}

/// User service errors
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("User not found")]
    UserNotFound,

    #[error("Profile not found")]
    ProfileNotFound,

    #[error("Entry not found")]
    EntryNotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<UserError> for AppError {
    fn from(e: UserError) -> Self {
        match e {
            UserError::UserNotFound => AppError::NotFound("User not found".into()),
            UserError::ProfileNotFound => AppError::NotFound("Profile not found".into()),
            UserError::EntryNotFound => AppError::NotFound("Entry not found".into()),
            UserError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<AppError> for UserError {
    fn from(e: AppError) -> Self {
        match e {
            AppError::NotFound(_) => UserError::EntryNotFound,
            other => UserError::Internal(other.to_string()),
        }
    }
}

/// User service trait for dependency injection
#[async_trait]
pub trait UserService: Send + Sync {
    /// Fetch a user by ID.
    async fn get_user(&self, id: i64) -> Result<User, UserError>;

    /// Update the caller's account fields.
    async fn update_user(&self, id: i64, fields: UpdateUserFields) -> Result<User, UserError>;

    /// Fetch a user's profile with education and experience.
    async fn get_profile(
        &self,
        user_id: i64,
    ) -> Result<(Profile, Vec<Education>, Vec<Experience>), UserError>;

    /// Create or replace the caller's profile.
    async fn upsert_profile(
        &self,
        user_id: i64,
        fields: ProfileFields,
    ) -> Result<Profile, UserError>;

    /// Add an education entry to the caller's profile.
    async fn add_education(
        &self,
        user_id: i64,
        school: String,
        degree: Option<String>,
        field_of_study: Option<String>,
        start_year: i32,
        end_year: Option<i32>,
    ) -> Result<Education, UserError>;

    /// Remove an education entry from the caller's profile.
    async fn delete_education(&self, user_id: i64, entry_id: i64) -> Result<(), UserError>;

    /// Add an experience entry to the caller's profile.
    async fn add_experience(
        &self,
        user_id: i64,
        company: String,
        title: String,
        description: Option<String>,
        start_date: chrono::NaiveDate,
        end_date: Option<chrono::NaiveDate>,
    ) -> Result<Experience, UserError>;

    /// Remove an experience entry from the caller's profile.
    async fn delete_experience(&self, user_id: i64, entry_id: i64) -> Result<(), UserError>;
}

/// UserService implementation
pub struct UserServiceImpl<U, P>
where
    U: UserRepository,
    P: ProfileRepository,
{
    user_repo: Arc<U>,
    profile_repo: Arc<P>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<U, P> UserServiceImpl<U, P>
where
    U: UserRepository,
    P: ProfileRepository,
{
    /// Create a new UserServiceImpl
    pub fn new(user_repo: Arc<U>, profile_repo: Arc<P>, id_generator: Arc<SnowflakeGenerator>) -> Self {
        Self {
            user_repo,
            profile_repo,
            id_generator,
        }
    }

    /// Fetch the caller's profile or fail.
    async fn require_profile(&self, user_id: i64) -> Result<Profile, UserError> {
        self.profile_repo
            .find_by_user_id(user_id)
            .await
            .map_err(|e| UserError::Internal(e.to_string()))?
            .ok_or(UserError::ProfileNotFound)
    }
}

#[async_trait]
impl<U, P> UserService for UserServiceImpl<U, P>
where
    U: UserRepository + 'static,
    P: ProfileRepository + 'static,
{
    async fn get_user(&self, id: i64) -> Result<User, UserError> {
        self.user_repo
            .find_by_id(id)
            .await
            .map_err(|e| UserError::Internal(e.to_string()))?
            .ok_or(UserError::UserNotFound)
    }

    async fn update_user(&self, id: i64, fields: UpdateUserFields) -> Result<User, UserError> {
        let mut user = self.get_user(id).await?;

        if let Some(full_name) = fields.full_name {
            user.full_name = Some(full_name);
        }
        if let Some(headline) = fields.headline {
            user.headline = Some(headline);
        }
        if let Some(avatar_url) = fields.avatar_url {
            user.avatar_url = Some(avatar_url);
        }

        self.user_repo
            .update(&user)
            .await
            .map_err(|e| UserError::Internal(e.to_string()))
    }

    async fn get_profile(
        &self,
        user_id: i64,
    ) -> Result<(Profile, Vec<Education>, Vec<Experience>), UserError> {
        let profile = self.require_profile(user_id).await?;

        let education = self
            .profile_repo
            .list_education(profile.id)
            .await
            .map_err(|e| UserError::Internal(e.to_string()))?;
        let experience = self
            .profile_repo
            .list_experience(profile.id)
            .await
            .map_err(|e| UserError::Internal(e.to_string()))?;

        Ok((profile, education, experience))
    }

    async fn upsert_profile(
        &self,
        user_id: i64,
        fields: ProfileFields,
    ) -> Result<Profile, UserError> {
        // Replace semantics: an existing profile keeps its ID and entries
        let existing = self
            .profile_repo
            .find_by_user_id(user_id)
            .await
            .map_err(|e| UserError::Internal(e.to_string()))?;

        let now = Utc::now();
        match existing {
            Some(mut profile) => {
                profile.bio = fields.bio;
                profile.location = fields.location;
                profile.website = fields.website;
                profile.skills = fields.skills;
                self.profile_repo
                    .update(&profile)
                    .await
                    .map_err(|e| UserError::Internal(e.to_string()))
            }
            None => {
                let profile = Profile {
                    id: self.id_generator.generate(),
                    user_id,
                    bio: fields.bio,
                    location: fields.location,
                    website: fields.website,
                    skills: fields.skills,
                    created_at: now,
                    updated_at: now,
                };
                self.profile_repo
                    .create(&profile)
                    .await
                    .map_err(|e| UserError::Internal(e.to_string()))
            }
        }
    }

    async fn add_education(
        &self,
        user_id: i64,
        school: String,
        degree: Option<String>,
        field_of_study: Option<String>,
        start_year: i32,
        end_year: Option<i32>,
    ) -> Result<Education, UserError> {
        let profile = self.require_profile(user_id).await?;

        let entry = Education {
            id: self.id_generator.generate(),
            profile_id: profile.id,
            school,
            degree,
            field_of_study,
            start_year,
            end_year,
            created_at: Utc::now(),
        };

        self.profile_repo
            .add_education(&entry)
            .await
            .map_err(|e| UserError::Internal(e.to_string()))
    }

    async fn delete_education(&self, user_id: i64, entry_id: i64) -> Result<(), UserError> {
        let profile = self.require_profile(user_id).await?;

        self.profile_repo
            .delete_education(profile.id, entry_id)
            .await
            .map_err(UserError::from)
    }

    async fn add_experience(
        &self,
        user_id: i64,
        company: String,
        title: String,
        description: Option<String>,
        start_date: chrono::NaiveDate,
        end_date: Option<chrono::NaiveDate>,
    ) -> Result<Experience, UserError> {
        let profile = self.require_profile(user_id).await?;

        let entry = Experience {
            id: self.id_generator.generate(),
            profile_id: profile.id,
            company,
            title,
            description,
            start_date,
            end_date,
            created_at: Utc::now(),
        };

        self.profile_repo
            .add_experience(&entry)
            .await
            .map_err(|e| UserError::Internal(e.to_string()))
    }

    async fn delete_experience(&self, user_id: i64, entry_id: i64) -> Result<(), UserError> {
        let profile = self.require_profile(user_id).await?;

        self.profile_repo
            .delete_experience(profile.id, entry_id)
            .await
            .map_err(UserError::from)
    }
}

