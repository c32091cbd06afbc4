//! Profile Repository Implementation
//!
//! PostgreSQL implementation of the ProfileRepository trait, covering
//! profiles plus their education and experience entries.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use crate::domain::{Education, Experience, Profile, ProfileRepository};
use crate::shared::error::AppError;

/// Database row representation matching the profiles table schema.
#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    id: i64,
    user_id: i64,
    bio: Option<String>,
    location: Option<String>,
    website: Option<String>,
    skills: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProfileRow {
    fn into_profile(self) -> Profile {
        Profile {
            id: self.id,
            user_id: self.user_id,
            bio: self.bio,
            location: self.location,
            website: self.website,
            skills: self.skills,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct EducationRow {
    id: i64,
    profile_id: i64,
    school: String,
    degree: Option<String>,
    field_of_study: Option<String>,
    start_year: i32,
    end_year: Option<i32>,
    created_at: DateTime<Utc>,
}

impl EducationRow {
    fn into_education(self) -> Education {
        Education {
            id: self.id,
            profile_id: self.profile_id,
            school: self.school,
            degree: self.degree,
            field_of_study: self.field_of_study,
            start_year: self.start_year,
            end_year: self.end_year,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ExperienceRow {
    id: i64,
    profile_id: i64,
    company: String,
    title: String,
    description: Option<String>,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
}

impl ExperienceRow {
    fn into_experience(self) -> Experience {
        Experience {
            id: self.id,
            profile_id: self.profile_id,
            company: self.company,
            title: self.title,
            description: self.description,
            start_date: self.start_date,
            end_date: self.end_date,
            created_at: self.created_at,
        }
    }
}

/// PostgreSQL profile repository implementation.
#[derive(Clone)]
pub struct PgProfileRepository {
    pool: PgPool,
}

impl PgProfileRepository {
    /// Create a new PgProfileRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    /// Find a profile by its owning user.
    async fn find_by_user_id(&self, user_id: i64) -> Result<Option<Profile>, AppError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, user_id, bio, location, website, skills, created_at, updated_at
            FROM profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_profile()))
    }

    /// Check whether a user already has a profile.
    async fn exists_for_user(&self, user_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM profiles WHERE user_id = $1)",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }

    /// Create a new profile.
    async fn create(&self, profile: &Profile) -> Result<Profile, AppError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            INSERT INTO profiles (id, user_id, bio, location, website, skills)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, bio, location, website, skills, created_at, updated_at
            "#,
        )
        .bind(profile.id)
        .bind(profile.user_id)
        .bind(&profile.bio)
        .bind(&profile.location)
        .bind(&profile.website)
        .bind(&profile.skills)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("User already has a profile".to_string())
            }
            _ => AppError::Database(e),
        })?;

        Ok(row.into_profile())
    }

    /// Update an existing profile.
    async fn update(&self, profile: &Profile) -> Result<Profile, AppError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            UPDATE profiles
            SET bio = $2,
                location = $3,
                website = $4,
                skills = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, bio, location, website, skills, created_at, updated_at
            "#,
        )
        .bind(profile.id)
        .bind(&profile.bio)
        .bind(&profile.location)
        .bind(&profile.website)
        .bind(&profile.skills)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile with id {} not found", profile.id)))?;

        Ok(row.into_profile())
    }

    /// Delete a profile (cascades to education/experience).
    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Profile with id {} not found",
                id
            )));
        }

        Ok(())
    }

    /// Add an education entry.
    async fn add_education(&self, entry: &Education) -> Result<Education, AppError> {
        let row = sqlx::query_as::<_, EducationRow>(
            r#"
            INSERT INTO education_entries (id, profile_id, school, degree, field_of_study, start_year, end_year)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, profile_id, school, degree, field_of_study, start_year, end_year, created_at
            "#,
        )
        .bind(entry.id)
        .bind(entry.profile_id)
        .bind(&entry.school)
        .bind(&entry.degree)
        .bind(&entry.field_of_study)
        .bind(entry.start_year)
        .bind(entry.end_year)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_education())
    }

    /// List education entries for a profile, most recent first.
    async fn list_education(&self, profile_id: i64) -> Result<Vec<Education>, AppError> {
        let rows = sqlx::query_as::<_, EducationRow>(
            r#"
            SELECT id, profile_id, school, degree, field_of_study, start_year, end_year, created_at
            FROM education_entries
            WHERE profile_id = $1
            ORDER BY start_year DESC, id DESC
            "#,
        )
        .bind(profile_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_education()).collect())
    }

    /// Delete an education entry, scoped to its profile.
    async fn delete_education(&self, profile_id: i64, entry_id: i64) -> Result<(), AppError> {
        let result =
            sqlx::query("DELETE FROM education_entries WHERE id = $1 AND profile_id = $2")
                .bind(entry_id)
                .bind(profile_id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Education entry {} not found",
                entry_id
            )));
        }

        Ok(())
    }

    /// Add an experience entry.
    async fn add_experience(&self, entry: &Experience) -> Result<Experience, AppError> {
        let row = sqlx::query_as::<_, ExperienceRow>(
            r#"
            INSERT INTO experience_entries (id, profile_id, company, title, description, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, profile_id, company, title, description, start_date, end_date, created_at
            "#,
        )
        .bind(entry.id)
        .bind(entry.profile_id)
        .bind(&entry.company)
        .bind(&entry.title)
        .bind(&entry.description)
        .bind(entry.start_date)
        .bind(entry.end_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_experience())
    }

    /// List experience entries for a profile, most recent first.
    async fn list_experience(&self, profile_id: i64) -> Result<Vec<Experience>, AppError> {
        let rows = sqlx::query_as::<_, ExperienceRow>(
            r#"
            SELECT id, profile_id, company, title, description, start_date, end_date, created_at
            FROM experience_entries
            WHERE profile_id = $1
            ORDER BY start_date DESC, id DESC
            "#,
        )
        .bind(profile_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_experience()).collect())
    }

    /// Delete an experience entry, scoped to its profile.
    async fn delete_experience(&self, profile_id: i64, entry_id: i64) -> Result<(), AppError> {
        let result =
            sqlx::query("DELETE FROM experience_entries WHERE id = $1 AND profile_id = $2")
                .bind(entry_id)
                .bind(profile_id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Experience entry {} not found",
                entry_id
            )));
        }

        Ok(())
    }
}

