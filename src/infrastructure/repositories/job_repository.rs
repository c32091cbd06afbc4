//! Job Repository Implementations
//!
//! PostgreSQL implementations of the JobPostRepository and
//! JobApplicationRepository traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{
    ApplicationStatus, EmploymentType, JobApplication, JobApplicationRepository, JobPost,
    JobPostRepository,
};
use crate::shared::error::AppError;

/// Database row representation matching the job_posts table schema.
#[derive(Debug, sqlx::FromRow)]
struct JobPostRow {
    id: i64,
    employer_id: i64,
    title: String,
    description: String,
    company: String,
    location: Option<String>,
    employment_type: String,
    salary_min: Option<i32>,
    salary_max: Option<i32>,
    remote: bool,
    open: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl JobPostRow {
    fn into_job_post(self) -> JobPost {
        JobPost {
            id: self.id,
            employer_id: self.employer_id,
            title: self.title,
            description: self.description,
            company: self.company,
            location: self.location,
            employment_type: EmploymentType::from_str(&self.employment_type),
            salary_min: self.salary_min,
            salary_max: self.salary_max,
            remote: self.remote,
            open: self.open,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Database row representation matching the job_applications table schema.
#[derive(Debug, sqlx::FromRow)]
struct JobApplicationRow {
    id: i64,
    job_id: i64,
    applicant_id: i64,
    cover_letter: Option<String>,
    resume_url: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl JobApplicationRow {
    fn into_application(self) -> JobApplication {
        JobApplication {
            id: self.id,
            job_id: self.job_id,
            applicant_id: self.applicant_id,
            cover_letter: self.cover_letter,
            resume_url: self.resume_url,
            status: ApplicationStatus::from_str(&self.status),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// PostgreSQL job post repository implementation.
#[derive(Clone)]
pub struct PgJobPostRepository {
    pool: PgPool,
}

impl PgJobPostRepository {
    /// Create a new PgJobPostRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobPostRepository for PgJobPostRepository {
    /// Find a job post by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<JobPost>, AppError> {
        let row = sqlx::query_as::<_, JobPostRow>(
            r#"
            SELECT id, employer_id, title, description, company, location, employment_type,
                   salary_min, salary_max, remote, open, created_at, updated_at
            FROM job_posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_job_post()))
    }

    /// List open posts with keyset pagination, newest first.
    async fn list_open(&self, after: Option<i64>, limit: i32) -> Result<Vec<JobPost>, AppError> {
        let rows = sqlx::query_as::<_, JobPostRow>(
            r#"
            SELECT id, employer_id, title, description, company, location, employment_type,
                   salary_min, salary_max, remote, open, created_at, updated_at
            FROM job_posts
            WHERE open = TRUE AND ($1::BIGINT IS NULL OR id < $1)
            ORDER BY id DESC
            LIMIT $2
            "#,
        )
        .bind(after)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_job_post()).collect())
    }

    /// List all posts belonging to an employer, newest first.
    async fn list_by_employer(&self, employer_id: i64) -> Result<Vec<JobPost>, AppError> {
        let rows = sqlx::query_as::<_, JobPostRow>(
            r#"
            SELECT id, employer_id, title, description, company, location, employment_type,
                   salary_min, salary_max, remote, open, created_at, updated_at
            FROM job_posts
            WHERE employer_id = $1
            ORDER BY id DESC
            "#,
        )
        .bind(employer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_job_post()).collect())
    }

    /// Create a new job post.
    async fn create(&self, post: &JobPost) -> Result<JobPost, AppError> {
        let row = sqlx::query_as::<_, JobPostRow>(
            r#"
            INSERT INTO job_posts (
                id, employer_id, title, description, company, location, employment_type,
                salary_min, salary_max, remote, open
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, employer_id, title, description, company, location, employment_type,
                      salary_min, salary_max, remote, open, created_at, updated_at
            "#,
        )
        .bind(post.id)
        .bind(post.employer_id)
        .bind(&post.title)
        .bind(&post.description)
        .bind(&post.company)
        .bind(&post.location)
        .bind(post.employment_type.as_str())
        .bind(post.salary_min)
        .bind(post.salary_max)
        .bind(post.remote)
        .bind(post.open)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_job_post())
    }

    /// Update an existing job post.
    async fn update(&self, post: &JobPost) -> Result<JobPost, AppError> {
        let row = sqlx::query_as::<_, JobPostRow>(
            r#"
            UPDATE job_posts
            SET title = $2,
                description = $3,
                company = $4,
                location = $5,
                employment_type = $6,
                salary_min = $7,
                salary_max = $8,
                remote = $9,
                open = $10,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, employer_id, title, description, company, location, employment_type,
                      salary_min, salary_max, remote, open, created_at, updated_at
            "#,
        )
        .bind(post.id)
        .bind(&post.title)
        .bind(&post.description)
        .bind(&post.company)
        .bind(&post.location)
        .bind(post.employment_type.as_str())
        .bind(post.salary_min)
        .bind(post.salary_max)
        .bind(post.remote)
        .bind(post.open)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job post with id {} not found", post.id)))?;

        Ok(row.into_job_post())
    }

    /// Delete a job post.
    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM job_posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Job post with id {} not found",
                id
            )));
        }

        Ok(())
    }
}

/// PostgreSQL job application repository implementation.
#[derive(Clone)]
pub struct PgJobApplicationRepository {
    pool: PgPool,
}

impl PgJobApplicationRepository {
    /// Create a new PgJobApplicationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobApplicationRepository for PgJobApplicationRepository {
    /// Find an application by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<JobApplication>, AppError> {
        let row = sqlx::query_as::<_, JobApplicationRow>(
            r#"
            SELECT id, job_id, applicant_id, cover_letter, resume_url, status,
                   created_at, updated_at
            FROM job_applications
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_application()))
    }

    /// Find the unique application for a (job, applicant) pair.
    async fn find_by_job_and_applicant(
        &self,
        job_id: i64,
        applicant_id: i64,
    ) -> Result<Option<JobApplication>, AppError> {
        let row = sqlx::query_as::<_, JobApplicationRow>(
            r#"
            SELECT id, job_id, applicant_id, cover_letter, resume_url, status,
                   created_at, updated_at
            FROM job_applications
            WHERE job_id = $1 AND applicant_id = $2
            "#,
        )
        .bind(job_id)
        .bind(applicant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_application()))
    }

    /// List applications for a job post, oldest first.
    async fn list_by_job(&self, job_id: i64) -> Result<Vec<JobApplication>, AppError> {
        let rows = sqlx::query_as::<_, JobApplicationRow>(
            r#"
            SELECT id, job_id, applicant_id, cover_letter, resume_url, status,
                   created_at, updated_at
            FROM job_applications
            WHERE job_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_application()).collect())
    }

    /// List a user's applications, newest first.
    async fn list_by_applicant(
        &self,
        applicant_id: i64,
    ) -> Result<Vec<JobApplication>, AppError> {
        let rows = sqlx::query_as::<_, JobApplicationRow>(
            r#"
            SELECT id, job_id, applicant_id, cover_letter, resume_url, status,
                   created_at, updated_at
            FROM job_applications
            WHERE applicant_id = $1
            ORDER BY id DESC
            "#,
        )
        .bind(applicant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_application()).collect())
    }

    /// Create a new application.
    async fn create(&self, application: &JobApplication) -> Result<JobApplication, AppError> {
        let row = sqlx::query_as::<_, JobApplicationRow>(
            r#"
            INSERT INTO job_applications (id, job_id, applicant_id, cover_letter, resume_url, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, job_id, applicant_id, cover_letter, resume_url, status,
                      created_at, updated_at
            "#,
        )
        .bind(application.id)
        .bind(application.job_id)
        .bind(application.applicant_id)
        .bind(&application.cover_letter)
        .bind(&application.resume_url)
        .bind(application.status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("You have already applied to this job".to_string())
            }
            _ => AppError::Database(e),
        })?;

        Ok(row.into_application())
    }

    /// Update an application's status.
    async fn update_status(&self, id: i64, status: ApplicationStatus) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE job_applications SET status = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(status.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Application with id {} not found",
                id
            )));
        }

        Ok(())
    }
}

