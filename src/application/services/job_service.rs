//! Job Service
//!
//! Job board business logic: employer posts, candidate applications, and
//! the application status workflow. Writes notifications as side effects.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{
    ApplicationStatus, EmploymentType, JobApplication, JobApplicationRepository, JobPost,
    JobPostRepository, Notification, NotificationKind, NotificationRepository, UserRepository,
};
use crate::shared::error::AppError;
use crate::shared::snowflake::SnowflakeGenerator;

/// Fields for creating a job post
#[derive(Debug)]
pub struct CreateJobPostFields {
    pub title: String,
    pub description: String,
    pub company: String,
    pub location: Option<String>,
    pub employment_type: EmploymentType,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub remote: bool,
}

/// Fields for updating a job post (None = leave unchanged)
#[derive(Debug, Default)]
pub struct UpdateJobPostFields {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<EmploymentType>,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub remote: Option<bool>,
    pub open: Option<bool>,
}

/// Job service errors
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("Job post not found")]
    PostNotFound,

    #[error("Application not found")]
    ApplicationNotFound,

    #[error("Only employer accounts can manage job posts")]
    NotEmployer,

    #[error("Not the owner of this job post")]
    NotOwner,

    #[error("Job post is closed")]
    PostClosed,

    #[error("Already applied to this job")]
    AlreadyApplied,

    #[error("Cannot apply to your own job post")]
    OwnPost,

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },

    #[error("Minimum salary exceeds maximum salary")]
    SalaryRange,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<JobError> for AppError {
    fn from(e: JobError) -> Self {
        match e {
            JobError::PostNotFound => AppError::NotFound("Job post not found".into()),
            JobError::ApplicationNotFound => AppError::NotFound("Application not found".into()),
            JobError::NotEmployer => {
                AppError::Forbidden("Only employer accounts can manage job posts".into())
            }
            JobError::NotOwner => AppError::Forbidden("Not the owner of this job post".into()),
            JobError::PostClosed => AppError::Conflict("Job post is closed".into()),
            JobError::AlreadyApplied => {
                AppError::Conflict("You have already applied to this job".into())
            }
            JobError::OwnPost => AppError::Conflict("Cannot apply to your own job post".into()),
            JobError::InvalidTransition { from, to } => AppError::Conflict(format!(
                "Cannot move application from {} to {}",
                from, to
            )),
            JobError::SalaryRange => {
                AppError::BadRequest("Minimum salary exceeds maximum salary".into())
            }
            JobError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Job service trait for dependency injection
#[async_trait]
pub trait JobService: Send + Sync {
    /// Create a job post on behalf of an employer account.
    async fn create_post(
        &self,
        employer_id: i64,
        fields: CreateJobPostFields,
    ) -> Result<JobPost, JobError>;

    /// Update a job post the employer owns.
    async fn update_post(
        &self,
        employer_id: i64,
        post_id: i64,
        fields: UpdateJobPostFields,
    ) -> Result<JobPost, JobError>;

    /// Delete a job post the employer owns.
    async fn delete_post(&self, employer_id: i64, post_id: i64) -> Result<(), JobError>;

    /// Fetch a single job post.
    async fn get_post(&self, id: i64) -> Result<JobPost, JobError>;

    /// List open posts, newest first.
    async fn list_open(&self, after: Option<i64>, limit: i32) -> Result<Vec<JobPost>, JobError>;

    /// List the employer's own posts.
    async fn list_my_posts(&self, employer_id: i64) -> Result<Vec<JobPost>, JobError>;

    /// Apply to an open job post.
    async fn apply(
        &self,
        applicant_id: i64,
        job_id: i64,
        cover_letter: Option<String>,
        resume_url: Option<String>,
    ) -> Result<JobApplication, JobError>;

    /// Withdraw the caller's application.
    async fn withdraw(&self, applicant_id: i64, application_id: i64) -> Result<(), JobError>;

    /// Employer moves an application through its workflow.
    async fn update_application_status(
        &self,
        employer_id: i64,
        application_id: i64,
        next: ApplicationStatus,
    ) -> Result<JobApplication, JobError>;

    /// List applications on a post the employer owns.
    async fn list_applications(
        &self,
        employer_id: i64,
        job_id: i64,
    ) -> Result<Vec<JobApplication>, JobError>;

    /// List the caller's own applications.
    async fn list_my_applications(
        &self,
        applicant_id: i64,
    ) -> Result<Vec<JobApplication>, JobError>;
}

/// JobService implementation
pub struct JobServiceImpl<JP, JA, U, N>
where
    JP: JobPostRepository,
    JA: JobApplicationRepository,
    U: UserRepository,
    N: NotificationRepository,
{
    post_repo: Arc<JP>,
    application_repo: Arc<JA>,
    user_repo: Arc<U>,
    notification_repo: Arc<N>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<JP, JA, U, N> JobServiceImpl<JP, JA, U, N>
where
    JP: JobPostRepository,
    JA: JobApplicationRepository,
    U: UserRepository,
    N: NotificationRepository,
{
    /// Create a new JobServiceImpl
    pub fn new(
        post_repo: Arc<JP>,
        application_repo: Arc<JA>,
        user_repo: Arc<U>,
        notification_repo: Arc<N>,
        id_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            post_repo,
            application_repo,
            user_repo,
            notification_repo,
            id_generator,
        }
    }

    /// Require the caller to be an employer account.
    async fn require_employer(&self, user_id: i64) -> Result<(), JobError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(|e| JobError::Internal(e.to_string()))?
            .ok_or(JobError::NotEmployer)?;

        if !user.is_employer() {
            return Err(JobError::NotEmployer);
        }
        Ok(())
    }

    /// Fetch a post and verify the caller owns it.
    async fn owned_post(&self, employer_id: i64, post_id: i64) -> Result<JobPost, JobError> {
        let post = self
            .post_repo
            .find_by_id(post_id)
            .await
            .map_err(|e| JobError::Internal(e.to_string()))?
            .ok_or(JobError::PostNotFound)?;

        if post.employer_id != employer_id {
            return Err(JobError::NotOwner);
        }
        Ok(post)
    }

    fn check_salary_range(min: Option<i32>, max: Option<i32>) -> Result<(), JobError> {
        if let (Some(lo), Some(hi)) = (min, max) {
            if lo > hi {
                return Err(JobError::SalaryRange);
            }
        }
        Ok(())
    }

    /// Notification writes are best effort; failures are logged, not raised.
    async fn notify(&self, user_id: i64, kind: NotificationKind, body: String, resource_id: i64) {
        let notification = Notification {
            id: self.id_generator.generate(),
            user_id,
            kind,
            body,
            resource_id: Some(resource_id),
            read_at: None,
            created_at: Utc::now(),
        };
        if let Err(e) = self.notification_repo.create(&notification).await {
            tracing::warn!(user_id, %kind, "Failed to write notification: {}", e);
        }
    }
}

#[async_trait]
impl<JP, JA, U, N> JobService for JobServiceImpl<JP, JA, U, N>
where
    JP: JobPostRepository + 'static,
    JA: JobApplicationRepository + 'static,
    U: UserRepository + 'static,
    N: NotificationRepository + 'static,
{
    async fn create_post(
        &self,
        employer_id: i64,
        fields: CreateJobPostFields,
    ) -> Result<JobPost, JobError> {
        self.require_employer(employer_id).await?;
        Self::check_salary_range(fields.salary_min, fields.salary_max)?;

        let now = Utc::now();
        let post = JobPost {
            id: self.id_generator.generate(),
            employer_id,
            title: fields.title,
            description: fields.description,
            company: fields.company,
            location: fields.location,
            employment_type: fields.employment_type,
            salary_min: fields.salary_min,
            salary_max: fields.salary_max,
            remote: fields.remote,
            open: true,
            created_at: now,
            updated_at: now,
        };

        self.post_repo
            .create(&post)
            .await
            .map_err(|e| JobError::Internal(e.to_string()))
    }

    async fn update_post(
        &self,
        employer_id: i64,
        post_id: i64,
        fields: UpdateJobPostFields,
    ) -> Result<JobPost, JobError> {
        let mut post = self.owned_post(employer_id, post_id).await?;

        if let Some(title) = fields.title {
            post.title = title;
        }
        if let Some(description) = fields.description {
            post.description = description;
        }
        if let Some(location) = fields.location {
            post.location = Some(location);
        }
        if let Some(employment_type) = fields.employment_type {
            post.employment_type = employment_type;
        }
        if let Some(salary_min) = fields.salary_min {
            post.salary_min = Some(salary_min);
        }
        if let Some(salary_max) = fields.salary_max {
            post.salary_max = Some(salary_max);
        }
        if let Some(remote) = fields.remote {
            post.remote = remote;
        }
        if let Some(open) = fields.open {
            post.open = open;
        }

        Self::check_salary_range(post.salary_min, post.salary_max)?;

        self.post_repo
            .update(&post)
            .await
            .map_err(|e| JobError::Internal(e.to_string()))
    }

    async fn delete_post(&self, employer_id: i64, post_id: i64) -> Result<(), JobError> {
        self.owned_post(employer_id, post_id).await?;

        self.post_repo
            .delete(post_id)
            .await
            .map_err(|e| JobError::Internal(e.to_string()))
    }

    async fn get_post(&self, id: i64) -> Result<JobPost, JobError> {
        self.post_repo
            .find_by_id(id)
            .await
            .map_err(|e| JobError::Internal(e.to_string()))?
            .ok_or(JobError::PostNotFound)
    }

    async fn list_open(&self, after: Option<i64>, limit: i32) -> Result<Vec<JobPost>, JobError> {
        self.post_repo
            .list_open(after, limit)
            .await
            .map_err(|e| JobError::Internal(e.to_string()))
    }

    async fn list_my_posts(&self, employer_id: i64) -> Result<Vec<JobPost>, JobError> {
        self.post_repo
            .list_by_employer(employer_id)
            .await
            .map_err(|e| JobError::Internal(e.to_string()))
    }

    async fn apply(
        &self,
        applicant_id: i64,
        job_id: i64,
        cover_letter: Option<String>,
        resume_url: Option<String>,
    ) -> Result<JobApplication, JobError> {
        let post = self.get_post(job_id).await?;

        if !post.accepts_applications() {
            return Err(JobError::PostClosed);
        }
        if post.employer_id == applicant_id {
            return Err(JobError::OwnPost);
        }

        let existing = self
            .application_repo
            .find_by_job_and_applicant(job_id, applicant_id)
            .await
            .map_err(|e| JobError::Internal(e.to_string()))?;
        if existing.is_some() {
            return Err(JobError::AlreadyApplied);
        }

        let now = Utc::now();
        let application = JobApplication {
            id: self.id_generator.generate(),
            job_id,
            applicant_id,
            cover_letter,
            resume_url,
            status: ApplicationStatus::Submitted,
            created_at: now,
            updated_at: now,
        };

        let created = self
            .application_repo
            .create(&application)
            .await
            .map_err(|e| match e {
                AppError::Conflict(_) => JobError::AlreadyApplied,
                other => JobError::Internal(other.to_string()),
            })?;

        self.notify(
            post.employer_id,
            NotificationKind::ApplicationReceived,
            format!("New application for \"{}\"", post.title),
            created.id,
        )
        .await;

        Ok(created)
    }

    async fn withdraw(&self, applicant_id: i64, application_id: i64) -> Result<(), JobError> {
        let application = self
            .application_repo
            .find_by_id(application_id)
            .await
            .map_err(|e| JobError::Internal(e.to_string()))?
            .ok_or(JobError::ApplicationNotFound)?;

        if application.applicant_id != applicant_id {
            return Err(JobError::ApplicationNotFound);
        }
        if application.status.is_terminal() {
            return Err(JobError::InvalidTransition {
                from: application.status,
                to: ApplicationStatus::Withdrawn,
            });
        }

        self.application_repo
            .update_status(application_id, ApplicationStatus::Withdrawn)
            .await
            .map_err(|e| JobError::Internal(e.to_string()))
    }

    async fn update_application_status(
        &self,
        employer_id: i64,
        application_id: i64,
        next: ApplicationStatus,
    ) -> Result<JobApplication, JobError> {
        let application = self
            .application_repo
            .find_by_id(application_id)
            .await
            .map_err(|e| JobError::Internal(e.to_string()))?
            .ok_or(JobError::ApplicationNotFound)?;

        let post = self.owned_post(employer_id, application.job_id).await?;

        if !application.status.employer_can_move_to(next) {
            return Err(JobError::InvalidTransition {
                from: application.status,
                to: next,
            });
        }

        self.application_repo
            .update_status(application_id, next)
            .await
            .map_err(|e| JobError::Internal(e.to_string()))?;

        self.notify(
            application.applicant_id,
            NotificationKind::ApplicationUpdate,
            format!("Your application for \"{}\" is now {}", post.title, next),
            application.id,
        )
        .await;

        let mut updated = application;
        updated.status = next;
        Ok(updated)
    }

    async fn list_applications(
        &self,
        employer_id: i64,
        job_id: i64,
    ) -> Result<Vec<JobApplication>, JobError> {
        self.owned_post(employer_id, job_id).await?;

        self.application_repo
            .list_by_job(job_id)
            .await
            .map_err(|e| JobError::Internal(e.to_string()))
    }

    async fn list_my_applications(
        &self,
        applicant_id: i64,
    ) -> Result<Vec<JobApplication>, JobError> {
        self.application_repo
            .list_by_applicant(applicant_id)
            .await
            .map_err(|e| JobError::Internal(e.to_string()))
    }
}

