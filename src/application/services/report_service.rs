//! Report Service
//!
//! Moderation reports: any user may file one against a job post, forum
//! thread, forum comment, workplace review or user; moderators list and
//! close them.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{
    ForumCommentRepository, ForumThreadRepository, JobPostRepository, Report, ReportRepository,
    ReportStatus, ReportTargetType, UserRepository, WorkplaceReviewRepository,
};
use crate::shared::error::AppError;
use crate::shared::snowflake::SnowflakeGenerator;

/// Report service errors
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Report not found")]
    ReportNotFound,

    #[error("Reported target not found")]
    TargetNotFound,

    #[error("Moderator role required")]
    NotModerator,

    #[error("Report is not open")]
    NotOpen,

    #[error("Resolution status must be resolved or dismissed")]
    InvalidResolution,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ReportError> for AppError {
    fn from(e: ReportError) -> Self {
        match e {
            ReportError::ReportNotFound => AppError::NotFound("Report not found".into()),
            ReportError::TargetNotFound => AppError::NotFound("Reported target not found".into()),
            ReportError::NotModerator => AppError::Forbidden("Moderator role required".into()),
            ReportError::NotOpen => AppError::Conflict("Report is not open".into()),
            ReportError::InvalidResolution => {
                AppError::BadRequest("Resolution status must be resolved or dismissed".into())
            }
            ReportError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Report service trait for dependency injection
#[async_trait]
pub trait ReportService: Send + Sync {
    /// File a report against a target.
    async fn create_report(
        &self,
        reporter_id: i64,
        target_type: ReportTargetType,
        target_id: i64,
        reason: String,
    ) -> Result<Report, ReportError>;

    /// List reports, optionally filtered by status (moderator only).
    async fn list_reports(
        &self,
        caller_id: i64,
        status: Option<ReportStatus>,
        after: Option<i64>,
        limit: i32,
    ) -> Result<Vec<Report>, ReportError>;

    /// Close an open report as resolved or dismissed (moderator only).
    async fn resolve_report(
        &self,
        caller_id: i64,
        report_id: i64,
        status: ReportStatus,
        note: Option<String>,
    ) -> Result<Report, ReportError>;
}

/// ReportService implementation
pub struct ReportServiceImpl<R, U, JP, FT, FC, WR>
where
    R: ReportRepository,
    U: UserRepository,
    JP: JobPostRepository,
    FT: ForumThreadRepository,
    FC: ForumCommentRepository,
    WR: WorkplaceReviewRepository,
{
    report_repo: Arc<R>,
    user_repo: Arc<U>,
    job_post_repo: Arc<JP>,
    thread_repo: Arc<FT>,
    comment_repo: Arc<FC>,
    workplace_review_repo: Arc<WR>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<R, U, JP, FT, FC, WR> ReportServiceImpl<R, U, JP, FT, FC, WR>
where
    R: ReportRepository,
    U: UserRepository,
    JP: JobPostRepository,
    FT: ForumThreadRepository,
    FC: ForumCommentRepository,
    WR: WorkplaceReviewRepository,
{
    /// Create a new ReportServiceImpl
    pub fn new(
        report_repo: Arc<R>,
        user_repo: Arc<U>,
        job_post_repo: Arc<JP>,
        thread_repo: Arc<FT>,
        comment_repo: Arc<FC>,
        workplace_review_repo: Arc<WR>,
        id_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            report_repo,
            user_repo,
            job_post_repo,
            thread_repo,
            comment_repo,
            workplace_review_repo,
            id_generator,
        }
    }

    async fn require_moderator(&self, user_id: i64) -> Result<(), ReportError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(|e| ReportError::Internal(e.to_string()))?;

        match user {
            Some(u) if u.is_moderator() => Ok(()),
            _ => Err(ReportError::NotModerator),
        }
    }

    /// Verify the reported record exists before accepting the report.
    async fn target_exists(
        &self,
        target_type: ReportTargetType,
        target_id: i64,
    ) -> Result<bool, ReportError> {
        let found = match target_type {
            ReportTargetType::JobPost => self
                .job_post_repo
                .find_by_id(target_id)
                .await
                .map_err(|e| ReportError::Internal(e.to_string()))?
                .is_some(),
            ReportTargetType::ForumThread => self
                .thread_repo
                .find_by_id(target_id)
                .await
                .map_err(|e| ReportError::Internal(e.to_string()))?
                .is_some(),
            ReportTargetType::ForumComment => self
                .comment_repo
                .find_by_id(target_id)
                .await
                .map_err(|e| ReportError::Internal(e.to_string()))?
                .is_some(),
            ReportTargetType::WorkplaceReview => self
                .workplace_review_repo
                .find_by_id(target_id)
                .await
                .map_err(|e| ReportError::Internal(e.to_string()))?
                .is_some(),
            ReportTargetType::User => self
                .user_repo
                .find_by_id(target_id)
                .await
                .map_err(|e| ReportError::Internal(e.to_string()))?
                .is_some(),
        };

        Ok(found)
    }
}

#[async_trait]
impl<R, U, JP, FT, FC, WR> ReportService for ReportServiceImpl<R, U, JP, FT, FC, WR>
where
    R: ReportRepository + 'static,
    U: UserRepository + 'static,
    JP: JobPostRepository + 'static,
    FT: ForumThreadRepository + 'static,
    FC: ForumCommentRepository + 'static,
    WR: WorkplaceReviewRepository + 'static,
{
    async fn create_report(
        &self,
        reporter_id: i64,
        target_type: ReportTargetType,
        target_id: i64,
        reason: String,
    ) -> Result<Report, ReportError> {
        if !self.target_exists(target_type, target_id).await? {
            return Err(ReportError::TargetNotFound);
        }

        let now = Utc::now();
        let report = Report {
            id: self.id_generator.generate(),
            reporter_id,
            target_type,
            target_id,
            reason,
            status: ReportStatus::Open,
            resolved_by: None,
            resolution_note: None,
            created_at: now,
            updated_at: now,
        };

        self.report_repo
            .create(&report)
            .await
            .map_err(|e| ReportError::Internal(e.to_string()))
    }

    async fn list_reports(
        &self,
        caller_id: i64,
        status: Option<ReportStatus>,
        after: Option<i64>,
        limit: i32,
    ) -> Result<Vec<Report>, ReportError> {
        self.require_moderator(caller_id).await?;

        self.report_repo
            .list(status, after, limit)
            .await
            .map_err(|e| ReportError::Internal(e.to_string()))
    }

    async fn resolve_report(
        &self,
        caller_id: i64,
        report_id: i64,
        status: ReportStatus,
        note: Option<String>,
    ) -> Result<Report, ReportError> {
        self.require_moderator(caller_id).await?;

        if status.is_open() {
            return Err(ReportError::InvalidResolution);
        }

        let report = self
            .report_repo
            .find_by_id(report_id)
            .await
            .map_err(|e| ReportError::Internal(e.to_string()))?
            .ok_or(ReportError::ReportNotFound)?;

        if !report.status.is_open() {
            return Err(ReportError::NotOpen);
        }

        self.report_repo
            .resolve(report_id, status, caller_id, note.as_deref())
            .await
            .map_err(|e| match e {
                AppError::Conflict(_) => ReportError::NotOpen,
                other => ReportError::Internal(other.to_string()),
            })?;

        self.report_repo
            .find_by_id(report_id)
            .await
            .map_err(|e| ReportError::Internal(e.to_string()))?
            .ok_or(ReportError::ReportNotFound)
    }
}

