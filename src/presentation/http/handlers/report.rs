//! Moderation Report Handlers
//!
//! Filing reports and the moderator queue.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use std::sync::Arc;
use validator::Validate;

use super::parse_id;
use crate::application::dto::request::{
    CreateReportRequest, ReportQueryParams, ResolveReportRequest,
};
use crate::application::dto::response::ReportResponse;
use crate::application::services::{ReportService, ReportServiceImpl};
use crate::domain::{ReportStatus, ReportTargetType};
use crate::infrastructure::repositories::{
    PgForumCommentRepository, PgForumThreadRepository, PgJobPostRepository, PgReportRepository,
    PgUserRepository, PgWorkplaceReviewRepository,
};
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

fn report_service(state: &AppState) -> impl ReportService {
    let report_repo = Arc::new(PgReportRepository::new(state.db.clone()));
    let user_repo = Arc::new(PgUserRepository::new(state.db.clone()));
    let job_post_repo = Arc::new(PgJobPostRepository::new(state.db.clone()));
    let thread_repo = Arc::new(PgForumThreadRepository::new(state.db.clone()));
    let comment_repo = Arc::new(PgForumCommentRepository::new(state.db.clone()));
    let workplace_review_repo = Arc::new(PgWorkplaceReviewRepository::new(state.db.clone()));
    ReportServiceImpl::new(
        report_repo,
        user_repo,
        job_post_repo,
        thread_repo,
        comment_repo,
        workplace_review_repo,
        state.snowflake.clone(),
    )
}

/// File a report against a piece of content or a user
pub async fn create_report(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<CreateReportRequest>,
) -> Result<impl IntoResponse, AppError> {
    body.validate()
        .map_err(validation_error)?;

    let target_type = ReportTargetType::from_str(&body.target_type).ok_or_else(|| {
        AppError::BadRequest(format!("Invalid target type: {}", body.target_type))
    })?;
    let target_id = parse_id(&body.target_id)?;

    let report = report_service(&state)
        .create_report(auth.user_id, target_type, target_id, body.reason)
        .await?;

    Ok((StatusCode::CREATED, Json(ReportResponse::from(report))))
}

/// List reports, optionally filtered by status (moderator only)
pub async fn list_reports(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<ReportQueryParams>,
) -> Result<Json<Vec<ReportResponse>>, AppError> {
    let status = query.status.as_deref().map(ReportStatus::from_str);
    let after = query.after.as_deref().and_then(|s| s.parse::<i64>().ok());
    let limit = query.limit.unwrap_or(20).clamp(1, 100);

    let reports = report_service(&state)
        .list_reports(auth.user_id, status, after, limit)
        .await?;

    Ok(Json(reports.into_iter().map(ReportResponse::from).collect()))
}

/// Close an open report as resolved or dismissed (moderator only)
pub async fn resolve_report(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(report_id): Path<String>,
    Json(body): Json<ResolveReportRequest>,
) -> Result<Json<ReportResponse>, AppError> {
    body.validate()
        .map_err(validation_error)?;
    let report_id = parse_id(&report_id)?;

    let status = match body.status.as_str() {
        "resolved" => ReportStatus::Resolved,
        "dismissed" => ReportStatus::Dismissed,
        other => {
            return Err(AppError::BadRequest(format!(
                "Invalid resolution status: {}",
                other
            )));
        }
    };

    let report = report_service(&state)
        .resolve_report(auth.user_id, report_id, status, body.note)
        .await?;

    Ok(Json(ReportResponse::from(report)))
}
