//! Job Board Handlers
//!
//! Job posts and the application workflow.

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
    ApplyRequest, CreateJobPostRequest, PageParams, UpdateApplicationStatusRequest,
    UpdateJobPostRequest,
};
use crate::application::dto::response::{JobApplicationResponse, JobPostResponse};
use crate::application::services::{
    CreateJobPostFields, JobService, JobServiceImpl, UpdateJobPostFields,
};
use crate::domain::{ApplicationStatus, EmploymentType};
use crate::infrastructure::repositories::{
    PgJobApplicationRepository, PgJobPostRepository, PgNotificationRepository, PgUserRepository,
};
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

fn job_service(state: &AppState) -> impl JobService {
    let post_repo = Arc::new(PgJobPostRepository::new(state.db.clone()));
    let application_repo = Arc::new(PgJobApplicationRepository::new(state.db.clone()));
    let user_repo = Arc::new(PgUserRepository::new(state.db.clone()));
    let notification_repo = Arc::new(PgNotificationRepository::new(state.db.clone()));
    JobServiceImpl::new(
        post_repo,
        application_repo,
        user_repo,
        notification_repo,
        state.snowflake.clone(),
    )
}

/// List open job posts, newest first
pub async fn list_open_posts(
    State(state): State<AppState>,
    Query(page): Query<PageParams>,
) -> Result<Json<Vec<JobPostResponse>>, AppError> {
    let posts = job_service(&state)
        .list_open(page.after_id(), page.clamped_limit())
        .await?;

    Ok(Json(posts.into_iter().map(JobPostResponse::from).collect()))
}

/// Create a job post (employers only)
pub async fn create_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<CreateJobPostRequest>,
) -> Result<impl IntoResponse, AppError> {
    body.validate()
        .map_err(validation_error)?;

    let fields = CreateJobPostFields {
        title: body.title,
        description: body.description,
        company: body.company,
        location: body.location,
        employment_type: body
            .employment_type
            .as_deref()
            .map(EmploymentType::from_str)
            .unwrap_or_default(),
        salary_min: body.salary_min,
        salary_max: body.salary_max,
        remote: body.remote,
    };
    let post = job_service(&state).create_post(auth.user_id, fields).await?;

    Ok((StatusCode::CREATED, Json(JobPostResponse::from(post))))
}

/// Fetch a job post
pub async fn get_post(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<JobPostResponse>, AppError> {
    let job_id = parse_id(&job_id)?;
    let post = job_service(&state).get_post(job_id).await?;

    Ok(Json(JobPostResponse::from(post)))
}

/// Update a job post (owning employer only)
pub async fn update_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(job_id): Path<String>,
    Json(body): Json<UpdateJobPostRequest>,
) -> Result<Json<JobPostResponse>, AppError> {
    body.validate()
        .map_err(validation_error)?;
    let job_id = parse_id(&job_id)?;

    let fields = UpdateJobPostFields {
        title: body.title,
        description: body.description,
        location: body.location,
        employment_type: body.employment_type.as_deref().map(EmploymentType::from_str),
        salary_min: body.salary_min,
        salary_max: body.salary_max,
        remote: body.remote,
        open: body.open,
    };
    let post = job_service(&state)
        .update_post(auth.user_id, job_id, fields)
        .await?;

    Ok(Json(JobPostResponse::from(post)))
}

/// Delete a job post (owning employer only)
pub async fn delete_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let job_id = parse_id(&job_id)?;
    job_service(&state).delete_post(auth.user_id, job_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Apply to an open job post
pub async fn apply(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(job_id): Path<String>,
    Json(body): Json<ApplyRequest>,
) -> Result<impl IntoResponse, AppError> {
    body.validate()
        .map_err(validation_error)?;
    let job_id = parse_id(&job_id)?;

    let application = job_service(&state)
        .apply(auth.user_id, job_id, body.cover_letter, body.resume_url)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(JobApplicationResponse::from(application)),
    ))
}

/// List applications for a job post (owning employer only)
pub async fn list_applications(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(job_id): Path<String>,
) -> Result<Json<Vec<JobApplicationResponse>>, AppError> {
    let job_id = parse_id(&job_id)?;
    let applications = job_service(&state)
        .list_applications(auth.user_id, job_id)
        .await?;

    Ok(Json(
        applications
            .into_iter()
            .map(JobApplicationResponse::from)
            .collect(),
    ))
}

/// Move an application through its statuses (owning employer only)
pub async fn update_application_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(application_id): Path<String>,
    Json(body): Json<UpdateApplicationStatusRequest>,
) -> Result<Json<JobApplicationResponse>, AppError> {
    let application_id = parse_id(&application_id)?;

    let next = match body.status.as_str() {
        "in_review" => ApplicationStatus::InReview,
        "accepted" => ApplicationStatus::Accepted,
        "rejected" => ApplicationStatus::Rejected,
        other => {
            return Err(AppError::BadRequest(format!("Invalid status: {}", other)));
        }
    };

    let application = job_service(&state)
        .update_application_status(auth.user_id, application_id, next)
        .await?;

    Ok(Json(JobApplicationResponse::from(application)))
}

/// Withdraw the caller's own application
pub async fn withdraw_application(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(application_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let application_id = parse_id(&application_id)?;
    job_service(&state)
        .withdraw(auth.user_id, application_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// List the caller's own job posts
pub async fn list_my_posts(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<JobPostResponse>>, AppError> {
    let posts = job_service(&state).list_my_posts(auth.user_id).await?;

    Ok(Json(posts.into_iter().map(JobPostResponse::from).collect()))
}

/// List the caller's own applications
pub async fn list_my_applications(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<JobApplicationResponse>>, AppError> {
    let applications = job_service(&state).list_my_applications(auth.user_id).await?;

    Ok(Json(
        applications
            .into_iter()
            .map(JobApplicationResponse::from)
            .collect(),
    ))
}
