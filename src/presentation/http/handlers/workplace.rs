//! Workplace Handlers
//!
//! Workplace directory, reviews and employer replies.

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
    CreateWorkplaceRequest, CreateWorkplaceReviewRequest, PageParams, ReviewReplyRequest,
};
use crate::application::dto::response::{WorkplaceResponse, WorkplaceReviewResponse};
use crate::application::services::{WorkplaceService, WorkplaceServiceImpl};
use crate::domain::PolicyTag;
use crate::infrastructure::repositories::{
    PgBadgeRepository, PgNotificationRepository, PgUserRepository, PgWorkplaceRepository,
    PgWorkplaceReviewRepository,
};
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

fn workplace_service(state: &AppState) -> impl WorkplaceService {
    let workplace_repo = Arc::new(PgWorkplaceRepository::new(state.db.clone()));
    let review_repo = Arc::new(PgWorkplaceReviewRepository::new(state.db.clone()));
    let user_repo = Arc::new(PgUserRepository::new(state.db.clone()));
    let badge_repo = Arc::new(PgBadgeRepository::new(state.db.clone()));
    let notification_repo = Arc::new(PgNotificationRepository::new(state.db.clone()));
    WorkplaceServiceImpl::new(
        workplace_repo,
        review_repo,
        user_repo,
        badge_repo,
        notification_repo,
        state.snowflake.clone(),
    )
}

/// Register a workplace
pub async fn create_workplace(
    State(state): State<AppState>,
    Json(body): Json<CreateWorkplaceRequest>,
) -> Result<impl IntoResponse, AppError> {
    body.validate()
        .map_err(validation_error)?;

    let workplace = workplace_service(&state)
        .create_workplace(body.name, body.website, body.industry)
        .await?;

    Ok((StatusCode::CREATED, Json(WorkplaceResponse::from(workplace))))
}

/// Fetch a workplace
pub async fn get_workplace(
    State(state): State<AppState>,
    Path(workplace_id): Path<String>,
) -> Result<Json<WorkplaceResponse>, AppError> {
    let workplace_id = parse_id(&workplace_id)?;
    let workplace = workplace_service(&state).get_workplace(workplace_id).await?;

    Ok(Json(WorkplaceResponse::from(workplace)))
}

/// Browse workplaces, newest first
pub async fn list_workplaces(
    State(state): State<AppState>,
    Query(page): Query<PageParams>,
) -> Result<Json<Vec<WorkplaceResponse>>, AppError> {
    let workplaces = workplace_service(&state)
        .list_workplaces(page.after_id(), page.clamped_limit())
        .await?;

    Ok(Json(
        workplaces.into_iter().map(WorkplaceResponse::from).collect(),
    ))
}

/// Review a workplace
pub async fn create_review(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(workplace_id): Path<String>,
    Json(body): Json<CreateWorkplaceReviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    body.validate()
        .map_err(validation_error)?;
    let workplace_id = parse_id(&workplace_id)?;

    let mut policy_tags = Vec::with_capacity(body.policy_tags.len());
    for tag in &body.policy_tags {
        let parsed = PolicyTag::from_str(tag)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown policy tag: {}", tag)))?;
        if !policy_tags.contains(&parsed) {
            policy_tags.push(parsed);
        }
    }

    let review = workplace_service(&state)
        .create_review(
            auth.user_id,
            workplace_id,
            body.rating,
            body.title,
            body.body,
            policy_tags,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(WorkplaceReviewResponse::from(review)),
    ))
}

/// List a workplace's reviews, newest first
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(workplace_id): Path<String>,
    Query(page): Query<PageParams>,
) -> Result<Json<Vec<WorkplaceReviewResponse>>, AppError> {
    let workplace_id = parse_id(&workplace_id)?;
    let reviews = workplace_service(&state)
        .list_reviews(workplace_id, page.after_id(), page.clamped_limit())
        .await?;

    Ok(Json(
        reviews
            .into_iter()
            .map(WorkplaceReviewResponse::from)
            .collect(),
    ))
}

/// Delete a review (author or moderator only)
pub async fn delete_review(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(review_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let review_id = parse_id(&review_id)?;
    workplace_service(&state)
        .delete_review(auth.user_id, review_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Attach the single employer reply to a review
pub async fn reply_to_review(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(review_id): Path<String>,
    Json(body): Json<ReviewReplyRequest>,
) -> Result<Json<WorkplaceReviewResponse>, AppError> {
    body.validate()
        .map_err(validation_error)?;
    let review_id = parse_id(&review_id)?;

    let review = workplace_service(&state)
        .reply_to_review(auth.user_id, review_id, body.body)
        .await?;

    Ok(Json(WorkplaceReviewResponse::from(review)))
}
