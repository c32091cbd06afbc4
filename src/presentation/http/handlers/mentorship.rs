//! Mentorship Handlers
//!
//! Mentor directory, the request lifecycle, messaging and mentor reviews.

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
    CreateMentorProfileRequest, CreateMentorReviewRequest, CreateMentorshipRequest, PageParams,
    SendMentorshipMessageRequest, UpdateMentorProfileRequest,
};
use crate::application::dto::response::{
    MentorProfileResponse, MentorReviewResponse, MentorshipMessageResponse,
    MentorshipRequestResponse,
};
use crate::application::services::{
    MentorProfileFields, MentorshipService, MentorshipServiceImpl, UpdateMentorProfileFields,
};
use crate::infrastructure::repositories::{
    PgBadgeRepository, PgMentorProfileRepository, PgMentorReviewRepository,
    PgMentorshipMessageRepository, PgMentorshipRequestRepository, PgNotificationRepository,
};
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

fn mentorship_service(state: &AppState) -> impl MentorshipService {
    let profile_repo = Arc::new(PgMentorProfileRepository::new(state.db.clone()));
    let request_repo = Arc::new(PgMentorshipRequestRepository::new(state.db.clone()));
    let message_repo = Arc::new(PgMentorshipMessageRepository::new(state.db.clone()));
    let review_repo = Arc::new(PgMentorReviewRepository::new(state.db.clone()));
    let badge_repo = Arc::new(PgBadgeRepository::new(state.db.clone()));
    let notification_repo = Arc::new(PgNotificationRepository::new(state.db.clone()));
    MentorshipServiceImpl::new(
        profile_repo,
        request_repo,
        message_repo,
        review_repo,
        badge_repo,
        notification_repo,
        state.snowflake.clone(),
    )
}

/// List as a mentor
pub async fn create_mentor_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<CreateMentorProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    body.validate()
        .map_err(validation_error)?;

    let fields = MentorProfileFields {
        headline: body.headline,
        expertise: body.expertise,
        capacity: body.capacity,
        accepting: body.accepting,
    };
    let profile = mentorship_service(&state)
        .create_mentor_profile(auth.user_id, fields)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MentorProfileResponse::from(profile)),
    ))
}

/// Update the caller's mentor profile
pub async fn update_mentor_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<UpdateMentorProfileRequest>,
) -> Result<Json<MentorProfileResponse>, AppError> {
    body.validate()
        .map_err(validation_error)?;

    let fields = UpdateMentorProfileFields {
        headline: body.headline,
        expertise: body.expertise,
        capacity: body.capacity,
        accepting: body.accepting,
    };
    let profile = mentorship_service(&state)
        .update_mentor_profile(auth.user_id, fields)
        .await?;

    Ok(Json(MentorProfileResponse::from(profile)))
}

/// Fetch a mentor profile
pub async fn get_mentor(
    State(state): State<AppState>,
    Path(mentor_id): Path<String>,
) -> Result<Json<MentorProfileResponse>, AppError> {
    let mentor_id = parse_id(&mentor_id)?;
    let profile = mentorship_service(&state).get_mentor(mentor_id).await?;

    Ok(Json(MentorProfileResponse::from(profile)))
}

/// Browse the mentor directory, newest first
pub async fn list_mentors(
    State(state): State<AppState>,
    Query(page): Query<PageParams>,
) -> Result<Json<Vec<MentorProfileResponse>>, AppError> {
    let mentors = mentorship_service(&state)
        .list_mentors(page.after_id(), page.clamped_limit())
        .await?;

    Ok(Json(
        mentors.into_iter().map(MentorProfileResponse::from).collect(),
    ))
}

/// Ask a mentor for mentorship
pub async fn create_request(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(mentor_id): Path<String>,
    Json(body): Json<CreateMentorshipRequest>,
) -> Result<impl IntoResponse, AppError> {
    body.validate()
        .map_err(validation_error)?;
    let mentor_id = parse_id(&mentor_id)?;

    let request = mentorship_service(&state)
        .create_request(auth.user_id, mentor_id, body.message)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MentorshipRequestResponse::from(request)),
    ))
}

/// Accept a pending request (mentor only)
pub async fn accept_request(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(request_id): Path<String>,
) -> Result<Json<MentorshipRequestResponse>, AppError> {
    let request_id = parse_id(&request_id)?;
    let request = mentorship_service(&state)
        .respond_to_request(auth.user_id, request_id, true)
        .await?;

    Ok(Json(MentorshipRequestResponse::from(request)))
}

/// Reject a pending request (mentor only)
pub async fn reject_request(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(request_id): Path<String>,
) -> Result<Json<MentorshipRequestResponse>, AppError> {
    let request_id = parse_id(&request_id)?;
    let request = mentorship_service(&state)
        .respond_to_request(auth.user_id, request_id, false)
        .await?;

    Ok(Json(MentorshipRequestResponse::from(request)))
}

/// Cancel a pending or accepted request (mentee only)
pub async fn cancel_request(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(request_id): Path<String>,
) -> Result<Json<MentorshipRequestResponse>, AppError> {
    let request_id = parse_id(&request_id)?;
    let request = mentorship_service(&state)
        .cancel_request(auth.user_id, request_id)
        .await?;

    Ok(Json(MentorshipRequestResponse::from(request)))
}

/// Mark an accepted mentorship as completed (mentor only)
pub async fn complete_request(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(request_id): Path<String>,
) -> Result<Json<MentorshipRequestResponse>, AppError> {
    let request_id = parse_id(&request_id)?;
    let request = mentorship_service(&state)
        .complete_request(auth.user_id, request_id)
        .await?;

    Ok(Json(MentorshipRequestResponse::from(request)))
}

/// Requests addressed to the caller's mentor profile
pub async fn list_incoming_requests(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<MentorshipRequestResponse>>, AppError> {
    let requests = mentorship_service(&state)
        .list_incoming_requests(auth.user_id)
        .await?;

    Ok(Json(
        requests
            .into_iter()
            .map(MentorshipRequestResponse::from)
            .collect(),
    ))
}

/// Requests the caller has made as a mentee
pub async fn list_outgoing_requests(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<MentorshipRequestResponse>>, AppError> {
    let requests = mentorship_service(&state)
        .list_outgoing_requests(auth.user_id)
        .await?;

    Ok(Json(
        requests
            .into_iter()
            .map(MentorshipRequestResponse::from)
            .collect(),
    ))
}

/// Send a message inside an accepted mentorship
pub async fn send_message(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(request_id): Path<String>,
    Json(body): Json<SendMentorshipMessageRequest>,
) -> Result<impl IntoResponse, AppError> {
    body.validate()
        .map_err(validation_error)?;
    let request_id = parse_id(&request_id)?;

    let message = mentorship_service(&state)
        .send_message(auth.user_id, request_id, body.body)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MentorshipMessageResponse::from(message)),
    ))
}

/// Read a mentorship's messages, oldest first
pub async fn list_messages(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(request_id): Path<String>,
    Query(page): Query<PageParams>,
) -> Result<Json<Vec<MentorshipMessageResponse>>, AppError> {
    let request_id = parse_id(&request_id)?;
    let messages = mentorship_service(&state)
        .list_messages(auth.user_id, request_id, page.after_id(), page.clamped_limit())
        .await?;

    Ok(Json(
        messages
            .into_iter()
            .map(MentorshipMessageResponse::from)
            .collect(),
    ))
}

/// Review a mentor after a completed mentorship
pub async fn create_review(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(mentor_id): Path<String>,
    Json(body): Json<CreateMentorReviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    body.validate()
        .map_err(validation_error)?;
    let mentor_id = parse_id(&mentor_id)?;

    let review = mentorship_service(&state)
        .create_review(auth.user_id, mentor_id, body.rating, body.comment)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MentorReviewResponse::from(review)),
    ))
}

/// List a mentor's reviews, newest first
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(mentor_id): Path<String>,
) -> Result<Json<Vec<MentorReviewResponse>>, AppError> {
    let mentor_id = parse_id(&mentor_id)?;
    let reviews = mentorship_service(&state).list_reviews(mentor_id).await?;

    Ok(Json(
        reviews.into_iter().map(MentorReviewResponse::from).collect(),
    ))
}
