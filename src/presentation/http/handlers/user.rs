//! User and Profile Handlers
//!
//! Account management, professional profiles and badge listings.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use std::sync::Arc;
use validator::Validate;

use super::parse_id;
use crate::application::dto::request::{
    AddEducationRequest, AddExperienceRequest, UpdateUserRequest, UpsertProfileRequest,
};
use crate::application::dto::response::{
    BadgeResponse, EducationResponse, ExperienceResponse, ProfileResponse, UserResponse,
};
use crate::application::services::{
    BadgeService, BadgeServiceImpl, ProfileFields, UpdateUserFields, UserService, UserServiceImpl,
};
use crate::infrastructure::repositories::{
    PgBadgeRepository, PgProfileRepository, PgUserRepository,
};
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

fn user_service(state: &AppState) -> impl UserService {
    let user_repo = Arc::new(PgUserRepository::new(state.db.clone()));
    let profile_repo = Arc::new(PgProfileRepository::new(state.db.clone()));
    UserServiceImpl::new(user_repo, profile_repo, state.snowflake.clone())
}

/// Get the authenticated user's own account
pub async fn get_current_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<UserResponse>, AppError> {
    let user = user_service(&state).get_user(auth.user_id).await?;

    Ok(Json(UserResponse::from_user(user, true)))
}

/// Update the authenticated user's account fields
pub async fn update_current_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    body.validate()
        .map_err(validation_error)?;

    let fields = UpdateUserFields {
        full_name: body.full_name,
        headline: body.headline,
        avatar_url: body.avatar_url,
    };
    let user = user_service(&state).update_user(auth.user_id, fields).await?;

    Ok(Json(UserResponse::from_user(user, true)))
}

/// Create or replace the authenticated user's profile
pub async fn upsert_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<UpsertProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    body.validate()
        .map_err(validation_error)?;

    let service = user_service(&state);
    let fields = ProfileFields {
        bio: body.bio,
        location: body.location,
        website: body.website,
        skills: body.skills,
    };
    service.upsert_profile(auth.user_id, fields).await?;

    let (profile, education, experience) = service.get_profile(auth.user_id).await?;

    Ok(Json(ProfileResponse::from_parts(
        profile, education, experience,
    )))
}

/// Add an education entry to the authenticated user's profile
pub async fn add_education(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<AddEducationRequest>,
) -> Result<impl IntoResponse, AppError> {
    body.validate()
        .map_err(validation_error)?;

    let entry = user_service(&state)
        .add_education(
            auth.user_id,
            body.school,
            body.degree,
            body.field_of_study,
            body.start_year,
            body.end_year,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(EducationResponse::from(entry))))
}

/// Remove an education entry
pub async fn delete_education(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(entry_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let entry_id = parse_id(&entry_id)?;
    user_service(&state)
        .delete_education(auth.user_id, entry_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Add an experience entry to the authenticated user's profile
pub async fn add_experience(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<AddExperienceRequest>,
) -> Result<impl IntoResponse, AppError> {
    body.validate()
        .map_err(validation_error)?;

    let entry = user_service(&state)
        .add_experience(
            auth.user_id,
            body.company,
            body.title,
            body.description,
            body.start_date,
            body.end_date,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ExperienceResponse::from(entry))))
}

/// Remove an experience entry
pub async fn delete_experience(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(entry_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let entry_id = parse_id(&entry_id)?;
    user_service(&state)
        .delete_experience(auth.user_id, entry_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Get a user's public account details
pub async fn get_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let user_id = parse_id(&user_id)?;
    let user = user_service(&state).get_user(user_id).await?;

    let own_account = auth.user_id == user.id;
    Ok(Json(UserResponse::from_user(user, own_account)))
}

/// Get a user's profile with education and experience
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ProfileResponse>, AppError> {
    let user_id = parse_id(&user_id)?;
    let (profile, education, experience) = user_service(&state).get_profile(user_id).await?;

    Ok(Json(ProfileResponse::from_parts(
        profile, education, experience,
    )))
}

/// List a user's badges
pub async fn get_user_badges(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<BadgeResponse>>, AppError> {
    let user_id = parse_id(&user_id)?;

    let badge_repo = Arc::new(PgBadgeRepository::new(state.db.clone()));
    let user_repo = Arc::new(PgUserRepository::new(state.db.clone()));
    let service = BadgeServiceImpl::new(badge_repo, user_repo);

    let badges = service.list_user_badges(user_id).await?;

    Ok(Json(badges.into_iter().map(BadgeResponse::from).collect()))
}
