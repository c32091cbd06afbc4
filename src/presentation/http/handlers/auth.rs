//! Authentication Handlers
//!
//! Registration, login, token refresh and logout.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use validator::Validate;

use crate::application::dto::request::{LoginRequest, RefreshTokenRequest, RegisterRequest};
use crate::application::dto::response::{RegisterResponse, TokenResponse, UserResponse};
use crate::application::services::{AuthService, AuthServiceImpl};
use crate::domain::UserRole;
use crate::infrastructure::repositories::{PgSessionRepository, PgUserRepository};
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

fn auth_service(state: &AppState) -> impl AuthService {
    let user_repo = Arc::new(PgUserRepository::new(state.db.clone()));
    let session_repo = Arc::new(PgSessionRepository::new(state.db.clone()));
    AuthServiceImpl::new(
        user_repo,
        session_repo,
        state.snowflake.clone(),
        state.settings.jwt.clone(),
    )
}

/// Register a new user account
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    body.validate()
        .map_err(validation_error)?;

    // Moderators are promoted out of band, never self-registered
    let role = match body.role.as_deref() {
        None | Some("member") => UserRole::Member,
        Some("employer") => UserRole::Employer,
        Some(other) => {
            return Err(AppError::BadRequest(format!("Invalid role: {}", other)));
        }
    };

    let service = auth_service(&state);
    let (user, tokens) = service
        .register(
            &body.username,
            &body.email,
            &body.password,
            body.full_name.as_deref(),
            role,
        )
        .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    let response = RegisterResponse {
        user: UserResponse::from_user(user, true),
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        expires_in: tokens.expires_in,
        token_type: tokens.token_type,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Authenticate with email and password
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    body.validate()
        .map_err(validation_error)?;

    let service = auth_service(&state);
    let tokens = service.authenticate(&body.email, &body.password).await?;

    Ok(Json(TokenResponse::from(tokens)))
}

/// Exchange a refresh token for a new token pair (rotates the refresh token)
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(body): Json<RefreshTokenRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let service = auth_service(&state);
    let tokens = service.refresh_token(&body.refresh_token).await?;

    Ok(Json(TokenResponse::from(tokens)))
}

/// Revoke a refresh token
pub async fn logout(
    State(state): State<AppState>,
    Json(body): Json<RefreshTokenRequest>,
) -> Result<impl IntoResponse, AppError> {
    let service = auth_service(&state);
    service.revoke_token(&body.refresh_token).await?;

    Ok(StatusCode::NO_CONTENT)
}
