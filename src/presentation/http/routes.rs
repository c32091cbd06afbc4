//! Route Configuration
//!
//! Configures all HTTP routes for the API.

use axum::{
    middleware,
    response::IntoResponse,
    routing::{delete, get, patch, post, put},
    Router,
};

use super::handlers;
use crate::infrastructure::metrics;
use crate::presentation::middleware::{
    auth_middleware, create_security_headers_layer, logging, rate_limit_api, rate_limit_auth,
    rate_limit_forum_write,
};
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api_routes(state.clone()))
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler))
        .layer(middleware::from_fn(logging::track_metrics))
        // Security headers go on last so every response carries them
        .layer(create_security_headers_layer())
        .with_state(state)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    let metrics = metrics::gather_metrics();
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        metrics,
    )
}

/// API v1 routes
fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Public routes (auth has its own stricter rate limiting)
        .nest("/auth", auth_routes(state.clone()))
        // Protected routes (require authentication)
        .nest("/users", user_routes(state.clone()))
        .nest("/jobs", job_routes(state.clone()))
        .nest("/forum", forum_routes(state.clone()))
        .nest("/mentors", mentor_routes(state.clone()))
        .nest("/mentorship", mentorship_routes(state.clone()))
        .nest("/workplaces", workplace_routes(state.clone()))
        .nest("/reports", report_routes(state.clone()))
        .nest("/notifications", notification_routes(state.clone()))
        // Apply API rate limiting to all API routes
        .route_layer(middleware::from_fn_with_state(state, rate_limit_api))
}

/// Authentication routes (public, with stricter rate limiting)
fn auth_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/refresh", post(handlers::auth::refresh_token))
        .route("/logout", post(handlers::auth::logout))
        .route_layer(middleware::from_fn_with_state(state, rate_limit_auth))
}

/// User and profile routes (protected)
fn user_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/@me", get(handlers::user::get_current_user))
        .route("/@me", patch(handlers::user::update_current_user))
        .route("/@me/profile", put(handlers::user::upsert_profile))
        .route("/@me/profile/education", post(handlers::user::add_education))
        .route(
            "/@me/profile/education/{entry_id}",
            delete(handlers::user::delete_education),
        )
        .route(
            "/@me/profile/experience",
            post(handlers::user::add_experience),
        )
        .route(
            "/@me/profile/experience/{entry_id}",
            delete(handlers::user::delete_experience),
        )
        .route("/@me/posts", get(handlers::job::list_my_posts))
        .route("/@me/applications", get(handlers::job::list_my_applications))
        .route("/{user_id}", get(handlers::user::get_user))
        .route("/{user_id}/profile", get(handlers::user::get_profile))
        .route("/{user_id}/badges", get(handlers::user::get_user_badges))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Job board routes (protected)
fn job_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::job::list_open_posts))
        .route("/", post(handlers::job::create_post))
        .route("/{job_id}", get(handlers::job::get_post))
        .route("/{job_id}", patch(handlers::job::update_post))
        .route("/{job_id}", delete(handlers::job::delete_post))
        .route("/{job_id}/applications", post(handlers::job::apply))
        .route("/{job_id}/applications", get(handlers::job::list_applications))
        .route(
            "/applications/{application_id}",
            patch(handlers::job::update_application_status),
        )
        .route(
            "/applications/{application_id}",
            delete(handlers::job::withdraw_application),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Forum routes (protected; writes carry their own rate limit tier)
fn forum_routes(state: AppState) -> Router<AppState> {
    let writes = Router::new()
        .route("/threads", post(handlers::forum::create_thread))
        .route(
            "/threads/{thread_id}/comments",
            post(handlers::forum::create_comment),
        )
        .route("/comments/{comment_id}/vote", put(handlers::forum::upvote))
        .route(
            "/comments/{comment_id}/vote",
            delete(handlers::forum::remove_vote),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_forum_write,
        ));

    Router::new()
        .route("/threads", get(handlers::forum::list_threads))
        .route("/threads/{thread_id}", get(handlers::forum::get_thread))
        .route("/threads/{thread_id}", delete(handlers::forum::delete_thread))
        .route(
            "/threads/{thread_id}/comments",
            get(handlers::forum::list_comments),
        )
        .route(
            "/comments/{comment_id}",
            delete(handlers::forum::delete_comment),
        )
        .merge(writes)
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Mentor directory routes (protected)
fn mentor_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::mentorship::list_mentors))
        .route("/", post(handlers::mentorship::create_mentor_profile))
        .route("/@me", patch(handlers::mentorship::update_mentor_profile))
        .route("/{mentor_id}", get(handlers::mentorship::get_mentor))
        .route(
            "/{mentor_id}/requests",
            post(handlers::mentorship::create_request),
        )
        .route(
            "/{mentor_id}/reviews",
            get(handlers::mentorship::list_reviews),
        )
        .route(
            "/{mentor_id}/reviews",
            post(handlers::mentorship::create_review),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Mentorship lifecycle routes (protected)
fn mentorship_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/requests/incoming",
            get(handlers::mentorship::list_incoming_requests),
        )
        .route(
            "/requests/outgoing",
            get(handlers::mentorship::list_outgoing_requests),
        )
        .route(
            "/requests/{request_id}/accept",
            post(handlers::mentorship::accept_request),
        )
        .route(
            "/requests/{request_id}/reject",
            post(handlers::mentorship::reject_request),
        )
        .route(
            "/requests/{request_id}/cancel",
            post(handlers::mentorship::cancel_request),
        )
        .route(
            "/requests/{request_id}/complete",
            post(handlers::mentorship::complete_request),
        )
        .route(
            "/requests/{request_id}/messages",
            get(handlers::mentorship::list_messages),
        )
        .route(
            "/requests/{request_id}/messages",
            post(handlers::mentorship::send_message),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Workplace routes (protected)
fn workplace_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::workplace::list_workplaces))
        .route("/", post(handlers::workplace::create_workplace))
        .route("/{workplace_id}", get(handlers::workplace::get_workplace))
        .route(
            "/{workplace_id}/reviews",
            get(handlers::workplace::list_reviews),
        )
        .route(
            "/{workplace_id}/reviews",
            post(handlers::workplace::create_review),
        )
        .route(
            "/reviews/{review_id}",
            delete(handlers::workplace::delete_review),
        )
        .route(
            "/reviews/{review_id}/reply",
            post(handlers::workplace::reply_to_review),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Moderation report routes (protected)
fn report_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::report::create_report))
        .route("/", get(handlers::report::list_reports))
        .route(
            "/{report_id}/resolve",
            post(handlers::report::resolve_report),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Notification routes (protected)
fn notification_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::notification::list_notifications))
        .route(
            "/unread-count",
            get(handlers::notification::unread_count),
        )
        .route(
            "/{notification_id}/read",
            post(handlers::notification::mark_read),
        )
        .route("/read-all", post(handlers::notification::mark_all_read))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
