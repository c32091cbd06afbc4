//! HTTP Handlers
//!
//! Request handlers for all HTTP endpoints.

pub mod health;
pub mod auth;
pub mod user;
pub mod job;
pub mod forum;
pub mod mentorship;
pub mod workplace;
pub mod report;
pub mod notification;

use crate::shared::error::AppError;

/// Parse a path segment into a snowflake ID.
///
/// IDs travel as strings in URLs and JSON for JavaScript BigInt safety.
pub(crate) fn parse_id(value: &str) -> Result<i64, AppError> {
    value
        .parse::<i64>()
        .map_err(|_| AppError::BadRequest(format!("Invalid ID: {}", value)))
}
