//! Rate Limiting Middleware
//!
//! Redis-based distributed rate limiting using a sliding window over a
//! sorted set. The window check and insert run in a single Lua script so
//! concurrent requests cannot race past the limit.

use std::net::{IpAddr, SocketAddr};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use redis::aio::ConnectionManager;
use serde::{Deserialize, Serialize};

use crate::config::RateLimitSettings;
use crate::presentation::middleware::auth::AuthUser;
use crate::shared::error::ErrorResponse;
use crate::startup::AppState;

/// Configuration for rate limiting behavior.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Requests allowed per window for this endpoint type
    pub requests_per_window: u32,
    /// Window duration in seconds
    pub window_seconds: u64,
    /// Optional burst allowance above base limit
    pub burst_allowance: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_window: 60,
            window_seconds: 60,
            burst_allowance: 10,
        }
    }
}

impl RateLimitConfig {
    /// Build the standard API tier from application settings.
    pub fn from_settings(settings: &RateLimitSettings) -> Self {
        let window_seconds = 60u64;
        Self {
            requests_per_window: (settings.requests_per_second * window_seconds as f64) as u32,
            window_seconds,
            burst_allowance: settings.burst_size,
        }
    }
}

/// Rate limit tiers for different endpoint groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointType {
    /// Authentication endpoints (login, register, refresh).
    /// Low limits against credential stuffing.
    Auth,
    /// Standard API endpoints
    Api,
    /// Forum thread/comment/vote writes, limited separately so a posting
    /// loop cannot exhaust a user's whole API budget
    ForumWrite,
}

impl EndpointType {
    /// Static configuration for this tier. The Api tier is normally
    /// overridden from settings via [`RateLimitConfig::from_settings`].
    pub fn config(&self) -> RateLimitConfig {
        match self {
            EndpointType::Auth => RateLimitConfig {
                requests_per_window: 5,
                window_seconds: 60,
                burst_allowance: 2,
            },
            EndpointType::Api => RateLimitConfig::default(),
            EndpointType::ForumWrite => RateLimitConfig {
                requests_per_window: 10,
                window_seconds: 60,
                burst_allowance: 5,
            },
        }
    }

    fn key_prefix(&self) -> &'static str {
        match self {
            EndpointType::Auth => "rl:auth",
            EndpointType::Api => "rl:api",
            EndpointType::ForumWrite => "rl:forum",
        }
    }
}

/// Information about rate limit status returned to clients.
#[derive(Debug, Serialize)]
pub struct RateLimitInfo {
    /// Maximum requests allowed in the current window
    pub limit: u32,
    /// Remaining requests in the current window
    pub remaining: u32,
    /// Unix timestamp when the rate limit resets
    pub reset_at: i64,
    /// Seconds until the rate limit resets
    pub retry_after: u64,
}

impl RateLimitInfo {
    /// Info reported when the limiter cannot reach Redis. The request is
    /// allowed and the full budget is advertised.
    fn fail_open(max_requests: u32, window_seconds: u64, now_ms: i64) -> Self {
        Self {
            limit: max_requests,
            remaining: max_requests,
            reset_at: (now_ms / 1000) + window_seconds as i64,
            retry_after: 0,
        }
    }
}

/// Rate limit exceeded error response.
#[derive(Debug, Serialize)]
struct RateLimitExceededResponse {
    #[serde(flatten)]
    error: ErrorResponse,
    rate_limit: RateLimitInfo,
}

/// Redis-based sliding window rate limiter.
///
/// A sorted set per identifier holds one member per request, scored by
/// the request's millisecond timestamp. Each check trims entries older
/// than the window, counts what remains, and either inserts and allows
/// or rejects with retry information.
#[derive(Clone)]
pub struct RateLimiter {
    redis: ConnectionManager,
    config: RateLimitConfig,
    endpoint_type: EndpointType,
}

impl RateLimiter {
    /// Create a rate limiter with the tier's default configuration.
    pub fn new(redis: ConnectionManager, endpoint_type: EndpointType) -> Self {
        Self {
            redis,
            config: endpoint_type.config(),
            endpoint_type,
        }
    }

    /// Create a rate limiter with custom configuration.
    pub fn with_config(
        redis: ConnectionManager,
        endpoint_type: EndpointType,
        config: RateLimitConfig,
    ) -> Self {
        Self {
            redis,
            config,
            endpoint_type,
        }
    }

    /// Check if a request should be allowed.
    ///
    /// Returns `Ok(RateLimitInfo)` if allowed, `Err(RateLimitInfo)` if rate limited.
    pub async fn check(&self, identifier: &str) -> Result<RateLimitInfo, RateLimitInfo> {
        let key = format!("{}:{}", self.endpoint_type.key_prefix(), identifier);
        let now_ms = chrono::Utc::now().timestamp_millis();
        let window_ms = (self.config.window_seconds * 1000) as i64;
        let window_start = now_ms - window_ms;
        let max_requests = self.config.requests_per_window + self.config.burst_allowance;

        let mut conn = self.redis.clone();

        let script = redis::Script::new(
            r#"
            local key = KEYS[1]
            local now_ms = tonumber(ARGV[1])
            local window_start = tonumber(ARGV[2])
            local max_requests = tonumber(ARGV[3])
            local window_seconds = tonumber(ARGV[4])

            redis.call('ZREMRANGEBYSCORE', key, '-inf', window_start)
            local current_count = redis.call('ZCARD', key)

            if current_count < max_requests then
                local member = now_ms .. ':' .. math.random(1000000)
                redis.call('ZADD', key, now_ms, member)
                redis.call('EXPIRE', key, window_seconds + 1)
                return {1, current_count + 1, max_requests}
            else
                local oldest = redis.call('ZRANGE', key, 0, 0, 'WITHSCORES')
                local retry_after = 0
                if oldest and #oldest >= 2 then
                    retry_after = oldest[2] + (window_seconds * 1000) - now_ms
                end
                return {0, current_count, max_requests, retry_after}
            end
            "#,
        );

        let result: Vec<i64> = match script
            .key(&key)
            .arg(now_ms)
            .arg(window_start)
            .arg(max_requests as i64)
            .arg(self.config.window_seconds as i64)
            .invoke_async(&mut conn)
            .await
        {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("Rate limiter Redis error, allowing request: {}", e);
                // A Redis outage must not take the API down with it
                return Ok(RateLimitInfo::fail_open(
                    max_requests,
                    self.config.window_seconds,
                    now_ms,
                ));
            }
        };

        let allowed = result[0] == 1;
        let current_count = result[1] as u32;
        let remaining = max_requests.saturating_sub(current_count);
        let reset_at = (now_ms / 1000) + self.config.window_seconds as i64;

        let info = RateLimitInfo {
            limit: max_requests,
            remaining,
            reset_at,
            retry_after: if allowed {
                0
            } else {
                let retry_ms = result.get(3).copied().unwrap_or(0);
                ((retry_ms as f64) / 1000.0).ceil() as u64
            },
        };

        if allowed {
            Ok(info)
        } else {
            Err(info)
        }
    }
}

/// Extract the rate limit identifier from a request.
///
/// Authenticated user ID when available, otherwise forwarded or direct
/// client IP.
fn extract_identifier(request: &Request, client_ip: Option<IpAddr>) -> String {
    if let Some(auth_user) = request.extensions().get::<AuthUser>() {
        return format!("user:{}", auth_user.user_id);
    }

    // X-Forwarded-For is only meaningful behind a trusted proxy
    if let Some(forwarded_for) = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
    {
        if let Some(first_ip) = forwarded_for.split(',').next() {
            let ip = first_ip.trim();
            if ip.parse::<IpAddr>().is_ok() {
                return format!("ip:{}", ip);
            }
        }
    }

    if let Some(real_ip) = request
        .headers()
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
    {
        if real_ip.parse::<IpAddr>().is_ok() {
            return format!("ip:{}", real_ip);
        }
    }

    match client_ip {
        Some(ip) => format!("ip:{}", ip),
        None => {
            tracing::warn!("Could not determine client identifier for rate limiting");
            "ip:unknown".to_string()
        }
    }
}

/// Rate limiting middleware for authentication endpoints.
pub async fn rate_limit_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    rate_limit_inner(state, request, next, EndpointType::Auth).await
}

/// Rate limiting middleware for standard API endpoints.
pub async fn rate_limit_api(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    rate_limit_inner(state, request, next, EndpointType::Api).await
}

/// Rate limiting middleware for forum write endpoints.
pub async fn rate_limit_forum_write(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    rate_limit_inner(state, request, next, EndpointType::ForumWrite).await
}

/// Internal rate limiting implementation.
async fn rate_limit_inner(
    state: AppState,
    request: Request,
    next: Next,
    endpoint_type: EndpointType,
) -> Response {
    // ConnectInfo is only present when served with connect info enabled,
    // not under in-process test requests
    let client_ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip());
    let identifier = extract_identifier(&request, client_ip);

    // The Api tier takes its budget from configuration
    let limiter = match endpoint_type {
        EndpointType::Api => RateLimiter::with_config(
            state.redis.clone(),
            endpoint_type,
            RateLimitConfig::from_settings(&state.settings.rate_limit),
        ),
        _ => RateLimiter::new(state.redis.clone(), endpoint_type),
    };

    match limiter.check(&identifier).await {
        Ok(info) => {
            let mut response = next.run(request).await;
            add_rate_limit_headers(response.headers_mut(), &info);
            response
        }
        Err(info) => {
            tracing::warn!(
                identifier = %identifier,
                endpoint_type = ?endpoint_type,
                "Rate limit exceeded"
            );
            create_rate_limit_response(info)
        }
    }
}

/// Add rate limit headers to a response.
fn add_rate_limit_headers(headers: &mut header::HeaderMap, info: &RateLimitInfo) {
    if let Ok(v) = header::HeaderValue::from_str(&info.limit.to_string()) {
        headers.insert("X-RateLimit-Limit", v);
    }
    if let Ok(v) = header::HeaderValue::from_str(&info.remaining.to_string()) {
        headers.insert("X-RateLimit-Remaining", v);
    }
    if let Ok(v) = header::HeaderValue::from_str(&info.reset_at.to_string()) {
        headers.insert("X-RateLimit-Reset", v);
    }
}

/// Create a 429 Too Many Requests response.
fn create_rate_limit_response(info: RateLimitInfo) -> Response {
    let body = RateLimitExceededResponse {
        error: ErrorResponse {
            code: 20006,
            message: "You are being rate limited. Please slow down.".to_string(),
            errors: None,
        },
        rate_limit: RateLimitInfo {
            limit: info.limit,
            remaining: 0,
            reset_at: info.reset_at,
            retry_after: info.retry_after,
        },
    };

    let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();

    if let Ok(v) = header::HeaderValue::from_str(&info.retry_after.to_string()) {
        response.headers_mut().insert(header::RETRY_AFTER, v);
    }

    add_rate_limit_headers(
        response.headers_mut(),
        &RateLimitInfo {
            limit: info.limit,
            remaining: 0,
            reset_at: info.reset_at,
            retry_after: info.retry_after,
        },
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_type_config() {
        let auth_config = EndpointType::Auth.config();
        let api_config = EndpointType::Api.config();
        let forum_config = EndpointType::ForumWrite.config();

        assert!(auth_config.requests_per_window < api_config.requests_per_window);
        assert!(forum_config.requests_per_window < api_config.requests_per_window);
    }

    #[test]
    fn test_rate_limit_config_default() {
        let config = RateLimitConfig::default();
        assert_eq!(config.requests_per_window, 60);
        assert_eq!(config.window_seconds, 60);
        assert_eq!(config.burst_allowance, 10);
    }

    #[test]
    fn test_fail_open_allows_full_budget() {
        let info = RateLimitInfo::fail_open(70, 60, 1_700_000_000_000);
        assert_eq!(info.remaining, info.limit);
        assert_eq!(info.retry_after, 0);
        assert_eq!(info.reset_at, 1_700_000_000 + 60);
    }

    #[test]
    fn test_config_from_settings() {
        let settings = RateLimitSettings {
            requests_per_second: 2.0,
            burst_size: 15,
        };
        let config = RateLimitConfig::from_settings(&settings);
        assert_eq!(config.requests_per_window, 120);
        assert_eq!(config.window_seconds, 60);
        assert_eq!(config.burst_allowance, 15);
    }
}
