//! Configuration Management
//!
//! Layered settings loading from files and environment variables.

mod settings;

pub use settings::{
    CorsSettings, DatabaseSettings, JwtSettings, RateLimitSettings, RedisSettings,
    ServerSettings, Settings, SnowflakeSettings, MIN_JWT_SECRET_LENGTH,
};
