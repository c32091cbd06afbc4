//! # TalentHub Library
//!
//! This crate provides a career community platform with:
//! - A job board with an application status workflow
//! - A discussion forum with comment votes and activity badges
//! - Mentorship matching with capacity tracking, messaging and reviews
//! - Rated, policy-tagged workplace reviews with employer replies
//! - Moderation reports and an in-app notification inbox
//! - JWT authentication with refresh-token rotation
//! - PostgreSQL for persistent storage
//! - Redis-backed sliding-window rate limiting
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: Core business entities and repository traits
//! - **Application Layer**: Business logic services and DTOs
//! - **Infrastructure Layer**: Database, Redis, and metrics implementations
//! - **Presentation Layer**: HTTP handlers and middleware
//!
//! ## Module Structure
//!
//! ```text
//! talenthub/
//! +-- config/        Configuration management
//! +-- domain/        Domain entities and repository traits
//! +-- application/   Application services and DTOs
//! +-- infrastructure/ Database, Redis and metrics implementations
//! +-- presentation/  HTTP routes, handlers and middleware
//! +-- shared/        Common utilities (errors, snowflake IDs)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Business services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP handlers and middleware
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
