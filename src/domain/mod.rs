//! # Domain Layer
//!
//! The domain layer contains the core business objects of the platform.
//! It is independent of any external frameworks or infrastructure concerns.
//!
//! ## Structure
//!
//! - **entities**: Core domain entities (User, JobPost, ForumThread, ...)
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure or presentation layers
//! - Repository traits define data access contracts
//! - Entities encapsulate domain behavior (status machines, thresholds,
//!   rating math)

pub mod entities;

// Re-export commonly used types
pub use entities::*;
