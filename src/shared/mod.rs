//! Shared Utilities
//!
//! Cross-cutting helpers: error types, snowflake IDs, validation.

pub mod error;
pub mod snowflake;
pub mod validation;
