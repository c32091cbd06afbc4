//! Integration Tests Entry Point
//!
//! This file serves as the entry point for integration tests.
//! Tests are organized by module:
//! - `api/` - REST API endpoint tests
//! - `common/` - Shared test utilities
//!
//! Endpoint tests need a running PostgreSQL and Redis and are marked
//! `#[ignore]`. Point TEST_DATABASE_URL and TEST_REDIS_URL at throwaway
//! instances and run `cargo test -- --ignored` to exercise them.

mod api;
mod common;

// Re-export common utilities for tests
pub use common::*;
