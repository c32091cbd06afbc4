//! REST API endpoint tests.

mod auth_tests;
mod forum_tests;
mod health_tests;
mod job_tests;
mod mentorship_tests;
mod workplace_tests;
