//! Framework-agnostic operations behind the route handlers.
//!
//! Every function takes typed payloads and a repository implementing the
//! traits it needs, so tests run against the in-memory repository.

pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod errors;
pub mod messages;
pub mod portfolio;
pub mod projects;
pub mod reviews;

pub use errors::{ServiceError, ServiceResult};
