//! Template-facing views of domain entities.

pub mod categories;
pub mod dashboard;
pub mod messages;
pub mod projects;
pub mod reviews;
