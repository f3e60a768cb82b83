//! Storage representations of domain entities.

pub mod category;
#[cfg(feature = "server")]
pub mod config;
pub mod document;
pub mod message;
pub mod project;
pub mod review;
