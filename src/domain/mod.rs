//! Domain entities shared by every persistence adapter.

pub mod category;
pub mod message;
pub mod project;
pub mod review;
pub mod types;
