//! Thin clients for the storage services behind the repositories.

pub mod document;
pub mod local_storage;
pub mod object_storage;
