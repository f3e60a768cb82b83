//! Core library exports for the portfolio site.
//!
//! The `data` feature exposes the domain, persistence adapters and the ordered
//! collection manager. The `server` feature adds forms, services and the
//! Actix-web routes of the public site and the admin panel.

pub mod clients;
pub mod db;
pub mod domain;
pub mod error_conversions;
pub mod models;
pub mod ordering;
pub mod repository;
pub mod schema;

#[cfg(feature = "server")]
pub mod auth;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;

/// Label of the synthetic group holding projects without a known category.
pub const UNCATEGORIZED: &str = "Uncategorized";
