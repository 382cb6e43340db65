//! Domain layer for the reporting backend.
//!
//! This crate contains:
//! - Reporting option models, date-range expansion and validation
//! - Report row projection and display-name resolution
//! - The fetch collaborator trait and the reporting service
//! - Domain error types

pub mod error;
pub mod models;
pub mod services;

pub use error::ReportingError;
