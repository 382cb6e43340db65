//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod user_report;

pub use user_report::UserReportEntity;
