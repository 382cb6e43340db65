//! Repository implementations for database operations.

pub mod user_report;

pub use user_report::{build_user_report_query, ReportParam, UserReportRepository};
