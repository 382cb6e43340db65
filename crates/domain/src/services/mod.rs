//! Domain services for reporting.
//!
//! Services contain business logic that operates on domain models.

pub mod reporting;

pub use reporting::{MockUserReportFetcher, ReportingService, UserReportFetcher};
