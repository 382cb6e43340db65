//! Domain models for reporting.

pub mod reporting;
pub mod user_report;

pub use reporting::{
    ReportDuration, ReportTimezone, ReportingBaseOptions, REPORTING_DEFAULT_PAGE_SIZE,
    REPORTING_MAX_PAGE_SIZE, REPORT_DURATION_LAST_30_DAYS, REPORT_DURATION_LAST_6_MONTHS,
    REPORT_DURATION_PREVIOUS_MONTH,
};
pub use user_report::{
    to_reports, DisplayNameFormat, ReportUser, UserPostStats, UserReport, UserReportOptions,
    UserReportQuery, UserReportSortColumn, USER_REPORT_SORT_COLUMNS,
};
