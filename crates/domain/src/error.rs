//! Reporting error taxonomy.

use thiserror::Error;

/// Errors produced while preparing, validating or fetching a report.
///
/// Every variant carries a machine-readable id (see [`ReportingError::id`])
/// and an HTTP-equivalent status (see [`ReportingError::status_code`]).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportingError {
    #[error("Page size must be between 1 and {max}", max = crate::models::REPORTING_MAX_PAGE_SIZE)]
    InvalidPageSize,

    #[error("Start of the date range is after its end")]
    InvalidDateRange,

    #[error("Sort column is not supported for this report")]
    InvalidSortColumn,

    #[error("Pagination cursor does not match the sort column")]
    InvalidCursor,

    #[error("Team filter is not a valid identifier")]
    InvalidTeamFilter,

    #[error("Cannot hide both active and inactive users")]
    InvalidActiveFilter,

    #[error("Failed to fetch report rows: {0}")]
    FetchFailed(String),

    #[error("Invalid report time zone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid display name format: {0}")]
    InvalidDisplayNameFormat(String),
}

impl ReportingError {
    /// Machine-readable error id.
    pub fn id(&self) -> &'static str {
        match self {
            Self::InvalidPageSize => "app.user.get_users_for_reporting.invalid_page_size",
            Self::InvalidDateRange => "app.user.get_users_for_reporting.bad_date_range",
            Self::InvalidSortColumn => "app.user.get_user_report.invalid_sort_column",
            Self::InvalidCursor => "app.user.get_users_for_reporting.invalid_cursor",
            Self::InvalidTeamFilter => "api.getUsersForReporting.invalid_team_filter",
            Self::InvalidActiveFilter => "api.getUsersForReporting.invalid_active_filter",
            Self::FetchFailed(_) => "app.user.get_users_for_reporting.fetch_failed",
            Self::InvalidTimezone(_) => "app.reporting.config.invalid_timezone",
            Self::InvalidDisplayNameFormat(_) => "app.reporting.config.invalid_display_name_format",
        }
    }

    /// HTTP-equivalent status code.
    pub fn status_code(&self) -> u16 {
        if self.is_client_error() {
            400
        } else {
            500
        }
    }

    /// True for errors caused by the request's own parameters.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidPageSize
                | Self::InvalidDateRange
                | Self::InvalidSortColumn
                | Self::InvalidCursor
                | Self::InvalidTeamFilter
                | Self::InvalidActiveFilter
        )
    }
}
