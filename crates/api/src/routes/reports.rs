//! Reporting route handlers.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use domain::models::{
    UserReport, UserReportOptions, UserReportSortColumn, REPORTING_DEFAULT_PAGE_SIZE,
};
use serde::Deserialize;

use crate::app::AppState;
use crate::error::ApiError;

/// Create reporting routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/users", get(get_users_for_reporting))
}

/// Raw query string of the user report endpoint.
///
/// Every field is optional text so that malformed values fall back to
/// defaults instead of failing extraction.
#[derive(Debug, Default, Deserialize)]
pub struct UserReportParams {
    pub sort_column: Option<String>,
    pub sort_direction: Option<String>,
    pub page_size: Option<String>,
    pub last_column_value: Option<String>,
    pub date_range: Option<String>,
    pub team_filter: Option<String>,
    pub last_id: Option<String>,
    pub role_filter: Option<String>,
    pub has_no_team: Option<String>,
    pub hide_active: Option<String>,
    pub hide_inactive: Option<String>,
}

fn flag(value: &Option<String>) -> bool {
    value.as_deref() == Some("true")
}

impl UserReportParams {
    /// Builds unvalidated options. Date bounds are left at 0 until populated.
    pub fn into_options(self) -> UserReportOptions {
        let mut options = UserReportOptions::default();

        options.base.sort_column = self
            .sort_column
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| UserReportSortColumn::default().as_str().to_string());
        options.base.sort_desc = self.sort_direction.as_deref() == Some("desc");
        options.base.page_size = self
            .page_size
            .as_deref()
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(REPORTING_DEFAULT_PAGE_SIZE);
        options.base.last_sort_column_value = self.last_column_value.unwrap_or_default();
        options.base.date_range = self.date_range.unwrap_or_default();

        options.has_no_team = flag(&self.has_no_team);
        options.hide_active = flag(&self.hide_active);
        options.hide_inactive = flag(&self.hide_inactive);
        options.team = self.team_filter.unwrap_or_default();
        options.last_user_id = self.last_id.unwrap_or_default();
        options.role = self.role_filter.unwrap_or_default();

        options
    }
}

/// List users for reporting.
///
/// GET /api/v4/reports/users
async fn get_users_for_reporting(
    State(state): State<AppState>,
    Query(params): Query<UserReportParams>,
) -> Result<Json<Vec<UserReport>>, ApiError> {
    let mut options = params.into_options();
    state.timezone.populate(&mut options.base, Utc::now());

    let reports = state.reporting.get_users_for_reporting(&options).await?;

    tracing::info!(
        rows = reports.len(),
        sort_column = %options.base.sort_column,
        date_range = %options.base.date_range,
        "User report served"
    );

    Ok(Json(reports))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> UserReportParams {
        let query = pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        let uri: axum::http::Uri = format!("/users?{}", query).parse().unwrap();
        Query::<UserReportParams>::try_from_uri(&uri).unwrap().0
    }

    #[test]
    fn test_defaults() {
        let options = UserReportParams::default().into_options();

        assert_eq!(options.base.sort_column, "Username");
        assert!(!options.base.sort_desc);
        assert_eq!(options.base.page_size, 50);
        assert!(options.base.last_sort_column_value.is_empty());
        assert!(options.base.date_range.is_empty());
        assert_eq!(options.base.start_at, 0);
        assert_eq!(options.base.end_at, 0);
        assert!(!options.has_no_team);
        assert!(!options.hide_active);
        assert!(!options.hide_inactive);
    }

    #[test]
    fn test_empty_sort_column_uses_default() {
        let options = params(&[("sort_column", "")]).into_options();
        assert_eq!(options.base.sort_column, "Username");
    }

    #[test]
    fn test_all_params() {
        let options = params(&[
            ("sort_column", "Email"),
            ("sort_direction", "desc"),
            ("page_size", "25"),
            ("last_column_value", "ada@example.com"),
            ("date_range", "last_30_days"),
            ("team_filter", "abcdefghijklmnopqrstuvwxyz"),
            ("last_id", "zyxwvutsrqponmlkjihgfedcba"),
            ("role_filter", "system_admin"),
            ("has_no_team", "true"),
            ("hide_inactive", "true"),
        ])
        .into_options();

        assert_eq!(options.base.sort_column, "Email");
        assert!(options.base.sort_desc);
        assert_eq!(options.base.page_size, 25);
        assert_eq!(options.base.last_sort_column_value, "ada@example.com");
        assert_eq!(options.base.date_range, "last_30_days");
        assert_eq!(options.team, "abcdefghijklmnopqrstuvwxyz");
        assert_eq!(options.last_user_id, "zyxwvutsrqponmlkjihgfedcba");
        assert_eq!(options.role, "system_admin");
        assert!(options.has_no_team);
        assert!(!options.hide_active);
        assert!(options.hide_inactive);
    }

    #[test]
    fn test_unparseable_page_size_falls_back() {
        let options = params(&[("page_size", "lots")]).into_options();
        assert_eq!(options.base.page_size, 50);
    }

    #[test]
    fn test_out_of_range_page_size_is_kept_for_validation() {
        let options = params(&[("page_size", "0")]).into_options();
        assert_eq!(options.base.page_size, 0);

        let options = params(&[("page_size", "500")]).into_options();
        assert_eq!(options.base.page_size, 500);
    }

    #[test]
    fn test_flags_require_exact_true() {
        let options = params(&[
            ("has_no_team", "TRUE"),
            ("hide_active", "1"),
            ("hide_inactive", "yes"),
        ])
        .into_options();

        assert!(!options.has_no_team);
        assert!(!options.hide_active);
        assert!(!options.hide_inactive);
    }

    #[test]
    fn test_sort_direction_other_than_desc_is_ascending() {
        let options = params(&[("sort_direction", "DESC")]).into_options();
        assert!(!options.base.sort_desc);
    }
}
