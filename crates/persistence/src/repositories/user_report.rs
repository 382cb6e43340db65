//! User report repository.
//!
//! Fetches one page of users joined with their post activity, using
//! keyset pagination on `(sort column, user id)`.

use domain::models::{UserReportOptions, UserReportQuery, UserReportSortColumn};
use domain::services::UserReportFetcher;
use domain::ReportingError;
use sqlx::PgPool;

use crate::entities::UserReportEntity;

const USER_REPORT_SELECT: &str = r#"
    SELECT
        u.id,
        u.username,
        u.email,
        u.create_at,
        u.first_name,
        u.last_name,
        u.nickname,
        u.roles,
        u.delete_at,
        u.last_login,
        s.last_activity_at AS last_status_at,
        ps.last_post_date,
        ps.days_active,
        ps.total_posts
    FROM users u
    LEFT JOIN user_status s ON s.user_id = u.id
    LEFT JOIN (
        SELECT
            p.user_id,
            MAX(p.create_at) AS last_post_date,
            COUNT(DISTINCT DATE(TO_TIMESTAMP(p.create_at / 1000.0)))::INT AS days_active,
            COUNT(p.id) AS total_posts
        FROM posts p
        WHERE p.delete_at = 0
          AND ($1::BIGINT = 0 OR p.create_at >= $1::BIGINT)
          AND ($2::BIGINT = 0 OR p.create_at < $2::BIGINT)
        GROUP BY p.user_id
    ) ps ON ps.user_id = u.id
    WHERE 1 = 1
    "#;

/// A positional query parameter, in bind order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportParam {
    Int(i64),
    Text(String),
}

/// Builds the user report query and its parameters.
///
/// `$1`/`$2` are always the post statistics window. Filters, the cursor and
/// the limit follow in that order. The sort column must already be
/// whitelisted; it is the only piece of the options spliced into the SQL
/// text, and it comes from [`UserReportSortColumn::as_sql_column`].
pub fn build_user_report_query(
    options: &UserReportOptions,
    sort_column: UserReportSortColumn,
) -> (String, Vec<ReportParam>) {
    let mut query = String::from(USER_REPORT_SELECT);
    let mut params = vec![
        ReportParam::Int(options.base.start_at),
        ReportParam::Int(options.base.end_at),
    ];
    let mut conditions = Vec::new();

    if !options.role.is_empty() {
        params.push(ReportParam::Text(options.role.clone()));
        conditions.push(format!(
            "${} = ANY(STRING_TO_ARRAY(u.roles, ' '))",
            params.len()
        ));
    }

    if !options.team.is_empty() {
        params.push(ReportParam::Text(options.team.clone()));
        conditions.push(format!(
            "EXISTS (SELECT 1 FROM team_members tm WHERE tm.user_id = u.id AND tm.team_id = ${} AND tm.delete_at = 0)",
            params.len()
        ));
    }

    if options.has_no_team {
        conditions.push(
            "NOT EXISTS (SELECT 1 FROM team_members tm WHERE tm.user_id = u.id AND tm.delete_at = 0)"
                .to_string(),
        );
    }

    if options.hide_active {
        conditions.push("u.delete_at > 0".to_string());
    }

    if options.hide_inactive {
        conditions.push("u.delete_at = 0".to_string());
    }

    let column = sort_column.as_sql_column();
    let (direction, comparison) = if options.base.sort_desc {
        ("DESC", "<")
    } else {
        ("ASC", ">")
    };

    if options.base.has_cursor() {
        params.push(ReportParam::Text(options.base.last_sort_column_value.clone()));
        let value_idx = params.len();
        params.push(ReportParam::Text(options.last_user_id.clone()));
        let id_idx = params.len();

        let cast = if sort_column.is_numeric() { "::BIGINT" } else { "" };
        conditions.push(format!(
            "({}, u.id) {} (${}{}, ${})",
            column, comparison, value_idx, cast, id_idx
        ));
    }

    for condition in &conditions {
        query.push_str(" AND ");
        query.push_str(condition);
    }

    params.push(ReportParam::Int(options.base.page_size));
    query.push_str(&format!(
        " ORDER BY {column} {direction}, u.id {direction} LIMIT ${}",
        params.len()
    ));

    (query, params)
}

/// PostgreSQL-backed user report fetcher.
#[derive(Clone)]
pub struct UserReportRepository {
    pool: PgPool,
}

impl UserReportRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_page(
        &self,
        options: &UserReportOptions,
    ) -> Result<Vec<UserReportEntity>, sqlx::Error> {
        // Options are validated before they reach the repository.
        let sort_column = options.sort_column().unwrap_or_default();
        let (query, params) = build_user_report_query(options, sort_column);

        let mut q = sqlx::query_as::<_, UserReportEntity>(&query);
        for param in params {
            q = match param {
                ReportParam::Int(value) => q.bind(value),
                ReportParam::Text(value) => q.bind(value),
            };
        }

        q.fetch_all(&self.pool).await
    }
}

#[async_trait::async_trait]
impl UserReportFetcher for UserReportRepository {
    async fn fetch_users_for_reporting(
        &self,
        options: &UserReportOptions,
    ) -> Result<Vec<UserReportQuery>, ReportingError> {
        let rows = self.fetch_page(options).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch users for reporting");
            ReportingError::FetchFailed(e.to_string())
        })?;

        Ok(rows.into_iter().map(UserReportQuery::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> UserReportOptions {
        UserReportOptions::default()
    }

    #[test]
    fn test_first_page_query() {
        let (query, params) = build_user_report_query(&options(), UserReportSortColumn::Username);

        assert!(query.ends_with(" ORDER BY u.username ASC, u.id ASC LIMIT $3"));
        assert_eq!(
            params,
            vec![ReportParam::Int(0), ReportParam::Int(0), ReportParam::Int(50)]
        );
        assert!(!query.contains("(u.username, u.id)"));
    }

    #[test]
    fn test_date_window_params() {
        let mut opts = options();
        opts.base.start_at = 1_000;
        opts.base.end_at = 2_000;
        let (_, params) = build_user_report_query(&opts, UserReportSortColumn::Username);

        assert_eq!(params[0], ReportParam::Int(1_000));
        assert_eq!(params[1], ReportParam::Int(2_000));
    }

    #[test]
    fn test_descending_cursor() {
        let mut opts = options();
        opts.base.sort_desc = true;
        opts.base.last_sort_column_value = "mike".to_string();
        opts.last_user_id = "abcdefghijklmnopqrstuvwxyz".to_string();
        let (query, params) = build_user_report_query(&opts, UserReportSortColumn::Username);

        assert!(query.contains("(u.username, u.id) < ($3, $4)"));
        assert!(query.ends_with(" ORDER BY u.username DESC, u.id DESC LIMIT $5"));
        assert_eq!(params[2], ReportParam::Text("mike".to_string()));
        assert_eq!(
            params[3],
            ReportParam::Text("abcdefghijklmnopqrstuvwxyz".to_string())
        );
    }

    #[test]
    fn test_numeric_cursor_is_cast() {
        let mut opts = options();
        opts.base.sort_column = "CreateAt".to_string();
        opts.base.last_sort_column_value = "1700000000000".to_string();
        let (query, _) = build_user_report_query(&opts, UserReportSortColumn::CreateAt);

        assert!(query.contains("(u.create_at, u.id) > ($3::BIGINT, $4)"));
    }

    #[test]
    fn test_filters_bind_in_order() {
        let mut opts = options();
        opts.role = "system_admin".to_string();
        opts.team = "abcdefghijklmnopqrstuvwxyz".to_string();
        opts.has_no_team = true;
        opts.hide_inactive = true;
        opts.base.page_size = 10;
        let (query, params) = build_user_report_query(&opts, UserReportSortColumn::Email);

        assert!(query.contains("$3 = ANY(STRING_TO_ARRAY(u.roles, ' '))"));
        assert!(query.contains("tm.team_id = $4"));
        assert!(query.contains("NOT EXISTS (SELECT 1 FROM team_members"));
        assert!(query.contains("u.delete_at = 0"));
        assert!(!query.contains("u.delete_at > 0"));
        assert!(query.ends_with("LIMIT $5"));
        assert_eq!(
            params,
            vec![
                ReportParam::Int(0),
                ReportParam::Int(0),
                ReportParam::Text("system_admin".to_string()),
                ReportParam::Text("abcdefghijklmnopqrstuvwxyz".to_string()),
                ReportParam::Int(10),
            ]
        );
    }

    #[test]
    fn test_hide_active() {
        let mut opts = options();
        opts.hide_active = true;
        let (query, _) = build_user_report_query(&opts, UserReportSortColumn::Username);

        assert!(query.contains("u.delete_at > 0"));
    }

    #[test]
    fn test_user_text_is_never_spliced() {
        let mut opts = options();
        opts.role = "'; DROP TABLE users; --".to_string();
        opts.base.last_sort_column_value = "x' OR '1'='1".to_string();
        let (query, _) = build_user_report_query(&opts, UserReportSortColumn::Roles);

        assert!(!query.contains("DROP TABLE"));
        assert!(!query.contains("OR '1'='1"));
    }
}
