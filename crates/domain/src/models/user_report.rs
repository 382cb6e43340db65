//! User reporting: filter options, raw query rows and the public report row.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use shared::validation::is_valid_id;
use std::fmt;
use std::str::FromStr;

use super::reporting::ReportingBaseOptions;
use crate::error::ReportingError;

/// Columns a user report may be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UserReportSortColumn {
    CreateAt,
    #[default]
    Username,
    FirstName,
    LastName,
    Nickname,
    Email,
    Roles,
}

/// Sort column whitelist for user reports.
pub const USER_REPORT_SORT_COLUMNS: [UserReportSortColumn; 7] = [
    UserReportSortColumn::CreateAt,
    UserReportSortColumn::Username,
    UserReportSortColumn::FirstName,
    UserReportSortColumn::LastName,
    UserReportSortColumn::Nickname,
    UserReportSortColumn::Email,
    UserReportSortColumn::Roles,
];

impl UserReportSortColumn {
    /// Looks `name` up in the whitelist. Case-sensitive.
    pub fn parse(name: &str) -> Option<Self> {
        USER_REPORT_SORT_COLUMNS
            .iter()
            .copied()
            .find(|column| column.as_str() == name)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateAt => "CreateAt",
            Self::Username => "Username",
            Self::FirstName => "FirstName",
            Self::LastName => "LastName",
            Self::Nickname => "Nickname",
            Self::Email => "Email",
            Self::Roles => "Roles",
        }
    }

    pub fn as_sql_column(&self) -> &'static str {
        match self {
            Self::CreateAt => "u.create_at",
            Self::Username => "u.username",
            Self::FirstName => "u.first_name",
            Self::LastName => "u.last_name",
            Self::Nickname => "u.nickname",
            Self::Email => "u.email",
            Self::Roles => "u.roles",
        }
    }

    /// Numeric columns compare cursor values as integers rather than text.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::CreateAt)
    }
}

/// Options for a user report request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserReportOptions {
    pub base: ReportingBaseOptions,
    /// Id of the last user on the previous page, breaks ties in the sort column.
    pub last_user_id: String,
    pub role: String,
    pub team: String,
    pub has_no_team: bool,
    pub hide_active: bool,
    pub hide_inactive: bool,
}

impl Default for UserReportOptions {
    fn default() -> Self {
        Self {
            base: ReportingBaseOptions {
                sort_column: UserReportSortColumn::default().as_str().to_string(),
                ..Default::default()
            },
            last_user_id: String::new(),
            role: String::new(),
            team: String::new(),
            has_no_team: false,
            hide_active: false,
            hide_inactive: false,
        }
    }
}

impl UserReportOptions {
    pub fn populate_date_range<Tz: TimeZone>(&mut self, now: DateTime<Tz>) {
        self.base.populate_date_range(now);
    }

    /// Validates every option. Checks run in a fixed order and the first
    /// failure is returned:
    /// 1. base options (page size, date range)
    /// 2. sort column whitelist
    /// 3. cursor value parses for numeric sort columns
    /// 4. team filter format
    /// 5. active/inactive filters are not both set
    pub fn is_valid(&self) -> Result<(), ReportingError> {
        self.base.is_valid()?;

        let sort_column = self
            .sort_column()
            .ok_or(ReportingError::InvalidSortColumn)?;

        if sort_column.is_numeric()
            && self.base.has_cursor()
            && self.base.last_sort_column_value.parse::<i64>().is_err()
        {
            return Err(ReportingError::InvalidCursor);
        }

        if !self.team.is_empty() && !is_valid_id(&self.team) {
            return Err(ReportingError::InvalidTeamFilter);
        }

        if self.hide_active && self.hide_inactive {
            return Err(ReportingError::InvalidActiveFilter);
        }

        Ok(())
    }

    /// The whitelisted sort column, or `None` if the requested one is not allowed.
    pub fn sort_column(&self) -> Option<UserReportSortColumn> {
        UserReportSortColumn::parse(&self.base.sort_column)
    }
}

/// Post activity statistics joined onto each report row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPostStats {
    #[serde(rename = "last_login_at", default)]
    pub last_login: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_status_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_post_date: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_active: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_posts: Option<i64>,
}

/// User attributes of a raw report row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub create_at: i64,
    pub first_name: String,
    pub last_name: String,
    pub nickname: String,
    pub roles: String,
    pub delete_at: i64,
}

impl ReportUser {
    pub fn full_name(&self) -> String {
        match (self.first_name.is_empty(), self.last_name.is_empty()) {
            (false, false) => format!("{} {}", self.first_name, self.last_name),
            (false, true) => self.first_name.clone(),
            (true, false) => self.last_name.clone(),
            (true, true) => String::new(),
        }
    }

    /// Name to show for this user under the given preference.
    ///
    /// Falls back to the username whenever the preferred fields are empty.
    pub fn display_name(&self, format: DisplayNameFormat) -> String {
        match format {
            DisplayNameFormat::Username => self.username.clone(),
            DisplayNameFormat::NicknameFullName => {
                if !self.nickname.is_empty() {
                    return self.nickname.clone();
                }
                self.full_name_or_username()
            }
            DisplayNameFormat::FullName => self.full_name_or_username(),
        }
    }

    fn full_name_or_username(&self) -> String {
        let full_name = self.full_name();
        if full_name.is_empty() {
            self.username.clone()
        } else {
            full_name
        }
    }
}

/// Display name preference applied when projecting report rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayNameFormat {
    Username,
    #[default]
    NicknameFullName,
    FullName,
}

impl fmt::Display for DisplayNameFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Username => write!(f, "username"),
            Self::NicknameFullName => write!(f, "nickname_full_name"),
            Self::FullName => write!(f, "full_name"),
        }
    }
}

impl FromStr for DisplayNameFormat {
    type Err = ReportingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "username" => Ok(Self::Username),
            "nickname_full_name" => Ok(Self::NicknameFullName),
            "full_name" => Ok(Self::FullName),
            _ => Err(ReportingError::InvalidDisplayNameFormat(s.to_string())),
        }
    }
}

/// A raw row returned by the fetch collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserReportQuery {
    pub user: ReportUser,
    pub stats: UserPostStats,
}

impl UserReportQuery {
    pub fn to_report(&self, format: DisplayNameFormat) -> UserReport {
        UserReport {
            id: self.user.id.clone(),
            username: self.user.username.clone(),
            email: self.user.email.clone(),
            create_at: self.user.create_at,
            display_name: self.user.display_name(format),
            roles: self.user.roles.clone(),
            stats: self.stats.clone(),
        }
    }
}

/// Projects raw rows into report rows, one for one and in order.
pub fn to_reports(rows: &[UserReportQuery], format: DisplayNameFormat) -> Vec<UserReport> {
    rows.iter().map(|row| row.to_report(format)).collect()
}

/// Public user report row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserReport {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub create_at: i64,
    pub display_name: String,
    pub roles: String,
    #[serde(flatten)]
    pub stats: UserPostStats,
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}
