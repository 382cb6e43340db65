//! Entity-agnostic reporting options.
//!
//! Sorting, page size, the pagination cursor and the symbolic date range
//! shared by every report. Entity-specific options (see
//! [`super::user_report::UserReportOptions`]) contain a
//! [`ReportingBaseOptions`] and validate it first.

use chrono::{
    DateTime, Datelike, Days, Duration, FixedOffset, Local, LocalResult, Months, NaiveDate,
    NaiveDateTime, Offset, TimeZone, Utc,
};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::error::ReportingError;

pub const REPORT_DURATION_LAST_30_DAYS: &str = "last_30_days";
pub const REPORT_DURATION_PREVIOUS_MONTH: &str = "previous_month";
pub const REPORT_DURATION_LAST_6_MONTHS: &str = "last_6_months";

/// Largest page a single reporting request may ask for.
pub const REPORTING_MAX_PAGE_SIZE: i64 = 100;

/// Page size used when the caller does not supply a usable one.
pub const REPORTING_DEFAULT_PAGE_SIZE: i64 = 50;

/// Recognized symbolic date ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportDuration {
    Last30Days,
    PreviousMonth,
    Last6Months,
}

impl ReportDuration {
    /// Parses a date range code. Matching is exact and case-sensitive.
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            REPORT_DURATION_LAST_30_DAYS => Some(Self::Last30Days),
            REPORT_DURATION_PREVIOUS_MONTH => Some(Self::PreviousMonth),
            REPORT_DURATION_LAST_6_MONTHS => Some(Self::Last6Months),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Last30Days => REPORT_DURATION_LAST_30_DAYS,
            Self::PreviousMonth => REPORT_DURATION_PREVIOUS_MONTH,
            Self::Last6Months => REPORT_DURATION_LAST_6_MONTHS,
        }
    }

    /// Expands the duration into `(start_at, end_at)` in epoch milliseconds.
    ///
    /// An `end_at` of 0 means the range is open-ended. Calendar arithmetic
    /// happens on `now`'s wall clock and clamps to the last day of shorter
    /// months; the result is mapped back with `resolve_local`. A bound
    /// outside chrono's range comes back as 0.
    pub fn range<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> (i64, i64) {
        let tz = now.timezone();
        let local = now.naive_local();

        match self {
            Self::Last30Days => (
                millis_or_zero(
                    local
                        .checked_sub_days(Days::new(30))
                        .and_then(|start| resolve_local(&tz, start)),
                ),
                0,
            ),
            Self::PreviousMonth => {
                let month_start = match NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
                {
                    Some(start) => start,
                    None => return (0, 0),
                };
                let end_at = match resolve_local(&tz, month_start) {
                    Some(end) => end.timestamp_millis(),
                    None => return (0, 0),
                };
                let start_at = millis_or_zero(
                    month_start
                        .checked_sub_months(Months::new(1))
                        .and_then(|start| resolve_local(&tz, start)),
                );
                (start_at, end_at)
            }
            Self::Last6Months => (
                millis_or_zero(
                    local
                        .checked_sub_months(Months::new(6))
                        .and_then(|start| resolve_local(&tz, start)),
                ),
                0,
            ),
        }
    }
}

/// Maps a wall-clock time in `tz` to an instant.
///
/// A repeated wall time (clocks turned back) resolves to its earlier
/// instant. A skipped wall time (clocks turned forward) is read with the
/// offset in effect before the jump, which lands past the gap: 02:30 on a
/// night that skips from 02:00 to 03:00 becomes 03:30. `None` only when the
/// instant is outside chrono's range.
fn resolve_local<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(instant) => Some(instant),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => {
            let before = local.checked_sub_signed(Duration::days(1))?;
            let offset = tz.from_local_datetime(&before).earliest()?.offset().fix();
            let utc = local
                .checked_sub_signed(Duration::seconds(i64::from(offset.local_minus_utc())))?;
            Some(tz.from_utc_datetime(&utc))
        }
    }
}

impl fmt::Display for ReportDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn millis_or_zero<Tz: TimeZone>(instant: Option<DateTime<Tz>>) -> i64 {
    instant.map(|i| i.timestamp_millis()).unwrap_or(0)
}

/// Sorting, paging and date filtering common to all reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportingBaseOptions {
    pub sort_desc: bool,
    pub page_size: i64,
    pub sort_column: String,
    /// Sort column value of the last row of the previous page; empty on the first page.
    pub last_sort_column_value: String,
    /// Symbolic date range code, expanded by [`Self::populate_date_range`].
    pub date_range: String,
    /// Derived, epoch milliseconds.
    pub start_at: i64,
    /// Derived, epoch milliseconds. 0 means no upper bound.
    pub end_at: i64,
}

impl Default for ReportingBaseOptions {
    fn default() -> Self {
        Self {
            sort_desc: false,
            page_size: REPORTING_DEFAULT_PAGE_SIZE,
            sort_column: String::new(),
            last_sort_column_value: String::new(),
            date_range: String::new(),
            start_at: 0,
            end_at: 0,
        }
    }
}

impl ReportingBaseOptions {
    /// Overwrites `start_at`/`end_at` from `date_range` relative to `now`.
    ///
    /// Unrecognized codes, including the empty string, reset both to 0.
    pub fn populate_date_range<Tz: TimeZone>(&mut self, now: DateTime<Tz>) {
        let (start_at, end_at) = ReportDuration::parse(&self.date_range)
            .map(|duration| duration.range(&now))
            .unwrap_or((0, 0));

        self.start_at = start_at;
        self.end_at = end_at;
    }

    /// Checks the page size, then the date range. The first failure wins.
    pub fn is_valid(&self) -> Result<(), ReportingError> {
        if self.page_size <= 0 || self.page_size > REPORTING_MAX_PAGE_SIZE {
            return Err(ReportingError::InvalidPageSize);
        }

        if self.end_at > 0 && self.start_at > self.end_at {
            return Err(ReportingError::InvalidDateRange);
        }

        Ok(())
    }

    /// True when the caller supplied a cursor from a previous page.
    pub fn has_cursor(&self) -> bool {
        !self.last_sort_column_value.is_empty()
    }
}

/// Time zone in which calendar-based date ranges are computed.
///
/// `previous_month` starts and ends at midnight, so its bounds depend on
/// which midnight is meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum ReportTimezone {
    /// The host's local time zone.
    #[default]
    Local,
    Utc,
    Fixed(FixedOffset),
}

impl ReportTimezone {
    /// Populates `options`' date range, interpreting `now` in this zone.
    pub fn populate(&self, options: &mut ReportingBaseOptions, now: DateTime<Utc>) {
        match self {
            Self::Local => options.populate_date_range(now.with_timezone(&Local)),
            Self::Utc => options.populate_date_range(now),
            Self::Fixed(offset) => options.populate_date_range(now.with_timezone(offset)),
        }
    }
}

impl FromStr for ReportTimezone {
    type Err = ReportingError;

    /// Accepts `local`, `utc` or an offset such as `+05:30`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" | "Local" => Ok(Self::Local),
            "utc" | "UTC" | "Z" => Ok(Self::Utc),
            _ => parse_offset(s)
                .map(Self::Fixed)
                .ok_or_else(|| ReportingError::InvalidTimezone(s.to_string())),
        }
    }
}

impl TryFrom<String> for ReportTimezone {
    type Error = ReportingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for ReportTimezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Utc => f.write_str("utc"),
            Self::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}

fn parse_offset(s: &str) -> Option<FixedOffset> {
    let sign = match s.chars().next()? {
        '+' => 1,
        '-' => -1,
        _ => return None,
    };
    let (hours, minutes) = s[1..].split_once(':')?;
    if hours.len() != 2
        || minutes.len() != 2
        || !hours.bytes().all(|b| b.is_ascii_digit())
        || !minutes.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
