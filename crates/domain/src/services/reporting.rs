//! Reporting service.
//!
//! Validates report options, hands them to the fetch collaborator and
//! projects the returned rows. Nothing is fetched for invalid options, and
//! fetch failures are returned as-is without retrying.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::ReportingError;
use crate::models::{to_reports, DisplayNameFormat, UserReport, UserReportOptions, UserReportQuery};

/// Fetches raw user report rows for already-validated options.
#[async_trait::async_trait]
pub trait UserReportFetcher: Send + Sync {
    /// Implementations report storage failures as [`ReportingError::FetchFailed`].
    async fn fetch_users_for_reporting(
        &self,
        options: &UserReportOptions,
    ) -> Result<Vec<UserReportQuery>, ReportingError>;
}

#[async_trait::async_trait]
impl<T: UserReportFetcher + ?Sized> UserReportFetcher for Arc<T> {
    async fn fetch_users_for_reporting(
        &self,
        options: &UserReportOptions,
    ) -> Result<Vec<UserReportQuery>, ReportingError> {
        (**self).fetch_users_for_reporting(options).await
    }
}

/// Orchestrates validation, fetching and projection of user reports.
#[derive(Debug, Clone)]
pub struct ReportingService<F> {
    fetcher: F,
    display_name_format: DisplayNameFormat,
}

impl<F: UserReportFetcher> ReportingService<F> {
    pub fn new(fetcher: F, display_name_format: DisplayNameFormat) -> Self {
        Self {
            fetcher,
            display_name_format,
        }
    }

    pub fn display_name_format(&self) -> DisplayNameFormat {
        self.display_name_format
    }

    /// Returns one report row per fetched row, in fetch order.
    pub async fn get_users_for_reporting(
        &self,
        options: &UserReportOptions,
    ) -> Result<Vec<UserReport>, ReportingError> {
        if let Err(err) = options.is_valid() {
            tracing::debug!(
                error = %err,
                error_id = err.id(),
                sort_column = %options.base.sort_column,
                page_size = options.base.page_size,
                "Rejected user report options"
            );
            return Err(err);
        }

        let rows = self
            .fetcher
            .fetch_users_for_reporting(options)
            .await
            .inspect_err(|err| {
                tracing::warn!(error = %err, "Failed to fetch user report rows");
            })?;

        tracing::debug!(
            rows = rows.len(),
            date_range = %options.base.date_range,
            start_at = options.base.start_at,
            end_at = options.base.end_at,
            "Fetched user report rows"
        );

        Ok(to_reports(&rows, self.display_name_format))
    }
}

/// In-memory fetcher for development and testing.
///
/// Returns a fixed set of rows truncated to the requested page size. It
/// counts how many times it was called and keeps the last options it saw.
#[derive(Debug, Default)]
pub struct MockUserReportFetcher {
    pub rows: Vec<UserReportQuery>,
    /// Whether to simulate failures for testing.
    pub simulate_failure: bool,
    calls: AtomicUsize,
    last_options: Mutex<Option<UserReportOptions>>,
}

impl MockUserReportFetcher {
    /// Create a mock fetcher that returns `rows`.
    pub fn new(rows: Vec<UserReportQuery>) -> Self {
        Self {
            rows,
            simulate_failure: false,
            ..Default::default()
        }
    }

    /// Create a mock fetcher that always fails.
    pub fn failing() -> Self {
        Self {
            rows: Vec::new(),
            simulate_failure: true,
            ..Default::default()
        }
    }

    /// Number of fetches performed so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Options of the most recent fetch, if any.
    pub fn last_options(&self) -> Option<UserReportOptions> {
        self.last_options
            .lock()
            .map(|last| last.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

#[async_trait::async_trait]
impl UserReportFetcher for MockUserReportFetcher {
    async fn fetch_users_for_reporting(
        &self,
        options: &UserReportOptions,
    ) -> Result<Vec<UserReportQuery>, ReportingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.last_options.lock() {
            Ok(mut last) => *last = Some(options.clone()),
            Err(poisoned) => *poisoned.into_inner() = Some(options.clone()),
        }

        if self.simulate_failure {
            tracing::warn!("Mock user report fetcher simulating failure");
            return Err(ReportingError::FetchFailed("Simulated failure".to_string()));
        }

        let limit = usize::try_from(options.base.page_size).unwrap_or(0);
        Ok(self.rows.iter().take(limit).cloned().collect())
    }
}
