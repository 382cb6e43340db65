use axum::{middleware, Router};
use domain::models::ReportTimezone;
use domain::services::{ReportingService, UserReportFetcher};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::Config;
use crate::middleware::trace_id;
use crate::routes::{not_found, reports};

/// Fetch collaborator shared by every request.
pub type SharedFetcher = Arc<dyn UserReportFetcher>;

#[derive(Clone)]
pub struct AppState {
    pub reporting: Arc<ReportingService<SharedFetcher>>,
    /// Zone in which date range codes are expanded.
    pub timezone: ReportTimezone,
}

pub fn create_app(config: Config, fetcher: SharedFetcher) -> Router {
    let state = AppState {
        reporting: Arc::new(ReportingService::new(
            fetcher,
            config.reporting.display_name_format,
        )),
        timezone: config.reporting.timezone,
    };

    tracing::debug!(
        timezone = %state.timezone,
        display_name_format = %config.reporting.display_name_format,
        "Reporting configured"
    );

    Router::new()
        .nest("/api/v4/reports", reports::router())
        .fallback(not_found)
        // Global middleware (order matters: bottom layers run first)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id)) // Request ID and logging
        .with_state(state)
}
