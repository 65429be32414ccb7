//! Student roster dashboard service.
//!
//! Uploaded workbooks go through `decode → normalize → filter → classify →
//! aggregate`, and come back as a [`models::DashboardReport`] or a CSV export.

use axum::{extract::DefaultBodyLimit, Router};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod routes;
pub mod services;

use services::export::ExportCache;

// Application state
pub struct AppState {
    pub config: config::Config,
    pub exports: ExportCache,
}

impl AppState {
    pub fn new(config: config::Config) -> Self {
        let exports = ExportCache::new(
            config.export_cache_max_bytes,
            Duration::from_secs(config.export_cache_ttl_secs),
        );
        Self { config, exports }
    }
}

/// Builds the application router; kept apart from `main` for tests.
pub fn create_router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_file_size;

    Router::new()
        .merge(routes::routes())
        .merge(routes::dashboard::routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
