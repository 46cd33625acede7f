//! farmlink-web - farmer/consumer produce sharing service
//!
//! Farmers upload produce photos for shelf-life analysis by an external
//! generative model and share short videos; consumers browse, like, and
//! comment on those videos.

pub mod api;
pub mod db;
pub mod error;
pub mod extract;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use farmlink_common::config::AppConfig;
use services::annotation::AnnotationClient;
use services::media::MediaStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub media: Arc<MediaStore>,
    /// Absent when no API key is configured; analysis then fails cleanly
    pub annotation: Option<Arc<AnnotationClient>>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        config: AppConfig,
        media: MediaStore,
        annotation: Option<AnnotationClient>,
    ) -> Self {
        Self {
            db,
            config: Arc::new(config),
            media: Arc::new(media),
            annotation: annotation.map(Arc::new),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let media_dir = ServeDir::new(state.media.root());
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .merge(api::account_routes())
        .merge(api::farmer_routes())
        .merge(api::video_routes())
        .merge(api::engagement_routes())
        .merge(api::health_routes())
        // Stored uploads are addressed by filename under /media
        .nest_service("/media", media_dir)
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
