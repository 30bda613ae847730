//! tabshelf-api library - HTTP service for the tablature catalog
//!
//! Translates JSON requests into storage and aggregation calls from
//! `tabshelf-common`.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod settings;

pub use error::{ApiError, ApiResult};
pub use settings::ServerSettings;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool, opened once at startup
    pub db: SqlitePool,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/api/tabs", get(api::list_tabs).post(api::create_tab))
        .route("/api/tabs/:id", get(api::get_tab))
        .route("/api/tabs/:id/rate", post(api::rate_tab))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
