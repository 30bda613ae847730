//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tabshelf_common::db::{count_tabs, get_schema_version};

use crate::{ApiResult, AppState};

/// Service status plus a quick look at the catalog store
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
    pub schema_version: i64,
    pub tab_count: i64,
}

/// GET /health
///
/// Touches the database so a broken store reports 500 instead of "ok".
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let schema_version = get_schema_version(&state.db).await?;
    let tab_count = count_tabs(&state.db).await?;

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        module: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        schema_version,
        tab_count,
    }))
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
