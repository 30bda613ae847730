//! Tab catalog endpoints
//!
//! - GET  /api/tabs?search=term  list with rating aggregates
//! - GET  /api/tabs/:id          single tab with rating aggregate
//! - POST /api/tabs              create a tab
//! - POST /api/tabs/:id/rate     submit a 1-5 rating

use std::net::SocketAddr;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        ConnectInfo, Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tabshelf_common::aggregate::rating_summary;
use tabshelf_common::db::{self, NewTab};
use tabshelf_common::{Error, TabWithRating};
use tracing::info;

use crate::{ApiResult, AppState};

/// Query parameters for the tab listing
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive substring of title or artist
    pub search: Option<String>,
}

/// Body of POST /api/tabs
///
/// Fields are optional here so a missing field surfaces as a validation
/// error naming it rather than a generic decode failure.
#[derive(Debug, Default, Deserialize)]
pub struct CreateTabRequest {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub content: Option<String>,
}

impl From<CreateTabRequest> for NewTab {
    fn from(req: CreateTabRequest) -> Self {
        NewTab::new(
            req.title.unwrap_or_default(),
            req.artist.unwrap_or_default(),
            req.content.unwrap_or_default(),
        )
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: i64,
}

/// Body of POST /api/tabs/:id/rate
#[derive(Debug, Default, Deserialize)]
pub struct RateRequest {
    pub rating: Option<i64>,
    /// Explicit submitter identity; the peer address is used when absent or blank
    pub client_key: Option<String>,
}

/// Response to a successful rating: new rating id plus the fresh aggregate
#[derive(Debug, Serialize)]
pub struct RateResponse {
    pub id: i64,
    pub tab_id: i64,
    pub average_rating: f64,
    pub vote_count: i64,
}

/// GET /api/tabs
pub async fn list_tabs(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<TabWithRating>>> {
    let tabs = tabshelf_common::list_with_aggregates(&state.db, query.search.as_deref()).await?;
    Ok(Json(tabs))
}

/// GET /api/tabs/:id
pub async fn get_tab(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<TabWithRating>> {
    let Path(id) = path?;
    let tab = tabshelf_common::get_with_aggregate(&state.db, id).await?;
    Ok(Json(tab))
}

/// POST /api/tabs
pub async fn create_tab(
    State(state): State<AppState>,
    payload: Result<Json<CreateTabRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    let Json(request) = payload?;
    let new_tab = NewTab::from(request);

    let id = db::create_tab(&state.db, &new_tab).await?;
    info!("Created tab {} ({} - {})", id, new_tab.artist, new_tab.title);

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// POST /api/tabs/:id/rate
pub async fn rate_tab(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    peer: Option<ConnectInfo<SocketAddr>>,
    payload: Result<Json<RateRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<RateResponse>)> {
    let Path(tab_id) = path?;
    let Json(request) = payload?;

    let rating = request
        .rating
        .ok_or_else(|| Error::Validation("rating is required".to_string()))?;

    // A blank body key falls back to the peer address like a missing one
    let client_key = request
        .client_key
        .filter(|k| !k.trim().is_empty())
        .or_else(|| peer.map(|ConnectInfo(addr)| addr.ip().to_string()));

    let id = db::add_rating(&state.db, tab_id, rating, client_key.as_deref()).await?;
    let summary = rating_summary(&state.db, tab_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(RateResponse {
            id,
            tab_id,
            average_rating: summary.average_rating,
            vote_count: summary.vote_count,
        }),
    ))
}
