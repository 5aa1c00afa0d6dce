use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, AppState, Paginated};
use crate::entities::anime;

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub title: Option<String>,
    pub genre: Option<String>,
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

const fn default_limit() -> i64 {
    10
}

/// GET /anime
/// One page of the catalog in insertion order.
pub async fn list_anime(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Paginated<anime::Model>>, ApiError> {
    let (records, total) = state.store().list_anime(query.skip, query.limit).await?;

    Ok(Json(Paginated::new(records, total, query.skip, query.limit)))
}

/// GET /anime/search
/// Case-insensitive substring filters on title and/or genre; both given
/// means both must match.
pub async fn search_anime(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Paginated<anime::Model>>, ApiError> {
    let (records, total) = state
        .store()
        .search_anime(
            query.title.as_deref(),
            query.genre.as_deref(),
            query.skip,
            query.limit,
        )
        .await?;

    Ok(Json(Paginated::new(records, total, query.skip, query.limit)))
}

/// GET /anime/{id}
pub async fn get_anime(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<anime::Model>, ApiError> {
    let record = state
        .store()
        .get_anime(id)
        .await?
        .ok_or_else(|| ApiError::anime_not_found(id))?;

    Ok(Json(record))
}
