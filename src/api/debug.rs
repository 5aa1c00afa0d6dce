//! Development-only seed/inspect/clear routes, mounted behind the
//! `server.development_mode` flag. Store failures are reported in-band
//! (HTTP 200 with an error body) so a broken database never takes down
//! the diagnostic surface itself.

use axum::{Json, Router, extract::State, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;

use super::{AppState, DbStatus};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/test/add-sample", get(add_sample))
        .route("/test/check-db", get(check_db))
        .route("/test/list-keys", get(list_keys))
        .route("/test/clear-db", get(clear_db))
}

/// GET /test/add-sample
/// Seeds the canonical sample records once; a non-empty catalog is left
/// untouched.
async fn add_sample(State(state): State<Arc<AppState>>) -> Json<Value> {
    match state.store().seed_sample_catalog().await {
        Ok(0) => Json(json!({ "message": "Sample data already exists" })),
        Ok(n) => Json(json!({ "message": format!("Added {n} sample anime records") })),
        Err(e) => Json(json!({ "error": e.to_string() })),
    }
}

/// GET /test/check-db
async fn check_db(State(state): State<Arc<AppState>>) -> Json<Value> {
    match db_status(&state).await {
        Ok(status) => Json(json!(status)),
        Err(e) => Json(json!({ "error": e.to_string() })),
    }
}

async fn db_status(state: &AppState) -> anyhow::Result<DbStatus> {
    state.store().ping().await?;

    Ok(DbStatus {
        status: "ok".to_string(),
        database_url: state.config().general.database_url.clone(),
        anime_count: state.store().anime_count().await?,
        api_key_count: state.store().api_key_count().await?,
        active_api_key_count: state.store().active_api_key_count().await?,
    })
}

/// GET /test/list-keys
/// Every key record, active or not.
async fn list_keys(State(state): State<Arc<AppState>>) -> Json<Value> {
    match state.store().list_api_keys().await {
        Ok(keys) => Json(json!(keys)),
        Err(e) => Json(json!({ "error": e.to_string() })),
    }
}

/// GET /test/clear-db
/// Deletes every anime record. API keys survive.
async fn clear_db(State(state): State<Arc<AppState>>) -> Json<Value> {
    match state.store().clear_catalog().await {
        Ok(removed) => Json(json!({ "message": format!("Removed {removed} anime records") })),
        Err(e) => Json(json!({ "error": e.to_string() })),
    }
}
