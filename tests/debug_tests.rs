//! Tests for the development-mode seed/inspect/clear routes.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;
use zooda::config::Config;

/// Default API key seeded by migration (must match m20250101_initial.rs)
const DEFAULT_API_KEY: &str = "zooda_default_api_key_please_rotate";

async fn spawn_app(development_mode: bool) -> (Arc<zooda::api::AppState>, Router) {
    let db_path =
        std::env::temp_dir().join(format!("zooda-debug-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_url = format!("sqlite:{}", db_path.display());
    config.server.development_mode = development_mode;

    let state = zooda::api::create_app_state(config)
        .await
        .expect("failed to create app state");

    let router = zooda::api::router(state.clone());
    (state, router)
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body_json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, body_json)
}

#[tokio::test]
async fn test_debug_routes_absent_in_production() {
    let (_, app) = spawn_app(false).await;

    for uri in [
        "/test/add-sample",
        "/test/check-db",
        "/test/list-keys",
        "/test/clear-db",
    ] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND, "uri: {}", uri);
    }
}

#[tokio::test]
async fn test_add_sample_seeds_once() {
    let (state, app) = spawn_app(true).await;

    let (status, body) = get_json(&app, "/test/add-sample").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Added 3 sample anime records");

    let (status, body) = get_json(&app, "/test/add-sample").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Sample data already exists");

    assert_eq!(state.store().anime_count().await.expect("count"), 3);

    // Seeded rows are served through the normal authenticated listing.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/anime")
                .header("X-Api-Key", DEFAULT_API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let list_body = response.into_body().collect().await.unwrap().to_bytes();
    let list_json: serde_json::Value = serde_json::from_slice(&list_body).unwrap();
    assert_eq!(list_json["total"], 3);
    assert_eq!(list_json["data"][0]["title"], "원피스");
}

#[tokio::test]
async fn test_check_db_reports_counts() {
    let (_, app) = spawn_app(true).await;

    let (status, _) = get_json(&app, "/test/add-sample").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get_json(&app, "/test/check-db").await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["status"], "ok");
    assert_eq!(body["anime_count"], 3);
    assert_eq!(body["api_key_count"], 1);
    assert_eq!(body["active_api_key_count"], 1);
    assert!(
        body["database_url"]
            .as_str()
            .expect("database_url string")
            .starts_with("sqlite:")
    );
}

#[tokio::test]
async fn test_list_keys_exposes_seeded_key() {
    let (state, app) = spawn_app(true).await;

    state
        .store()
        .insert_api_key("second-key", "qa", true)
        .await
        .expect("insert key");

    let (status, body) = get_json(&app, "/test/list-keys").await;
    assert_eq!(status, StatusCode::OK);

    let keys = body.as_array().expect("array of keys");
    assert_eq!(keys.len(), 2);

    assert_eq!(keys[0]["key"], DEFAULT_API_KEY);
    assert_eq!(keys[0]["user_id"], "admin");
    assert_eq!(keys[0]["is_active"], true);

    assert_eq!(keys[1]["key"], "second-key");
    assert_eq!(keys[1]["user_id"], "qa");
}

#[tokio::test]
async fn test_clear_db_removes_catalog_only() {
    let (state, app) = spawn_app(true).await;

    let (status, _) = get_json(&app, "/test/add-sample").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get_json(&app, "/test/clear-db").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Removed 3 anime records");

    assert_eq!(state.store().anime_count().await.expect("count"), 0);
    assert_eq!(state.store().api_key_count().await.expect("key count"), 1);

    // Clearing an empty catalog is harmless.
    let (status, body) = get_json(&app, "/test/clear-db").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Removed 0 anime records");
}
