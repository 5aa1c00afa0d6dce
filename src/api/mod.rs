use axum::{Json, Router, http::HeaderValue, middleware, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Store;

mod anime;
pub mod auth;
mod debug;
mod error;
mod observability;
mod types;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    store: Store,
    config: Config,
}

impl AppState {
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Connect the store (running migrations) and bundle it with the config
/// into the shared request state.
pub async fn create_app_state(config: Config) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.general.database_url,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    Ok(Arc::new(AppState { store, config }))
}

#[must_use]
pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().server.cors_allowed_origins.clone();
    let development_mode = state.config().server.development_mode;
    let track_usage = state.config().server.track_usage;

    let mut app = Router::new()
        .route("/", get(welcome))
        .merge(create_protected_router(state.clone()));

    if development_mode {
        app = app.merge(debug::router());
    }

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    let mut app = app
        .with_state(state.clone())
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware));

    if track_usage {
        app = app.layer(middleware::from_fn_with_state(
            state,
            observability::track_usage,
        ));
    }

    app
}

/// GET /
async fn welcome() -> Json<MessageBody> {
    Json(MessageBody::new("Welcome to Zooda API"))
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/anime", get(anime::list_anime))
        .route("/anime/search", get(anime::search_anime))
        .route("/anime/{id}", get(anime::get_anime))
        .route_layer(middleware::from_fn_with_state(state, auth::require_api_key))
}
