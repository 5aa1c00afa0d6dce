use axum::{
    extract::{Query, Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use super::AppState;
use super::auth::{self, AuthQuery};

pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = Uuid::new_v4().to_string();

    let method = req.method().to_string();
    let uri = req.uri().path().to_string();

    let matched_path = req
        .extensions()
        .get::<axum::extract::MatchedPath>()
        .map(|mp| mp.as_str().to_string());

    let user_agent = req
        .headers()
        .get("user-agent")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %uri,
        route = matched_path,
        user_id = tracing::field::Empty,
    );

    async move {
        let response = next.run(req).await;

        let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        let status = response.status().as_u16();

        let outcome = if status >= 500 {
            "error"
        } else if status >= 400 {
            "client_error"
        } else {
            "success"
        };

        // Wide event
        info!(
            event = "http_request_finished",
            duration_ms = duration_ms,
            status_code = status,
            user_agent = %user_agent,
            outcome = %outcome,
            "Request finished"
        );

        response
    }
    .instrument(span)
    .await
}

/// Appends one usage row per request. Best effort: a failed insert is
/// logged and the response goes out untouched.
pub async fn track_usage(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let start = Instant::now();

    let method = req.method().to_string();
    let endpoint = req.uri().path().to_string();

    // Same extraction the auth gate uses, tolerant of unparsable queries.
    let query = Query::<AuthQuery>::try_from_uri(req.uri())
        .map(|Query(q)| q)
        .unwrap_or(AuthQuery { key: None });
    let key = auth::extract_api_key(&query, req.headers());

    let response = next.run(req).await;

    let status = i32::from(response.status().as_u16());
    let latency_ms = i64::try_from(start.elapsed().as_millis()).unwrap_or(i64::MAX);

    if let Err(e) = state
        .store()
        .record_usage(key, &endpoint, &method, status, latency_ms)
        .await
    {
        warn!("Failed to record API usage: {e}");
    }

    response
}
