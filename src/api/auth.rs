use axum::{
    extract::{Query, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;

use super::{ApiError, AppState};

#[derive(Deserialize)]
pub struct AuthQuery {
    pub key: Option<String>,
}

/// Why a request was turned away. Diagnostics only: both reasons collapse
/// into the same 401 response.
#[derive(Debug, Error)]
pub enum AuthRejection {
    #[error("no API key presented")]
    MissingKey,
    #[error("API key unknown or inactive")]
    InvalidOrInactive,
}

/// Authorization middleware for the protected routes. The key may arrive:
/// 1. in the `X-Api-Key` header
/// 2. in an `Authorization: Bearer <key>` header
/// 3. in the `?key=` query parameter
///
/// Admission requires an exact, case-sensitive match against an active key.
/// A store failure during lookup is a 500, never a 401.
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AuthQuery>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    let Some(key) = extract_api_key(&query, &headers) else {
        return Err(reject(&AuthRejection::MissingKey));
    };

    let found = state
        .store()
        .find_active_key(&key)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    match found {
        Some(api_key) => {
            tracing::Span::current().record("user_id", &api_key.user_id);
            Ok(next.run(request).await)
        }
        None => Err(reject(&AuthRejection::InvalidOrInactive)),
    }
}

fn reject(reason: &AuthRejection) -> ApiError {
    tracing::debug!("Rejected request: {reason}");
    ApiError::Unauthorized
}

/// Extract the API key from the request, in documented priority order.
pub(super) fn extract_api_key(query: &AuthQuery, headers: &HeaderMap) -> Option<String> {
    // Check X-Api-Key header
    if let Some(api_key) = headers.get("X-Api-Key")
        && let Ok(key_str) = api_key.to_str()
    {
        return Some(key_str.to_string());
    }

    // Check Authorization: Bearer header
    if let Some(auth_header) = headers.get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        return Some(token.trim().to_string());
    }

    query.key.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn query(key: Option<&str>) -> AuthQuery {
        AuthQuery {
            key: key.map(String::from),
        }
    }

    #[test]
    fn test_header_beats_bearer_and_query() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Api-Key", HeaderValue::from_static("from-header"));
        headers.insert(
            "Authorization",
            HeaderValue::from_static("Bearer from-bearer"),
        );

        assert_eq!(
            extract_api_key(&query(Some("from-query")), &headers).as_deref(),
            Some("from-header")
        );
    }

    #[test]
    fn test_bearer_prefix_is_stripped() {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static("Bearer secret"));

        assert_eq!(
            extract_api_key(&query(None), &headers).as_deref(),
            Some("secret")
        );
    }

    #[test]
    fn test_query_parameter_is_the_fallback() {
        let headers = HeaderMap::new();
        assert_eq!(
            extract_api_key(&query(Some("from-query")), &headers).as_deref(),
            Some("from-query")
        );
    }

    #[test]
    fn test_no_channel_yields_none() {
        let headers = HeaderMap::new();
        assert_eq!(extract_api_key(&query(None), &headers), None);
    }

    #[test]
    fn test_basic_auth_is_not_a_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static("Basic dXNlcjpwdw=="));

        assert_eq!(extract_api_key(&query(None), &headers), None);
    }
}
