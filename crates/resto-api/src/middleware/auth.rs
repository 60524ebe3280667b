// ============================================================================
// Resto API - Session Authentication Middleware
// File: crates/resto-api/src/middleware/auth.rs
// ============================================================================

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::cookies::read_cookie;
use crate::error::ApiError;
use crate::state::AppState;

/// Resolve the session token and attach the caller's `AuthContext`
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = session_token(request.headers(), &state.config.auth.cookie_name)
        .ok_or_else(|| ApiError::Unauthorized("Missing session token".to_string()))?;

    let ctx = state.auth.authenticate(&token).await?;
    debug!("Authenticated {} ({})", ctx.username, ctx.role.as_str());

    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}

/// Bearer token first, then the session cookie
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    match bearer {
        Some(token) => Some(token.to_string()),
        None => read_cookie(headers, cookie_name),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{header::COOKIE, HeaderValue};

    use super::*;

    #[test]
    fn prefers_bearer_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));
        headers.insert(COOKIE, HeaderValue::from_static("resto_session=from-cookie"));
        assert_eq!(session_token(&headers, "resto_session").as_deref(), Some("from-header"));
    }

    #[test]
    fn falls_back_to_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("resto_session=from-cookie"));
        assert_eq!(session_token(&headers, "resto_session").as_deref(), Some("from-cookie"));
    }

    #[test]
    fn rejects_other_schemes_and_blank_tokens() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert_eq!(session_token(&headers, "resto_session"), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert_eq!(session_token(&headers, "resto_session"), None);
    }
}
