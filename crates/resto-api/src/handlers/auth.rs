// ============================================================================
// Resto API - Auth Handlers
// File: crates/resto-api/src/handlers/auth.rs
// ============================================================================
//! Login, logout, current user, password change and reset

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap},
    response::{IntoResponse, Response},
    Extension, Json,
};
use resto_core::AuthContext;

use super::{ok, ApiResult};
use crate::cookies::{clear_session_cookie, session_cookie};
use crate::dto::{
    ChangePasswordRequest, LoginRequest, PasswordResetConfirm, PasswordResetRequest, RevokedSessions,
    SessionResponse, UserDto,
};
use crate::error::ApiError;
use crate::extract::{ApiJson, Client};
use crate::middleware::auth::session_token;
use crate::response::{ApiResponse, Message};
use crate::state::AppState;

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Client(client): Client,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Response, ApiError> {
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::BadRequest("Username and password are required".to_string()));
    }

    let result = state
        .auth
        .login(&payload.username, &payload.password, payload.remember, &client)
        .await?;

    let auth = &state.config.auth;
    let cookie = session_cookie(&auth.cookie_name, &result.session.token, result.session.expires_at, auth.cookie_secure);
    let body = SessionResponse::new(&result.user, &result.session);

    Ok(([(SET_COOKIE, cookie)], Json(ApiResponse::success(body))).into_response())
}

/// POST /api/v1/auth/logout
///
/// Succeeds without a session so a stale cookie can always be cleared.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, ApiError> {
    let auth = &state.config.auth;
    if let Some(token) = session_token(&headers, &auth.cookie_name) {
        state.auth.logout(&token).await?;
    }

    let cookie = clear_session_cookie(&auth.cookie_name, auth.cookie_secure);
    Ok(([(SET_COOKIE, cookie)], Json(ApiResponse::success(Message::new("Logged out")))).into_response())
}

/// GET /api/v1/auth/me
pub async fn me(State(state): State<AppState>, Extension(ctx): Extension<AuthContext>) -> ApiResult<UserDto> {
    let user = state.auth.current_user(&ctx).await?;
    ok(UserDto::from(&user))
}

/// POST /api/v1/auth/logout-all
pub async fn logout_all(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Response, ApiError> {
    let revoked = state.auth.logout_all(&ctx).await?;

    let auth = &state.config.auth;
    let cookie = clear_session_cookie(&auth.cookie_name, auth.cookie_secure);
    Ok(([(SET_COOKIE, cookie)], Json(ApiResponse::success(RevokedSessions { revoked }))).into_response())
}

/// POST /api/v1/auth/change-password
pub async fn change_password(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiJson(payload): ApiJson<ChangePasswordRequest>,
) -> ApiResult<Message> {
    state
        .auth
        .change_password(&ctx, &payload.current_password, &payload.new_password)
        .await?;
    ok(Message::new("Password changed"))
}

/// POST /api/v1/auth/password-reset/request
///
/// Same answer whether or not the email belongs to an account.
pub async fn request_password_reset(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<PasswordResetRequest>,
) -> ApiResult<Message> {
    state.auth.request_password_reset(&payload.email).await?;
    ok(Message::new("If the email is registered, a reset link has been sent"))
}

/// POST /api/v1/auth/password-reset/confirm
pub async fn confirm_password_reset(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<PasswordResetConfirm>,
) -> ApiResult<Message> {
    state.auth.reset_password(&payload.token, &payload.new_password).await?;
    ok(Message::new("Password has been reset"))
}
