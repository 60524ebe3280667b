//! Self-service sign-up: plan catalogue, registration and simulated payment

use axum::{
    extract::State,
    http::{header::SET_COOKIE, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use resto_core::services::{list_plans, PlanInfo, RegistrationRequest, RegistrationStarted, RegistrationView};
use resto_core::CardDetails;
use uuid::Uuid;

use super::{created, ok, ApiResult, Created};
use crate::cookies::session_cookie;
use crate::dto::RegistrationCompletedResponse;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, Client};
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/plans
pub async fn plans() -> ApiResult<Vec<PlanInfo>> {
    ok(list_plans())
}

/// POST /api/v1/registrations
pub async fn start(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegistrationRequest>,
) -> Created<RegistrationStarted> {
    created(state.registrations.start_registration(payload).await?)
}

/// GET /api/v1/registrations/{id}
pub async fn get(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<RegistrationView> {
    ok(state.registrations.get_registration(&id).await?)
}

/// POST /api/v1/registrations/{id}/payment
///
/// On approval the new admin is logged in straight away.
pub async fn pay(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    Client(client): Client,
    ApiJson(card): ApiJson<CardDetails>,
) -> Result<Response, ApiError> {
    let done = state.registrations.confirm_payment(&id, &card, &client).await?;

    let auth = &state.config.auth;
    let cookie = session_cookie(&auth.cookie_name, &done.session.token, done.session.expires_at, auth.cookie_secure);
    let body = RegistrationCompletedResponse::from(&done);

    Ok((StatusCode::CREATED, [(SET_COOKIE, cookie)], Json(ApiResponse::success(body))).into_response())
}
