//! Restaurant admin accounts

use axum::{extract::State, Extension};
use resto_core::services::NewAdmin;
use resto_core::AuthContext;
use uuid::Uuid;

use super::{created, ok, ApiResult, Created};
use crate::dto::{ActiveRequest, UserDto};
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiPath(restaurant_id): ApiPath<Uuid>,
) -> ApiResult<Vec<UserDto>> {
    let admins = state.admins.list_admins(&ctx, &restaurant_id).await?;
    ok(admins.iter().map(UserDto::from).collect())
}

pub async fn create(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiPath(restaurant_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<NewAdmin>,
) -> Created<UserDto> {
    let user = state.admins.create_admin(&ctx, &restaurant_id, payload).await?;
    created(UserDto::from(&user))
}

/// Deactivating an admin also ends their sessions
pub async fn set_active(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiPath(user_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<ActiveRequest>,
) -> ApiResult<UserDto> {
    let user = state.admins.set_admin_active(&ctx, &user_id, payload.is_active).await?;
    ok(UserDto::from(&user))
}
