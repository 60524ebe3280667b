use axum::{extract::State, Extension};
use resto_core::{AuthContext, Branch, BranchInput};
use uuid::Uuid;

use super::{created, ok, ApiResult, Created};
use crate::extract::{ApiJson, ApiPath};
use crate::response::Message;
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiPath(restaurant_id): ApiPath<Uuid>,
) -> ApiResult<Vec<Branch>> {
    ok(state.branches.list(&ctx, &restaurant_id).await?)
}

pub async fn create(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiPath(restaurant_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<BranchInput>,
) -> Created<Branch> {
    created(state.branches.create(&ctx, &restaurant_id, payload).await?)
}

pub async fn get(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Branch> {
    ok(state.branches.get(&ctx, &id).await?)
}

pub async fn update(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<BranchInput>,
) -> ApiResult<Branch> {
    ok(state.branches.update(&ctx, &id, payload).await?)
}

pub async fn set_main(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Branch> {
    ok(state.branches.set_main(&ctx, &id).await?)
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Message> {
    state.branches.delete(&ctx, &id).await?;
    ok(Message::new("Branch deleted"))
}
