//! Back-office order management

use axum::{extract::State, Extension};
use resto_core::{AuthContext, Order, OrderDetail, OrderStats};
use resto_shared::Page;
use uuid::Uuid;

use super::{ok, ApiResult};
use crate::dto::{OrderListQuery, StatusUpdateRequest};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;

/// GET /api/v1/restaurants/{rid}/orders?branch_id=&status=&from=&to=&page=&per_page=
pub async fn list(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiPath(restaurant_id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<OrderListQuery>,
) -> ApiResult<Page<Order>> {
    let (filter, pagination) = query.split();
    ok(state.orders.list(&ctx, &restaurant_id, &filter, &pagination).await?)
}

pub async fn stats(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiPath(restaurant_id): ApiPath<Uuid>,
) -> ApiResult<OrderStats> {
    ok(state.orders.stats(&ctx, &restaurant_id).await?)
}

pub async fn get(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<OrderDetail> {
    ok(state.orders.get(&ctx, &id).await?)
}

/// PUT /api/v1/orders/{oid}/status
pub async fn update_status(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<StatusUpdateRequest>,
) -> ApiResult<OrderDetail> {
    ok(state.orders.update_status(&ctx, &id, payload.status, payload.note).await?)
}
