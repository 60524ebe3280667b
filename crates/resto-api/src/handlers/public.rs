//! Unauthenticated customer-facing endpoints

use axum::extract::State;
use resto_core::services::{PlaceOrderRequest, PlacedOrder};
use resto_core::PublicMenu;

use super::{created, ok, ApiResult, Created};
use crate::dto::PublicMenuQuery;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;

/// GET /api/v1/public/{slug}/menu?branch_id=
pub async fn menu(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
    ApiQuery(query): ApiQuery<PublicMenuQuery>,
) -> ApiResult<PublicMenu> {
    ok(state.public_menu.get_public_menu(&slug, query.branch_id).await?)
}

/// POST /api/v1/public/{slug}/orders
pub async fn place_order(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
    ApiJson(payload): ApiJson<PlaceOrderRequest>,
) -> Created<PlacedOrder> {
    created(state.orders.place_order(&slug, payload).await?)
}
