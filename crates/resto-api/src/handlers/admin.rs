// ============================================================================
// Resto API - Platform Administration Handlers
// File: crates/resto-api/src/handlers/admin.rs
// ============================================================================
//! Root-admin only: tenant listing, platform stats, activation and plans

use axum::{extract::State, Extension};
use resto_core::{AuthContext, PlatformStats, Restaurant, RestaurantSummary};
use resto_shared::Page;
use uuid::Uuid;

use super::{ok, ApiResult};
use crate::dto::{ActiveRequest, PlanChangeRequest, RestaurantListQuery};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;

/// GET /api/v1/admin/restaurants?search=&is_active=&page=&per_page=
pub async fn list_restaurants(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiQuery(query): ApiQuery<RestaurantListQuery>,
) -> ApiResult<Page<RestaurantSummary>> {
    let (query, pagination) = query.split();
    ok(state.restaurants.list(&ctx, &query, &pagination).await?)
}

/// GET /api/v1/admin/stats
pub async fn stats(State(state): State<AppState>, Extension(ctx): Extension<AuthContext>) -> ApiResult<PlatformStats> {
    ok(state.restaurants.platform_stats(&ctx).await?)
}

/// PUT /api/v1/admin/restaurants/{rid}/active
pub async fn set_restaurant_active(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<ActiveRequest>,
) -> ApiResult<Restaurant> {
    ok(state.restaurants.set_active(&ctx, &id, payload.is_active).await?)
}

/// PUT /api/v1/admin/restaurants/{rid}/plan
pub async fn change_plan(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<PlanChangeRequest>,
) -> ApiResult<Restaurant> {
    ok(state.restaurants.change_plan(&ctx, &id, payload.plan, payload.billing_cycle).await?)
}
