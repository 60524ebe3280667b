//! Tenant profile and dashboard

use axum::{extract::State, Extension};
use resto_core::{AuthContext, Restaurant, RestaurantDashboard, RestaurantProfileUpdate};
use uuid::Uuid;

use super::{ok, ApiResult};
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

/// GET /api/v1/restaurants/{rid}
pub async fn get(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Restaurant> {
    ok(state.restaurants.get(&ctx, &id).await?)
}

/// PUT /api/v1/restaurants/{rid}
pub async fn update(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<RestaurantProfileUpdate>,
) -> ApiResult<Restaurant> {
    ok(state.restaurants.update_profile(&ctx, &id, payload).await?)
}

/// GET /api/v1/restaurants/{rid}/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<RestaurantDashboard> {
    ok(state.dashboard.restaurant_dashboard(&ctx, &id).await?)
}
