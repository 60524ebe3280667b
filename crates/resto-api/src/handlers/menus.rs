// ============================================================================
// Resto API - Menu Handlers
// File: crates/resto-api/src/handlers/menus.rs
// ============================================================================
//! Menus, their categories, menu items and theme settings

use axum::{extract::State, Extension};
use resto_core::{
    AuthContext, Category, CategoryInput, Menu, MenuInput, MenuItem, MenuItemInput, ThemeInput, ThemeSettings,
};
use uuid::Uuid;

use super::{created, ok, ApiResult, Created};
use crate::dto::{ActiveRequest, AvailabilityRequest, ReorderRequest};
use crate::extract::{ApiJson, ApiPath};
use crate::response::Message;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Menus
// ---------------------------------------------------------------------------

pub async fn list_menus(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiPath(branch_id): ApiPath<Uuid>,
) -> ApiResult<Vec<Menu>> {
    ok(state.menus.list_menus(&ctx, &branch_id).await?)
}

pub async fn create_menu(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiPath(branch_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<MenuInput>,
) -> Created<Menu> {
    created(state.menus.create_menu(&ctx, &branch_id, payload).await?)
}

pub async fn get_menu(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Menu> {
    ok(state.menus.get_menu(&ctx, &id).await?)
}

pub async fn update_menu(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<MenuInput>,
) -> ApiResult<Menu> {
    ok(state.menus.update_menu(&ctx, &id, payload).await?)
}

pub async fn set_menu_active(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<ActiveRequest>,
) -> ApiResult<Menu> {
    ok(state.menus.set_menu_active(&ctx, &id, payload.is_active).await?)
}

pub async fn delete_menu(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Message> {
    state.menus.delete_menu(&ctx, &id).await?;
    ok(Message::new("Menu deleted"))
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

pub async fn list_categories(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiPath(menu_id): ApiPath<Uuid>,
) -> ApiResult<Vec<Category>> {
    ok(state.menus.list_categories(&ctx, &menu_id).await?)
}

pub async fn create_category(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiPath(menu_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<CategoryInput>,
) -> Created<Category> {
    created(state.menus.create_category(&ctx, &menu_id, payload).await?)
}

pub async fn reorder_categories(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiPath(menu_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<ReorderRequest>,
) -> ApiResult<Vec<Category>> {
    ok(state.menus.reorder_categories(&ctx, &menu_id, &payload.ids).await?)
}

pub async fn update_category(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<CategoryInput>,
) -> ApiResult<Category> {
    ok(state.menus.update_category(&ctx, &id, payload).await?)
}

pub async fn delete_category(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Message> {
    state.menus.delete_category(&ctx, &id).await?;
    ok(Message::new("Category deleted"))
}

// ---------------------------------------------------------------------------
// Menu items
// ---------------------------------------------------------------------------

pub async fn list_items(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiPath(category_id): ApiPath<Uuid>,
) -> ApiResult<Vec<MenuItem>> {
    ok(state.items.list_items(&ctx, &category_id).await?)
}

pub async fn create_item(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiPath(category_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<MenuItemInput>,
) -> Created<MenuItem> {
    created(state.items.create_item(&ctx, &category_id, payload).await?)
}

pub async fn reorder_items(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiPath(category_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<ReorderRequest>,
) -> ApiResult<Vec<MenuItem>> {
    ok(state.items.reorder_items(&ctx, &category_id, &payload.ids).await?)
}

pub async fn update_item(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<MenuItemInput>,
) -> ApiResult<MenuItem> {
    ok(state.items.update_item(&ctx, &id, payload).await?)
}

pub async fn set_item_availability(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<AvailabilityRequest>,
) -> ApiResult<MenuItem> {
    ok(state.items.set_available(&ctx, &id, payload.is_available).await?)
}

pub async fn delete_item(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Message> {
    state.items.delete_item(&ctx, &id).await?;
    ok(Message::new("Menu item deleted"))
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

pub async fn get_theme(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiPath(menu_id): ApiPath<Uuid>,
) -> ApiResult<ThemeSettings> {
    ok(state.themes.get(&ctx, &menu_id).await?)
}

pub async fn update_theme(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiPath(menu_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<ThemeInput>,
) -> ApiResult<ThemeSettings> {
    ok(state.themes.update(&ctx, &menu_id, payload).await?)
}

/// Back to the default theme
pub async fn reset_theme(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiPath(menu_id): ApiPath<Uuid>,
) -> ApiResult<ThemeSettings> {
    ok(state.themes.reset(&ctx, &menu_id).await?)
}
