//! HTTP handlers grouped by resource

pub mod admin;
pub mod admins;
pub mod auth;
pub mod branches;
pub mod health;
pub mod menus;
pub mod orders;
pub mod public;
pub mod registration;
pub mod restaurants;

use axum::{http::StatusCode, Json};
use serde::Serialize;

use crate::error::ApiError;
use crate::response::ApiResponse;

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;
pub type Created<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

pub(crate) fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}

pub(crate) fn created<T: Serialize>(data: T) -> Created<T> {
    Ok((StatusCode::CREATED, Json(ApiResponse::success(data))))
}
