// ============================================================================
// Resto API - Error Mapping
// File: crates/resto-api/src/error.rs
// ============================================================================

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use resto_core::DomainError;
use thiserror::Error;

use crate::response::ApiResponse;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Too many requests")]
    RateLimited,

    #[error("Internal error: {0}")]
    Internal(String),
}

const INTERNAL_MESSAGE: &str = "Internal server error";

impl ApiError {
    /// HTTP status, machine-readable code and client-facing message
    pub fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            ApiError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMITED",
                "Too many requests, try again later".to_string(),
            ),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", INTERNAL_MESSAGE.to_string()),
            ApiError::Domain(e) => domain_parts(e),
        }
    }
}

fn domain_parts(e: &DomainError) -> (StatusCode, &'static str, String) {
    use DomainError::*;

    let (status, code) = match e {
        ValidationError(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        PasswordPolicy(_) => (StatusCode::BAD_REQUEST, "WEAK_PASSWORD"),
        InvalidResetToken => (StatusCode::BAD_REQUEST, "INVALID_RESET_TOKEN"),

        InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
        InvalidSession | SessionExpired => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),

        PaymentDeclined(_) => (StatusCode::PAYMENT_REQUIRED, "PAYMENT_DECLINED"),

        Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
        UserNotActive => (StatusCode::FORBIDDEN, "USER_NOT_ACTIVE"),
        RestaurantNotActive => (StatusCode::FORBIDDEN, "RESTAURANT_NOT_ACTIVE"),
        SubscriptionExpired => (StatusCode::FORBIDDEN, "SUBSCRIPTION_EXPIRED"),

        UserNotFound | RestaurantNotFound | BranchNotFound | MenuNotFound | CategoryNotFound
        | MenuItemNotFound | OrderNotFound | RegistrationNotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),

        UsernameAlreadyExists(_) => (StatusCode::CONFLICT, "USERNAME_EXISTS"),
        EmailAlreadyExists(_) => (StatusCode::CONFLICT, "EMAIL_EXISTS"),
        SlugAlreadyExists(_) | UnableToGenerateUniqueName => (StatusCode::CONFLICT, "SLUG_EXISTS"),
        RegistrationAlreadyCompleted => (StatusCode::CONFLICT, "REGISTRATION_COMPLETED"),
        Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),

        AccountLocked(_) => (StatusCode::LOCKED, "ACCOUNT_LOCKED"),

        InvalidStatusTransition { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_STATUS_TRANSITION"),
        PlanLimitReached(_) => (StatusCode::UNPROCESSABLE_ENTITY, "PLAN_LIMIT_REACHED"),
        CannotDeleteMainBranch | CannotDeactivateMainBranch => (StatusCode::UNPROCESSABLE_ENTITY, "MAIN_BRANCH"),
        MenuItemUnavailable(_) => (StatusCode::UNPROCESSABLE_ENTITY, "ITEM_UNAVAILABLE"),
        RegistrationExpired => (StatusCode::UNPROCESSABLE_ENTITY, "REGISTRATION_EXPIRED"),

        PasswordHashError(_) | DatabaseError(_) | NotificationError(_) | InternalError(_) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", INTERNAL_MESSAGE.to_string());
        }
    };

    (status, code, e.to_string())
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        if status.is_server_error() {
            tracing::error!("{}: {}", code, self);
        } else {
            tracing::warn!("{} ({}): {}", code, status.as_u16(), message);
        }

        (status, Json(ApiResponse::error(code, &message))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
