//! Domain errors

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::OrderStatus;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account locked until {0}")]
    AccountLocked(DateTime<Utc>),

    #[error("User not active")]
    UserNotActive,

    #[error("Session invalid")]
    InvalidSession,

    #[error("Session expired")]
    SessionExpired,

    #[error("Password reset token invalid or expired")]
    InvalidResetToken,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("User not found")]
    UserNotFound,

    #[error("Username already exists: {0}")]
    UsernameAlreadyExists(String),

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Restaurant not found")]
    RestaurantNotFound,

    #[error("Restaurant not active")]
    RestaurantNotActive,

    #[error("Restaurant subscription expired")]
    SubscriptionExpired,

    #[error("Restaurant slug already exists: {0}")]
    SlugAlreadyExists(String),

    #[error("Unable to generate unique slug")]
    UnableToGenerateUniqueName,

    #[error("Branch not found")]
    BranchNotFound,

    #[error("Main branch cannot be deleted")]
    CannotDeleteMainBranch,

    #[error("Main branch cannot be deactivated")]
    CannotDeactivateMainBranch,

    #[error("Menu not found")]
    MenuNotFound,

    #[error("Category not found")]
    CategoryNotFound,

    #[error("Menu item not found")]
    MenuItemNotFound,

    #[error("Menu item not available: {0}")]
    MenuItemUnavailable(String),

    #[error("Order not found")]
    OrderNotFound,

    #[error("Invalid order status transition from {from} to {to}")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },

    #[error("Plan limit reached: {0}")]
    PlanLimitReached(String),

    #[error("Registration not found")]
    RegistrationNotFound,

    #[error("Registration expired")]
    RegistrationExpired,

    #[error("Registration already completed")]
    RegistrationAlreadyCompleted,

    #[error("Payment declined: {0}")]
    PaymentDeclined(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Password too weak: {0}")]
    PasswordPolicy(String),

    #[error("Password hash error: {0}")]
    PasswordHashError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Notification error: {0}")]
    NotificationError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DomainError::ValidationError(errors.to_string())
    }
}

impl From<resto_security::PolicyViolation> for DomainError {
    fn from(violation: resto_security::PolicyViolation) -> Self {
        DomainError::PasswordPolicy(violation.to_string())
    }
}

impl From<resto_security::password::PasswordError> for DomainError {
    fn from(e: resto_security::password::PasswordError) -> Self {
        DomainError::PasswordHashError(e.to_string())
    }
}
