//! PostgreSQL repository implementations

pub mod restaurant_repo_impl;
pub mod admin_user_repo_impl;
pub mod session_repo_impl;
pub mod branch_repo_impl;
pub mod menu_repo_impl;
pub mod theme_repo_impl;
pub mod order_repo_impl;
pub mod registration_repo_impl;

pub use restaurant_repo_impl::PgRestaurantRepository;
pub use admin_user_repo_impl::PgAdminUserRepository;
pub use session_repo_impl::{PgPasswordResetRepository, PgSessionRepository};
pub use branch_repo_impl::PgBranchRepository;
pub use menu_repo_impl::{PgCategoryRepository, PgMenuItemRepository, PgMenuRepository};
pub use theme_repo_impl::PgThemeRepository;
pub use order_repo_impl::PgOrderRepository;
pub use registration_repo_impl::{PgPaymentRepository, PgRegistrationRepository};

use resto_core::error::DomainError;
use tracing::error;

/// Logs the failure and wraps it as a domain database error
pub(crate) fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> DomainError {
    move |e: sqlx::Error| {
        error!("Database error {}: {}", context, e);
        DomainError::DatabaseError(e.to_string())
    }
}

/// Name of the unique constraint a write tripped over, if any
pub(crate) fn unique_violation(e: &sqlx::Error) -> Option<String> {
    match e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            Some(db.constraint().unwrap_or_default().to_string())
        }
        _ => None,
    }
}
