//! Database module (PostgreSQL adapters)

pub mod connection;
pub mod postgres;

use std::sync::Arc;

use resto_core::repositories::Repositories;
use sqlx::PgPool;

pub use connection::{create_pool, run_migrations};
use postgres::*;

/// Every repository port backed by one shared pool
pub fn postgres_repositories(pool: PgPool) -> Repositories {
    Repositories {
        restaurants: Arc::new(PgRestaurantRepository::new(pool.clone())),
        users: Arc::new(PgAdminUserRepository::new(pool.clone())),
        sessions: Arc::new(PgSessionRepository::new(pool.clone())),
        resets: Arc::new(PgPasswordResetRepository::new(pool.clone())),
        branches: Arc::new(PgBranchRepository::new(pool.clone())),
        menus: Arc::new(PgMenuRepository::new(pool.clone())),
        categories: Arc::new(PgCategoryRepository::new(pool.clone())),
        items: Arc::new(PgMenuItemRepository::new(pool.clone())),
        themes: Arc::new(PgThemeRepository::new(pool.clone())),
        orders: Arc::new(PgOrderRepository::new(pool.clone())),
        registrations: Arc::new(PgRegistrationRepository::new(pool.clone())),
        payments: Arc::new(PgPaymentRepository::new(pool)),
    }
}
