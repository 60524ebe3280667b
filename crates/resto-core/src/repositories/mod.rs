//! Repository traits (ports)

pub mod restaurant_repository;
pub mod admin_user_repository;
pub mod session_repository;
pub mod branch_repository;
pub mod menu_repository;
pub mod theme_repository;
pub mod order_repository;
pub mod registration_repository;

pub use restaurant_repository::RestaurantRepository;
pub use admin_user_repository::AdminUserRepository;
pub use session_repository::{PasswordResetRepository, SessionRepository};
pub use branch_repository::BranchRepository;
pub use menu_repository::{CategoryRepository, MenuItemRepository, MenuRepository};
pub use theme_repository::ThemeRepository;
pub use order_repository::OrderRepository;
pub use registration_repository::{PaymentRepository, Provisioning, RegistrationRepository};

use std::sync::Arc;

/// One handle per repository port, shared by every service
#[derive(Clone)]
pub struct Repositories {
    pub restaurants: Arc<dyn RestaurantRepository>,
    pub users: Arc<dyn AdminUserRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub resets: Arc<dyn PasswordResetRepository>,
    pub branches: Arc<dyn BranchRepository>,
    pub menus: Arc<dyn MenuRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub items: Arc<dyn MenuItemRepository>,
    pub themes: Arc<dyn ThemeRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub registrations: Arc<dyn RegistrationRepository>,
    pub payments: Arc<dyn PaymentRepository>,
}
