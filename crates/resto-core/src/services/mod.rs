//! Domain services (business logic)

pub mod auth_service;
pub mod restaurant_service;
pub mod admin_user_service;
pub mod branch_service;
pub mod menu_service;
pub mod menu_item_service;
pub mod theme_service;
pub mod public_menu_service;
pub mod order_service;
pub mod registration_service;
pub mod dashboard_service;
pub mod housekeeping_service;

pub use auth_service::{AuthPolicy, AuthService, LoginResult};
pub use restaurant_service::RestaurantService;
pub use admin_user_service::{AdminUserService, NewAdmin};
pub use branch_service::BranchService;
pub use menu_service::MenuService;
pub use menu_item_service::MenuItemService;
pub use theme_service::ThemeService;
pub use public_menu_service::PublicMenuService;
pub use order_service::{OrderLineRequest, OrderService, PlaceOrderRequest, PlacedOrder};
pub use registration_service::{
    list_plans, PlanInfo, RegistrationCompleted, RegistrationPolicy, RegistrationRequest, RegistrationService,
    RegistrationStarted, RegistrationView,
};
pub use dashboard_service::DashboardService;
pub use housekeeping_service::{HousekeepingReport, HousekeepingService};
