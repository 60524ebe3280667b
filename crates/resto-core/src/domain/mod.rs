//! # Resto Core - Domain Module
//!
//! Domain entities for the restaurant backend.

pub mod plan;
pub mod restaurant;
pub mod admin_user;
pub mod session;
pub mod access;
pub mod branch;
pub mod menu;
pub mod theme;
pub mod order;
pub mod registration;
pub mod whatsapp;
pub mod public_menu;
pub mod dashboard;

// Re-export all entities and enums
pub use plan::{BillingCycle, Plan, PlanLimits};
pub use restaurant::{PlatformStats, Restaurant, RestaurantProfileUpdate, RestaurantQuery, RestaurantSummary};
pub use admin_user::{AdminUser, FailedLogin, UserRole};
pub use session::{ClientInfo, PasswordResetToken, Session};
pub use access::AuthContext;
pub use branch::{Branch, BranchInput};
pub use menu::{Category, CategoryInput, Menu, MenuInput, MenuItem, MenuItemInput};
pub use theme::{MenuLayout, ThemeInput, ThemeSettings};
pub use order::{
    Order, OrderDetail, OrderDraft, OrderFilter, OrderItem, OrderStats, OrderStatus,
    OrderStatusChange, OrderType, PricedLine,
};
pub use registration::{
    CardDetails, ChargeRequest, NewRegistration, Payment, PaymentReceipt, PaymentStatus,
    Registration, RegistrationStatus,
};
pub use public_menu::{PublicBranch, PublicCategory, PublicMenu, PublicMenuItem, PublicMenuSection, PublicRestaurant};
pub use dashboard::{PlanUsage, RestaurantDashboard};
