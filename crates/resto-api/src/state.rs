//! Shared application state handed to every handler

use std::sync::Arc;

use chrono::Duration;
use resto_core::ports::{Mailer, PaymentGateway};
use resto_core::repositories::Repositories;
use resto_core::services::{
    AdminUserService, AuthPolicy, AuthService, BranchService, DashboardService, MenuItemService, MenuService,
    OrderService, PublicMenuService, RegistrationPolicy, RegistrationService, RestaurantService, ThemeService,
};
use resto_shared::config::AppConfig;
use sqlx::PgPool;

use crate::middleware::rate_limit::RateLimiters;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub auth: Arc<AuthService>,
    pub restaurants: Arc<RestaurantService>,
    pub admins: Arc<AdminUserService>,
    pub branches: Arc<BranchService>,
    pub menus: Arc<MenuService>,
    pub items: Arc<MenuItemService>,
    pub themes: Arc<ThemeService>,
    pub public_menu: Arc<PublicMenuService>,
    pub orders: Arc<OrderService>,
    pub registrations: Arc<RegistrationService>,
    pub dashboard: Arc<DashboardService>,
    pub limiters: RateLimiters,
}

impl AppState {
    pub fn new(
        db: PgPool,
        config: AppConfig,
        repos: Repositories,
        mailer: Arc<dyn Mailer>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        let auth_policy = AuthPolicy::from_settings(&config.auth, &config.app.public_base_url);
        let password_policy = auth_policy.password_policy.clone();

        let auth = Arc::new(AuthService::new(
            repos.users.clone(),
            repos.restaurants.clone(),
            repos.sessions.clone(),
            repos.resets.clone(),
            mailer.clone(),
            auth_policy,
        ));

        let registrations = Arc::new(RegistrationService::new(
            repos.registrations.clone(),
            repos.payments.clone(),
            repos.restaurants.clone(),
            repos.users.clone(),
            gateway,
            mailer,
            auth.clone(),
            RegistrationPolicy {
                ttl: Duration::hours(config.payment.registration_ttl_hours),
                currency: config.payment.currency.clone(),
                password_policy: password_policy.clone(),
            },
        ));

        Self {
            db,
            limiters: RateLimiters::from_settings(&config.rate_limit),
            config: Arc::new(config),
            auth,
            restaurants: Arc::new(RestaurantService::new(repos.restaurants.clone())),
            admins: Arc::new(AdminUserService::new(
                repos.users.clone(),
                repos.restaurants.clone(),
                repos.sessions.clone(),
                password_policy,
            )),
            branches: Arc::new(BranchService::new(repos.branches.clone(), repos.restaurants.clone())),
            menus: Arc::new(MenuService::new(repos.menus.clone(), repos.categories.clone(), repos.branches.clone())),
            items: Arc::new(MenuItemService::new(
                repos.items.clone(),
                repos.categories.clone(),
                repos.restaurants.clone(),
            )),
            themes: Arc::new(ThemeService::new(repos.themes.clone(), repos.menus.clone())),
            public_menu: Arc::new(PublicMenuService::new(
                repos.restaurants.clone(),
                repos.branches.clone(),
                repos.menus.clone(),
                repos.categories.clone(),
                repos.items.clone(),
                repos.themes.clone(),
            )),
            orders: Arc::new(OrderService::new(
                repos.orders.clone(),
                repos.restaurants.clone(),
                repos.branches.clone(),
                repos.items.clone(),
            )),
            registrations,
            dashboard: Arc::new(DashboardService::new(
                repos.restaurants,
                repos.branches,
                repos.menus,
                repos.items,
                repos.orders,
            )),
        }
    }
}
