//! Restaurant dashboard

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{AuthContext, PlanUsage, RestaurantDashboard};
use crate::error::DomainError;
use crate::repositories::{BranchRepository, MenuItemRepository, MenuRepository, OrderRepository, RestaurantRepository};

pub struct DashboardService {
    restaurants: Arc<dyn RestaurantRepository>,
    branches: Arc<dyn BranchRepository>,
    menus: Arc<dyn MenuRepository>,
    items: Arc<dyn MenuItemRepository>,
    orders: Arc<dyn OrderRepository>,
}

impl DashboardService {
    pub fn new(
        restaurants: Arc<dyn RestaurantRepository>,
        branches: Arc<dyn BranchRepository>,
        menus: Arc<dyn MenuRepository>,
        items: Arc<dyn MenuItemRepository>,
        orders: Arc<dyn OrderRepository>,
    ) -> Self {
        Self { restaurants, branches, menus, items, orders }
    }

    pub async fn restaurant_dashboard(
        &self,
        ctx: &AuthContext,
        restaurant_id: &Uuid,
    ) -> Result<RestaurantDashboard, DomainError> {
        ctx.ensure_restaurant(*restaurant_id)?;
        let restaurant = self
            .restaurants
            .find_by_id(restaurant_id)
            .await?
            .filter(|r| !r.is_deleted())
            .ok_or(DomainError::RestaurantNotFound)?;

        let (branch_count, menu_count, item_count, orders) = tokio::try_join!(
            self.branches.count_by_restaurant(restaurant_id),
            self.menus.count_by_restaurant(restaurant_id),
            self.items.count_by_restaurant(restaurant_id),
            self.orders.stats(restaurant_id),
        )?;

        Ok(RestaurantDashboard {
            restaurant_id: restaurant.id,
            branch_count,
            menu_count,
            item_count,
            orders,
            plan: PlanUsage {
                plan: restaurant.plan,
                limits: restaurant.plan.limits(),
                branches_used: branch_count,
                menu_items_used: item_count,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BillingCycle, OrderStats, Plan, Restaurant, UserRole};
    use crate::repositories::branch_repository::MockBranchRepository;
    use crate::repositories::menu_repository::{MockMenuItemRepository, MockMenuRepository};
    use crate::repositories::order_repository::MockOrderRepository;
    use crate::repositories::restaurant_repository::MockRestaurantRepository;

    #[tokio::test]
    async fn test_dashboard_figures() {
        let r = Restaurant::new(
            "Pempek Palembang".to_string(),
            "pempek-palembang".to_string(),
            None,
            None,
            "USD".to_string(),
            Plan::Basic,
            BillingCycle::Monthly,
        )
        .unwrap();
        let rid = r.id;

        let mut restaurants = MockRestaurantRepository::new();
        restaurants.expect_find_by_id().returning(move |_| Ok(Some(r.clone())));
        let mut branches = MockBranchRepository::new();
        branches.expect_count_by_restaurant().returning(|_| Ok(1));
        let mut menus = MockMenuRepository::new();
        menus.expect_count_by_restaurant().returning(|_| Ok(2));
        let mut items = MockMenuItemRepository::new();
        items.expect_count_by_restaurant().returning(|_| Ok(37));
        let mut orders = MockOrderRepository::new();
        orders.expect_stats().returning(|_| {
            let mut stats = OrderStats::default();
            stats.set_count(crate::domain::OrderStatus::Pending, 4);
            Ok(stats)
        });

        let service = DashboardService::new(
            Arc::new(restaurants),
            Arc::new(branches),
            Arc::new(menus),
            Arc::new(items),
            Arc::new(orders),
        );
        let ctx = AuthContext {
            user_id: Uuid::new_v4(),
            username: "owner".to_string(),
            role: UserRole::RestaurantAdmin,
            restaurant_id: Some(rid),
            session_id: None,
        };
        let dashboard = service.restaurant_dashboard(&ctx, &rid).await.unwrap();
        assert_eq!(dashboard.item_count, 37);
        assert_eq!(dashboard.orders.pending, 4);
        assert_eq!(dashboard.plan.limits.max_menu_items, Some(100));
        assert_eq!(dashboard.plan.branches_used, 1);
    }
}
