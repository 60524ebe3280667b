//! Restaurant profile and root-admin tenant management

use std::sync::Arc;

use resto_shared::{Page, Pagination};
use tracing::info;
use uuid::Uuid;

use crate::domain::{
    AuthContext, BillingCycle, Plan, PlatformStats, Restaurant, RestaurantProfileUpdate,
    RestaurantQuery, RestaurantSummary,
};
use crate::error::DomainError;
use crate::repositories::RestaurantRepository;

pub struct RestaurantService {
    restaurants: Arc<dyn RestaurantRepository>,
}

impl RestaurantService {
    pub fn new(restaurants: Arc<dyn RestaurantRepository>) -> Self {
        Self { restaurants }
    }

    pub async fn get(&self, ctx: &AuthContext, id: &Uuid) -> Result<Restaurant, DomainError> {
        ctx.ensure_restaurant(*id)?;
        self.load(id).await
    }

    pub async fn update_profile(
        &self,
        ctx: &AuthContext,
        id: &Uuid,
        patch: RestaurantProfileUpdate,
    ) -> Result<Restaurant, DomainError> {
        ctx.ensure_restaurant(*id)?;
        let mut restaurant = self.load(id).await?;
        patch.apply(&mut restaurant)?;
        let updated = self.restaurants.update(&restaurant).await?;
        info!("Restaurant {} profile updated by {}", id, ctx.user_id);
        Ok(updated)
    }

    pub async fn list(
        &self,
        ctx: &AuthContext,
        query: &RestaurantQuery,
        pagination: &Pagination,
    ) -> Result<Page<RestaurantSummary>, DomainError> {
        ctx.ensure_root()?;
        self.restaurants.list(query, &pagination.normalized()).await
    }

    pub async fn set_active(&self, ctx: &AuthContext, id: &Uuid, active: bool) -> Result<Restaurant, DomainError> {
        ctx.ensure_root()?;
        let mut restaurant = self.load(id).await?;
        restaurant.set_active(active);
        let updated = self.restaurants.update(&restaurant).await?;
        info!("Restaurant {} set active={} by {}", id, active, ctx.user_id);
        Ok(updated)
    }

    /// Switch plan; the subscription period restarts from now
    pub async fn change_plan(
        &self,
        ctx: &AuthContext,
        id: &Uuid,
        plan: Plan,
        cycle: BillingCycle,
    ) -> Result<Restaurant, DomainError> {
        ctx.ensure_root()?;
        let mut restaurant = self.load(id).await?;
        restaurant.change_plan(plan, cycle);
        let updated = self.restaurants.update(&restaurant).await?;
        info!("Restaurant {} moved to plan {} ({})", id, plan.as_str(), cycle.as_str());
        Ok(updated)
    }

    pub async fn platform_stats(&self, ctx: &AuthContext) -> Result<PlatformStats, DomainError> {
        ctx.ensure_root()?;
        self.restaurants.platform_stats().await
    }

    async fn load(&self, id: &Uuid) -> Result<Restaurant, DomainError> {
        self.restaurants
            .find_by_id(id)
            .await?
            .filter(|r| !r.is_deleted())
            .ok_or(DomainError::RestaurantNotFound)
    }
}
