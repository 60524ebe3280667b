//! Branch management with the single-main-branch rule and plan limits

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::{AuthContext, Branch, BranchInput};
use crate::error::DomainError;
use crate::repositories::{BranchRepository, RestaurantRepository};

pub struct BranchService {
    branches: Arc<dyn BranchRepository>,
    restaurants: Arc<dyn RestaurantRepository>,
}

impl BranchService {
    pub fn new(branches: Arc<dyn BranchRepository>, restaurants: Arc<dyn RestaurantRepository>) -> Self {
        Self { branches, restaurants }
    }

    pub async fn list(&self, ctx: &AuthContext, restaurant_id: &Uuid) -> Result<Vec<Branch>, DomainError> {
        ctx.ensure_restaurant(*restaurant_id)?;
        self.branches.list_by_restaurant(restaurant_id).await
    }

    pub async fn get(&self, ctx: &AuthContext, id: &Uuid) -> Result<Branch, DomainError> {
        self.load(ctx, id).await
    }

    /// The first branch of a restaurant becomes its main branch
    pub async fn create(
        &self,
        ctx: &AuthContext,
        restaurant_id: &Uuid,
        input: BranchInput,
    ) -> Result<Branch, DomainError> {
        ctx.ensure_restaurant(*restaurant_id)?;
        let restaurant = self
            .restaurants
            .find_by_id(restaurant_id)
            .await?
            .filter(|r| !r.is_deleted())
            .ok_or(DomainError::RestaurantNotFound)?;

        let count = self.branches.count_by_restaurant(restaurant_id).await?;
        let limits = restaurant.plan.limits();
        if !limits.allows_branch(count) {
            return Err(DomainError::PlanLimitReached(format!(
                "{} plan allows at most {} branches",
                restaurant.plan.display_name(),
                limits.max_branches.unwrap_or_default()
            )));
        }

        let branch = Branch::new(*restaurant_id, input, count == 0)?;
        let created = self.branches.create(&branch).await?;
        info!("Branch {} created for restaurant {} (main={})", created.id, restaurant_id, created.is_main);
        Ok(created)
    }

    pub async fn update(&self, ctx: &AuthContext, id: &Uuid, input: BranchInput) -> Result<Branch, DomainError> {
        let mut branch = self.load(ctx, id).await?;
        if branch.is_main && !input.is_active {
            return Err(DomainError::CannotDeactivateMainBranch);
        }
        branch.update(input)?;
        self.branches.update(&branch).await
    }

    pub async fn set_main(&self, ctx: &AuthContext, id: &Uuid) -> Result<Branch, DomainError> {
        let mut branch = self.load(ctx, id).await?;
        if branch.is_main {
            return Ok(branch);
        }
        if !branch.is_active {
            return Err(DomainError::ValidationError("an inactive branch cannot be the main branch".to_string()));
        }

        self.branches.set_main(&branch.restaurant_id, &branch.id).await?;
        info!("Branch {} is now main for restaurant {}", branch.id, branch.restaurant_id);
        branch.is_main = true;
        Ok(branch)
    }

    pub async fn delete(&self, ctx: &AuthContext, id: &Uuid) -> Result<(), DomainError> {
        let branch = self.load(ctx, id).await?;
        if branch.is_main {
            return Err(DomainError::CannotDeleteMainBranch);
        }
        self.branches.soft_delete(&branch.id).await?;
        info!("Branch {} deleted by {}", branch.id, ctx.user_id);
        Ok(())
    }

    async fn load(&self, ctx: &AuthContext, id: &Uuid) -> Result<Branch, DomainError> {
        let branch = self
            .branches
            .find_by_id(id)
            .await?
            .filter(|b| !b.is_deleted())
            .ok_or(DomainError::BranchNotFound)?;
        ctx.ensure_restaurant(branch.restaurant_id)?;
        Ok(branch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BillingCycle, Plan, Restaurant, UserRole};
    use crate::repositories::branch_repository::MockBranchRepository;
    use crate::repositories::restaurant_repository::MockRestaurantRepository;

    fn restaurant(plan: Plan) -> Restaurant {
        Restaurant::new(
            "Ayam Bakar".to_string(),
            "ayam-bakar".to_string(),
            None,
            None,
            "USD".to_string(),
            plan,
            BillingCycle::Monthly,
        )
        .unwrap()
    }

    fn ctx_for(restaurant_id: Uuid) -> AuthContext {
        AuthContext {
            user_id: Uuid::new_v4(),
            username: "owner".to_string(),
            role: UserRole::RestaurantAdmin,
            restaurant_id: Some(restaurant_id),
            session_id: None,
        }
    }

    fn input(name: &str, is_active: bool) -> BranchInput {
        BranchInput { name: name.to_string(), is_active, ..Default::default() }
    }

    #[tokio::test]
    async fn test_first_branch_is_main() {
        let r = restaurant(Plan::Pro);
        let rid = r.id;
        let mut restaurants = MockRestaurantRepository::new();
        restaurants.expect_find_by_id().returning(move |_| Ok(Some(r.clone())));
        let mut branches = MockBranchRepository::new();
        branches.expect_count_by_restaurant().returning(|_| Ok(0));
        branches.expect_create().returning(|b| Ok(b.clone()));

        let service = BranchService::new(Arc::new(branches), Arc::new(restaurants));
        let branch = service.create(&ctx_for(rid), &rid, input("Pusat", false)).await.unwrap();
        assert!(branch.is_main);
        assert!(branch.is_active);
    }

    #[tokio::test]
    async fn test_basic_plan_branch_limit() {
        let r = restaurant(Plan::Basic);
        let rid = r.id;
        let mut restaurants = MockRestaurantRepository::new();
        restaurants.expect_find_by_id().returning(move |_| Ok(Some(r.clone())));
        let mut branches = MockBranchRepository::new();
        branches.expect_count_by_restaurant().returning(|_| Ok(1));
        branches.expect_create().never();

        let service = BranchService::new(Arc::new(branches), Arc::new(restaurants));
        let err = service.create(&ctx_for(rid), &rid, input("Cabang 2", true)).await.unwrap_err();
        assert!(matches!(err, DomainError::PlanLimitReached(_)));
    }

    #[tokio::test]
    async fn test_main_branch_cannot_be_deleted_or_deactivated() {
        let rid = Uuid::new_v4();
        let main = Branch::new(rid, input("Pusat", true), true).unwrap();
        let id = main.id;
        let mut branches = MockBranchRepository::new();
        branches.expect_find_by_id().returning(move |_| Ok(Some(main.clone())));
        branches.expect_soft_delete().never();
        branches.expect_update().never();

        let service = BranchService::new(Arc::new(branches), Arc::new(MockRestaurantRepository::new()));
        let ctx = ctx_for(rid);
        assert!(matches!(
            service.delete(&ctx, &id).await.unwrap_err(),
            DomainError::CannotDeleteMainBranch
        ));
        assert!(matches!(
            service.update(&ctx, &id, input("Pusat", false)).await.unwrap_err(),
            DomainError::CannotDeactivateMainBranch
        ));
    }

    #[tokio::test]
    async fn test_delete_rejected_when_branch_became_main() {
        let rid = Uuid::new_v4();
        // Loaded as a regular branch, promoted before the delete reaches the store
        let stale = Branch::new(rid, input("Cabang", true), false).unwrap();
        let id = stale.id;
        let mut branches = MockBranchRepository::new();
        branches.expect_find_by_id().returning(move |_| Ok(Some(stale.clone())));
        branches
            .expect_soft_delete()
            .times(1)
            .returning(|_| Err(DomainError::CannotDeleteMainBranch));

        let service = BranchService::new(Arc::new(branches), Arc::new(MockRestaurantRepository::new()));
        let err = service.delete(&ctx_for(rid), &id).await.unwrap_err();
        assert!(matches!(err, DomainError::CannotDeleteMainBranch));
    }

    #[tokio::test]
    async fn test_set_main_moves_flag() {
        let rid = Uuid::new_v4();
        let branch = Branch::new(rid, input("Cabang", true), false).unwrap();
        let id = branch.id;
        let mut branches = MockBranchRepository::new();
        branches.expect_find_by_id().returning(move |_| Ok(Some(branch.clone())));
        branches
            .expect_set_main()
            .withf(move |r, b| *r == rid && *b == id)
            .times(1)
            .returning(|_, _| Ok(()));

        let service = BranchService::new(Arc::new(branches), Arc::new(MockRestaurantRepository::new()));
        let updated = service.set_main(&ctx_for(rid), &id).await.unwrap();
        assert!(updated.is_main);
    }

    #[tokio::test]
    async fn test_other_tenant_branch_forbidden() {
        let branch = Branch::new(Uuid::new_v4(), input("Cabang", true), false).unwrap();
        let id = branch.id;
        let mut branches = MockBranchRepository::new();
        branches.expect_find_by_id().returning(move |_| Ok(Some(branch.clone())));

        let service = BranchService::new(Arc::new(branches), Arc::new(MockRestaurantRepository::new()));
        let err = service.get(&ctx_for(Uuid::new_v4()), &id).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }
}
