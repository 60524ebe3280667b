//! Menu items: CRUD, availability, ordering and per-plan item limits

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::menu::is_permutation;
use crate::domain::{AuthContext, Category, MenuItem, MenuItemInput};
use crate::error::DomainError;
use crate::repositories::{CategoryRepository, MenuItemRepository, RestaurantRepository};

pub struct MenuItemService {
    items: Arc<dyn MenuItemRepository>,
    categories: Arc<dyn CategoryRepository>,
    restaurants: Arc<dyn RestaurantRepository>,
}

impl MenuItemService {
    pub fn new(
        items: Arc<dyn MenuItemRepository>,
        categories: Arc<dyn CategoryRepository>,
        restaurants: Arc<dyn RestaurantRepository>,
    ) -> Self {
        Self { items, categories, restaurants }
    }

    pub async fn list_items(&self, ctx: &AuthContext, category_id: &Uuid) -> Result<Vec<MenuItem>, DomainError> {
        let (category, _) = self.load_category(ctx, category_id).await?;
        self.items.list_by_category(&category.id).await
    }

    pub async fn create_item(
        &self,
        ctx: &AuthContext,
        category_id: &Uuid,
        mut input: MenuItemInput,
    ) -> Result<MenuItem, DomainError> {
        let (category, restaurant_id) = self.load_category(ctx, category_id).await?;

        let restaurant = self
            .restaurants
            .find_by_id(&restaurant_id)
            .await?
            .ok_or(DomainError::RestaurantNotFound)?;
        let count = self.items.count_by_restaurant(&restaurant_id).await?;
        let limits = restaurant.plan.limits();
        if !limits.allows_menu_item(count) {
            return Err(DomainError::PlanLimitReached(format!(
                "{} plan allows at most {} menu items",
                restaurant.plan.display_name(),
                limits.max_menu_items.unwrap_or_default()
            )));
        }

        input.category_id = None;
        let position = self.items.next_display_order(&category.id).await?;
        let item = MenuItem::new(category.id, input, position)?;
        let created = self.items.create(&item).await?;
        info!("Menu item {} created in category {}", created.id, category.id);
        Ok(created)
    }

    /// May move the item to another category of the same restaurant
    pub async fn update_item(&self, ctx: &AuthContext, id: &Uuid, input: MenuItemInput) -> Result<MenuItem, DomainError> {
        let (mut item, restaurant_id) = self.load_item(ctx, id).await?;

        let moved_to = input.category_id.filter(|target| *target != item.category_id);
        if let Some(target) = moved_to {
            self.categories
                .find_by_id(&target)
                .await?
                .filter(|c| c.removed_at.is_none())
                .ok_or(DomainError::CategoryNotFound)?;
            if self.categories.restaurant_id_of(&target).await? != Some(restaurant_id) {
                return Err(DomainError::CategoryNotFound);
            }
        }

        item.update(input)?;
        if let Some(target) = moved_to {
            item.display_order = self.items.next_display_order(&target).await?;
        }
        self.items.update(&item).await
    }

    pub async fn set_available(&self, ctx: &AuthContext, id: &Uuid, available: bool) -> Result<MenuItem, DomainError> {
        let (mut item, _) = self.load_item(ctx, id).await?;
        item.set_available(available);
        self.items.update(&item).await
    }

    pub async fn delete_item(&self, ctx: &AuthContext, id: &Uuid) -> Result<(), DomainError> {
        let (item, _) = self.load_item(ctx, id).await?;
        self.items.soft_delete(&item.id).await
    }

    pub async fn reorder_items(
        &self,
        ctx: &AuthContext,
        category_id: &Uuid,
        ordered_ids: &[Uuid],
    ) -> Result<Vec<MenuItem>, DomainError> {
        let (category, _) = self.load_category(ctx, category_id).await?;
        let existing: Vec<Uuid> = self.items.list_by_category(&category.id).await?.iter().map(|i| i.id).collect();
        if !is_permutation(&existing, ordered_ids) {
            return Err(DomainError::ValidationError(
                "item order must list every item of the category exactly once".to_string(),
            ));
        }
        self.items.reorder(&category.id, ordered_ids).await?;
        self.items.list_by_category(&category.id).await
    }

    async fn load_category(&self, ctx: &AuthContext, id: &Uuid) -> Result<(Category, Uuid), DomainError> {
        let category = self
            .categories
            .find_by_id(id)
            .await?
            .filter(|c| c.removed_at.is_none())
            .ok_or(DomainError::CategoryNotFound)?;
        let restaurant_id = self
            .categories
            .restaurant_id_of(id)
            .await?
            .ok_or(DomainError::CategoryNotFound)?;
        ctx.ensure_restaurant(restaurant_id)?;
        Ok((category, restaurant_id))
    }

    async fn load_item(&self, ctx: &AuthContext, id: &Uuid) -> Result<(MenuItem, Uuid), DomainError> {
        let item = self
            .items
            .find_by_id(id)
            .await?
            .filter(|i| i.removed_at.is_none())
            .ok_or(DomainError::MenuItemNotFound)?;
        let restaurant_id = self.items.restaurant_id_of(id).await?.ok_or(DomainError::MenuItemNotFound)?;
        ctx.ensure_restaurant(restaurant_id)?;
        Ok((item, restaurant_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BillingCycle, CategoryInput, Plan, Restaurant, UserRole};
    use crate::repositories::menu_repository::{MockCategoryRepository, MockMenuItemRepository};
    use crate::repositories::restaurant_repository::MockRestaurantRepository;

    fn ctx_for(restaurant_id: Uuid) -> AuthContext {
        AuthContext {
            user_id: Uuid::new_v4(),
            username: "owner".to_string(),
            role: UserRole::RestaurantAdmin,
            restaurant_id: Some(restaurant_id),
            session_id: None,
        }
    }

    fn category() -> Category {
        Category::new(Uuid::new_v4(), CategoryInput { name: "Mains".to_string(), ..Default::default() }, 0).unwrap()
    }

    fn item_input(name: &str) -> MenuItemInput {
        MenuItemInput { name: name.to_string(), price_cents: 1200, ..Default::default() }
    }

    fn restaurant(plan: Plan) -> Restaurant {
        Restaurant::new(
            "Mie Ayam".to_string(),
            "mie-ayam".to_string(),
            None,
            None,
            "USD".to_string(),
            plan,
            BillingCycle::Monthly,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_item_limit_enforced() {
        let r = restaurant(Plan::Basic);
        let rid = r.id;
        let c = category();
        let cid = c.id;

        let mut categories = MockCategoryRepository::new();
        categories.expect_find_by_id().returning(move |_| Ok(Some(c.clone())));
        categories.expect_restaurant_id_of().returning(move |_| Ok(Some(rid)));
        let mut restaurants = MockRestaurantRepository::new();
        restaurants.expect_find_by_id().returning(move |_| Ok(Some(r.clone())));
        let mut items = MockMenuItemRepository::new();
        items.expect_count_by_restaurant().returning(|_| Ok(100));
        items.expect_create().never();

        let service = MenuItemService::new(Arc::new(items), Arc::new(categories), Arc::new(restaurants));
        let err = service.create_item(&ctx_for(rid), &cid, item_input("Bakso")).await.unwrap_err();
        assert!(matches!(err, DomainError::PlanLimitReached(_)));
    }

    #[tokio::test]
    async fn test_create_item_in_path_category() {
        let r = restaurant(Plan::Pro);
        let rid = r.id;
        let c = category();
        let cid = c.id;

        let mut categories = MockCategoryRepository::new();
        categories.expect_find_by_id().returning(move |_| Ok(Some(c.clone())));
        categories.expect_restaurant_id_of().returning(move |_| Ok(Some(rid)));
        let mut restaurants = MockRestaurantRepository::new();
        restaurants.expect_find_by_id().returning(move |_| Ok(Some(r.clone())));
        let mut items = MockMenuItemRepository::new();
        items.expect_count_by_restaurant().returning(|_| Ok(10));
        items.expect_next_display_order().returning(|_| Ok(2));
        items.expect_create().returning(|i| Ok(i.clone()));

        let service = MenuItemService::new(Arc::new(items), Arc::new(categories), Arc::new(restaurants));
        let mut input = item_input("Bakso");
        input.category_id = Some(Uuid::new_v4());
        let created = service.create_item(&ctx_for(rid), &cid, input).await.unwrap();
        assert_eq!(created.category_id, cid);
        assert_eq!(created.display_order, 2);
    }

    #[tokio::test]
    async fn test_move_to_foreign_category_rejected() {
        let rid = Uuid::new_v4();
        let item = MenuItem::new(Uuid::new_v4(), item_input("Bakso"), 0).unwrap();
        let iid = item.id;
        let foreign = category();
        let foreign_id = foreign.id;

        let mut items = MockMenuItemRepository::new();
        items.expect_find_by_id().returning(move |_| Ok(Some(item.clone())));
        items.expect_restaurant_id_of().returning(move |_| Ok(Some(rid)));
        items.expect_update().never();
        let mut categories = MockCategoryRepository::new();
        categories.expect_find_by_id().returning(move |_| Ok(Some(foreign.clone())));
        categories.expect_restaurant_id_of().returning(|_| Ok(Some(Uuid::new_v4())));

        let service = MenuItemService::new(
            Arc::new(items),
            Arc::new(categories),
            Arc::new(MockRestaurantRepository::new()),
        );
        let mut input = item_input("Bakso");
        input.category_id = Some(foreign_id);
        let err = service.update_item(&ctx_for(rid), &iid, input).await.unwrap_err();
        assert!(matches!(err, DomainError::CategoryNotFound));
    }

    #[tokio::test]
    async fn test_toggle_availability() {
        let rid = Uuid::new_v4();
        let item = MenuItem::new(Uuid::new_v4(), item_input("Bakso"), 0).unwrap();
        let iid = item.id;
        let mut items = MockMenuItemRepository::new();
        items.expect_find_by_id().returning(move |_| Ok(Some(item.clone())));
        items.expect_restaurant_id_of().returning(move |_| Ok(Some(rid)));
        items.expect_update().returning(|i| Ok(i.clone()));

        let service = MenuItemService::new(
            Arc::new(items),
            Arc::new(MockCategoryRepository::new()),
            Arc::new(MockRestaurantRepository::new()),
        );
        let updated = service.set_available(&ctx_for(rid), &iid, false).await.unwrap();
        assert!(!updated.is_available);
    }

    fn reorder_fixture(rid: Uuid) -> (MockCategoryRepository, MenuItem, MenuItem, Uuid) {
        let c = category();
        let cid = c.id;
        let a = MenuItem::new(cid, item_input("Bakso"), 0).unwrap();
        let b = MenuItem::new(cid, item_input("Soto"), 1).unwrap();
        let mut categories = MockCategoryRepository::new();
        categories.expect_find_by_id().returning(move |_| Ok(Some(c.clone())));
        categories.expect_restaurant_id_of().returning(move |_| Ok(Some(rid)));
        (categories, a, b, cid)
    }

    #[tokio::test]
    async fn test_reorder_items_requires_exact_set() {
        let rid = Uuid::new_v4();
        let (categories, a, b, cid) = reorder_fixture(rid);
        let (a_id, b_id) = (a.id, b.id);

        let mut items = MockMenuItemRepository::new();
        items.expect_list_by_category().returning(move |_| Ok(vec![a.clone(), b.clone()]));
        items.expect_reorder().never();

        let service = MenuItemService::new(
            Arc::new(items),
            Arc::new(categories),
            Arc::new(MockRestaurantRepository::new()),
        );
        let err = service.reorder_items(&ctx_for(rid), &cid, &[b_id]).await.unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
        let err = service
            .reorder_items(&ctx_for(rid), &cid, &[a_id, b_id, a_id])
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
        let err = service
            .reorder_items(&ctx_for(rid), &cid, &[a_id, Uuid::new_v4()])
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_reorder_items_applies_permutation() {
        let rid = Uuid::new_v4();
        let (categories, a, b, cid) = reorder_fixture(rid);
        let (a_id, b_id) = (a.id, b.id);

        let mut items = MockMenuItemRepository::new();
        items.expect_list_by_category().returning(move |_| Ok(vec![a.clone(), b.clone()]));
        items
            .expect_reorder()
            .withf(move |category_id, ids| *category_id == cid && ids.to_vec() == vec![b_id, a_id])
            .times(1)
            .returning(|_, _| Ok(()));

        let service = MenuItemService::new(
            Arc::new(items),
            Arc::new(categories),
            Arc::new(MockRestaurantRepository::new()),
        );
        let listed = service.reorder_items(&ctx_for(rid), &cid, &[b_id, a_id]).await.unwrap();
        assert_eq!(listed.len(), 2);
    }
}
