//! Customer-facing menu page

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{
    Branch, PublicBranch, PublicCategory, PublicMenu, PublicMenuSection, PublicRestaurant, Restaurant,
    ThemeSettings,
};
use crate::error::DomainError;
use crate::repositories::{
    BranchRepository, CategoryRepository, MenuItemRepository, MenuRepository, RestaurantRepository,
    ThemeRepository,
};

/// Open restaurant, the selected branch, and all active branches
#[derive(Debug)]
pub(crate) struct Storefront {
    pub restaurant: Restaurant,
    pub branch: Branch,
    pub branches: Vec<Branch>,
}

/// Resolve a public slug to an open restaurant and one of its active branches.
/// Without `branch_id` the main branch is used.
pub(crate) async fn resolve_storefront(
    restaurants: &dyn RestaurantRepository,
    branches: &dyn BranchRepository,
    slug: &str,
    branch_id: Option<Uuid>,
) -> Result<Storefront, DomainError> {
    let restaurant = restaurants
        .find_by_slug(&slug.trim().to_lowercase())
        .await?
        .filter(|r| !r.is_deleted())
        .ok_or(DomainError::RestaurantNotFound)?;
    if !restaurant.is_active {
        return Err(DomainError::RestaurantNotActive);
    }
    if !restaurant.is_subscription_active() {
        return Err(DomainError::SubscriptionExpired);
    }

    let active: Vec<Branch> = branches
        .list_by_restaurant(&restaurant.id)
        .await?
        .into_iter()
        .filter(|b| b.is_active && !b.is_deleted())
        .collect();

    let selected = match branch_id {
        Some(id) => active.iter().find(|b| b.id == id),
        None => active.iter().find(|b| b.is_main).or_else(|| active.first()),
    }
    .cloned()
    .ok_or(DomainError::BranchNotFound)?;

    Ok(Storefront { restaurant, branch: selected, branches: active })
}

pub struct PublicMenuService {
    restaurants: Arc<dyn RestaurantRepository>,
    branches: Arc<dyn BranchRepository>,
    menus: Arc<dyn MenuRepository>,
    categories: Arc<dyn CategoryRepository>,
    items: Arc<dyn MenuItemRepository>,
    themes: Arc<dyn ThemeRepository>,
}

impl PublicMenuService {
    pub fn new(
        restaurants: Arc<dyn RestaurantRepository>,
        branches: Arc<dyn BranchRepository>,
        menus: Arc<dyn MenuRepository>,
        categories: Arc<dyn CategoryRepository>,
        items: Arc<dyn MenuItemRepository>,
        themes: Arc<dyn ThemeRepository>,
    ) -> Self {
        Self { restaurants, branches, menus, categories, items, themes }
    }

    /// Active menus of the branch with their themes; inactive categories and
    /// categories without items are left out, unavailable items stay flagged
    pub async fn get_public_menu(&self, slug: &str, branch_id: Option<Uuid>) -> Result<PublicMenu, DomainError> {
        let storefront =
            resolve_storefront(self.restaurants.as_ref(), self.branches.as_ref(), slug, branch_id).await?;

        let mut sections = Vec::new();
        for menu in self.menus.list_active_by_branch(&storefront.branch.id).await? {
            let theme = self
                .themes
                .find_by_menu(&menu.id)
                .await?
                .unwrap_or_else(|| ThemeSettings::default_for(menu.id));

            let mut categories = Vec::new();
            for category in self.categories.list_by_menu(&menu.id).await? {
                if !category.is_active {
                    continue;
                }
                let items = self.items.list_by_category(&category.id).await?;
                if items.is_empty() {
                    continue;
                }
                categories.push(PublicCategory::new(category, items));
            }

            sections.push(PublicMenuSection::new(menu, theme, categories));
        }

        Ok(PublicMenu {
            restaurant: PublicRestaurant::from(&storefront.restaurant),
            branch: PublicBranch::from(&storefront.branch),
            branches: storefront.branches.iter().map(PublicBranch::from).collect(),
            menus: sections,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BillingCycle, BranchInput, Category, CategoryInput, Menu, MenuInput, MenuItem, MenuItemInput, Plan};
    use crate::repositories::branch_repository::MockBranchRepository;
    use crate::repositories::menu_repository::{MockCategoryRepository, MockMenuItemRepository, MockMenuRepository};
    use crate::repositories::restaurant_repository::MockRestaurantRepository;
    use crate::repositories::theme_repository::MockThemeRepository;
    use chrono::{Duration, Utc};

    fn restaurant() -> Restaurant {
        Restaurant::new(
            "Sate Madura".to_string(),
            "sate-madura".to_string(),
            Some("628123456789".to_string()),
            None,
            "USD".to_string(),
            Plan::Pro,
            BillingCycle::Monthly,
        )
        .unwrap()
    }

    fn branch(rid: Uuid, name: &str, is_main: bool) -> Branch {
        Branch::new(rid, BranchInput { name: name.to_string(), is_active: true, ..Default::default() }, is_main).unwrap()
    }

    fn restaurants_returning(r: Restaurant) -> MockRestaurantRepository {
        let mut repo = MockRestaurantRepository::new();
        repo.expect_find_by_slug().returning(move |_| Ok(Some(r.clone())));
        repo
    }

    #[tokio::test]
    async fn test_storefront_defaults_to_main_branch() {
        let r = restaurant();
        let rid = r.id;
        let side = branch(rid, "Cabang", false);
        let main = branch(rid, "Pusat", true);
        let main_id = main.id;
        let mut branches = MockBranchRepository::new();
        branches.expect_list_by_restaurant().returning(move |_| Ok(vec![side.clone(), main.clone()]));

        let sf = resolve_storefront(&restaurants_returning(r), &branches, "Sate-Madura", None).await.unwrap();
        assert_eq!(sf.branch.id, main_id);
        assert_eq!(sf.branches.len(), 2);
    }

    #[tokio::test]
    async fn test_storefront_rejects_foreign_branch() {
        let r = restaurant();
        let rid = r.id;
        let main = branch(rid, "Pusat", true);
        let mut branches = MockBranchRepository::new();
        branches.expect_list_by_restaurant().returning(move |_| Ok(vec![main.clone()]));

        let err = resolve_storefront(&restaurants_returning(r), &branches, "sate-madura", Some(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::BranchNotFound));
    }

    #[tokio::test]
    async fn test_storefront_closed_restaurants() {
        let mut inactive = restaurant();
        inactive.is_active = false;
        let err = resolve_storefront(&restaurants_returning(inactive), &MockBranchRepository::new(), "x", None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::RestaurantNotActive));

        let mut expired = restaurant();
        expired.subscription_expires_at = Some(Utc::now() - Duration::days(1));
        let err = resolve_storefront(&restaurants_returning(expired), &MockBranchRepository::new(), "x", None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::SubscriptionExpired));
    }

    #[tokio::test]
    async fn test_public_menu_skips_empty_and_inactive_categories() {
        let r = restaurant();
        let rid = r.id;
        let main = branch(rid, "Pusat", true);
        let bid = main.id;
        let menu = Menu::new(bid, MenuInput { name: "All day".to_string(), ..Default::default() }).unwrap();
        let mid = menu.id;

        let full = Category::new(mid, CategoryInput { name: "Sate".to_string(), ..Default::default() }, 0).unwrap();
        let empty = Category::new(mid, CategoryInput { name: "Empty".to_string(), ..Default::default() }, 1).unwrap();
        let hidden = Category::new(
            mid,
            CategoryInput { name: "Hidden".to_string(), is_active: Some(false), ..Default::default() },
            2,
        )
        .unwrap();
        let full_id = full.id;
        let mut sold_out = MenuItem::new(
            full_id,
            MenuItemInput { name: "Sate Kambing".to_string(), price_cents: 3000, ..Default::default() },
            0,
        )
        .unwrap();
        sold_out.is_available = false;

        let mut branches = MockBranchRepository::new();
        branches.expect_list_by_restaurant().returning(move |_| Ok(vec![main.clone()]));
        let mut menus = MockMenuRepository::new();
        menus.expect_list_active_by_branch().returning(move |_| Ok(vec![menu.clone()]));
        let mut categories = MockCategoryRepository::new();
        categories
            .expect_list_by_menu()
            .returning(move |_| Ok(vec![full.clone(), empty.clone(), hidden.clone()]));
        let mut items = MockMenuItemRepository::new();
        items.expect_list_by_category().returning(move |cid| {
            if *cid == full_id {
                Ok(vec![sold_out.clone()])
            } else {
                Ok(vec![])
            }
        });
        let mut themes = MockThemeRepository::new();
        themes.expect_find_by_menu().returning(|_| Ok(None));

        let service = PublicMenuService::new(
            Arc::new(restaurants_returning(r)),
            Arc::new(branches),
            Arc::new(menus),
            Arc::new(categories),
            Arc::new(items),
            Arc::new(themes),
        );
        let page = service.get_public_menu("sate-madura", None).await.unwrap();
        assert_eq!(page.menus.len(), 1);
        assert_eq!(page.menus[0].categories.len(), 1);
        assert_eq!(page.menus[0].categories[0].name, "Sate");
        assert!(!page.menus[0].categories[0].items[0].is_available);
        assert_eq!(page.menus[0].theme, ThemeSettings::default_for(mid));
    }
}
