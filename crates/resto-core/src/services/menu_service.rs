// ============================================================================
// Resto Core - Menu Service
// File: crates/resto-core/src/services/menu_service.rs
// Description: Branch menus and their categories
// ============================================================================

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::domain::menu::is_permutation;
use crate::domain::{AuthContext, Branch, Category, CategoryInput, Menu, MenuInput};
use crate::error::DomainError;
use crate::repositories::{BranchRepository, CategoryRepository, MenuRepository};

pub struct MenuService {
    menus: Arc<dyn MenuRepository>,
    categories: Arc<dyn CategoryRepository>,
    branches: Arc<dyn BranchRepository>,
}

impl MenuService {
    pub fn new(
        menus: Arc<dyn MenuRepository>,
        categories: Arc<dyn CategoryRepository>,
        branches: Arc<dyn BranchRepository>,
    ) -> Self {
        Self { menus, categories, branches }
    }

    // ---- Menus --------------------------------------------------------------

    pub async fn list_menus(&self, ctx: &AuthContext, branch_id: &Uuid) -> Result<Vec<Menu>, DomainError> {
        let branch = self.load_branch(ctx, branch_id).await?;
        self.menus.list_by_branch(&branch.id).await
    }

    pub async fn get_menu(&self, ctx: &AuthContext, id: &Uuid) -> Result<Menu, DomainError> {
        self.load_menu(ctx, id).await
    }

    pub async fn create_menu(&self, ctx: &AuthContext, branch_id: &Uuid, input: MenuInput) -> Result<Menu, DomainError> {
        let branch = self.load_branch(ctx, branch_id).await?;
        let menu = Menu::new(branch.id, input)?;
        let created = self.menus.create(&menu).await?;
        info!("Menu {} created in branch {}", created.id, branch.id);
        Ok(created)
    }

    pub async fn update_menu(&self, ctx: &AuthContext, id: &Uuid, input: MenuInput) -> Result<Menu, DomainError> {
        let mut menu = self.load_menu(ctx, id).await?;
        menu.update(input)?;
        self.menus.update(&menu).await
    }

    pub async fn set_menu_active(&self, ctx: &AuthContext, id: &Uuid, active: bool) -> Result<Menu, DomainError> {
        let mut menu = self.load_menu(ctx, id).await?;
        menu.is_active = active;
        menu.modified_at = Some(Utc::now());
        self.menus.update(&menu).await
    }

    /// Soft delete; the menu and everything under it leaves the public page
    pub async fn delete_menu(&self, ctx: &AuthContext, id: &Uuid) -> Result<(), DomainError> {
        let menu = self.load_menu(ctx, id).await?;
        self.menus.soft_delete(&menu.id).await?;
        info!("Menu {} deleted by {}", menu.id, ctx.user_id);
        Ok(())
    }

    // ---- Categories ---------------------------------------------------------

    pub async fn list_categories(&self, ctx: &AuthContext, menu_id: &Uuid) -> Result<Vec<Category>, DomainError> {
        let menu = self.load_menu(ctx, menu_id).await?;
        self.categories.list_by_menu(&menu.id).await
    }

    /// New categories go to the end of the menu
    pub async fn create_category(
        &self,
        ctx: &AuthContext,
        menu_id: &Uuid,
        input: CategoryInput,
    ) -> Result<Category, DomainError> {
        let menu = self.load_menu(ctx, menu_id).await?;
        let position = self.categories.next_display_order(&menu.id).await?;
        let category = Category::new(menu.id, input, position)?;
        self.categories.create(&category).await
    }

    pub async fn update_category(
        &self,
        ctx: &AuthContext,
        id: &Uuid,
        input: CategoryInput,
    ) -> Result<Category, DomainError> {
        let mut category = self.load_category(ctx, id).await?;
        category.update(input)?;
        self.categories.update(&category).await
    }

    pub async fn delete_category(&self, ctx: &AuthContext, id: &Uuid) -> Result<(), DomainError> {
        let category = self.load_category(ctx, id).await?;
        self.categories.soft_delete(&category.id).await
    }

    /// `ordered_ids` must list exactly the menu's categories
    pub async fn reorder_categories(
        &self,
        ctx: &AuthContext,
        menu_id: &Uuid,
        ordered_ids: &[Uuid],
    ) -> Result<Vec<Category>, DomainError> {
        let menu = self.load_menu(ctx, menu_id).await?;
        let existing: Vec<Uuid> = self.categories.list_by_menu(&menu.id).await?.iter().map(|c| c.id).collect();
        if !is_permutation(&existing, ordered_ids) {
            return Err(DomainError::ValidationError(
                "category order must list every category of the menu exactly once".to_string(),
            ));
        }
        self.categories.reorder(&menu.id, ordered_ids).await?;
        self.categories.list_by_menu(&menu.id).await
    }

    // ---- Ownership ----------------------------------------------------------

    async fn load_branch(&self, ctx: &AuthContext, id: &Uuid) -> Result<Branch, DomainError> {
        let branch = self
            .branches
            .find_by_id(id)
            .await?
            .filter(|b| !b.is_deleted())
            .ok_or(DomainError::BranchNotFound)?;
        ctx.ensure_restaurant(branch.restaurant_id)?;
        Ok(branch)
    }

    async fn load_menu(&self, ctx: &AuthContext, id: &Uuid) -> Result<Menu, DomainError> {
        let menu = self
            .menus
            .find_by_id(id)
            .await?
            .filter(|m| m.removed_at.is_none())
            .ok_or(DomainError::MenuNotFound)?;
        let restaurant_id = self.menus.restaurant_id_of(id).await?.ok_or(DomainError::MenuNotFound)?;
        ctx.ensure_restaurant(restaurant_id)?;
        Ok(menu)
    }

    async fn load_category(&self, ctx: &AuthContext, id: &Uuid) -> Result<Category, DomainError> {
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
        Ok(category)
    }
}
