//! Menu, category and menu item repository traits (ports)

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, Menu, MenuItem};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MenuRepository: Send + Sync {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Menu>, DomainError>;
    async fn list_by_branch(&self, branch_id: &Uuid) -> Result<Vec<Menu>, DomainError>;
    async fn list_active_by_branch(&self, branch_id: &Uuid) -> Result<Vec<Menu>, DomainError>;
    async fn count_by_restaurant(&self, restaurant_id: &Uuid) -> Result<i64, DomainError>;
    /// Owning restaurant through the branch
    async fn restaurant_id_of(&self, menu_id: &Uuid) -> Result<Option<Uuid>, DomainError>;
    async fn create(&self, menu: &Menu) -> Result<Menu, DomainError>;
    async fn update(&self, menu: &Menu) -> Result<Menu, DomainError>;
    async fn soft_delete(&self, id: &Uuid) -> Result<(), DomainError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Category>, DomainError>;
    /// Non-deleted categories in display order
    async fn list_by_menu(&self, menu_id: &Uuid) -> Result<Vec<Category>, DomainError>;
    async fn next_display_order(&self, menu_id: &Uuid) -> Result<i32, DomainError>;
    async fn restaurant_id_of(&self, category_id: &Uuid) -> Result<Option<Uuid>, DomainError>;
    async fn create(&self, category: &Category) -> Result<Category, DomainError>;
    async fn update(&self, category: &Category) -> Result<Category, DomainError>;
    async fn soft_delete(&self, id: &Uuid) -> Result<(), DomainError>;
    /// Positions become the index in `ordered_ids`
    async fn reorder(&self, menu_id: &Uuid, ordered_ids: &[Uuid]) -> Result<(), DomainError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MenuItemRepository: Send + Sync {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<MenuItem>, DomainError>;
    /// Non-deleted items in display order
    async fn list_by_category(&self, category_id: &Uuid) -> Result<Vec<MenuItem>, DomainError>;
    async fn next_display_order(&self, category_id: &Uuid) -> Result<i32, DomainError>;
    async fn count_by_restaurant(&self, restaurant_id: &Uuid) -> Result<i64, DomainError>;
    async fn restaurant_id_of(&self, item_id: &Uuid) -> Result<Option<Uuid>, DomainError>;
    /// Items among `ids` that sit in an active, non-deleted menu and category
    /// of the branch
    async fn find_orderable(&self, branch_id: &Uuid, ids: &[Uuid]) -> Result<Vec<MenuItem>, DomainError>;
    async fn create(&self, item: &MenuItem) -> Result<MenuItem, DomainError>;
    async fn update(&self, item: &MenuItem) -> Result<MenuItem, DomainError>;
    async fn soft_delete(&self, id: &Uuid) -> Result<(), DomainError>;
    async fn reorder(&self, category_id: &Uuid, ordered_ids: &[Uuid]) -> Result<(), DomainError>;
}
