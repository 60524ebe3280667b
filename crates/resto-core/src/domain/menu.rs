// ============================================================================
// Resto Core - Menu, Category and Menu Item Entities
// File: crates/resto-core/src/domain/menu.rs
// Description: Branch menus, their categories and purchasable items
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::restaurant::non_empty;

/// Menu entity (scoped to one branch)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Menu {
    pub id: Uuid,
    pub branch_id: Uuid,

    #[validate(length(min = 1, max = 100, message = "Menu name must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(length(max = 1000, message = "Description too long"))]
    pub description: Option<String>,

    pub is_active: bool,
    pub display_order: i32,

    // Audit fields
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
    pub removed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuInput {
    pub name: String,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub display_order: Option<i32>,
}

impl Menu {
    pub fn new(branch_id: Uuid, input: MenuInput) -> Result<Self, validator::ValidationErrors> {
        let menu = Self {
            id: Uuid::new_v4(),
            branch_id,
            name: input.name.trim().to_string(),
            description: input.description.and_then(non_empty),
            is_active: input.is_active.unwrap_or(true),
            display_order: input.display_order.unwrap_or(0),
            created_at: Utc::now(),
            modified_at: None,
            removed_at: None,
        };
        menu.validate()?;
        Ok(menu)
    }

    pub fn update(&mut self, input: MenuInput) -> Result<(), validator::ValidationErrors> {
        self.name = input.name.trim().to_string();
        self.description = input.description.and_then(non_empty);
        if let Some(active) = input.is_active {
            self.is_active = active;
        }
        if let Some(order) = input.display_order {
            self.display_order = order;
        }
        self.modified_at = Some(Utc::now());
        self.validate()
    }
}

/// Category entity (grouping inside a menu)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Category {
    pub id: Uuid,
    pub menu_id: Uuid,

    #[validate(length(min = 1, max = 100, message = "Category name must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(length(max = 1000, message = "Description too long"))]
    pub description: Option<String>,

    pub display_order: i32,
    pub is_active: bool,

    // Audit fields
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
    pub removed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

impl Category {
    pub fn new(menu_id: Uuid, input: CategoryInput, display_order: i32) -> Result<Self, validator::ValidationErrors> {
        let category = Self {
            id: Uuid::new_v4(),
            menu_id,
            name: input.name.trim().to_string(),
            description: input.description.and_then(non_empty),
            display_order,
            is_active: input.is_active.unwrap_or(true),
            created_at: Utc::now(),
            modified_at: None,
            removed_at: None,
        };
        category.validate()?;
        Ok(category)
    }

    pub fn update(&mut self, input: CategoryInput) -> Result<(), validator::ValidationErrors> {
        self.name = input.name.trim().to_string();
        self.description = input.description.and_then(non_empty);
        if let Some(active) = input.is_active {
            self.is_active = active;
        }
        self.modified_at = Some(Utc::now());
        self.validate()
    }
}

/// Menu item entity; prices are minor currency units
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MenuItem {
    pub id: Uuid,
    pub category_id: Uuid,

    #[validate(length(min = 1, max = 150, message = "Item name must be between 1 and 150 characters"))]
    pub name: String,

    #[validate(length(max = 1000, message = "Description too long"))]
    pub description: Option<String>,

    #[validate(range(min = 0, max = 100_000_000, message = "Price out of range"))]
    pub price_cents: i64,

    #[validate(length(max = 2048, message = "Image URL too long"))]
    pub image_url: Option<String>,

    pub is_available: bool,
    pub display_order: i32,

    // Audit fields
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
    pub removed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuItemInput {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub image_url: Option<String>,
    pub is_available: Option<bool>,
    /// Move to another category of the same restaurant
    pub category_id: Option<Uuid>,
}

impl MenuItem {
    pub fn new(category_id: Uuid, input: MenuItemInput, display_order: i32) -> Result<Self, validator::ValidationErrors> {
        let item = Self {
            id: Uuid::new_v4(),
            category_id,
            name: input.name.trim().to_string(),
            description: input.description.and_then(non_empty),
            price_cents: input.price_cents,
            image_url: input.image_url.and_then(non_empty),
            is_available: input.is_available.unwrap_or(true),
            display_order,
            created_at: Utc::now(),
            modified_at: None,
            removed_at: None,
        };
        item.validate()?;
        Ok(item)
    }

    pub fn update(&mut self, input: MenuItemInput) -> Result<(), validator::ValidationErrors> {
        self.name = input.name.trim().to_string();
        self.description = input.description.and_then(non_empty);
        self.price_cents = input.price_cents;
        self.image_url = input.image_url.and_then(non_empty);
        if let Some(available) = input.is_available {
            self.is_available = available;
        }
        if let Some(category_id) = input.category_id {
            self.category_id = category_id;
        }
        self.modified_at = Some(Utc::now());
        self.validate()
    }

    pub fn set_available(&mut self, available: bool) {
        self.is_available = available;
        self.modified_at = Some(Utc::now());
    }
}

/// Check that `ordered` is a permutation of `existing`
pub fn is_permutation(existing: &[Uuid], ordered: &[Uuid]) -> bool {
    if existing.len() != ordered.len() {
        return false;
    }
    let mut a = existing.to_vec();
    let mut b = ordered.to_vec();
    a.sort();
    b.sort();
    a == b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_price_rejected() {
        let input = MenuItemInput {
            name: "Nasi Goreng".to_string(),
            price_cents: -1,
            ..Default::default()
        };
        assert!(MenuItem::new(Uuid::new_v4(), input, 0).is_err());
    }

    #[test]
    fn test_item_update_moves_category() {
        let input = MenuItemInput {
            name: "Es Teh".to_string(),
            price_cents: 800,
            ..Default::default()
        };
        let mut item = MenuItem::new(Uuid::new_v4(), input.clone(), 0).unwrap();
        assert!(item.is_available);

        let target = Uuid::new_v4();
        item.update(MenuItemInput { category_id: Some(target), price_cents: 900, ..input }).unwrap();
        assert_eq!(item.category_id, target);
        assert_eq!(item.price_cents, 900);
    }

    #[test]
    fn test_category_blank_name_rejected() {
        let input = CategoryInput { name: "   ".to_string(), ..Default::default() };
        assert!(Category::new(Uuid::new_v4(), input, 0).is_err());
    }

    #[test]
    fn test_is_permutation() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert!(is_permutation(&[a, b], &[b, a]));
        assert!(!is_permutation(&[a, b], &[a, a]));
        assert!(!is_permutation(&[a, b], &[a]));
    }
}
