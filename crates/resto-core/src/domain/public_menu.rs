//! Read models for the customer-facing menu page

use serde::Serialize;
use uuid::Uuid;

use super::branch::Branch;
use super::menu::{Category, Menu, MenuItem};
use super::restaurant::Restaurant;
use super::theme::ThemeSettings;

#[derive(Debug, Clone, Serialize)]
pub struct PublicRestaurant {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub currency: String,
}

impl From<&Restaurant> for PublicRestaurant {
    fn from(r: &Restaurant) -> Self {
        Self {
            name: r.name.clone(),
            slug: r.slug.clone(),
            description: r.description.clone(),
            logo_url: r.logo_url.clone(),
            phone: r.phone.clone(),
            address: r.address.clone(),
            currency: r.currency.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicBranch {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub is_main: bool,
}

impl From<&Branch> for PublicBranch {
    fn from(b: &Branch) -> Self {
        Self {
            id: b.id,
            name: b.name.clone(),
            address: b.address.clone(),
            phone: b.phone.clone(),
            is_main: b.is_main,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicMenuItem {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub image_url: Option<String>,
    pub is_available: bool,
}

impl From<MenuItem> for PublicMenuItem {
    fn from(item: MenuItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            price_cents: item.price_cents,
            image_url: item.image_url,
            is_available: item.is_available,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicCategory {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub items: Vec<PublicMenuItem>,
}

impl PublicCategory {
    pub fn new(category: Category, items: Vec<MenuItem>) -> Self {
        Self {
            id: category.id,
            name: category.name,
            description: category.description,
            items: items.into_iter().map(PublicMenuItem::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicMenuSection {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub theme: ThemeSettings,
    pub categories: Vec<PublicCategory>,
}

impl PublicMenuSection {
    pub fn new(menu: Menu, theme: ThemeSettings, categories: Vec<PublicCategory>) -> Self {
        Self {
            id: menu.id,
            name: menu.name,
            description: menu.description,
            theme,
            categories,
        }
    }
}

/// Everything the public page needs in one response
#[derive(Debug, Clone, Serialize)]
pub struct PublicMenu {
    pub restaurant: PublicRestaurant,
    pub branch: PublicBranch,
    pub branches: Vec<PublicBranch>,
    pub menus: Vec<PublicMenuSection>,
}
