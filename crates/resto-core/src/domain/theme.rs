//! Per-menu presentation settings for the public menu page

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid regex"));

pub const ALLOWED_FONTS: &[&str] = &[
    "Inter",
    "Roboto",
    "Open Sans",
    "Lato",
    "Montserrat",
    "Poppins",
    "Playfair Display",
    "Merriweather",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuLayout {
    Grid,
    List,
    Compact,
}

impl MenuLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            MenuLayout::Grid => "grid",
            MenuLayout::List => "list",
            MenuLayout::Compact => "compact",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "grid" => Some(MenuLayout::Grid),
            "list" => Some(MenuLayout::List),
            "compact" => Some(MenuLayout::Compact),
            _ => None,
        }
    }
}

impl Default for MenuLayout {
    fn default() -> Self {
        MenuLayout::Grid
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeSettings {
    pub menu_id: Uuid,
    pub primary_color: String,
    pub secondary_color: String,
    pub background_color: String,
    pub text_color: String,
    pub accent_color: String,
    pub font_family: String,
    pub layout: MenuLayout,
    pub show_images: bool,
    pub show_prices: bool,
    pub header_image_url: Option<String>,
    pub modified_at: Option<DateTime<Utc>>,
}

/// Full replacement payload for a menu theme
#[derive(Debug, Clone, Deserialize)]
pub struct ThemeInput {
    pub primary_color: String,
    pub secondary_color: String,
    pub background_color: String,
    pub text_color: String,
    pub accent_color: String,
    pub font_family: String,
    pub layout: MenuLayout,
    pub show_images: bool,
    pub show_prices: bool,
    pub header_image_url: Option<String>,
}

impl ThemeSettings {
    pub fn default_for(menu_id: Uuid) -> Self {
        Self {
            menu_id,
            primary_color: "#E4572E".to_string(),
            secondary_color: "#29335C".to_string(),
            background_color: "#FFFFFF".to_string(),
            text_color: "#1F2933".to_string(),
            accent_color: "#F3A712".to_string(),
            font_family: "Inter".to_string(),
            layout: MenuLayout::Grid,
            show_images: true,
            show_prices: true,
            header_image_url: None,
            modified_at: None,
        }
    }

    pub fn from_input(menu_id: Uuid, input: ThemeInput) -> Result<Self, DomainError> {
        let theme = Self {
            menu_id,
            primary_color: input.primary_color.trim().to_uppercase(),
            secondary_color: input.secondary_color.trim().to_uppercase(),
            background_color: input.background_color.trim().to_uppercase(),
            text_color: input.text_color.trim().to_uppercase(),
            accent_color: input.accent_color.trim().to_uppercase(),
            font_family: input.font_family.trim().to_string(),
            layout: input.layout,
            show_images: input.show_images,
            show_prices: input.show_prices,
            header_image_url: input
                .header_image_url
                .map(|u| u.trim().to_string())
                .filter(|u| !u.is_empty()),
            modified_at: Some(Utc::now()),
        };
        theme.validate()?;
        Ok(theme)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let colors = [
            ("primary_color", &self.primary_color),
            ("secondary_color", &self.secondary_color),
            ("background_color", &self.background_color),
            ("text_color", &self.text_color),
            ("accent_color", &self.accent_color),
        ];
        for (field, value) in colors {
            if !is_hex_color(value) {
                return Err(DomainError::ValidationError(format!(
                    "{} must be a hex color like #RRGGBB",
                    field
                )));
            }
        }

        if !ALLOWED_FONTS.contains(&self.font_family.as_str()) {
            return Err(DomainError::ValidationError(format!(
                "font_family must be one of: {}",
                ALLOWED_FONTS.join(", ")
            )));
        }

        if self.header_image_url.as_ref().map_or(false, |u| u.len() > 2048) {
            return Err(DomainError::ValidationError("header_image_url too long".to_string()));
        }

        Ok(())
    }
}

pub fn is_hex_color(value: &str) -> bool {
    HEX_COLOR.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> ThemeInput {
        ThemeInput {
            primary_color: "#ff0000".to_string(),
            secondary_color: "#0f0".to_string(),
            background_color: "#FFFFFF".to_string(),
            text_color: "#000000".to_string(),
            accent_color: "#123abc".to_string(),
            font_family: "Poppins".to_string(),
            layout: MenuLayout::List,
            show_images: false,
            show_prices: true,
            header_image_url: Some(" ".to_string()),
        }
    }

    #[test]
    fn test_default_theme_is_valid() {
        assert!(ThemeSettings::default_for(Uuid::new_v4()).validate().is_ok());
    }

    #[test]
    fn test_from_input_normalizes() {
        let theme = ThemeSettings::from_input(Uuid::new_v4(), input()).unwrap();
        assert_eq!(theme.primary_color, "#FF0000");
        assert_eq!(theme.header_image_url, None);
        assert_eq!(theme.layout, MenuLayout::List);
    }

    #[test]
    fn test_bad_color_rejected() {
        let mut i = input();
        i.accent_color = "red".to_string();
        assert!(matches!(
            ThemeSettings::from_input(Uuid::new_v4(), i),
            Err(DomainError::ValidationError(_))
        ));
    }

    #[test]
    fn test_unknown_font_rejected() {
        let mut i = input();
        i.font_family = "Comic Sans MS".to_string();
        assert!(ThemeSettings::from_input(Uuid::new_v4(), i).is_err());
    }
}
