//! Per-menu theme settings

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{AuthContext, ThemeInput, ThemeSettings};
use crate::error::DomainError;
use crate::repositories::{MenuRepository, ThemeRepository};

pub struct ThemeService {
    themes: Arc<dyn ThemeRepository>,
    menus: Arc<dyn MenuRepository>,
}

impl ThemeService {
    pub fn new(themes: Arc<dyn ThemeRepository>, menus: Arc<dyn MenuRepository>) -> Self {
        Self { themes, menus }
    }

    /// Stored settings, or the defaults when none were saved
    pub async fn get(&self, ctx: &AuthContext, menu_id: &Uuid) -> Result<ThemeSettings, DomainError> {
        self.ensure_menu(ctx, menu_id).await?;
        Ok(self
            .themes
            .find_by_menu(menu_id)
            .await?
            .unwrap_or_else(|| ThemeSettings::default_for(*menu_id)))
    }

    pub async fn update(&self, ctx: &AuthContext, menu_id: &Uuid, input: ThemeInput) -> Result<ThemeSettings, DomainError> {
        self.ensure_menu(ctx, menu_id).await?;
        let theme = ThemeSettings::from_input(*menu_id, input)?;
        self.themes.upsert(&theme).await
    }

    pub async fn reset(&self, ctx: &AuthContext, menu_id: &Uuid) -> Result<ThemeSettings, DomainError> {
        self.ensure_menu(ctx, menu_id).await?;
        self.themes.delete(menu_id).await?;
        Ok(ThemeSettings::default_for(*menu_id))
    }

    async fn ensure_menu(&self, ctx: &AuthContext, menu_id: &Uuid) -> Result<(), DomainError> {
        self.menus
            .find_by_id(menu_id)
            .await?
            .filter(|m| m.removed_at.is_none())
            .ok_or(DomainError::MenuNotFound)?;
        let restaurant_id = self.menus.restaurant_id_of(menu_id).await?.ok_or(DomainError::MenuNotFound)?;
        ctx.ensure_restaurant(restaurant_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Menu, MenuInput, MenuLayout, UserRole};
    use crate::repositories::menu_repository::MockMenuRepository;
    use crate::repositories::theme_repository::MockThemeRepository;

    fn setup(rid: Uuid) -> (MockMenuRepository, Uuid) {
        let menu = Menu::new(Uuid::new_v4(), MenuInput { name: "Dinner".to_string(), ..Default::default() }).unwrap();
        let mid = menu.id;
        let mut menus = MockMenuRepository::new();
        menus.expect_find_by_id().returning(move |_| Ok(Some(menu.clone())));
        menus.expect_restaurant_id_of().returning(move |_| Ok(Some(rid)));
        (menus, mid)
    }

    fn ctx_for(rid: Uuid) -> AuthContext {
        AuthContext {
            user_id: Uuid::new_v4(),
            username: "owner".to_string(),
            role: UserRole::RestaurantAdmin,
            restaurant_id: Some(rid),
            session_id: None,
        }
    }

    #[tokio::test]
    async fn test_defaults_when_missing() {
        let rid = Uuid::new_v4();
        let (menus, mid) = setup(rid);
        let mut themes = MockThemeRepository::new();
        themes.expect_find_by_menu().returning(|_| Ok(None));

        let theme = ThemeService::new(Arc::new(themes), Arc::new(menus)).get(&ctx_for(rid), &mid).await.unwrap();
        assert_eq!(theme, ThemeSettings::default_for(mid));
    }

    #[tokio::test]
    async fn test_invalid_color_rejected() {
        let rid = Uuid::new_v4();
        let (menus, mid) = setup(rid);
        let mut themes = MockThemeRepository::new();
        themes.expect_upsert().never();

        let input = ThemeInput {
            primary_color: "red".to_string(),
            secondary_color: "#000".to_string(),
            background_color: "#fff".to_string(),
            text_color: "#111111".to_string(),
            accent_color: "#abcdef".to_string(),
            font_family: "Inter".to_string(),
            layout: MenuLayout::List,
            show_images: true,
            show_prices: true,
            header_image_url: None,
        };
        let err = ThemeService::new(Arc::new(themes), Arc::new(menus))
            .update(&ctx_for(rid), &mid, input)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_reset_deletes_stored() {
        let rid = Uuid::new_v4();
        let (menus, mid) = setup(rid);
        let mut themes = MockThemeRepository::new();
        themes.expect_delete().times(1).returning(|_| Ok(()));

        let theme = ThemeService::new(Arc::new(themes), Arc::new(menus))
            .reset(&ctx_for(rid), &mid)
            .await
            .unwrap();
        assert_eq!(theme.layout, MenuLayout::Grid);
    }
}
