// ============================================================================
// Resto Infrastructure - PostgreSQL Theme Repository
// File: crates/resto-infrastructure/src/database/postgres/theme_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use resto_core::domain::{MenuLayout, ThemeSettings};
use resto_core::error::DomainError;
use resto_core::repositories::ThemeRepository;

use super::db_error;

pub struct PgThemeRepository {
    pool: PgPool,
}

impl PgThemeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ThemeRow {
    pub menu_id: Uuid,
    pub primary_color: String,
    pub secondary_color: String,
    pub background_color: String,
    pub text_color: String,
    pub accent_color: String,
    pub font_family: String,
    pub layout: String,
    pub show_images: bool,
    pub show_prices: bool,
    pub header_image_url: Option<String>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl From<ThemeRow> for ThemeSettings {
    fn from(row: ThemeRow) -> Self {
        ThemeSettings {
            menu_id: row.menu_id,
            primary_color: row.primary_color,
            secondary_color: row.secondary_color,
            background_color: row.background_color,
            text_color: row.text_color,
            accent_color: row.accent_color,
            font_family: row.font_family,
            layout: MenuLayout::from_str(&row.layout).unwrap_or_default(),
            show_images: row.show_images,
            show_prices: row.show_prices,
            header_image_url: row.header_image_url,
            modified_at: row.modified_at,
        }
    }
}

#[async_trait]
impl ThemeRepository for PgThemeRepository {
    async fn find_by_menu(&self, menu_id: &Uuid) -> Result<Option<ThemeSettings>, DomainError> {
        let row: Option<ThemeRow> = sqlx::query_as(
            r#"
            SELECT menu_id, primary_color, secondary_color, background_color, text_color,
                   accent_color, font_family, layout, show_images, show_prices,
                   header_image_url, modified_at
            FROM theme_settings
            WHERE menu_id = $1
            "#
        )
        .bind(menu_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("finding theme"))?;

        Ok(row.map(|r| r.into()))
    }

    async fn upsert(&self, theme: &ThemeSettings) -> Result<ThemeSettings, DomainError> {
        let row: ThemeRow = sqlx::query_as(
            r#"
            INSERT INTO theme_settings (
                menu_id, primary_color, secondary_color, background_color, text_color,
                accent_color, font_family, layout, show_images, show_prices,
                header_image_url, modified_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, NOW())
            ON CONFLICT (menu_id) DO UPDATE SET
                primary_color = EXCLUDED.primary_color,
                secondary_color = EXCLUDED.secondary_color,
                background_color = EXCLUDED.background_color,
                text_color = EXCLUDED.text_color,
                accent_color = EXCLUDED.accent_color,
                font_family = EXCLUDED.font_family,
                layout = EXCLUDED.layout,
                show_images = EXCLUDED.show_images,
                show_prices = EXCLUDED.show_prices,
                header_image_url = EXCLUDED.header_image_url,
                modified_at = NOW()
            RETURNING menu_id, primary_color, secondary_color, background_color, text_color,
                      accent_color, font_family, layout, show_images, show_prices,
                      header_image_url, modified_at
            "#
        )
        .bind(theme.menu_id)
        .bind(&theme.primary_color)
        .bind(&theme.secondary_color)
        .bind(&theme.background_color)
        .bind(&theme.text_color)
        .bind(&theme.accent_color)
        .bind(&theme.font_family)
        .bind(theme.layout.as_str())
        .bind(theme.show_images)
        .bind(theme.show_prices)
        .bind(&theme.header_image_url)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("saving theme"))?;

        Ok(row.into())
    }

    async fn delete(&self, menu_id: &Uuid) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM theme_settings WHERE menu_id = $1")
            .bind(menu_id)
            .execute(&self.pool)
            .await
            .map_err(db_error("deleting theme"))?;

        Ok(())
    }
}
