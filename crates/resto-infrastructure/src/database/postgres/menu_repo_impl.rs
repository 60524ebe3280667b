// ============================================================================
// Resto Infrastructure - PostgreSQL Menu, Category & Menu Item Repositories
// File: crates/resto-infrastructure/src/database/postgres/menu_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use resto_core::domain::{Category, Menu, MenuItem};
use resto_core::error::DomainError;
use resto_core::repositories::{CategoryRepository, MenuItemRepository, MenuRepository};

use super::db_error;

// ----------------------------------------------------------------------------
// Menus
// ----------------------------------------------------------------------------

pub struct PgMenuRepository {
    pool: PgPool,
}

impl PgMenuRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct MenuRow {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
    pub removed_at: Option<DateTime<Utc>>,
}

impl From<MenuRow> for Menu {
    fn from(row: MenuRow) -> Self {
        Menu {
            id: row.id,
            branch_id: row.branch_id,
            name: row.name,
            description: row.description,
            is_active: row.is_active,
            display_order: row.display_order,
            created_at: row.created_at,
            modified_at: row.modified_at,
            removed_at: row.removed_at,
        }
    }
}

#[async_trait]
impl MenuRepository for PgMenuRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Menu>, DomainError> {
        let row: Option<MenuRow> = sqlx::query_as(
            r#"
            SELECT id, branch_id, name, description, is_active, display_order,
                   created_at, modified_at, removed_at
            FROM menus
            WHERE id = $1 AND removed_at IS NULL
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("finding menu by id"))?;

        Ok(row.map(|r| r.into()))
    }

    async fn list_by_branch(&self, branch_id: &Uuid) -> Result<Vec<Menu>, DomainError> {
        let rows: Vec<MenuRow> = sqlx::query_as(
            r#"
            SELECT id, branch_id, name, description, is_active, display_order,
                   created_at, modified_at, removed_at
            FROM menus
            WHERE branch_id = $1 AND removed_at IS NULL
            ORDER BY display_order, created_at
            "#
        )
        .bind(branch_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("listing menus"))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn list_active_by_branch(&self, branch_id: &Uuid) -> Result<Vec<Menu>, DomainError> {
        let rows: Vec<MenuRow> = sqlx::query_as(
            r#"
            SELECT id, branch_id, name, description, is_active, display_order,
                   created_at, modified_at, removed_at
            FROM menus
            WHERE branch_id = $1 AND is_active AND removed_at IS NULL
            ORDER BY display_order, created_at
            "#
        )
        .bind(branch_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("listing active menus"))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn count_by_restaurant(&self, restaurant_id: &Uuid) -> Result<i64, DomainError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM menus m
            JOIN branches b ON b.id = m.branch_id
            WHERE b.restaurant_id = $1 AND m.removed_at IS NULL AND b.removed_at IS NULL
            "#
        )
        .bind(restaurant_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("counting menus"))?;

        Ok(count)
    }

    async fn restaurant_id_of(&self, menu_id: &Uuid) -> Result<Option<Uuid>, DomainError> {
        let restaurant_id: Option<Uuid> = sqlx::query_scalar(
            r#"
            SELECT b.restaurant_id
            FROM menus m
            JOIN branches b ON b.id = m.branch_id
            WHERE m.id = $1 AND m.removed_at IS NULL AND b.removed_at IS NULL
            "#
        )
        .bind(menu_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("resolving menu owner"))?;

        Ok(restaurant_id)
    }

    async fn create(&self, menu: &Menu) -> Result<Menu, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO menus (id, branch_id, name, description, is_active, display_order, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#
        )
        .bind(menu.id)
        .bind(menu.branch_id)
        .bind(&menu.name)
        .bind(&menu.description)
        .bind(menu.is_active)
        .bind(menu.display_order)
        .bind(menu.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("creating menu"))?;

        Ok(menu.clone())
    }

    async fn update(&self, menu: &Menu) -> Result<Menu, DomainError> {
        let row: Option<MenuRow> = sqlx::query_as(
            r#"
            UPDATE menus SET
                name = $2, description = $3, is_active = $4, display_order = $5,
                modified_at = NOW()
            WHERE id = $1 AND removed_at IS NULL
            RETURNING id, branch_id, name, description, is_active, display_order,
                      created_at, modified_at, removed_at
            "#
        )
        .bind(menu.id)
        .bind(&menu.name)
        .bind(&menu.description)
        .bind(menu.is_active)
        .bind(menu.display_order)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("updating menu"))?;

        row.map(|r| r.into()).ok_or(DomainError::MenuNotFound)
    }

    async fn soft_delete(&self, id: &Uuid) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE menus SET removed_at = NOW() WHERE id = $1 AND removed_at IS NULL")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("deleting menu"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::MenuNotFound);
        }

        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Categories
// ----------------------------------------------------------------------------

pub struct PgCategoryRepository {
    pool: PgPool,
}

impl PgCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CategoryRow {
    pub id: Uuid,
    pub menu_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
    pub removed_at: Option<DateTime<Utc>>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            menu_id: row.menu_id,
            name: row.name,
            description: row.description,
            display_order: row.display_order,
            is_active: row.is_active,
            created_at: row.created_at,
            modified_at: row.modified_at,
            removed_at: row.removed_at,
        }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Category>, DomainError> {
        let row: Option<CategoryRow> = sqlx::query_as(
            r#"
            SELECT id, menu_id, name, description, display_order, is_active,
                   created_at, modified_at, removed_at
            FROM categories
            WHERE id = $1 AND removed_at IS NULL
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("finding category by id"))?;

        Ok(row.map(|r| r.into()))
    }

    async fn list_by_menu(&self, menu_id: &Uuid) -> Result<Vec<Category>, DomainError> {
        let rows: Vec<CategoryRow> = sqlx::query_as(
            r#"
            SELECT id, menu_id, name, description, display_order, is_active,
                   created_at, modified_at, removed_at
            FROM categories
            WHERE menu_id = $1 AND removed_at IS NULL
            ORDER BY display_order, created_at
            "#
        )
        .bind(menu_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("listing categories"))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn next_display_order(&self, menu_id: &Uuid) -> Result<i32, DomainError> {
        let next: i32 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(display_order) + 1, 0) FROM categories WHERE menu_id = $1 AND removed_at IS NULL"
        )
        .bind(menu_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("computing category position"))?;

        Ok(next)
    }

    async fn restaurant_id_of(&self, category_id: &Uuid) -> Result<Option<Uuid>, DomainError> {
        let restaurant_id: Option<Uuid> = sqlx::query_scalar(
            r#"
            SELECT b.restaurant_id
            FROM categories c
            JOIN menus m ON m.id = c.menu_id
            JOIN branches b ON b.id = m.branch_id
            WHERE c.id = $1
              AND c.removed_at IS NULL AND m.removed_at IS NULL AND b.removed_at IS NULL
            "#
        )
        .bind(category_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("resolving category owner"))?;

        Ok(restaurant_id)
    }

    async fn create(&self, category: &Category) -> Result<Category, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO categories (id, menu_id, name, description, display_order, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#
        )
        .bind(category.id)
        .bind(category.menu_id)
        .bind(&category.name)
        .bind(&category.description)
        .bind(category.display_order)
        .bind(category.is_active)
        .bind(category.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("creating category"))?;

        Ok(category.clone())
    }

    async fn update(&self, category: &Category) -> Result<Category, DomainError> {
        let row: Option<CategoryRow> = sqlx::query_as(
            r#"
            UPDATE categories SET
                name = $2, description = $3, is_active = $4, modified_at = NOW()
            WHERE id = $1 AND removed_at IS NULL
            RETURNING id, menu_id, name, description, display_order, is_active,
                      created_at, modified_at, removed_at
            "#
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(&category.description)
        .bind(category.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("updating category"))?;

        row.map(|r| r.into()).ok_or(DomainError::CategoryNotFound)
    }

    async fn soft_delete(&self, id: &Uuid) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE categories SET removed_at = NOW() WHERE id = $1 AND removed_at IS NULL")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("deleting category"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::CategoryNotFound);
        }

        Ok(())
    }

    async fn reorder(&self, menu_id: &Uuid, ordered_ids: &[Uuid]) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE categories c
            SET display_order = (o.pos - 1)::INT, modified_at = NOW()
            FROM UNNEST($2::UUID[]) WITH ORDINALITY AS o(id, pos)
            WHERE c.id = o.id AND c.menu_id = $1 AND c.removed_at IS NULL
            "#
        )
        .bind(menu_id)
        .bind(ordered_ids)
        .execute(&self.pool)
        .await
        .map_err(db_error("reordering categories"))?;

        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Menu items
// ----------------------------------------------------------------------------

pub struct PgMenuItemRepository {
    pool: PgPool,
}

impl PgMenuItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct MenuItemRow {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub image_url: Option<String>,
    pub is_available: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
    pub removed_at: Option<DateTime<Utc>>,
}

impl From<MenuItemRow> for MenuItem {
    fn from(row: MenuItemRow) -> Self {
        MenuItem {
            id: row.id,
            category_id: row.category_id,
            name: row.name,
            description: row.description,
            price_cents: row.price_cents,
            image_url: row.image_url,
            is_available: row.is_available,
            display_order: row.display_order,
            created_at: row.created_at,
            modified_at: row.modified_at,
            removed_at: row.removed_at,
        }
    }
}

#[async_trait]
impl MenuItemRepository for PgMenuItemRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<MenuItem>, DomainError> {
        let row: Option<MenuItemRow> = sqlx::query_as(
            r#"
            SELECT id, category_id, name, description, price_cents, image_url,
                   is_available, display_order, created_at, modified_at, removed_at
            FROM menu_items
            WHERE id = $1 AND removed_at IS NULL
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("finding menu item by id"))?;

        Ok(row.map(|r| r.into()))
    }

    async fn list_by_category(&self, category_id: &Uuid) -> Result<Vec<MenuItem>, DomainError> {
        let rows: Vec<MenuItemRow> = sqlx::query_as(
            r#"
            SELECT id, category_id, name, description, price_cents, image_url,
                   is_available, display_order, created_at, modified_at, removed_at
            FROM menu_items
            WHERE category_id = $1 AND removed_at IS NULL
            ORDER BY display_order, created_at
            "#
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("listing menu items"))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn next_display_order(&self, category_id: &Uuid) -> Result<i32, DomainError> {
        let next: i32 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(display_order) + 1, 0) FROM menu_items WHERE category_id = $1 AND removed_at IS NULL"
        )
        .bind(category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("computing menu item position"))?;

        Ok(next)
    }

    async fn count_by_restaurant(&self, restaurant_id: &Uuid) -> Result<i64, DomainError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM menu_items i
            JOIN categories c ON c.id = i.category_id
            JOIN menus m ON m.id = c.menu_id
            JOIN branches b ON b.id = m.branch_id
            WHERE b.restaurant_id = $1
              AND i.removed_at IS NULL AND c.removed_at IS NULL
              AND m.removed_at IS NULL AND b.removed_at IS NULL
            "#
        )
        .bind(restaurant_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("counting menu items"))?;

        Ok(count)
    }

    async fn restaurant_id_of(&self, item_id: &Uuid) -> Result<Option<Uuid>, DomainError> {
        let restaurant_id: Option<Uuid> = sqlx::query_scalar(
            r#"
            SELECT b.restaurant_id
            FROM menu_items i
            JOIN categories c ON c.id = i.category_id
            JOIN menus m ON m.id = c.menu_id
            JOIN branches b ON b.id = m.branch_id
            WHERE i.id = $1
              AND i.removed_at IS NULL AND c.removed_at IS NULL
              AND m.removed_at IS NULL AND b.removed_at IS NULL
            "#
        )
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("resolving menu item owner"))?;

        Ok(restaurant_id)
    }

    async fn find_orderable(&self, branch_id: &Uuid, ids: &[Uuid]) -> Result<Vec<MenuItem>, DomainError> {
        let rows: Vec<MenuItemRow> = sqlx::query_as(
            r#"
            SELECT i.id, i.category_id, i.name, i.description, i.price_cents, i.image_url,
                   i.is_available, i.display_order, i.created_at, i.modified_at, i.removed_at
            FROM menu_items i
            JOIN categories c ON c.id = i.category_id
            JOIN menus m ON m.id = c.menu_id
            WHERE m.branch_id = $1
              AND i.id = ANY($2)
              AND i.removed_at IS NULL
              AND c.removed_at IS NULL AND c.is_active
              AND m.removed_at IS NULL AND m.is_active
            "#
        )
        .bind(branch_id)
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("loading orderable items"))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn create(&self, item: &MenuItem) -> Result<MenuItem, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO menu_items (
                id, category_id, name, description, price_cents, image_url,
                is_available, display_order, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#
        )
        .bind(item.id)
        .bind(item.category_id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.price_cents)
        .bind(&item.image_url)
        .bind(item.is_available)
        .bind(item.display_order)
        .bind(item.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("creating menu item"))?;

        Ok(item.clone())
    }

    async fn update(&self, item: &MenuItem) -> Result<MenuItem, DomainError> {
        let row: Option<MenuItemRow> = sqlx::query_as(
            r#"
            UPDATE menu_items SET
                category_id = $2, name = $3, description = $4, price_cents = $5,
                image_url = $6, is_available = $7, display_order = $8, modified_at = NOW()
            WHERE id = $1 AND removed_at IS NULL
            RETURNING id, category_id, name, description, price_cents, image_url,
                      is_available, display_order, created_at, modified_at, removed_at
            "#
        )
        .bind(item.id)
        .bind(item.category_id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.price_cents)
        .bind(&item.image_url)
        .bind(item.is_available)
        .bind(item.display_order)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("updating menu item"))?;

        row.map(|r| r.into()).ok_or(DomainError::MenuItemNotFound)
    }

    async fn soft_delete(&self, id: &Uuid) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE menu_items SET removed_at = NOW() WHERE id = $1 AND removed_at IS NULL")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("deleting menu item"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::MenuItemNotFound);
        }

        Ok(())
    }

    async fn reorder(&self, category_id: &Uuid, ordered_ids: &[Uuid]) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE menu_items i
            SET display_order = (o.pos - 1)::INT, modified_at = NOW()
            FROM UNNEST($2::UUID[]) WITH ORDINALITY AS o(id, pos)
            WHERE i.id = o.id AND i.category_id = $1 AND i.removed_at IS NULL
            "#
        )
        .bind(category_id)
        .bind(ordered_ids)
        .execute(&self.pool)
        .await
        .map_err(db_error("reordering menu items"))?;

        Ok(())
    }
}
