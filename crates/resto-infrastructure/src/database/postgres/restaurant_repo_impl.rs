// ============================================================================
// Resto Infrastructure - PostgreSQL Restaurant Repository
// File: crates/resto-infrastructure/src/database/postgres/restaurant_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use resto_core::domain::{BillingCycle, Plan, PlatformStats, Restaurant, RestaurantQuery, RestaurantSummary};
use resto_core::error::DomainError;
use resto_core::repositories::RestaurantRepository;
use resto_shared::{Page, Pagination};

use super::{db_error, unique_violation};

pub struct PgRestaurantRepository {
    pool: PgPool,
}

impl PgRestaurantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
pub(crate) struct RestaurantRow {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub logo_url: Option<String>,
    pub address: Option<String>,
    pub currency: String,
    pub plan: String,
    pub billing_cycle: String,
    pub subscription_expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
    pub removed_at: Option<DateTime<Utc>>,
}

impl From<RestaurantRow> for Restaurant {
    fn from(row: RestaurantRow) -> Self {
        Restaurant {
            id: row.id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            phone: row.phone,
            email: row.email,
            logo_url: row.logo_url,
            address: row.address,
            currency: row.currency,
            plan: Plan::from_str(&row.plan).unwrap_or_default(),
            billing_cycle: BillingCycle::from_str(&row.billing_cycle).unwrap_or_default(),
            subscription_expires_at: row.subscription_expires_at,
            is_active: row.is_active,
            created_at: row.created_at,
            modified_at: row.modified_at,
            removed_at: row.removed_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct RestaurantSummaryRow {
    #[sqlx(flatten)]
    restaurant: RestaurantRow,
    branch_count: i64,
    order_count: i64,
}

#[derive(Debug, FromRow)]
struct PlatformStatsRow {
    total_restaurants: i64,
    active_restaurants: i64,
    orders_today: i64,
    delivered_revenue_cents: i64,
}

/// Inserts a restaurant inside a caller-owned transaction
pub(crate) async fn insert_restaurant(conn: &mut PgConnection, restaurant: &Restaurant) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO restaurants (
            id, name, slug, description, phone, email, logo_url, address,
            currency, plan, billing_cycle, subscription_expires_at, is_active, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        "#
    )
    .bind(restaurant.id)
    .bind(&restaurant.name)
    .bind(&restaurant.slug)
    .bind(&restaurant.description)
    .bind(&restaurant.phone)
    .bind(&restaurant.email)
    .bind(&restaurant.logo_url)
    .bind(&restaurant.address)
    .bind(&restaurant.currency)
    .bind(restaurant.plan.as_str())
    .bind(restaurant.billing_cycle.as_str())
    .bind(restaurant.subscription_expires_at)
    .bind(restaurant.is_active)
    .bind(restaurant.created_at)
    .execute(&mut *conn)
    .await
    .map_err(|e| match unique_violation(&e) {
        Some(_) => DomainError::SlugAlreadyExists(restaurant.slug.clone()),
        None => db_error("inserting restaurant")(e),
    })?;

    Ok(())
}

#[async_trait]
impl RestaurantRepository for PgRestaurantRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Restaurant>, DomainError> {
        let row: Option<RestaurantRow> = sqlx::query_as(
            r#"
            SELECT
                id, name, slug, description, phone, email, logo_url, address,
                currency, plan, billing_cycle, subscription_expires_at, is_active,
                created_at, modified_at, removed_at
            FROM restaurants
            WHERE id = $1 AND removed_at IS NULL
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("finding restaurant by id"))?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Restaurant>, DomainError> {
        let row: Option<RestaurantRow> = sqlx::query_as(
            r#"
            SELECT
                id, name, slug, description, phone, email, logo_url, address,
                currency, plan, billing_cycle, subscription_expires_at, is_active,
                created_at, modified_at, removed_at
            FROM restaurants
            WHERE slug = $1 AND removed_at IS NULL
            "#
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("finding restaurant by slug"))?;

        Ok(row.map(|r| r.into()))
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, DomainError> {
        // Deleted restaurants keep their slug reserved
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM restaurants WHERE slug = $1)")
            .bind(slug)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("checking restaurant slug"))?;

        Ok(exists)
    }

    async fn update(&self, restaurant: &Restaurant) -> Result<Restaurant, DomainError> {
        let row: Option<RestaurantRow> = sqlx::query_as(
            r#"
            UPDATE restaurants SET
                name = $2, description = $3, phone = $4, email = $5, logo_url = $6,
                address = $7, currency = $8, plan = $9, billing_cycle = $10,
                subscription_expires_at = $11, is_active = $12, modified_at = NOW()
            WHERE id = $1 AND removed_at IS NULL
            RETURNING
                id, name, slug, description, phone, email, logo_url, address,
                currency, plan, billing_cycle, subscription_expires_at, is_active,
                created_at, modified_at, removed_at
            "#
        )
        .bind(restaurant.id)
        .bind(&restaurant.name)
        .bind(&restaurant.description)
        .bind(&restaurant.phone)
        .bind(&restaurant.email)
        .bind(&restaurant.logo_url)
        .bind(&restaurant.address)
        .bind(&restaurant.currency)
        .bind(restaurant.plan.as_str())
        .bind(restaurant.billing_cycle.as_str())
        .bind(restaurant.subscription_expires_at)
        .bind(restaurant.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("updating restaurant"))?;

        row.map(|r| r.into()).ok_or(DomainError::RestaurantNotFound)
    }

    async fn list(
        &self,
        query: &RestaurantQuery,
        pagination: &Pagination,
    ) -> Result<Page<RestaurantSummary>, DomainError> {
        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s.replace('%', "\\%").replace('_', "\\_")));

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM restaurants r
            WHERE r.removed_at IS NULL
              AND ($1::TEXT IS NULL OR r.name ILIKE $1 OR r.slug ILIKE $1)
              AND ($2::BOOLEAN IS NULL OR r.is_active = $2)
            "#
        )
        .bind(&search)
        .bind(query.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("counting restaurants"))?;

        let rows: Vec<RestaurantSummaryRow> = sqlx::query_as(
            r#"
            SELECT
                r.id, r.name, r.slug, r.description, r.phone, r.email, r.logo_url, r.address,
                r.currency, r.plan, r.billing_cycle, r.subscription_expires_at, r.is_active,
                r.created_at, r.modified_at, r.removed_at,
                (SELECT COUNT(*) FROM branches b
                  WHERE b.restaurant_id = r.id AND b.removed_at IS NULL) AS branch_count,
                (SELECT COUNT(*) FROM orders o WHERE o.restaurant_id = r.id) AS order_count
            FROM restaurants r
            WHERE r.removed_at IS NULL
              AND ($1::TEXT IS NULL OR r.name ILIKE $1 OR r.slug ILIKE $1)
              AND ($2::BOOLEAN IS NULL OR r.is_active = $2)
            ORDER BY r.created_at DESC
            LIMIT $3 OFFSET $4
            "#
        )
        .bind(&search)
        .bind(query.is_active)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("listing restaurants"))?;

        let items = rows
            .into_iter()
            .map(|row| RestaurantSummary {
                restaurant: row.restaurant.into(),
                branch_count: row.branch_count,
                order_count: row.order_count,
            })
            .collect();

        Ok(Page::new(items, total, *pagination))
    }

    async fn platform_stats(&self) -> Result<PlatformStats, DomainError> {
        let row: PlatformStatsRow = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM restaurants WHERE removed_at IS NULL) AS total_restaurants,
                (SELECT COUNT(*) FROM restaurants
                  WHERE removed_at IS NULL AND is_active) AS active_restaurants,
                (SELECT COUNT(*) FROM orders
                  WHERE created_at >= date_trunc('day', NOW())) AS orders_today,
                (SELECT COALESCE(SUM(total_cents), 0)::BIGINT FROM orders
                  WHERE status = 'delivered') AS delivered_revenue_cents
            "#
        )
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("loading platform stats"))?;

        Ok(PlatformStats {
            total_restaurants: row.total_restaurants,
            active_restaurants: row.active_restaurants,
            orders_today: row.orders_today,
            delivered_revenue_cents: row.delivered_revenue_cents,
        })
    }
}
