// ============================================================================
// Resto Infrastructure - PostgreSQL Order Repository
// File: crates/resto-infrastructure/src/database/postgres/order_repo_impl.rs
// ============================================================================

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;

use resto_core::domain::{
    Order, OrderFilter, OrderItem, OrderStats, OrderStatus, OrderStatusChange, OrderType,
};
use resto_core::error::DomainError;
use resto_core::repositories::OrderRepository;
use resto_shared::{Page, Pagination};

use super::{db_error, unique_violation};

pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Loads the line items of several orders at once, keyed by order id
    async fn items_for(&self, order_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<OrderItem>>, DomainError> {
        let rows: Vec<OrderItemRow> = sqlx::query_as(
            r#"
            SELECT id, order_id, menu_item_id, item_name, unit_price_cents,
                   quantity, notes, line_total_cents
            FROM order_items
            WHERE order_id = ANY($1)
            ORDER BY order_id, position
            "#
        )
        .bind(order_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("loading order items"))?;

        let mut grouped: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
        for row in rows {
            grouped.entry(row.order_id).or_default().push(row.into());
        }
        Ok(grouped)
    }
}

#[derive(Debug, FromRow)]
struct OrderRow {
    pub id: Uuid,
    pub order_number: String,
    pub restaurant_id: Uuid,
    pub branch_id: Uuid,
    pub customer_name: String,
    pub customer_phone: String,
    pub order_type: String,
    pub table_number: Option<String>,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
    pub subtotal_cents: i64,
    pub total_cents: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Order {
        Order {
            id: self.id,
            order_number: self.order_number,
            restaurant_id: self.restaurant_id,
            branch_id: self.branch_id,
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            order_type: OrderType::from_str(&self.order_type).unwrap_or_default(),
            table_number: self.table_number,
            delivery_address: self.delivery_address,
            notes: self.notes,
            items,
            subtotal_cents: self.subtotal_cents,
            total_cents: self.total_cents,
            status: OrderStatus::from_str(&self.status).unwrap_or_default(),
            created_at: self.created_at,
            modified_at: self.modified_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct OrderItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub menu_item_id: Option<Uuid>,
    pub item_name: String,
    pub unit_price_cents: i64,
    pub quantity: i32,
    pub notes: Option<String>,
    pub line_total_cents: i64,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        OrderItem {
            id: row.id,
            order_id: row.order_id,
            menu_item_id: row.menu_item_id,
            item_name: row.item_name,
            unit_price_cents: row.unit_price_cents,
            quantity: row.quantity,
            notes: row.notes,
            line_total_cents: row.line_total_cents,
        }
    }
}

#[derive(Debug, FromRow)]
struct StatusChangeRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub from_status: Option<String>,
    pub to_status: String,
    pub changed_by: Option<Uuid>,
    pub note: Option<String>,
    pub changed_at: DateTime<Utc>,
}

impl From<StatusChangeRow> for OrderStatusChange {
    fn from(row: StatusChangeRow) -> Self {
        OrderStatusChange {
            id: row.id,
            order_id: row.order_id,
            from_status: row.from_status.as_deref().and_then(OrderStatus::from_str),
            to_status: OrderStatus::from_str(&row.to_status).unwrap_or_default(),
            changed_by: row.changed_by,
            note: row.note,
            changed_at: row.changed_at,
        }
    }
}

async fn insert_status_change(conn: &mut PgConnection, change: &OrderStatusChange) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO order_status_history (id, order_id, from_status, to_status, changed_by, note, changed_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#
    )
    .bind(change.id)
    .bind(change.order_id)
    .bind(change.from_status.map(|s| s.as_str()))
    .bind(change.to_status.as_str())
    .bind(change.changed_by)
    .bind(&change.note)
    .bind(change.changed_at)
    .execute(&mut *conn)
    .await
    .map_err(db_error("recording order status change"))?;

    Ok(())
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn create(&self, order: &Order, initial: &OrderStatusChange) -> Result<Order, DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error("starting transaction"))?;

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, order_number, restaurant_id, branch_id, customer_name, customer_phone,
                order_type, table_number, delivery_address, notes,
                subtotal_cents, total_cents, status, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#
        )
        .bind(order.id)
        .bind(&order.order_number)
        .bind(order.restaurant_id)
        .bind(order.branch_id)
        .bind(&order.customer_name)
        .bind(&order.customer_phone)
        .bind(order.order_type.as_str())
        .bind(&order.table_number)
        .bind(&order.delivery_address)
        .bind(&order.notes)
        .bind(order.subtotal_cents)
        .bind(order.total_cents)
        .bind(order.status.as_str())
        .bind(order.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| match unique_violation(&e) {
            Some(_) => DomainError::Conflict(format!("order number {} already taken", order.order_number)),
            None => db_error("inserting order")(e),
        })?;

        for (position, item) in order.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_items (
                    id, order_id, menu_item_id, item_name, unit_price_cents,
                    quantity, notes, line_total_cents, position
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#
            )
            .bind(item.id)
            .bind(order.id)
            .bind(item.menu_item_id)
            .bind(&item.item_name)
            .bind(item.unit_price_cents)
            .bind(item.quantity)
            .bind(&item.notes)
            .bind(item.line_total_cents)
            .bind(position as i32)
            .execute(&mut *tx)
            .await
            .map_err(db_error("inserting order item"))?;
        }

        insert_status_change(&mut tx, initial).await?;

        tx.commit().await.map_err(db_error("committing order"))?;

        info!("Order {} stored for branch {}", order.order_number, order.branch_id);
        Ok(order.clone())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Order>, DomainError> {
        let row: Option<OrderRow> = sqlx::query_as(
            r#"
            SELECT id, order_number, restaurant_id, branch_id, customer_name, customer_phone,
                   order_type, table_number, delivery_address, notes,
                   subtotal_cents, total_cents, status, created_at, modified_at
            FROM orders
            WHERE id = $1
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("finding order by id"))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut items = self.items_for(&[row.id]).await?;
        let order_items = items.remove(&row.id).unwrap_or_default();
        Ok(Some(row.into_order(order_items)))
    }

    async fn list(
        &self,
        restaurant_id: &Uuid,
        filter: &OrderFilter,
        pagination: &Pagination,
    ) -> Result<Page<Order>, DomainError> {
        let status = filter.status.map(|s| s.as_str());

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM orders
            WHERE restaurant_id = $1
              AND ($2::UUID IS NULL OR branch_id = $2)
              AND ($3::TEXT IS NULL OR status = $3)
              AND ($4::TIMESTAMPTZ IS NULL OR created_at >= $4)
              AND ($5::TIMESTAMPTZ IS NULL OR created_at < $5)
            "#
        )
        .bind(restaurant_id)
        .bind(filter.branch_id)
        .bind(status)
        .bind(filter.from)
        .bind(filter.to)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("counting orders"))?;

        let rows: Vec<OrderRow> = sqlx::query_as(
            r#"
            SELECT id, order_number, restaurant_id, branch_id, customer_name, customer_phone,
                   order_type, table_number, delivery_address, notes,
                   subtotal_cents, total_cents, status, created_at, modified_at
            FROM orders
            WHERE restaurant_id = $1
              AND ($2::UUID IS NULL OR branch_id = $2)
              AND ($3::TEXT IS NULL OR status = $3)
              AND ($4::TIMESTAMPTZ IS NULL OR created_at >= $4)
              AND ($5::TIMESTAMPTZ IS NULL OR created_at < $5)
            ORDER BY created_at DESC
            LIMIT $6 OFFSET $7
            "#
        )
        .bind(restaurant_id)
        .bind(filter.branch_id)
        .bind(status)
        .bind(filter.from)
        .bind(filter.to)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("listing orders"))?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut items = if ids.is_empty() { HashMap::new() } else { self.items_for(&ids).await? };

        let orders = rows
            .into_iter()
            .map(|row| {
                let order_items = items.remove(&row.id).unwrap_or_default();
                row.into_order(order_items)
            })
            .collect();

        Ok(Page::new(orders, total, *pagination))
    }

    async fn update_status(
        &self,
        id: &Uuid,
        expected: OrderStatus,
        change: &OrderStatusChange,
    ) -> Result<bool, DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error("starting transaction"))?;

        let result = sqlx::query(
            "UPDATE orders SET status = $3, modified_at = $4 WHERE id = $1 AND status = $2"
        )
        .bind(id)
        .bind(expected.as_str())
        .bind(change.to_status.as_str())
        .bind(change.changed_at)
        .execute(&mut *tx)
        .await
        .map_err(db_error("updating order status"))?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        insert_status_change(&mut tx, change).await?;
        tx.commit().await.map_err(db_error("committing order status"))?;

        Ok(true)
    }

    async fn history(&self, order_id: &Uuid) -> Result<Vec<OrderStatusChange>, DomainError> {
        let rows: Vec<StatusChangeRow> = sqlx::query_as(
            r#"
            SELECT id, order_id, from_status, to_status, changed_by, note, changed_at
            FROM order_status_history
            WHERE order_id = $1
            ORDER BY changed_at, id
            "#
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("loading order history"))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn stats(&self, restaurant_id: &Uuid) -> Result<OrderStats, DomainError> {
        let counts: Vec<(String, i64)> = sqlx::query_as(
            "SELECT status, COUNT(*) FROM orders WHERE restaurant_id = $1 GROUP BY status"
        )
        .bind(restaurant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("counting orders by status"))?;

        let (orders_today, delivered_revenue_cents): (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE created_at >= date_trunc('day', NOW())),
                COALESCE(SUM(total_cents) FILTER (WHERE status = 'delivered'), 0)::BIGINT
            FROM orders
            WHERE restaurant_id = $1
            "#
        )
        .bind(restaurant_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("summarising orders"))?;

        let mut stats = OrderStats { orders_today, delivered_revenue_cents, ..Default::default() };
        for (status, count) in counts {
            if let Some(status) = OrderStatus::from_str(&status) {
                stats.set_count(status, count);
            }
        }

        Ok(stats)
    }
}
