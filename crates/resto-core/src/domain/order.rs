// ============================================================================
// Resto Core - Order Entity
// File: crates/resto-core/src/domain/order.rs
// Description: Customer orders, line items and the status lifecycle
// ============================================================================

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Order lifecycle:
/// pending -> confirmed -> preparing -> ready -> delivered, or cancelled
/// from any non-terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(OrderStatus::Pending),
            "confirmed" => Some(OrderStatus::Confirmed),
            "preparing" => Some(OrderStatus::Preparing),
            "ready" => Some(OrderStatus::Ready),
            "delivered" => Some(OrderStatus::Delivered),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Next status in the forward flow, if any
    pub fn next(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Confirmed),
            OrderStatus::Confirmed => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::Ready),
            OrderStatus::Ready => Some(OrderStatus::Delivered),
            OrderStatus::Delivered | OrderStatus::Cancelled => None,
        }
    }

    pub fn can_transition_to(&self, to: OrderStatus) -> bool {
        if to == OrderStatus::Cancelled {
            return !self.is_terminal();
        }
        self.next() == Some(to)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    DineIn,
    Takeaway,
    Delivery,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::DineIn => "dine_in",
            OrderType::Takeaway => "takeaway",
            OrderType::Delivery => "delivery",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "dine_in" => Some(OrderType::DineIn),
            "takeaway" => Some(OrderType::Takeaway),
            "delivery" => Some(OrderType::Delivery),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OrderType::DineIn => "Dine-in",
            OrderType::Takeaway => "Takeaway",
            OrderType::Delivery => "Delivery",
        }
    }
}

impl Default for OrderType {
    fn default() -> Self {
        OrderType::Takeaway
    }
}

/// Line item with name and price snapshotted at order time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub menu_item_id: Option<Uuid>,
    pub item_name: String,
    pub unit_price_cents: i64,
    pub quantity: i32,
    pub notes: Option<String>,
    pub line_total_cents: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub restaurant_id: Uuid,
    pub branch_id: Uuid,
    pub customer_name: String,
    pub customer_phone: String,
    pub order_type: OrderType,
    pub table_number: Option<String>,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
    pub items: Vec<OrderItem>,
    pub subtotal_cents: i64,
    pub total_cents: i64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

/// Customer details of a new order
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub restaurant_id: Uuid,
    pub branch_id: Uuid,
    pub customer_name: String,
    pub customer_phone: String,
    pub order_type: OrderType,
    pub table_number: Option<String>,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
}

/// Priced line ready to be attached to an order
#[derive(Debug, Clone)]
pub struct PricedLine {
    pub menu_item_id: Uuid,
    pub item_name: String,
    pub unit_price_cents: i64,
    pub quantity: i32,
    pub notes: Option<String>,
}

impl Order {
    pub fn new(order_number: String, draft: OrderDraft, lines: Vec<PricedLine>) -> Self {
        let id = Uuid::new_v4();
        let items: Vec<OrderItem> = lines
            .into_iter()
            .map(|line| OrderItem {
                id: Uuid::new_v4(),
                order_id: id,
                menu_item_id: Some(line.menu_item_id),
                line_total_cents: line.unit_price_cents * line.quantity as i64,
                item_name: line.item_name,
                unit_price_cents: line.unit_price_cents,
                quantity: line.quantity,
                notes: line.notes,
            })
            .collect();
        let subtotal_cents = items.iter().map(|i| i.line_total_cents).sum();

        Self {
            id,
            order_number,
            restaurant_id: draft.restaurant_id,
            branch_id: draft.branch_id,
            customer_name: draft.customer_name,
            customer_phone: draft.customer_phone,
            order_type: draft.order_type,
            table_number: draft.table_number,
            delivery_address: draft.delivery_address,
            notes: draft.notes,
            items,
            subtotal_cents,
            total_cents: subtotal_cents,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            modified_at: None,
        }
    }

    pub fn item_count(&self) -> i32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

/// `YYYYMMDD-XXXXXX`
pub fn generate_order_number(now: DateTime<Utc>) -> String {
    format!(
        "{}-{}",
        now.format("%Y%m%d"),
        resto_security::TokenService::short_code(6)
    )
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusChange {
    pub id: Uuid,
    pub order_id: Uuid,
    pub from_status: Option<OrderStatus>,
    pub to_status: OrderStatus,
    pub changed_by: Option<Uuid>,
    pub note: Option<String>,
    pub changed_at: DateTime<Utc>,
}

impl OrderStatusChange {
    pub fn new(
        order_id: Uuid,
        from_status: Option<OrderStatus>,
        to_status: OrderStatus,
        changed_by: Option<Uuid>,
        note: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id,
            from_status,
            to_status,
            changed_by,
            note,
            changed_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub history: Vec<OrderStatusChange>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderFilter {
    pub branch_id: Option<Uuid>,
    pub status: Option<OrderStatus>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OrderStats {
    pub pending: i64,
    pub confirmed: i64,
    pub preparing: i64,
    pub ready: i64,
    pub delivered: i64,
    pub cancelled: i64,
    pub orders_today: i64,
    pub delivered_revenue_cents: i64,
}

impl OrderStats {
    pub fn set_count(&mut self, status: OrderStatus, count: i64) {
        match status {
            OrderStatus::Pending => self.pending = count,
            OrderStatus::Confirmed => self.confirmed = count,
            OrderStatus::Preparing => self.preparing = count,
            OrderStatus::Ready => self.ready = count,
            OrderStatus::Delivered => self.delivered = count,
            OrderStatus::Cancelled => self.cancelled = count,
        }
    }

    pub fn total(&self) -> i64 {
        self.pending + self.confirmed + self.preparing + self.ready + self.delivered + self.cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Confirmed));
        assert!(OrderStatus::Confirmed.can_transition_to(OrderStatus::Preparing));
        assert!(OrderStatus::Preparing.can_transition_to(OrderStatus::Ready));
        assert!(OrderStatus::Ready.can_transition_to(OrderStatus::Delivered));
    }

    #[test]
    fn test_skipping_and_backwards_rejected() {
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Ready));
        assert!(!OrderStatus::Ready.can_transition_to(OrderStatus::Preparing));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn test_cancel_only_from_non_terminal() {
        for status in [OrderStatus::Pending, OrderStatus::Confirmed, OrderStatus::Preparing, OrderStatus::Ready] {
            assert!(status.can_transition_to(OrderStatus::Cancelled), "{}", status);
        }
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Confirmed));
    }

    #[test]
    fn test_new_order_totals() {
        let draft = OrderDraft {
            restaurant_id: Uuid::new_v4(),
            branch_id: Uuid::new_v4(),
            customer_name: "Ani".to_string(),
            customer_phone: "62811".to_string(),
            order_type: OrderType::Takeaway,
            table_number: None,
            delivery_address: None,
            notes: None,
        };
        let lines = vec![
            PricedLine { menu_item_id: Uuid::new_v4(), item_name: "Sate".to_string(), unit_price_cents: 2500, quantity: 2, notes: None },
            PricedLine { menu_item_id: Uuid::new_v4(), item_name: "Teh".to_string(), unit_price_cents: 500, quantity: 3, notes: None },
        ];
        let order = Order::new("20260101-ABCDEF".to_string(), draft, lines);
        assert_eq!(order.subtotal_cents, 6500);
        assert_eq!(order.total_cents, 6500);
        assert_eq!(order.item_count(), 5);
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.items.iter().all(|i| i.order_id == order.id));
    }

    #[test]
    fn test_order_number_format() {
        let now = chrono::TimeZone::with_ymd_and_hms(&Utc, 2026, 3, 9, 12, 0, 0).unwrap();
        let number = generate_order_number(now);
        assert!(number.starts_with("20260309-"));
        assert_eq!(number.len(), 15);
    }

    #[test]
    fn test_stats_total() {
        let mut stats = OrderStats::default();
        stats.set_count(OrderStatus::Pending, 2);
        stats.set_count(OrderStatus::Delivered, 5);
        assert_eq!(stats.total(), 7);
    }
}
