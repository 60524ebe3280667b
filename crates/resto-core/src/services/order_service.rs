// ============================================================================
// Resto Core - Order Service
// File: crates/resto-core/src/services/order_service.rs
// Description: Public order placement, WhatsApp hand-off and the status flow
// ============================================================================

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use resto_shared::constants::{MAX_LINE_QUANTITY, MAX_ORDER_LINES};
use resto_shared::utils::{is_valid_phone, normalize_phone};
use resto_shared::{Page, Pagination};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use super::public_menu_service::resolve_storefront;
use crate::domain::order::generate_order_number;
use crate::domain::whatsapp::{build_order_message, whatsapp_url};
use crate::domain::{
    AuthContext, Order, OrderDetail, OrderDraft, OrderFilter, OrderStats, OrderStatus, OrderStatusChange,
    OrderType, PricedLine,
};
use crate::error::DomainError;
use crate::repositories::{BranchRepository, MenuItemRepository, OrderRepository, RestaurantRepository};

const ORDER_NUMBER_ATTEMPTS: usize = 3;
const MAX_NOTE_LENGTH: usize = 500;

#[derive(Debug, Clone, Deserialize)]
pub struct OrderLineRequest {
    pub menu_item_id: Uuid,
    pub quantity: i32,
    pub notes: Option<String>,
}

/// Customer checkout payload; client-side prices are never trusted
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceOrderRequest {
    pub branch_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_phone: String,
    pub order_type: OrderType,
    pub table_number: Option<String>,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
    pub items: Vec<OrderLineRequest>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlacedOrder {
    pub order: Order,
    /// Absent when neither branch nor restaurant has a contact number
    pub whatsapp_url: Option<String>,
}

pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    restaurants: Arc<dyn RestaurantRepository>,
    branches: Arc<dyn BranchRepository>,
    items: Arc<dyn MenuItemRepository>,
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        restaurants: Arc<dyn RestaurantRepository>,
        branches: Arc<dyn BranchRepository>,
        items: Arc<dyn MenuItemRepository>,
    ) -> Self {
        Self { orders, restaurants, branches, items }
    }

    pub async fn place_order(&self, slug: &str, request: PlaceOrderRequest) -> Result<PlacedOrder, DomainError> {
        let draft_fields = validate_request(&request)?;

        let storefront = resolve_storefront(
            self.restaurants.as_ref(),
            self.branches.as_ref(),
            slug,
            request.branch_id,
        )
        .await?;
        let restaurant = storefront.restaurant;
        let branch = storefront.branch;

        // Price every line from the catalogue
        let mut ids: Vec<Uuid> = request.items.iter().map(|l| l.menu_item_id).collect();
        ids.sort();
        ids.dedup();
        let catalogue: HashMap<Uuid, _> = self
            .items
            .find_orderable(&branch.id, &ids)
            .await?
            .into_iter()
            .map(|item| (item.id, item))
            .collect();

        let mut lines = Vec::with_capacity(request.items.len());
        for line in request.items {
            let item = catalogue.get(&line.menu_item_id).ok_or(DomainError::MenuItemNotFound)?;
            if !item.is_available {
                return Err(DomainError::MenuItemUnavailable(item.name.clone()));
            }
            lines.push(PricedLine {
                menu_item_id: item.id,
                item_name: item.name.clone(),
                unit_price_cents: item.price_cents,
                quantity: line.quantity,
                notes: line.notes.and_then(trimmed),
            });
        }

        let draft = OrderDraft {
            restaurant_id: restaurant.id,
            branch_id: branch.id,
            customer_name: draft_fields.customer_name,
            customer_phone: draft_fields.customer_phone,
            order_type: request.order_type,
            table_number: draft_fields.table_number,
            delivery_address: draft_fields.delivery_address,
            notes: draft_fields.notes,
        };

        let order = self.store_with_unique_number(draft, lines).await?;
        info!(
            "Order {} placed at branch {} ({} items, total {})",
            order.order_number,
            branch.id,
            order.item_count(),
            order.total_cents
        );

        let contact = branch.contact_number().or(restaurant.phone.as_deref());
        let whatsapp_url = contact.and_then(|number| {
            let message = build_order_message(&order, &restaurant.name, &branch.name, &restaurant.currency);
            whatsapp_url(number, &message)
        });
        if whatsapp_url.is_none() {
            warn!("No WhatsApp contact for branch {}; order {} has no hand-off link", branch.id, order.order_number);
        }

        Ok(PlacedOrder { order, whatsapp_url })
    }

    pub async fn list(
        &self,
        ctx: &AuthContext,
        restaurant_id: &Uuid,
        filter: &OrderFilter,
        pagination: &Pagination,
    ) -> Result<Page<Order>, DomainError> {
        ctx.ensure_restaurant(*restaurant_id)?;
        self.orders.list(restaurant_id, filter, &pagination.normalized()).await
    }

    pub async fn get(&self, ctx: &AuthContext, id: &Uuid) -> Result<OrderDetail, DomainError> {
        let order = self.load(ctx, id).await?;
        let history = self.orders.history(&order.id).await?;
        Ok(OrderDetail { order, history })
    }

    /// Conditional on the status read here; a concurrent change yields `Conflict`
    pub async fn update_status(
        &self,
        ctx: &AuthContext,
        id: &Uuid,
        to: OrderStatus,
        note: Option<String>,
    ) -> Result<OrderDetail, DomainError> {
        let mut order = self.load(ctx, id).await?;
        let from = order.status;
        if !from.can_transition_to(to) {
            return Err(DomainError::InvalidStatusTransition { from, to });
        }

        let change = OrderStatusChange::new(order.id, Some(from), to, Some(ctx.user_id), note.and_then(trimmed));
        if !self.orders.update_status(&order.id, from, &change).await? {
            warn!("Order {} changed concurrently, expected status {}", order.id, from);
            return Err(DomainError::Conflict(format!(
                "order {} is no longer {}",
                order.order_number, from
            )));
        }

        info!("Order {} {} -> {} by {}", order.order_number, from, to, ctx.user_id);
        order.status = to;
        order.modified_at = Some(change.changed_at);
        let history = self.orders.history(&order.id).await?;
        Ok(OrderDetail { order, history })
    }

    pub async fn stats(&self, ctx: &AuthContext, restaurant_id: &Uuid) -> Result<OrderStats, DomainError> {
        ctx.ensure_restaurant(*restaurant_id)?;
        self.orders.stats(restaurant_id).await
    }

    async fn load(&self, ctx: &AuthContext, id: &Uuid) -> Result<Order, DomainError> {
        let order = self.orders.find_by_id(id).await?.ok_or(DomainError::OrderNotFound)?;
        ctx.ensure_restaurant(order.restaurant_id)?;
        Ok(order)
    }

    /// Order numbers carry a random suffix; retry on the rare collision
    async fn store_with_unique_number(&self, draft: OrderDraft, lines: Vec<PricedLine>) -> Result<Order, DomainError> {
        let mut last_error = None;
        for _ in 0..ORDER_NUMBER_ATTEMPTS {
            let order = Order::new(generate_order_number(Utc::now()), draft.clone(), lines.clone());
            let initial = OrderStatusChange::new(order.id, None, OrderStatus::Pending, None, None);
            match self.orders.create(&order, &initial).await {
                Ok(stored) => return Ok(stored),
                Err(DomainError::Conflict(msg)) => {
                    warn!("Order number collision: {}", msg);
                    last_error = Some(DomainError::Conflict(msg));
                }
                Err(e) => return Err(e),
            }
        }
        Err(last_error.unwrap_or(DomainError::UnableToGenerateUniqueName))
    }
}

struct ValidatedCustomer {
    customer_name: String,
    customer_phone: String,
    table_number: Option<String>,
    delivery_address: Option<String>,
    notes: Option<String>,
}

fn trimmed(value: String) -> Option<String> {
    let t = value.trim();
    (!t.is_empty()).then(|| t.to_string())
}

fn validate_request(request: &PlaceOrderRequest) -> Result<ValidatedCustomer, DomainError> {
    let invalid = |msg: &str| Err(DomainError::ValidationError(msg.to_string()));

    let customer_name = request.customer_name.trim().to_string();
    if customer_name.is_empty() || customer_name.chars().count() > 100 {
        return invalid("customer_name must be between 1 and 100 characters");
    }
    if !is_valid_phone(&request.customer_phone) {
        return invalid("customer_phone must contain 7 to 15 digits");
    }
    if request.items.is_empty() || request.items.len() > MAX_ORDER_LINES {
        return Err(DomainError::ValidationError(format!(
            "an order must have between 1 and {} lines",
            MAX_ORDER_LINES
        )));
    }
    if request.items.iter().any(|l| l.quantity < 1 || l.quantity > MAX_LINE_QUANTITY) {
        return Err(DomainError::ValidationError(format!(
            "quantity must be between 1 and {}",
            MAX_LINE_QUANTITY
        )));
    }
    let long_note = request
        .items
        .iter()
        .filter_map(|l| l.notes.as_ref())
        .chain(request.notes.as_ref())
        .any(|n| n.chars().count() > MAX_NOTE_LENGTH);
    if long_note {
        return invalid("notes are limited to 500 characters");
    }

    let table_number = request.table_number.clone().and_then(trimmed);
    let delivery_address = request.delivery_address.clone().and_then(trimmed);
    match request.order_type {
        OrderType::DineIn if table_number.is_none() => return invalid("table_number is required for dine-in orders"),
        OrderType::Delivery if delivery_address.is_none() => {
            return invalid("delivery_address is required for delivery orders")
        }
        _ => {}
    }

    Ok(ValidatedCustomer {
        customer_name,
        customer_phone: normalize_phone(&request.customer_phone),
        table_number: if request.order_type == OrderType::DineIn { table_number } else { None },
        delivery_address: if request.order_type == OrderType::Delivery { delivery_address } else { None },
        notes: request.notes.clone().and_then(trimmed),
    })
}
