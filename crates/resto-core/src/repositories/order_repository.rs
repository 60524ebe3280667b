//! Order repository trait (port)

use async_trait::async_trait;
use resto_shared::{Page, Pagination};
use uuid::Uuid;

use crate::domain::{Order, OrderFilter, OrderStats, OrderStatus, OrderStatusChange};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Stores the order, its items and the initial history entry together
    async fn create(&self, order: &Order, initial: &OrderStatusChange) -> Result<Order, DomainError>;
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Order>, DomainError>;
    async fn list(
        &self,
        restaurant_id: &Uuid,
        filter: &OrderFilter,
        pagination: &Pagination,
    ) -> Result<Page<Order>, DomainError>;
    /// Compare-and-set on the status; returns false when `expected` no longer
    /// matches the stored status
    async fn update_status(
        &self,
        id: &Uuid,
        expected: OrderStatus,
        change: &OrderStatusChange,
    ) -> Result<bool, DomainError>;
    async fn history(&self, order_id: &Uuid) -> Result<Vec<OrderStatusChange>, DomainError>;
    async fn stats(&self, restaurant_id: &Uuid) -> Result<OrderStats, DomainError>;
}
