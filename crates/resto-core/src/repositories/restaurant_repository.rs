//! Restaurant repository trait (port)

use async_trait::async_trait;
use resto_shared::{Page, Pagination};
use uuid::Uuid;

use crate::domain::{PlatformStats, Restaurant, RestaurantQuery, RestaurantSummary};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Restaurant>, DomainError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Restaurant>, DomainError>;
    async fn slug_exists(&self, slug: &str) -> Result<bool, DomainError>;
    async fn update(&self, restaurant: &Restaurant) -> Result<Restaurant, DomainError>;
    async fn list(
        &self,
        query: &RestaurantQuery,
        pagination: &Pagination,
    ) -> Result<Page<RestaurantSummary>, DomainError>;
    async fn platform_stats(&self) -> Result<PlatformStats, DomainError>;
}
