//! Branch repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Branch;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BranchRepository: Send + Sync {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Branch>, DomainError>;
    /// Non-deleted branches, main branch first
    async fn list_by_restaurant(&self, restaurant_id: &Uuid) -> Result<Vec<Branch>, DomainError>;
    async fn count_by_restaurant(&self, restaurant_id: &Uuid) -> Result<i64, DomainError>;
    async fn create(&self, branch: &Branch) -> Result<Branch, DomainError>;
    async fn update(&self, branch: &Branch) -> Result<Branch, DomainError>;
    /// Moves the main flag to `branch_id` in one transaction
    async fn set_main(&self, restaurant_id: &Uuid, branch_id: &Uuid) -> Result<(), DomainError>;
    /// Fails with `CannotDeleteMainBranch` if the branch is main when the write lands
    async fn soft_delete(&self, id: &Uuid) -> Result<(), DomainError>;
}
