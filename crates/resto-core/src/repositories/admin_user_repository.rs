//! Admin user repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::AdminUser;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminUserRepository: Send + Sync {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<AdminUser>, DomainError>;
    /// Case-insensitive
    async fn find_by_username(&self, username: &str) -> Result<Option<AdminUser>, DomainError>;
    /// Case-insensitive
    async fn find_by_email(&self, email: &str) -> Result<Option<AdminUser>, DomainError>;
    async fn list_by_restaurant(&self, restaurant_id: &Uuid) -> Result<Vec<AdminUser>, DomainError>;
    async fn create(&self, user: &AdminUser) -> Result<AdminUser, DomainError>;
    async fn update(&self, user: &AdminUser) -> Result<AdminUser, DomainError>;
    async fn root_admin_exists(&self) -> Result<bool, DomainError>;
}
