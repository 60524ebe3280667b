//! Theme settings repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ThemeSettings;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ThemeRepository: Send + Sync {
    async fn find_by_menu(&self, menu_id: &Uuid) -> Result<Option<ThemeSettings>, DomainError>;
    async fn upsert(&self, theme: &ThemeSettings) -> Result<ThemeSettings, DomainError>;
    async fn delete(&self, menu_id: &Uuid) -> Result<(), DomainError>;
}
