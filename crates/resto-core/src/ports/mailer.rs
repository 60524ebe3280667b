//! Outbound mail port

use async_trait::async_trait;

use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_password_reset(&self, to: &str, username: &str, reset_link: &str) -> Result<(), DomainError>;
    async fn send_welcome(&self, to: &str, username: &str, restaurant_name: &str) -> Result<(), DomainError>;
}
