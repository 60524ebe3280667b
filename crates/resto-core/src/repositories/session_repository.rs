//! Session and password reset token repository traits (ports)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{PasswordResetToken, Session};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: &Session) -> Result<(), DomainError>;
    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, DomainError>;
    async fn touch(&self, id: &Uuid, seen_at: DateTime<Utc>) -> Result<(), DomainError>;
    async fn delete_by_token_hash(&self, token_hash: &str) -> Result<(), DomainError>;
    async fn delete_for_user(&self, user_id: &Uuid) -> Result<u64, DomainError>;
    /// Revokes every session of the user except `keep`
    async fn delete_for_user_except(&self, user_id: &Uuid, keep: &Uuid) -> Result<u64, DomainError>;
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordResetRepository: Send + Sync {
    async fn create(&self, token: &PasswordResetToken) -> Result<(), DomainError>;
    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<PasswordResetToken>, DomainError>;
    /// Marks the token used and stores the new password hash (clearing any
    /// lockout) in one transaction. Returns false when the token was already used.
    async fn redeem(
        &self,
        id: &Uuid,
        user_id: &Uuid,
        password_hash: &str,
        used_at: DateTime<Utc>,
    ) -> Result<bool, DomainError>;
    /// Drops tokens that expired or were used before `before`
    async fn purge(&self, before: DateTime<Utc>) -> Result<u64, DomainError>;
}
