//! Registration and payment repository traits (ports)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{AdminUser, Branch, Payment, Registration, Restaurant};
use crate::error::DomainError;

/// Records created when a paid registration completes
#[derive(Debug, Clone)]
pub struct Provisioning {
    pub restaurant: Restaurant,
    pub branch: Branch,
    pub admin: AdminUser,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// Stores the registration with its first pending payment
    async fn create(&self, registration: &Registration, payment: &Payment) -> Result<(), DomainError>;
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Registration>, DomainError>;
    /// Slug held by a registration still awaiting payment
    async fn slug_reserved(&self, slug: &str) -> Result<bool, DomainError>;
    /// Username held by an open registration, case-insensitive
    async fn username_reserved(&self, username: &str) -> Result<bool, DomainError>;
    async fn email_reserved(&self, email: &str) -> Result<bool, DomainError>;
    /// Moves an unexpired `pending_payment` registration to `processing`.
    /// Returns false when another attempt already holds it.
    async fn begin_payment(&self, registration_id: &Uuid) -> Result<bool, DomainError>;
    /// Returns a `processing` registration to `pending_payment`
    async fn release_payment(&self, registration_id: &Uuid) -> Result<(), DomainError>;
    /// Creates restaurant, main branch and admin, marks the payment succeeded
    /// and the registration completed, all in one transaction. Returns false
    /// when the registration was no longer `processing`.
    async fn complete(
        &self,
        registration_id: &Uuid,
        payment: &Payment,
        provisioning: &Provisioning,
    ) -> Result<bool, DomainError>;
    async fn expire_stale(&self, now: DateTime<Utc>) -> Result<u64, DomainError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn create(&self, payment: &Payment) -> Result<(), DomainError>;
    async fn update(&self, payment: &Payment) -> Result<(), DomainError>;
    async fn find_pending(&self, registration_id: &Uuid) -> Result<Option<Payment>, DomainError>;
    async fn list_for_registration(&self, registration_id: &Uuid) -> Result<Vec<Payment>, DomainError>;
}
