//! Payment gateway port

use async_trait::async_trait;

use crate::domain::{CardDetails, ChargeRequest, PaymentReceipt};
use crate::error::DomainError;

#[derive(Debug, Clone)]
pub enum ChargeOutcome {
    Approved(PaymentReceipt),
    Declined { reason: String },
}

/// `Err` is reserved for malformed card data and gateway faults; a refused
/// charge is `Ok(ChargeOutcome::Declined)`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn charge(&self, request: &ChargeRequest, card: &CardDetails) -> Result<ChargeOutcome, DomainError>;
}
