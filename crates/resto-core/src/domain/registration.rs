// ============================================================================
// Resto Core - Registration & Payment Entities
// File: crates/resto-core/src/domain/registration.rs
// Description: Paid-plan signup awaiting payment, and payment attempts
// ============================================================================

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::plan::{BillingCycle, Plan};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    PendingPayment,
    /// Claimed by a payment attempt; no second charge may start
    Processing,
    Completed,
    Expired,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::PendingPayment => "pending_payment",
            RegistrationStatus::Processing => "processing",
            RegistrationStatus::Completed => "completed",
            RegistrationStatus::Expired => "expired",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending_payment" => Some(RegistrationStatus::PendingPayment),
            "processing" => Some(RegistrationStatus::Processing),
            "completed" => Some(RegistrationStatus::Completed),
            "expired" => Some(RegistrationStatus::Expired),
            _ => None,
        }
    }
}

impl Default for RegistrationStatus {
    fn default() -> Self {
        RegistrationStatus::PendingPayment
    }
}

/// Signup captured before payment; the password is stored hashed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub id: Uuid,
    pub restaurant_name: String,
    pub slug: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: Option<String>,
    pub plan: Plan,
    pub billing_cycle: BillingCycle,
    pub amount_cents: i64,
    pub currency: String,
    pub status: RegistrationStatus,
    pub restaurant_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

pub struct NewRegistration {
    pub restaurant_name: String,
    pub slug: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub plan: Plan,
    pub billing_cycle: BillingCycle,
    pub currency: String,
}

impl Registration {
    pub fn new(input: NewRegistration, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            amount_cents: input.plan.price_cents(input.billing_cycle),
            restaurant_name: input.restaurant_name,
            slug: input.slug,
            username: input.username,
            email: input.email,
            password_hash: input.password_hash,
            phone: input.phone,
            plan: input.plan,
            billing_cycle: input.billing_cycle,
            currency: input.currency,
            status: RegistrationStatus::PendingPayment,
            restaurant_id: None,
            created_at: now,
            expires_at: now + ttl,
            completed_at: None,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.status == RegistrationStatus::Expired
            || (self.is_open() && self.expires_at <= now)
    }

    /// Awaiting payment or mid-charge; holds its slug, username and email
    pub fn is_open(&self) -> bool {
        matches!(self.status, RegistrationStatus::PendingPayment | RegistrationStatus::Processing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Succeeded,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Succeeded => "succeeded",
            PaymentStatus::Failed => "failed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(PaymentStatus::Pending),
            "succeeded" => Some(PaymentStatus::Succeeded),
            "failed" => Some(PaymentStatus::Failed),
            _ => None,
        }
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub registration_id: Uuid,
    pub amount_cents: i64,
    pub currency: String,
    pub status: PaymentStatus,
    pub provider_reference: Option<String>,
    pub failure_reason: Option<String>,
    pub card_brand: Option<String>,
    pub card_last4: Option<String>,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl Payment {
    pub fn pending_for(registration: &Registration) -> Self {
        Self {
            id: Uuid::new_v4(),
            registration_id: registration.id,
            amount_cents: registration.amount_cents,
            currency: registration.currency.clone(),
            status: PaymentStatus::Pending,
            provider_reference: None,
            failure_reason: None,
            card_brand: None,
            card_last4: None,
            created_at: Utc::now(),
            processed_at: None,
        }
    }

    pub fn mark_succeeded(&mut self, receipt: &PaymentReceipt) {
        self.status = PaymentStatus::Succeeded;
        self.provider_reference = Some(receipt.reference.clone());
        self.card_brand = Some(receipt.card_brand.clone());
        self.card_last4 = Some(receipt.card_last4.clone());
        self.failure_reason = None;
        self.processed_at = Some(Utc::now());
    }

    pub fn mark_failed(&mut self, reason: &str, card_last4: Option<String>) {
        self.status = PaymentStatus::Failed;
        self.failure_reason = Some(reason.to_string());
        self.card_last4 = card_last4;
        self.processed_at = Some(Utc::now());
    }
}

/// Card details submitted to the payment gateway; never persisted
#[derive(Clone, Deserialize)]
pub struct CardDetails {
    pub holder_name: String,
    pub number: String,
    pub expiry_month: u32,
    pub expiry_year: u32,
    pub cvc: String,
}

impl std::fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardDetails")
            .field("holder_name", &self.holder_name)
            .field("last4", &self.last4())
            .finish_non_exhaustive()
    }
}

impl CardDetails {
    pub fn digits(&self) -> String {
        self.number.chars().filter(|c| c.is_ascii_digit()).collect()
    }

    pub fn last4(&self) -> String {
        let digits = self.digits();
        digits[digits.len().saturating_sub(4)..].to_string()
    }
}

#[derive(Debug, Clone)]
pub struct ChargeRequest {
    pub payment_id: Uuid,
    pub amount_cents: i64,
    pub currency: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentReceipt {
    pub reference: String,
    pub card_brand: String,
    pub card_last4: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> Registration {
        Registration::new(
            NewRegistration {
                restaurant_name: "Kopi Kita".to_string(),
                slug: "kopi-kita".to_string(),
                username: "kopi".to_string(),
                email: "kopi@example.com".to_string(),
                password_hash: "hash".to_string(),
                phone: None,
                plan: Plan::Pro,
                billing_cycle: BillingCycle::Yearly,
                currency: "USD".to_string(),
            },
            Duration::hours(24),
        )
    }

    #[test]
    fn test_amount_from_plan() {
        let r = registration();
        assert_eq!(r.amount_cents, 49_000);
        assert_eq!(r.status, RegistrationStatus::PendingPayment);
        assert!(!r.is_expired(Utc::now()));
        assert!(r.is_expired(Utc::now() + Duration::hours(25)));
    }

    #[test]
    fn test_payment_transitions() {
        let r = registration();
        let mut p = Payment::pending_for(&r);
        assert_eq!(p.amount_cents, r.amount_cents);

        p.mark_failed("card_declined", Some("0002".to_string()));
        assert_eq!(p.status, PaymentStatus::Failed);

        p.mark_succeeded(&PaymentReceipt {
            reference: "sim_1".to_string(),
            card_brand: "visa".to_string(),
            card_last4: "4242".to_string(),
        });
        assert_eq!(p.status, PaymentStatus::Succeeded);
        assert_eq!(p.failure_reason, None);
    }

    #[test]
    fn test_card_debug_hides_number() {
        let card = CardDetails {
            holder_name: "A B".to_string(),
            number: "4242 4242 4242 4242".to_string(),
            expiry_month: 12,
            expiry_year: 2030,
            cvc: "123".to_string(),
        };
        let debug = format!("{:?}", card);
        assert!(!debug.contains("4242 4242"));
        assert!(!debug.contains("123"));
        assert_eq!(card.last4(), "4242");
    }
}
