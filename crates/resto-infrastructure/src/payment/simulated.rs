// ============================================================================
// Resto Infrastructure - Simulated Payment Gateway
// File: crates/resto-infrastructure/src/payment/simulated.rs
// ============================================================================
//
// No money moves. Cards are checked the way a processor would before
// charging, and the test numbers in DECLINING_CARDS are always refused.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use tracing::{info, warn};

use resto_core::domain::{CardDetails, ChargeRequest, PaymentReceipt};
use resto_core::error::DomainError;
use resto_core::ports::{ChargeOutcome, PaymentGateway};

/// Test numbers that are valid cards but always declined
const DECLINING_CARDS: &[(&str, &str)] = &[
    ("4000000000000002", "card_declined"),
    ("4000000000009995", "insufficient_funds"),
    ("4000000000000069", "expired_card"),
];

pub struct SimulatedPaymentGateway {
    latency: Duration,
}

impl SimulatedPaymentGateway {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for SimulatedPaymentGateway {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

#[async_trait]
impl PaymentGateway for SimulatedPaymentGateway {
    async fn charge(&self, request: &ChargeRequest, card: &CardDetails) -> Result<ChargeOutcome, DomainError> {
        if request.amount_cents <= 0 {
            return Err(DomainError::ValidationError("Charge amount must be positive".to_string()));
        }
        validate_card(card, Utc::now().date_naive())?;

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let digits = card.digits();
        if let Some((_, reason)) = DECLINING_CARDS.iter().find(|(number, _)| *number == digits) {
            warn!(payment_id = %request.payment_id, "Simulated charge declined: {}", reason);
            return Ok(ChargeOutcome::Declined { reason: reason.to_string() });
        }

        let receipt = PaymentReceipt {
            reference: format!("sim_{}", hex::encode(rand::random::<[u8; 12]>())),
            card_brand: card_brand(&digits).to_string(),
            card_last4: card.last4(),
        };
        info!(
            payment_id = %request.payment_id,
            amount_cents = request.amount_cents,
            currency = %request.currency,
            "Simulated charge approved: {}",
            receipt.reference
        );

        Ok(ChargeOutcome::Approved(receipt))
    }
}

/// Rejects malformed card data before any charge is attempted
pub fn validate_card(card: &CardDetails, today: NaiveDate) -> Result<(), DomainError> {
    let invalid = |msg: &str| Err(DomainError::ValidationError(msg.to_string()));

    if card.holder_name.trim().is_empty() {
        return invalid("Card holder name is required");
    }

    if card.number.chars().any(|c| !(c.is_ascii_digit() || c == ' ' || c == '-')) {
        return invalid("Card number may only contain digits");
    }
    let digits = card.digits();
    if !(13..=19).contains(&digits.len()) || !luhn_valid(&digits) {
        return invalid("Card number is invalid");
    }

    if !(1..=12).contains(&card.expiry_month) {
        return invalid("Card expiry month is invalid");
    }
    let year = if card.expiry_year < 100 { card.expiry_year + 2000 } else { card.expiry_year };
    let (this_year, this_month) = (today.year() as u32, today.month());
    if year < this_year || (year == this_year && card.expiry_month < this_month) {
        return invalid("Card has expired");
    }

    let cvc_ok = (3..=4).contains(&card.cvc.len()) && card.cvc.chars().all(|c| c.is_ascii_digit());
    if !cvc_ok {
        return invalid("Card security code is invalid");
    }

    Ok(())
}

fn luhn_valid(digits: &str) -> bool {
    let sum: u32 = digits
        .chars()
        .rev()
        .filter_map(|c| c.to_digit(10))
        .enumerate()
        .map(|(i, d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

fn card_brand(digits: &str) -> &'static str {
    let prefix2: u32 = digits.get(..2).and_then(|p| p.parse().ok()).unwrap_or(0);
    let prefix4: u32 = digits.get(..4).and_then(|p| p.parse().ok()).unwrap_or(0);

    if digits.starts_with('4') {
        "visa"
    } else if (51..=55).contains(&prefix2) || (2221..=2720).contains(&prefix4) {
        "mastercard"
    } else if prefix2 == 34 || prefix2 == 37 {
        "amex"
    } else if digits.starts_with("6011") || prefix2 == 65 {
        "discover"
    } else {
        "card"
    }
}
