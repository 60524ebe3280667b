//! Outbound service ports (mail, payments)

pub mod mailer;
pub mod payment_gateway;

pub use mailer::Mailer;
pub use payment_gateway::{ChargeOutcome, PaymentGateway};
