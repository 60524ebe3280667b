//! # Resto Infrastructure
//! 
//! PostgreSQL repositories, outbound mail, the simulated payment gateway
//! and the background housekeeping loop (adapters).

pub mod database;
pub mod mail;
pub mod payment;
pub mod housekeeping;

pub use database::{create_pool, postgres_repositories, run_migrations};
pub use database::postgres::*;
pub use mail::{LogMailer, SmtpMailer};
pub use payment::SimulatedPaymentGateway;
pub use housekeeping::spawn_housekeeping;
