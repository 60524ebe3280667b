//! # Resto Core
//! 
//! Domain entities, services, and repository traits for the restaurant backend.

pub mod domain;
pub mod services;
pub mod repositories;
pub mod ports;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use error::DomainError;
