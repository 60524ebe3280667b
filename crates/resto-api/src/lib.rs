//! # Resto API
//!
//! HTTP handlers, middleware, DTOs, the response envelope and the router.

pub mod cookies;
pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use response::ApiResponse;
pub use router::create_router;
pub use state::AppState;

#[cfg(test)]
pub(crate) mod test_support;
