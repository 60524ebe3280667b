//! Request middleware

pub mod auth;
pub mod rate_limit;

pub use auth::require_auth;
pub use rate_limit::{rate_limit, RateLimiters};
