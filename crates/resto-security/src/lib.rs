//! # Resto Security
//! 
//! Security utilities: password hashing, password policy, opaque tokens.

pub mod password;
pub mod policy;
pub mod token;

pub use password::PasswordService;
pub use policy::{PasswordPolicy, PolicyViolation};
pub use token::{IssuedToken, TokenService};
