//! Opaque bearer tokens (sessions, password resets)
//!
//! The plaintext token is handed to the client once; only its SHA-256 digest
//! is persisted.

use chrono::{DateTime, Duration, Utc};
use resto_shared::constants::SESSION_TOKEN_BYTES;
use sha2::{Digest, Sha256};

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

pub struct TokenService;

impl TokenService {
    pub fn generate() -> String {
        let bytes: [u8; SESSION_TOKEN_BYTES] = rand::random();
        hex::encode(bytes)
    }

    pub fn hash(token: &str) -> String {
        hex::encode(Sha256::digest(token.as_bytes()))
    }

    pub fn issue(ttl: Duration) -> IssuedToken {
        let token = Self::generate();
        IssuedToken {
            token_hash: Self::hash(&token),
            token,
            expires_at: Utc::now() + ttl,
        }
    }

    /// Upper-case alphanumeric code, used for order numbers and references
    pub fn short_code(len: usize) -> String {
        const CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
        (0..len)
            .map(|_| {
                let b: u8 = rand::random();
                CHARSET[b as usize % CHARSET.len()] as char
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_hex_and_unique() {
        let a = TokenService::generate();
        let b = TokenService::generate();
        assert_eq!(a.len(), SESSION_TOKEN_BYTES * 2);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_is_stable() {
        let token = "abc123";
        assert_eq!(TokenService::hash(token), TokenService::hash(token));
        assert_ne!(TokenService::hash(token), token);
        assert_eq!(TokenService::hash(token).len(), 64);
    }

    #[test]
    fn test_issue_sets_expiry() {
        let issued = TokenService::issue(Duration::hours(1));
        assert_eq!(issued.token_hash, TokenService::hash(&issued.token));
        assert!(issued.expires_at > Utc::now());
    }

    #[test]
    fn test_short_code() {
        let code = TokenService::short_code(6);
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }
}
