//! Password strength policy

use resto_shared::constants::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyViolation {
    #[error("Password must be at least {0} characters")]
    TooShort(usize),
    #[error("Password must be at most {0} characters")]
    TooLong(usize),
    #[error("Password is too easy to guess")]
    TooWeak,
}

/// Length bounds plus a minimum zxcvbn score (0..=4)
#[derive(Debug, Clone, Copy)]
pub struct PasswordPolicy {
    pub min_score: u8,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self { min_score: 2 }
    }
}

impl PasswordPolicy {
    pub fn new(min_score: u8) -> Self {
        Self { min_score: min_score.min(4) }
    }

    /// `user_inputs` are account fields (username, email) that must not make
    /// the password guessable.
    pub fn check(&self, password: &str, user_inputs: &[&str]) -> Result<(), PolicyViolation> {
        let len = password.chars().count();
        if len < MIN_PASSWORD_LENGTH {
            return Err(PolicyViolation::TooShort(MIN_PASSWORD_LENGTH));
        }
        if len > MAX_PASSWORD_LENGTH {
            return Err(PolicyViolation::TooLong(MAX_PASSWORD_LENGTH));
        }

        let estimate = zxcvbn::zxcvbn(password, user_inputs);
        if (estimate.score() as u8) < self.min_score {
            return Err(PolicyViolation::TooWeak);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_bounds() {
        let policy = PasswordPolicy::new(0);
        assert_eq!(policy.check("short", &[]), Err(PolicyViolation::TooShort(8)));
        let long = "a".repeat(129);
        assert_eq!(policy.check(&long, &[]), Err(PolicyViolation::TooLong(128)));
    }

    #[test]
    fn test_weak_password_rejected() {
        let policy = PasswordPolicy::new(3);
        assert_eq!(policy.check("password", &[]), Err(PolicyViolation::TooWeak));
        assert_eq!(policy.check("pizzahut1", &["pizzahut1"]), Err(PolicyViolation::TooWeak));
    }

    #[test]
    fn test_strong_password_accepted() {
        let policy = PasswordPolicy::default();
        assert!(policy.check("tangerine-Ferry-74-lantern", &["owner"]).is_ok());
    }
}
