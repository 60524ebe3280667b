// ============================================================================
// Resto Core - Admin User Entity
// File: crates/resto-core/src/domain/admin_user.rs
// Description: Back-office accounts (root and restaurant admins) with lockout
// ============================================================================

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Admin role enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    RootAdmin,
    RestaurantAdmin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::RootAdmin => "root_admin",
            UserRole::RestaurantAdmin => "restaurant_admin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "root_admin" => Some(UserRole::RootAdmin),
            "restaurant_admin" => Some(UserRole::RestaurantAdmin),
            _ => None,
        }
    }
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::RestaurantAdmin
    }
}

/// Admin user entity
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AdminUser {
    pub id: Uuid,
    /// `None` for root admins
    pub restaurant_id: Option<Uuid>,

    #[validate(length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email"))]
    pub email: String,

    #[serde(skip_serializing)]
    pub password_hash: String,

    pub role: UserRole,
    pub is_active: bool,

    pub failed_login_attempts: i32,
    pub locked_until: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,

    // Audit fields
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
    pub removed_at: Option<DateTime<Utc>>,
}

/// Outcome of a failed password check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailedLogin {
    /// Counter incremented, still below the threshold
    Counted(i32),
    /// Threshold reached; account locked until the given instant
    Locked(DateTime<Utc>),
}

impl AdminUser {
    pub fn new_restaurant_admin(
        restaurant_id: Uuid,
        username: String,
        email: String,
        password_hash: String,
    ) -> Result<Self, validator::ValidationErrors> {
        Self::build(Some(restaurant_id), UserRole::RestaurantAdmin, username, email, password_hash)
    }

    pub fn new_root_admin(
        username: String,
        email: String,
        password_hash: String,
    ) -> Result<Self, validator::ValidationErrors> {
        Self::build(None, UserRole::RootAdmin, username, email, password_hash)
    }

    fn build(
        restaurant_id: Option<Uuid>,
        role: UserRole,
        username: String,
        email: String,
        password_hash: String,
    ) -> Result<Self, validator::ValidationErrors> {
        let user = Self {
            id: Uuid::new_v4(),
            restaurant_id,
            username: username.trim().to_string(),
            email: email.trim().to_lowercase(),
            password_hash,
            role,
            is_active: true,
            failed_login_attempts: 0,
            locked_until: None,
            last_login_at: None,
            created_at: Utc::now(),
            modified_at: None,
            removed_at: None,
        };

        user.validate()?;
        if !is_valid_username(&user.username) {
            let mut error = validator::ValidationError::new("username_charset");
            error.message = Some("Username may contain letters, digits, '.', '_' and '-'".into());
            let mut errors = validator::ValidationErrors::new();
            errors.add("username", error);
            return Err(errors);
        }
        Ok(user)
    }

    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.map_or(false, |until| until > now)
    }

    pub fn is_root(&self) -> bool {
        self.role == UserRole::RootAdmin
    }

    /// Count a failed attempt; on reaching `max_attempts` lock and reset the counter
    pub fn register_failed_login(&mut self, max_attempts: i32, lockout: Duration) -> FailedLogin {
        let now = Utc::now();
        self.failed_login_attempts += 1;
        self.modified_at = Some(now);

        if self.failed_login_attempts >= max_attempts.max(1) {
            let until = now + lockout;
            self.locked_until = Some(until);
            self.failed_login_attempts = 0;
            FailedLogin::Locked(until)
        } else {
            FailedLogin::Counted(self.failed_login_attempts)
        }
    }

    pub fn record_login(&mut self) {
        let now = Utc::now();
        self.failed_login_attempts = 0;
        self.locked_until = None;
        self.last_login_at = Some(now);
        self.modified_at = Some(now);
    }

    pub fn set_password_hash(&mut self, password_hash: String) {
        self.password_hash = password_hash;
        self.failed_login_attempts = 0;
        self.locked_until = None;
        self.modified_at = Some(Utc::now());
    }

    pub fn set_active(&mut self, active: bool) {
        self.is_active = active;
        self.modified_at = Some(Utc::now());
    }

    pub fn is_deleted(&self) -> bool {
        self.removed_at.is_some()
    }
}

pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> AdminUser {
        AdminUser::new_restaurant_admin(
            Uuid::new_v4(),
            "chef.budi".to_string(),
            "Budi@Example.com".to_string(),
            "hash".to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_create_admin() {
        let user = admin();
        assert_eq!(user.email, "budi@example.com");
        assert_eq!(user.role, UserRole::RestaurantAdmin);
        assert!(!user.is_root());
    }

    #[test]
    fn test_username_charset() {
        let user = AdminUser::new_root_admin("bad name".to_string(), "a@b.co".to_string(), "h".to_string());
        assert!(user.is_err());
    }

    #[test]
    fn test_lockout_after_max_attempts() {
        let mut user = admin();
        let lockout = Duration::minutes(15);

        assert_eq!(user.register_failed_login(3, lockout), FailedLogin::Counted(1));
        assert_eq!(user.register_failed_login(3, lockout), FailedLogin::Counted(2));
        match user.register_failed_login(3, lockout) {
            FailedLogin::Locked(until) => assert!(until > Utc::now()),
            other => panic!("expected lock, got {:?}", other),
        }
        assert!(user.is_locked(Utc::now()));
        assert_eq!(user.failed_login_attempts, 0);
        assert!(!user.is_locked(Utc::now() + Duration::minutes(16)));
    }

    #[test]
    fn test_record_login_clears_lock() {
        let mut user = admin();
        user.register_failed_login(1, Duration::minutes(5));
        user.record_login();
        assert!(!user.is_locked(Utc::now()));
        assert!(user.last_login_at.is_some());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let json = serde_json::to_value(admin()).unwrap();
        assert!(json.get("password_hash").is_none());
    }
}
