//! Authenticated caller context and tenant scoping

use serde::Serialize;
use uuid::Uuid;

use super::admin_user::{AdminUser, UserRole};
use crate::error::DomainError;

/// Identity attached to an authenticated request
#[derive(Debug, Clone, Serialize)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub username: String,
    pub role: UserRole,
    pub restaurant_id: Option<Uuid>,
    /// Session the request was authenticated with
    #[serde(skip)]
    pub session_id: Option<Uuid>,
}

impl AuthContext {
    pub fn with_session(mut self, session_id: Uuid) -> Self {
        self.session_id = Some(session_id);
        self
    }

    pub fn is_root(&self) -> bool {
        self.role == UserRole::RootAdmin
    }

    pub fn can_access(&self, restaurant_id: Uuid) -> bool {
        self.is_root() || self.restaurant_id == Some(restaurant_id)
    }

    pub fn ensure_restaurant(&self, restaurant_id: Uuid) -> Result<(), DomainError> {
        if self.can_access(restaurant_id) {
            Ok(())
        } else {
            Err(DomainError::Forbidden(format!(
                "no access to restaurant {}",
                restaurant_id
            )))
        }
    }

    pub fn ensure_root(&self) -> Result<(), DomainError> {
        if self.is_root() {
            Ok(())
        } else {
            Err(DomainError::Forbidden("root admin required".to_string()))
        }
    }
}

impl From<&AdminUser> for AuthContext {
    fn from(user: &AdminUser) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            role: user.role,
            restaurant_id: user.restaurant_id,
            session_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(role: UserRole, restaurant_id: Option<Uuid>) -> AuthContext {
        AuthContext {
            user_id: Uuid::new_v4(),
            username: "u".to_string(),
            role,
            restaurant_id,
            session_id: None,
        }
    }

    #[test]
    fn test_root_sees_everything() {
        let root = ctx(UserRole::RootAdmin, None);
        assert!(root.ensure_restaurant(Uuid::new_v4()).is_ok());
        assert!(root.ensure_root().is_ok());
    }

    #[test]
    fn test_restaurant_admin_scoped() {
        let own = Uuid::new_v4();
        let admin = ctx(UserRole::RestaurantAdmin, Some(own));
        assert!(admin.ensure_restaurant(own).is_ok());
        assert!(matches!(
            admin.ensure_restaurant(Uuid::new_v4()),
            Err(DomainError::Forbidden(_))
        ));
        assert!(admin.ensure_root().is_err());
    }
}
