//! Restaurant admin accounts and root admin bootstrap

use std::sync::Arc;

use resto_security::{PasswordPolicy, PasswordService};
use resto_shared::utils::mask_email;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{AdminUser, AuthContext};
use crate::error::DomainError;
use crate::repositories::{AdminUserRepository, RestaurantRepository, SessionRepository};

#[derive(Debug, Clone, Deserialize)]
pub struct NewAdmin {
    pub username: String,
    pub email: String,
    pub password: String,
}

pub struct AdminUserService {
    users: Arc<dyn AdminUserRepository>,
    restaurants: Arc<dyn RestaurantRepository>,
    sessions: Arc<dyn SessionRepository>,
    password_policy: PasswordPolicy,
}

impl AdminUserService {
    pub fn new(
        users: Arc<dyn AdminUserRepository>,
        restaurants: Arc<dyn RestaurantRepository>,
        sessions: Arc<dyn SessionRepository>,
        password_policy: PasswordPolicy,
    ) -> Self {
        Self { users, restaurants, sessions, password_policy }
    }

    pub async fn list_admins(&self, ctx: &AuthContext, restaurant_id: &Uuid) -> Result<Vec<AdminUser>, DomainError> {
        ctx.ensure_restaurant(*restaurant_id)?;
        self.users.list_by_restaurant(restaurant_id).await
    }

    pub async fn create_admin(
        &self,
        ctx: &AuthContext,
        restaurant_id: &Uuid,
        input: NewAdmin,
    ) -> Result<AdminUser, DomainError> {
        ctx.ensure_restaurant(*restaurant_id)?;
        self.restaurants
            .find_by_id(restaurant_id)
            .await?
            .filter(|r| !r.is_deleted())
            .ok_or(DomainError::RestaurantNotFound)?;

        let username = input.username.trim().to_string();
        let email = input.email.trim().to_lowercase();
        self.ensure_unique(&username, &email).await?;
        self.password_policy.check(&input.password, &[&username, &email])?;

        let hash = PasswordService::hash(&input.password)?;
        let user = AdminUser::new_restaurant_admin(*restaurant_id, username, email, hash)?;
        let created = self.users.create(&user).await?;

        info!("Admin {} created for restaurant {} by {}", created.id, restaurant_id, ctx.user_id);
        Ok(created)
    }

    /// Deactivation revokes every session of the target
    pub async fn set_admin_active(
        &self,
        ctx: &AuthContext,
        user_id: &Uuid,
        active: bool,
    ) -> Result<AdminUser, DomainError> {
        let mut user = self
            .users
            .find_by_id(user_id)
            .await?
            .filter(|u| !u.is_deleted())
            .ok_or(DomainError::UserNotFound)?;

        let restaurant_id = user
            .restaurant_id
            .ok_or_else(|| DomainError::Forbidden("root admin accounts cannot be changed".to_string()))?;
        ctx.ensure_restaurant(restaurant_id)?;
        if user.id == ctx.user_id && !active {
            return Err(DomainError::Forbidden("cannot deactivate your own account".to_string()));
        }

        user.set_active(active);
        let updated = self.users.update(&user).await?;
        if !active {
            let revoked = self.sessions.delete_for_user(user_id).await?;
            info!("Admin {} deactivated, {} sessions revoked", user_id, revoked);
        }
        Ok(updated)
    }

    /// Create the root admin when none exists yet. Returns true when created.
    pub async fn ensure_root_admin(&self, username: &str, email: &str, password: &str) -> Result<bool, DomainError> {
        if self.users.root_admin_exists().await? {
            return Ok(false);
        }

        let username = username.trim().to_string();
        let email = email.trim().to_lowercase();
        if let Err(e) = self.password_policy.check(password, &[&username, &email]) {
            warn!("Root admin password does not meet policy: {}", e);
            return Err(e.into());
        }
        self.ensure_unique(&username, &email).await?;

        let user = AdminUser::new_root_admin(username, email, PasswordService::hash(password)?)?;
        self.users.create(&user).await?;
        info!("Root admin {} created ({})", user.username, mask_email(&user.email));
        Ok(true)
    }

    async fn ensure_unique(&self, username: &str, email: &str) -> Result<(), DomainError> {
        if self.users.find_by_username(username).await?.is_some() {
            return Err(DomainError::UsernameAlreadyExists(username.to_string()));
        }
        if self.users.find_by_email(email).await?.is_some() {
            return Err(DomainError::EmailAlreadyExists(email.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use fake::faker::internet::en::SafeEmail;
    use fake::faker::lorem::en::Word;
    use fake::Fake;

    use super::*;
    use crate::domain::{BillingCycle, Plan, Restaurant, UserRole};
    use crate::repositories::admin_user_repository::MockAdminUserRepository;
    use crate::repositories::restaurant_repository::MockRestaurantRepository;
    use crate::repositories::session_repository::MockSessionRepository;

    fn service(
        users: MockAdminUserRepository,
        restaurants: MockRestaurantRepository,
        sessions: MockSessionRepository,
    ) -> AdminUserService {
        AdminUserService::new(Arc::new(users), Arc::new(restaurants), Arc::new(sessions), PasswordPolicy::default())
    }

    fn admin(restaurant_id: Uuid, username: &str) -> AdminUser {
        AdminUser::new_restaurant_admin(
            restaurant_id,
            username.to_string(),
            format!("{}@example.com", username),
            "hash".to_string(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_admin_rejects_duplicate_username() {
        let restaurant = Restaurant::new(
            "Soto Pak Min".to_string(),
            "soto-pak-min".to_string(),
            None,
            None,
            "USD".to_string(),
            Plan::Basic,
            BillingCycle::Monthly,
        )
        .unwrap();
        let rid = restaurant.id;
        let existing = admin(rid, "kasir");

        let mut restaurants = MockRestaurantRepository::new();
        restaurants.expect_find_by_id().returning(move |_| Ok(Some(restaurant.clone())));
        let mut users = MockAdminUserRepository::new();
        users.expect_find_by_username().returning(move |_| Ok(Some(existing.clone())));
        users.expect_create().never();

        let ctx = AuthContext::from(&admin(rid, "owner"));
        let err = service(users, restaurants, MockSessionRepository::new())
            .create_admin(
                &ctx,
                &rid,
                NewAdmin {
                    username: "Kasir".to_string(),
                    email: "kasir2@example.com".to_string(),
                    password: "purple monkey dishwasher 42".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::UsernameAlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_create_admin_normalizes_identity() {
        let restaurant = Restaurant::new(
            "Bakmi Ayam".to_string(),
            "bakmi-ayam".to_string(),
            None,
            None,
            "USD".to_string(),
            Plan::Pro,
            BillingCycle::Yearly,
        )
        .unwrap();
        let rid = restaurant.id;

        let word: String = Word().fake();
        let username = format!("{}_admin", word);
        let email: String = SafeEmail().fake();
        let expected_email = email.to_lowercase();
        let expected_username = username.clone();

        let mut restaurants = MockRestaurantRepository::new();
        restaurants.expect_find_by_id().returning(move |_| Ok(Some(restaurant.clone())));
        let mut users = MockAdminUserRepository::new();
        users.expect_find_by_username().returning(|_| Ok(None));
        users.expect_find_by_email().returning(|_| Ok(None));
        users
            .expect_create()
            .withf(move |u| {
                u.email == expected_email
                    && u.username == expected_username
                    && u.restaurant_id == Some(rid)
                    && u.role == UserRole::RestaurantAdmin
            })
            .times(1)
            .returning(|u| Ok(u.clone()));

        let ctx = AuthContext::from(&admin(rid, "owner"));
        let created = service(users, restaurants, MockSessionRepository::new())
            .create_admin(
                &ctx,
                &rid,
                NewAdmin {
                    username: format!("  {} ", username),
                    email: email.to_uppercase(),
                    password: "purple monkey dishwasher 42".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(created.username, username);
        assert_ne!(created.password_hash, "purple monkey dishwasher 42");
    }

    #[tokio::test]
    async fn test_deactivate_revokes_sessions() {
        let rid = Uuid::new_v4();
        let target = admin(rid, "kasir");
        let target_id = target.id;

        let mut users = MockAdminUserRepository::new();
        users.expect_find_by_id().returning(move |_| Ok(Some(target.clone())));
        users.expect_update().withf(|u| !u.is_active).returning(|u| Ok(u.clone()));
        let mut sessions = MockSessionRepository::new();
        sessions
            .expect_delete_for_user()
            .withf(move |id| *id == target_id)
            .times(1)
            .returning(|_| Ok(3));

        let ctx = AuthContext::from(&admin(rid, "owner"));
        let updated = service(users, MockRestaurantRepository::new(), sessions)
            .set_admin_active(&ctx, &target_id, false)
            .await
            .unwrap();
        assert!(!updated.is_active);
    }

    #[tokio::test]
    async fn test_cannot_deactivate_self() {
        let me = admin(Uuid::new_v4(), "owner");
        let ctx = AuthContext::from(&me);
        let my_id = me.id;
        let mut users = MockAdminUserRepository::new();
        users.expect_find_by_id().returning(move |_| Ok(Some(me.clone())));

        let err = service(users, MockRestaurantRepository::new(), MockSessionRepository::new())
            .set_admin_active(&ctx, &my_id, false)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_root_admin_not_recreated() {
        let mut users = MockAdminUserRepository::new();
        users.expect_root_admin_exists().returning(|| Ok(true));
        users.expect_create().never();

        let created = service(users, MockRestaurantRepository::new(), MockSessionRepository::new())
            .ensure_root_admin("root", "root@example.com", "purple monkey dishwasher 42")
            .await
            .unwrap();
        assert!(!created);
    }

    #[tokio::test]
    async fn test_root_admin_created() {
        let mut users = MockAdminUserRepository::new();
        users.expect_root_admin_exists().returning(|| Ok(false));
        users.expect_find_by_username().returning(|_| Ok(None));
        users.expect_find_by_email().returning(|_| Ok(None));
        users
            .expect_create()
            .withf(|u| u.role == UserRole::RootAdmin && u.restaurant_id.is_none())
            .times(1)
            .returning(|u| Ok(u.clone()));

        let created = service(users, MockRestaurantRepository::new(), MockSessionRepository::new())
            .ensure_root_admin("root", "Root@Example.com", "purple monkey dishwasher 42")
            .await
            .unwrap();
        assert!(created);
    }
}
