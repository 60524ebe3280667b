// ============================================================================
// Resto Core - Authentication Service
// File: crates/resto-core/src/services/auth_service.rs
// ============================================================================
//! Login with lockout, opaque sessions, password change and reset

use std::sync::Arc;

use chrono::{Duration, Utc};
use resto_security::{IssuedToken, PasswordPolicy, PasswordService, TokenService};
use resto_shared::config::AuthSettings;
use resto_shared::utils::mask_email;
use tracing::{error, info, warn};

use crate::domain::{AdminUser, AuthContext, ClientInfo, FailedLogin, PasswordResetToken, Session};
use crate::error::DomainError;
use crate::ports::Mailer;
use crate::repositories::{
    AdminUserRepository, PasswordResetRepository, RestaurantRepository, SessionRepository,
};

/// Tunables of the authentication flow
#[derive(Debug, Clone)]
pub struct AuthPolicy {
    pub session_ttl: Duration,
    pub remember_me_ttl: Duration,
    pub max_failed_attempts: i32,
    pub lockout: Duration,
    pub reset_token_ttl: Duration,
    pub public_base_url: String,
    pub password_policy: PasswordPolicy,
}

impl AuthPolicy {
    pub fn from_settings(auth: &AuthSettings, public_base_url: &str) -> Self {
        Self {
            session_ttl: Duration::hours(auth.session_ttl_hours),
            remember_me_ttl: Duration::days(auth.remember_me_ttl_days),
            max_failed_attempts: auth.max_failed_attempts,
            lockout: Duration::minutes(auth.lockout_minutes),
            reset_token_ttl: Duration::minutes(auth.reset_token_ttl_minutes),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            password_policy: PasswordPolicy::new(auth.min_password_score),
        }
    }

    pub fn session_ttl(&self, remember: bool) -> Duration {
        if remember {
            self.remember_me_ttl
        } else {
            self.session_ttl
        }
    }
}

/// Result of successful login
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub user: AdminUser,
    pub session: IssuedToken,
}

/// Authentication service for admin users
pub struct AuthService {
    users: Arc<dyn AdminUserRepository>,
    restaurants: Arc<dyn RestaurantRepository>,
    sessions: Arc<dyn SessionRepository>,
    resets: Arc<dyn PasswordResetRepository>,
    mailer: Arc<dyn Mailer>,
    policy: AuthPolicy,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn AdminUserRepository>,
        restaurants: Arc<dyn RestaurantRepository>,
        sessions: Arc<dyn SessionRepository>,
        resets: Arc<dyn PasswordResetRepository>,
        mailer: Arc<dyn Mailer>,
        policy: AuthPolicy,
    ) -> Self {
        Self { users, restaurants, sessions, resets, mailer, policy }
    }

    pub fn policy(&self) -> &AuthPolicy {
        &self.policy
    }

    /// Login with username and password
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        remember: bool,
        client: &ClientInfo,
    ) -> Result<LoginResult, DomainError> {
        let username = username.trim();
        info!("Login attempt for username: {}", username);

        // 1. Find user (case-insensitive)
        let mut user = self
            .users
            .find_by_username(username)
            .await?
            .filter(|u| !u.is_deleted())
            .ok_or_else(|| {
                warn!("Login failed: unknown username: {}", username);
                DomainError::InvalidCredentials
            })?;

        // 2. Locked accounts are rejected before the password is checked
        let now = Utc::now();
        if let Some(until) = user.locked_until.filter(|until| *until > now) {
            warn!("Login rejected: account {} locked until {}", user.id, until);
            return Err(DomainError::AccountLocked(until));
        }

        // 3. Verify password
        let password_valid = PasswordService::verify(password, &user.password_hash)
            .map_err(|_e| DomainError::InvalidCredentials)?;

        if !password_valid {
            let outcome = user.register_failed_login(self.policy.max_failed_attempts, self.policy.lockout);
            self.users.update(&user).await?;
            return match outcome {
                FailedLogin::Counted(attempts) => {
                    warn!("Login failed: invalid password for {} (attempt {})", user.id, attempts);
                    Err(DomainError::InvalidCredentials)
                }
                FailedLogin::Locked(until) => {
                    warn!("Account {} locked until {} after repeated failures", user.id, until);
                    Err(DomainError::AccountLocked(until))
                }
            };
        }

        // 4. Account and tenant must be active
        if !user.is_active {
            warn!("Login failed: user {} not active", user.id);
            return Err(DomainError::UserNotActive);
        }
        self.ensure_tenant_active(&user).await?;

        // 5. Record login and open a session
        user.record_login();
        let user = self.users.update(&user).await?;
        let session = self.issue_session(&user, remember, client).await?;

        info!("Login successful for user: {}", user.id);
        Ok(LoginResult { user, session })
    }

    /// Create a session for an already authenticated user
    pub async fn issue_session(
        &self,
        user: &AdminUser,
        remember: bool,
        client: &ClientInfo,
    ) -> Result<IssuedToken, DomainError> {
        let issued = TokenService::issue(self.policy.session_ttl(remember));
        let session = Session::new(user.id, issued.token_hash.clone(), issued.expires_at, client);
        self.sessions.create(&session).await?;
        Ok(issued)
    }

    /// Resolve a bearer/cookie token to the caller's context
    pub async fn authenticate(&self, token: &str) -> Result<AuthContext, DomainError> {
        let token_hash = TokenService::hash(token);
        let session = self
            .sessions
            .find_by_token_hash(&token_hash)
            .await?
            .ok_or(DomainError::InvalidSession)?;

        let now = Utc::now();
        if session.is_expired(now) {
            self.sessions.delete_by_token_hash(&token_hash).await?;
            return Err(DomainError::SessionExpired);
        }

        let user = self
            .users
            .find_by_id(&session.user_id)
            .await?
            .filter(|u| u.is_active && !u.is_deleted())
            .ok_or(DomainError::InvalidSession)?;
        self.ensure_tenant_active(&user).await?;

        if let Err(e) = self.sessions.touch(&session.id, now).await {
            error!("Failed to touch session {}: {}", session.id, e);
        }

        Ok(AuthContext::from(&user).with_session(session.id))
    }

    pub async fn current_user(&self, ctx: &AuthContext) -> Result<AdminUser, DomainError> {
        self.users
            .find_by_id(&ctx.user_id)
            .await?
            .ok_or(DomainError::UserNotFound)
    }

    pub async fn logout(&self, token: &str) -> Result<(), DomainError> {
        self.sessions.delete_by_token_hash(&TokenService::hash(token)).await
    }

    pub async fn logout_all(&self, ctx: &AuthContext) -> Result<u64, DomainError> {
        let removed = self.sessions.delete_for_user(&ctx.user_id).await?;
        info!("Revoked {} sessions of user {}", removed, ctx.user_id);
        Ok(removed)
    }

    /// Change password; every other session of the user is revoked
    pub async fn change_password(
        &self,
        ctx: &AuthContext,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), DomainError> {
        let mut user = self.current_user(ctx).await?;

        let valid = PasswordService::verify(current_password, &user.password_hash)
            .map_err(|_e| DomainError::InvalidCredentials)?;
        if !valid {
            warn!("Password change rejected for {}: wrong current password", user.id);
            return Err(DomainError::InvalidCredentials);
        }

        self.policy
            .password_policy
            .check(new_password, &[&user.username, &user.email])?;
        user.set_password_hash(PasswordService::hash(new_password)?);
        self.users.update(&user).await?;

        let revoked = match ctx.session_id {
            Some(keep) => self.sessions.delete_for_user_except(&user.id, &keep).await?,
            None => self.sessions.delete_for_user(&user.id).await?,
        };
        info!("Password changed for {}; {} other sessions revoked", user.id, revoked);
        Ok(())
    }

    /// Always succeeds for the caller; a link is mailed only when the email
    /// belongs to an active user
    pub async fn request_password_reset(&self, email: &str) -> Result<(), DomainError> {
        let email = email.trim().to_lowercase();
        let user = match self.users.find_by_email(&email).await? {
            Some(user) if user.is_active && !user.is_deleted() => user,
            _ => {
                info!("Password reset requested for unknown email {}", mask_email(&email));
                return Ok(());
            }
        };

        let issued = TokenService::issue(self.policy.reset_token_ttl);
        let reset = PasswordResetToken::new(user.id, issued.token_hash, issued.expires_at);
        self.resets.create(&reset).await?;

        let link = format!("{}/reset-password?token={}", self.policy.public_base_url, issued.token);
        if let Err(e) = self.mailer.send_password_reset(&user.email, &user.username, &link).await {
            error!("Failed to send reset mail to {}: {}", mask_email(&user.email), e);
        } else {
            info!("Password reset mail sent to {}", mask_email(&user.email));
        }
        Ok(())
    }

    /// Consume a reset token; clears lockout and revokes all sessions
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), DomainError> {
        let now = Utc::now();
        let reset = self
            .resets
            .find_by_token_hash(&TokenService::hash(token))
            .await?
            .filter(|r| r.is_usable(now))
            .ok_or(DomainError::InvalidResetToken)?;

        let user = self
            .users
            .find_by_id(&reset.user_id)
            .await?
            .filter(|u| !u.is_deleted())
            .ok_or(DomainError::InvalidResetToken)?;

        self.policy
            .password_policy
            .check(new_password, &[&user.username, &user.email])?;
        let password_hash = PasswordService::hash(new_password)?;

        if !self.resets.redeem(&reset.id, &user.id, &password_hash, now).await? {
            return Err(DomainError::InvalidResetToken);
        }
        self.sessions.delete_for_user(&user.id).await?;

        info!("Password reset completed for user {}", user.id);
        Ok(())
    }

    async fn ensure_tenant_active(&self, user: &AdminUser) -> Result<(), DomainError> {
        let Some(restaurant_id) = user.restaurant_id else {
            return Ok(());
        };
        match self.restaurants.find_by_id(&restaurant_id).await? {
            Some(r) if r.is_active && !r.is_deleted() => Ok(()),
            _ => {
                warn!("Restaurant {} of user {} is not active", restaurant_id, user.id);
                Err(DomainError::RestaurantNotActive)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::{BillingCycle, Plan, Restaurant};
    use crate::ports::mailer::MockMailer;
    use crate::repositories::admin_user_repository::MockAdminUserRepository;
    use crate::repositories::restaurant_repository::MockRestaurantRepository;
    use crate::repositories::session_repository::{MockPasswordResetRepository, MockSessionRepository};
    use resto_shared::config::AuthSettings;
    use uuid::Uuid;

    const PASSWORD: &str = "correct horse battery staple";

    pub(crate) fn policy() -> AuthPolicy {
        AuthPolicy::from_settings(
            &AuthSettings {
                session_ttl_hours: 24,
                remember_me_ttl_days: 30,
                max_failed_attempts: 3,
                lockout_minutes: 15,
                reset_token_ttl_minutes: 60,
                cookie_name: "resto_session".to_string(),
                cookie_secure: false,
                min_password_score: 2,
            },
            "https://app.example.com/",
        )
    }

    fn restaurant() -> Restaurant {
        Restaurant::new(
            "Warung Sari".to_string(),
            "warung-sari".to_string(),
            None,
            None,
            "USD".to_string(),
            Plan::Basic,
            BillingCycle::Monthly,
        )
        .unwrap()
    }

    fn admin(restaurant_id: Uuid) -> AdminUser {
        let hash = PasswordService::hash(PASSWORD).unwrap();
        AdminUser::new_restaurant_admin(restaurant_id, "sari".to_string(), "sari@example.com".to_string(), hash)
            .unwrap()
    }

    struct Mocks {
        users: MockAdminUserRepository,
        restaurants: MockRestaurantRepository,
        sessions: MockSessionRepository,
        resets: MockPasswordResetRepository,
        mailer: MockMailer,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                users: MockAdminUserRepository::new(),
                restaurants: MockRestaurantRepository::new(),
                sessions: MockSessionRepository::new(),
                resets: MockPasswordResetRepository::new(),
                mailer: MockMailer::new(),
            }
        }

        fn service(self) -> AuthService {
            AuthService::new(
                Arc::new(self.users),
                Arc::new(self.restaurants),
                Arc::new(self.sessions),
                Arc::new(self.resets),
                Arc::new(self.mailer),
                policy(),
            )
        }
    }

    #[tokio::test]
    async fn test_login_success_creates_session() {
        let r = restaurant();
        let user = admin(r.id);
        let mut m = Mocks::new();

        let found = user.clone();
        m.users
            .expect_find_by_username()
            .withf(|name| name == "Sari")
            .returning(move |_| Ok(Some(found.clone())));
        m.users.expect_update().returning(|u| Ok(u.clone()));
        m.restaurants.expect_find_by_id().returning(move |_| Ok(Some(r.clone())));
        m.sessions.expect_create().times(1).returning(|_| Ok(()));

        let result = m.service().login(" Sari ", PASSWORD, false, &ClientInfo::default()).await.unwrap();
        assert_eq!(result.user.id, user.id);
        assert!(result.user.last_login_at.is_some());
        assert_eq!(result.session.token.len(), 64);
        let ttl = result.session.expires_at - Utc::now();
        assert!(ttl <= Duration::hours(24) && ttl > Duration::hours(23));
    }

    #[tokio::test]
    async fn test_unknown_user_is_invalid_credentials() {
        let mut m = Mocks::new();
        m.users.expect_find_by_username().returning(|_| Ok(None));

        let err = m.service().login("nobody", PASSWORD, false, &ClientInfo::default()).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_wrong_password_counts_then_locks() {
        let mut user = admin(Uuid::new_v4());
        user.failed_login_attempts = 2;
        let mut m = Mocks::new();

        m.users.expect_find_by_username().returning(move |_| Ok(Some(user.clone())));
        m.users
            .expect_update()
            .withf(|u| u.failed_login_attempts == 0 && u.locked_until.is_some())
            .times(1)
            .returning(|u| Ok(u.clone()));

        let err = m.service().login("sari", "wrong password", false, &ClientInfo::default()).await.unwrap_err();
        assert!(matches!(err, DomainError::AccountLocked(_)));
    }

    #[tokio::test]
    async fn test_locked_account_skips_password_check() {
        let mut user = admin(Uuid::new_v4());
        user.locked_until = Some(Utc::now() + Duration::minutes(5));
        let mut m = Mocks::new();
        m.users.expect_find_by_username().returning(move |_| Ok(Some(user.clone())));
        m.users.expect_update().never();

        let err = m.service().login("sari", PASSWORD, false, &ClientInfo::default()).await.unwrap_err();
        assert!(matches!(err, DomainError::AccountLocked(_)));
    }

    #[tokio::test]
    async fn test_inactive_restaurant_blocks_login() {
        let mut r = restaurant();
        r.is_active = false;
        let user = admin(r.id);
        let mut m = Mocks::new();
        m.users.expect_find_by_username().returning(move |_| Ok(Some(user.clone())));
        m.restaurants.expect_find_by_id().returning(move |_| Ok(Some(r.clone())));

        let err = m.service().login("sari", PASSWORD, false, &ClientInfo::default()).await.unwrap_err();
        assert!(matches!(err, DomainError::RestaurantNotActive));
    }

    #[tokio::test]
    async fn test_expired_session_is_removed() {
        let user = admin(Uuid::new_v4());
        let token = TokenService::generate();
        let session = Session::new(
            user.id,
            TokenService::hash(&token),
            Utc::now() - Duration::minutes(1),
            &ClientInfo::default(),
        );
        let mut m = Mocks::new();
        m.sessions.expect_find_by_token_hash().returning(move |_| Ok(Some(session.clone())));
        m.sessions.expect_delete_by_token_hash().times(1).returning(|_| Ok(()));

        let err = m.service().authenticate(&token).await.unwrap_err();
        assert!(matches!(err, DomainError::SessionExpired));
    }

    #[tokio::test]
    async fn test_authenticate_returns_context() {
        let user = admin(Uuid::new_v4());
        let token = TokenService::generate();
        let expected_hash = TokenService::hash(&token);
        let session = Session::new(
            user.id,
            expected_hash.clone(),
            Utc::now() + Duration::hours(1),
            &ClientInfo::default(),
        );
        let session_id = session.id;
        let restaurant_id = user.restaurant_id;
        let mut r = restaurant();
        r.id = restaurant_id.unwrap();

        let mut m = Mocks::new();
        m.sessions
            .expect_find_by_token_hash()
            .withf(move |hash| hash == expected_hash)
            .returning(move |_| Ok(Some(session.clone())));
        m.sessions.expect_touch().returning(|_, _| Ok(()));
        m.users.expect_find_by_id().returning(move |_| Ok(Some(user.clone())));
        m.restaurants.expect_find_by_id().returning(move |_| Ok(Some(r.clone())));

        let ctx = m.service().authenticate(&token).await.unwrap();
        assert_eq!(ctx.session_id, Some(session_id));
        assert_eq!(ctx.restaurant_id, restaurant_id);
    }

    #[tokio::test]
    async fn test_reset_request_for_unknown_email_is_silent() {
        let mut m = Mocks::new();
        m.users.expect_find_by_email().returning(|_| Ok(None));
        m.resets.expect_create().never();
        m.mailer.expect_send_password_reset().never();

        assert!(m.service().request_password_reset("ghost@example.com").await.is_ok());
    }

    #[tokio::test]
    async fn test_reset_request_mails_link() {
        let user = admin(Uuid::new_v4());
        let mut m = Mocks::new();
        m.users.expect_find_by_email().returning(move |_| Ok(Some(user.clone())));
        m.resets.expect_create().times(1).returning(|_| Ok(()));
        m.mailer
            .expect_send_password_reset()
            .withf(|to, _, link| {
                to == "sari@example.com" && link.starts_with("https://app.example.com/reset-password?token=")
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        m.service().request_password_reset("SARI@example.com").await.unwrap();
    }

    #[tokio::test]
    async fn test_used_reset_token_rejected() {
        let user = admin(Uuid::new_v4());
        let mut reset = PasswordResetToken::new(user.id, "h".to_string(), Utc::now() + Duration::minutes(10));
        reset.used_at = Some(Utc::now());
        let mut m = Mocks::new();
        m.resets.expect_find_by_token_hash().returning(move |_| Ok(Some(reset.clone())));

        let err = m.service().reset_password("token", "a brand new passphrase").await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidResetToken));
    }

    #[tokio::test]
    async fn test_reset_password_revokes_sessions() {
        let mut user = admin(Uuid::new_v4());
        user.locked_until = Some(Utc::now() + Duration::minutes(10));
        let user_id = user.id;
        let reset = PasswordResetToken::new(user.id, "h".to_string(), Utc::now() + Duration::minutes(10));
        let mut m = Mocks::new();
        m.resets.expect_find_by_token_hash().returning(move |_| Ok(Some(reset.clone())));
        m.users.expect_find_by_id().returning(move |_| Ok(Some(user.clone())));
        m.resets
            .expect_redeem()
            .withf(move |_, uid, hash, _| *uid == user_id && hash.starts_with("$argon2id$"))
            .times(1)
            .returning(|_, _, _, _| Ok(true));
        m.users.expect_update().never();
        m.sessions
            .expect_delete_for_user()
            .withf(move |id| *id == user_id)
            .times(1)
            .returning(|_| Ok(2));

        m.service().reset_password("token", "purple monkey dishwasher 42").await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_password_write_keeps_sessions() {
        let user = admin(Uuid::new_v4());
        let reset = PasswordResetToken::new(user.id, "h".to_string(), Utc::now() + Duration::minutes(10));
        let mut m = Mocks::new();
        m.resets.expect_find_by_token_hash().returning(move |_| Ok(Some(reset.clone())));
        m.users.expect_find_by_id().returning(move |_| Ok(Some(user.clone())));
        m.resets
            .expect_redeem()
            .returning(|_, _, _, _| Err(DomainError::DatabaseError("connection reset".to_string())));
        m.sessions.expect_delete_for_user().never();

        let err = m.service().reset_password("token", "purple monkey dishwasher 42").await.unwrap_err();
        assert!(matches!(err, DomainError::DatabaseError(_)));
    }

    #[tokio::test]
    async fn test_concurrently_redeemed_token_rejected() {
        let user = admin(Uuid::new_v4());
        let reset = PasswordResetToken::new(user.id, "h".to_string(), Utc::now() + Duration::minutes(10));
        let mut m = Mocks::new();
        m.resets.expect_find_by_token_hash().returning(move |_| Ok(Some(reset.clone())));
        m.users.expect_find_by_id().returning(move |_| Ok(Some(user.clone())));
        m.resets.expect_redeem().returning(|_, _, _, _| Ok(false));
        m.sessions.expect_delete_for_user().never();

        let err = m.service().reset_password("token", "purple monkey dishwasher 42").await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidResetToken));
    }

    #[tokio::test]
    async fn test_change_password_keeps_current_session() {
        let user = admin(Uuid::new_v4());
        let session_id = Uuid::new_v4();
        let ctx = AuthContext::from(&user).with_session(session_id);
        let mut m = Mocks::new();
        m.users.expect_find_by_id().returning(move |_| Ok(Some(user.clone())));
        m.users.expect_update().returning(|u| Ok(u.clone()));
        m.sessions
            .expect_delete_for_user_except()
            .withf(move |_, keep| *keep == session_id)
            .times(1)
            .returning(|_, _| Ok(1));

        m.service()
            .change_password(&ctx, PASSWORD, "purple monkey dishwasher 42")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_change_password_rejects_weak() {
        let user = admin(Uuid::new_v4());
        let ctx = AuthContext::from(&user);
        let mut m = Mocks::new();
        m.users.expect_find_by_id().returning(move |_| Ok(Some(user.clone())));
        m.users.expect_update().never();

        let err = m.service().change_password(&ctx, PASSWORD, "password").await.unwrap_err();
        assert!(matches!(err, DomainError::PasswordPolicy(_)));
    }
}
