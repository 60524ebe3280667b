// ============================================================================
// Resto Core - Registration Service
// File: crates/resto-core/src/services/registration_service.rs
// Description: Paid-plan signup, payment confirmation and provisioning
// ============================================================================

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use resto_security::{IssuedToken, PasswordPolicy, PasswordService};
use resto_shared::constants::MAX_SLUG_ATTEMPTS;
use resto_shared::utils::{is_valid_phone, mask_email, normalize_phone, slugify};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::Validate;

use super::auth_service::AuthService;
use crate::domain::admin_user::is_valid_username;
use crate::domain::{
    AdminUser, BillingCycle, Branch, BranchInput, CardDetails, ChargeRequest, ClientInfo, NewRegistration,
    Payment, PaymentReceipt, PaymentStatus, Plan, PlanLimits, Registration, RegistrationStatus, Restaurant,
};
use crate::error::DomainError;
use crate::ports::{ChargeOutcome, Mailer, PaymentGateway};
use crate::repositories::{
    AdminUserRepository, PaymentRepository, Provisioning, RegistrationRepository, RestaurantRepository,
};

const MAX_SLUG_BASE_LENGTH: usize = 90;
const MAIN_BRANCH_NAME: &str = "Main Branch";

/// Catalogue entry shown on the pricing page
#[derive(Debug, Clone, Serialize)]
pub struct PlanInfo {
    pub plan: Plan,
    pub name: &'static str,
    pub monthly_price_cents: i64,
    pub yearly_price_cents: i64,
    pub limits: PlanLimits,
    pub features: &'static [&'static str],
}

pub fn list_plans() -> Vec<PlanInfo> {
    Plan::ALL
        .iter()
        .map(|plan| PlanInfo {
            plan: *plan,
            name: plan.display_name(),
            monthly_price_cents: plan.price_cents(BillingCycle::Monthly),
            yearly_price_cents: plan.price_cents(BillingCycle::Yearly),
            limits: plan.limits(),
            features: plan.features(),
        })
        .collect()
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegistrationRequest {
    #[validate(length(min = 2, max = 100, message = "Restaurant name must be between 2 and 100 characters"))]
    pub restaurant_name: String,

    #[validate(length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub password: String,
    pub phone: Option<String>,
    pub plan: Plan,
    pub billing_cycle: BillingCycle,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegistrationStarted {
    pub registration_id: Uuid,
    pub slug: String,
    pub plan: Plan,
    pub billing_cycle: BillingCycle,
    pub amount_cents: i64,
    pub currency: String,
    pub expires_at: DateTime<Utc>,
}

impl From<&Registration> for RegistrationStarted {
    fn from(r: &Registration) -> Self {
        Self {
            registration_id: r.id,
            slug: r.slug.clone(),
            plan: r.plan,
            billing_cycle: r.billing_cycle,
            amount_cents: r.amount_cents,
            currency: r.currency.clone(),
            expires_at: r.expires_at,
        }
    }
}

/// Status view of a registration, including the last payment failure
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationView {
    pub registration_id: Uuid,
    pub status: RegistrationStatus,
    pub slug: String,
    pub restaurant_name: String,
    pub plan: Plan,
    pub billing_cycle: BillingCycle,
    pub amount_cents: i64,
    pub currency: String,
    pub expires_at: DateTime<Utc>,
    pub restaurant_id: Option<Uuid>,
    pub payment_attempts: usize,
    pub last_failure: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RegistrationCompleted {
    pub restaurant: Restaurant,
    pub user: AdminUser,
    pub receipt: PaymentReceipt,
    pub session: IssuedToken,
}

#[derive(Debug, Clone)]
pub struct RegistrationPolicy {
    pub ttl: Duration,
    pub currency: String,
    pub password_policy: PasswordPolicy,
}

pub struct RegistrationService {
    registrations: Arc<dyn RegistrationRepository>,
    payments: Arc<dyn PaymentRepository>,
    restaurants: Arc<dyn RestaurantRepository>,
    users: Arc<dyn AdminUserRepository>,
    gateway: Arc<dyn PaymentGateway>,
    mailer: Arc<dyn Mailer>,
    auth: Arc<AuthService>,
    policy: RegistrationPolicy,
}

impl RegistrationService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        registrations: Arc<dyn RegistrationRepository>,
        payments: Arc<dyn PaymentRepository>,
        restaurants: Arc<dyn RestaurantRepository>,
        users: Arc<dyn AdminUserRepository>,
        gateway: Arc<dyn PaymentGateway>,
        mailer: Arc<dyn Mailer>,
        auth: Arc<AuthService>,
        policy: RegistrationPolicy,
    ) -> Self {
        Self { registrations, payments, restaurants, users, gateway, mailer, auth, policy }
    }

    pub async fn start_registration(&self, request: RegistrationRequest) -> Result<RegistrationStarted, DomainError> {
        request.validate()?;
        let username = request.username.trim().to_string();
        let email = request.email.trim().to_lowercase();
        info!("Registration attempt for {}", mask_email(&email));

        if !is_valid_username(&username) {
            return Err(DomainError::ValidationError(
                "Username may contain letters, digits, '.', '_' and '-'".to_string(),
            ));
        }
        let phone = match request.phone.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
            Some(p) if is_valid_phone(p) => Some(normalize_phone(p)),
            Some(_) => return Err(DomainError::ValidationError("phone must contain 7 to 15 digits".to_string())),
            None => None,
        };

        if self.users.find_by_username(&username).await?.is_some()
            || self.registrations.username_reserved(&username).await?
        {
            warn!("Registration rejected: username taken: {}", username);
            return Err(DomainError::UsernameAlreadyExists(username));
        }
        if self.users.find_by_email(&email).await?.is_some() || self.registrations.email_reserved(&email).await? {
            warn!("Registration rejected: email taken: {}", mask_email(&email));
            return Err(DomainError::EmailAlreadyExists(email));
        }
        self.policy.password_policy.check(&request.password, &[&username, &email])?;

        let slug = self.unique_slug(&request.restaurant_name).await?;
        let password_hash = PasswordService::hash(&request.password)?;

        let registration = Registration::new(
            NewRegistration {
                restaurant_name: request.restaurant_name.trim().to_string(),
                slug,
                username,
                email,
                password_hash,
                phone,
                plan: request.plan,
                billing_cycle: request.billing_cycle,
                currency: self.policy.currency.clone(),
            },
            self.policy.ttl,
        );
        let payment = Payment::pending_for(&registration);
        self.registrations.create(&registration, &payment).await?;

        info!(
            "Registration {} started for slug {} ({} {})",
            registration.id,
            registration.slug,
            registration.plan.as_str(),
            registration.billing_cycle.as_str()
        );
        Ok(RegistrationStarted::from(&registration))
    }

    pub async fn get_registration(&self, id: &Uuid) -> Result<RegistrationView, DomainError> {
        let registration = self.load(id).await?;
        let payments = self.payments.list_for_registration(id).await?;
        let last_failure = payments
            .iter()
            .filter(|p| p.status == PaymentStatus::Failed)
            .max_by_key(|p| p.processed_at)
            .and_then(|p| p.failure_reason.clone());

        let status = if registration.is_expired(Utc::now()) {
            RegistrationStatus::Expired
        } else {
            registration.status
        };

        Ok(RegistrationView {
            registration_id: registration.id,
            status,
            slug: registration.slug,
            restaurant_name: registration.restaurant_name,
            plan: registration.plan,
            billing_cycle: registration.billing_cycle,
            amount_cents: registration.amount_cents,
            currency: registration.currency,
            expires_at: registration.expires_at,
            restaurant_id: registration.restaurant_id,
            payment_attempts: payments.iter().filter(|p| p.status != PaymentStatus::Pending).count(),
            last_failure,
        })
    }

    /// Charge the card; on approval provision the tenant and log the new
    /// admin in. A declined charge leaves the registration payable again.
    pub async fn confirm_payment(
        &self,
        id: &Uuid,
        card: &CardDetails,
        client: &ClientInfo,
    ) -> Result<RegistrationCompleted, DomainError> {
        let registration = self.load(id).await?;
        match registration.status {
            RegistrationStatus::Completed => return Err(DomainError::RegistrationAlreadyCompleted),
            _ if registration.is_expired(Utc::now()) => return Err(DomainError::RegistrationExpired),
            RegistrationStatus::Processing => return Err(payment_in_progress()),
            _ => {}
        }

        // Nothing is charged unless provisioning can still succeed
        self.ensure_identity_free(&registration).await?;
        let provisioning = provision(&registration)?;

        if !self.registrations.begin_payment(id).await? {
            warn!("Registration {} already has a payment in progress", id);
            return Err(payment_in_progress());
        }

        let (payment, receipt) = match self.charge(&registration, card).await {
            Ok(charged) => charged,
            Err(e) => {
                self.release(id).await;
                return Err(e);
            }
        };

        match self.registrations.complete(id, &payment, &provisioning).await {
            Ok(true) => {}
            Ok(false) => {
                error!("Registration {} changed state after a successful charge {}", id, receipt.reference);
                return Err(DomainError::RegistrationAlreadyCompleted);
            }
            Err(e) => {
                error!(
                    "Provisioning failed for registration {} after charge {}; refund required: {}",
                    id, receipt.reference, e
                );
                if let Err(update_err) = self.payments.update(&payment).await {
                    error!("Failed to record charge {}: {}", receipt.reference, update_err);
                }
                self.release(id).await;
                return Err(e);
            }
        }
        info!(
            "Registration {} completed: restaurant {} provisioned (payment {})",
            id, provisioning.restaurant.id, receipt.reference
        );

        let Provisioning { restaurant, admin, .. } = provisioning;
        let session = self.auth.issue_session(&admin, false, client).await?;

        if let Err(e) = self.mailer.send_welcome(&admin.email, &admin.username, &restaurant.name).await {
            error!("Failed to send welcome mail to {}: {}", mask_email(&admin.email), e);
        }

        Ok(RegistrationCompleted { restaurant, user: admin, receipt, session })
    }

    /// Username, email and slug must still be free outside this registration
    async fn ensure_identity_free(&self, registration: &Registration) -> Result<(), DomainError> {
        if self.users.find_by_username(&registration.username).await?.is_some() {
            warn!("Registration {} blocked: username {} taken", registration.id, registration.username);
            return Err(DomainError::UsernameAlreadyExists(registration.username.clone()));
        }
        if self.users.find_by_email(&registration.email).await?.is_some() {
            warn!("Registration {} blocked: email taken", registration.id);
            return Err(DomainError::EmailAlreadyExists(registration.email.clone()));
        }
        if self.restaurants.slug_exists(&registration.slug).await? {
            warn!("Registration {} blocked: slug {} taken", registration.id, registration.slug);
            return Err(DomainError::SlugAlreadyExists(registration.slug.clone()));
        }
        Ok(())
    }

    async fn charge(
        &self,
        registration: &Registration,
        card: &CardDetails,
    ) -> Result<(Payment, PaymentReceipt), DomainError> {
        let mut payment = match self.payments.find_pending(&registration.id).await? {
            Some(payment) => payment,
            None => {
                let payment = Payment::pending_for(registration);
                self.payments.create(&payment).await?;
                payment
            }
        };

        let request = ChargeRequest {
            payment_id: payment.id,
            amount_cents: payment.amount_cents,
            currency: payment.currency.clone(),
            description: format!(
                "{} plan ({}) for {}",
                registration.plan.display_name(),
                registration.billing_cycle.as_str(),
                registration.slug
            ),
        };

        match self.gateway.charge(&request, card).await? {
            ChargeOutcome::Approved(receipt) => {
                payment.mark_succeeded(&receipt);
                Ok((payment, receipt))
            }
            ChargeOutcome::Declined { reason } => {
                payment.mark_failed(&reason, Some(card.last4()));
                self.payments.update(&payment).await?;
                warn!("Payment {} for registration {} declined: {}", payment.id, registration.id, reason);
                Err(DomainError::PaymentDeclined(reason))
            }
        }
    }

    async fn release(&self, id: &Uuid) {
        if let Err(e) = self.registrations.release_payment(id).await {
            error!("Failed to release registration {}: {}", id, e);
        }
    }

    async fn load(&self, id: &Uuid) -> Result<Registration, DomainError> {
        self.registrations.find_by_id(id).await?.ok_or(DomainError::RegistrationNotFound)
    }

    /// `base`, `base-2`, ... `base-20`; slugs held by pending registrations count as taken
    async fn unique_slug(&self, name: &str) -> Result<String, DomainError> {
        let mut base = slugify(name);
        base.truncate(MAX_SLUG_BASE_LENGTH);
        let base = base.trim_end_matches('-').to_string();
        if base.is_empty() {
            return Err(DomainError::ValidationError(
                "Restaurant name must contain letters or digits".to_string(),
            ));
        }

        for attempt in 1..=MAX_SLUG_ATTEMPTS {
            let candidate = if attempt == 1 { base.clone() } else { format!("{}-{}", base, attempt) };
            if !self.restaurants.slug_exists(&candidate).await?
                && !self.registrations.slug_reserved(&candidate).await?
            {
                return Ok(candidate);
            }
        }
        warn!("No free slug for base {}", base);
        Err(DomainError::UnableToGenerateUniqueName)
    }
}

fn payment_in_progress() -> DomainError {
    DomainError::Conflict("A payment for this registration is already in progress".to_string())
}

fn provision(registration: &Registration) -> Result<Provisioning, DomainError> {
    let restaurant = Restaurant::new(
        registration.restaurant_name.clone(),
        registration.slug.clone(),
        registration.phone.clone(),
        Some(registration.email.clone()),
        registration.currency.clone(),
        registration.plan,
        registration.billing_cycle,
    )?;
    let branch = Branch::new(
        restaurant.id,
        BranchInput {
            name: MAIN_BRANCH_NAME.to_string(),
            address: None,
            phone: registration.phone.clone(),
            whatsapp_number: registration.phone.clone(),
            is_active: true,
        },
        true,
    )?;
    let admin = AdminUser::new_restaurant_admin(
        restaurant.id,
        registration.username.clone(),
        registration.email.clone(),
        registration.password_hash.clone(),
    )?;
    Ok(Provisioning { restaurant, branch, admin })
}
