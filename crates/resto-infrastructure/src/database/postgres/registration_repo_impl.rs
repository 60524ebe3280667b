// ============================================================================
// Resto Infrastructure - PostgreSQL Registration & Payment Repositories
// File: crates/resto-infrastructure/src/database/postgres/registration_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool};
use tracing::{info, warn};
use uuid::Uuid;

use resto_core::domain::{BillingCycle, Payment, PaymentStatus, Plan, Registration, RegistrationStatus};
use resto_core::error::DomainError;
use resto_core::repositories::{PaymentRepository, Provisioning, RegistrationRepository};

use super::admin_user_repo_impl::insert_admin_user;
use super::branch_repo_impl::insert_branch;
use super::db_error;
use super::restaurant_repo_impl::insert_restaurant;

pub struct PgRegistrationRepository {
    pool: PgPool,
}

impl PgRegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RegistrationRow {
    pub id: Uuid,
    pub restaurant_name: String,
    pub slug: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub plan: String,
    pub billing_cycle: String,
    pub amount_cents: i64,
    pub currency: String,
    pub status: String,
    pub restaurant_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<RegistrationRow> for Registration {
    fn from(row: RegistrationRow) -> Self {
        Registration {
            id: row.id,
            restaurant_name: row.restaurant_name,
            slug: row.slug,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            phone: row.phone,
            plan: Plan::from_str(&row.plan).unwrap_or_default(),
            billing_cycle: BillingCycle::from_str(&row.billing_cycle).unwrap_or_default(),
            amount_cents: row.amount_cents,
            currency: row.currency,
            status: RegistrationStatus::from_str(&row.status).unwrap_or_default(),
            restaurant_id: row.restaurant_id,
            created_at: row.created_at,
            expires_at: row.expires_at,
            completed_at: row.completed_at,
        }
    }
}

async fn insert_payment(conn: &mut PgConnection, payment: &Payment) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO payments (
            id, registration_id, amount_cents, currency, status, provider_reference,
            failure_reason, card_brand, card_last4, created_at, processed_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        "#
    )
    .bind(payment.id)
    .bind(payment.registration_id)
    .bind(payment.amount_cents)
    .bind(&payment.currency)
    .bind(payment.status.as_str())
    .bind(&payment.provider_reference)
    .bind(&payment.failure_reason)
    .bind(&payment.card_brand)
    .bind(&payment.card_last4)
    .bind(payment.created_at)
    .bind(payment.processed_at)
    .execute(&mut *conn)
    .await
    .map_err(db_error("inserting payment"))?;

    Ok(())
}

async fn update_payment(conn: &mut PgConnection, payment: &Payment) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        UPDATE payments SET
            status = $2, provider_reference = $3, failure_reason = $4,
            card_brand = $5, card_last4 = $6, processed_at = $7
        WHERE id = $1
        "#
    )
    .bind(payment.id)
    .bind(payment.status.as_str())
    .bind(&payment.provider_reference)
    .bind(&payment.failure_reason)
    .bind(&payment.card_brand)
    .bind(&payment.card_last4)
    .bind(payment.processed_at)
    .execute(&mut *conn)
    .await
    .map_err(db_error("updating payment"))?;

    Ok(())
}

#[async_trait]
impl RegistrationRepository for PgRegistrationRepository {
    async fn create(&self, registration: &Registration, payment: &Payment) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error("starting transaction"))?;

        sqlx::query(
            r#"
            INSERT INTO registrations (
                id, restaurant_name, slug, username, email, password_hash, phone,
                plan, billing_cycle, amount_cents, currency, status,
                restaurant_id, created_at, expires_at, completed_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#
        )
        .bind(registration.id)
        .bind(&registration.restaurant_name)
        .bind(&registration.slug)
        .bind(&registration.username)
        .bind(&registration.email)
        .bind(&registration.password_hash)
        .bind(&registration.phone)
        .bind(registration.plan.as_str())
        .bind(registration.billing_cycle.as_str())
        .bind(registration.amount_cents)
        .bind(&registration.currency)
        .bind(registration.status.as_str())
        .bind(registration.restaurant_id)
        .bind(registration.created_at)
        .bind(registration.expires_at)
        .bind(registration.completed_at)
        .execute(&mut *tx)
        .await
        .map_err(db_error("inserting registration"))?;

        insert_payment(&mut tx, payment).await?;

        tx.commit().await.map_err(db_error("committing registration"))?;
        Ok(())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Registration>, DomainError> {
        let row: Option<RegistrationRow> = sqlx::query_as(
            r#"
            SELECT id, restaurant_name, slug, username, email, password_hash, phone,
                   plan, billing_cycle, amount_cents, currency, status,
                   restaurant_id, created_at, expires_at, completed_at
            FROM registrations
            WHERE id = $1
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("finding registration"))?;

        Ok(row.map(|r| r.into()))
    }

    async fn slug_reserved(&self, slug: &str) -> Result<bool, DomainError> {
        let reserved: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM registrations
                WHERE slug = $1 AND status IN ('pending_payment', 'processing') AND expires_at > NOW()
            )
            "#
        )
        .bind(slug)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("checking reserved slug"))?;

        Ok(reserved)
    }

    async fn username_reserved(&self, username: &str) -> Result<bool, DomainError> {
        let reserved: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM registrations
                WHERE LOWER(username) = LOWER($1)
                  AND status IN ('pending_payment', 'processing') AND expires_at > NOW()
            )
            "#
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("checking reserved username"))?;

        Ok(reserved)
    }

    async fn email_reserved(&self, email: &str) -> Result<bool, DomainError> {
        let reserved: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM registrations
                WHERE LOWER(email) = LOWER($1)
                  AND status IN ('pending_payment', 'processing') AND expires_at > NOW()
            )
            "#
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("checking reserved email"))?;

        Ok(reserved)
    }

    async fn begin_payment(&self, registration_id: &Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE registrations SET status = 'processing'
            WHERE id = $1 AND status = 'pending_payment' AND expires_at > NOW()
            "#
        )
        .bind(registration_id)
        .execute(&self.pool)
        .await
        .map_err(db_error("claiming registration for payment"))?;

        Ok(result.rows_affected() == 1)
    }

    async fn release_payment(&self, registration_id: &Uuid) -> Result<(), DomainError> {
        sqlx::query("UPDATE registrations SET status = 'pending_payment' WHERE id = $1 AND status = 'processing'")
            .bind(registration_id)
            .execute(&self.pool)
            .await
            .map_err(db_error("releasing registration"))?;

        Ok(())
    }

    async fn complete(
        &self,
        registration_id: &Uuid,
        payment: &Payment,
        provisioning: &Provisioning,
    ) -> Result<bool, DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error("starting transaction"))?;

        // Row lock serialises completion against expiry
        let status: Option<String> = sqlx::query_scalar(
            "SELECT status FROM registrations WHERE id = $1 FOR UPDATE"
        )
        .bind(registration_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("locking registration"))?;

        match status.as_deref() {
            Some("processing") => {}
            Some(other) => {
                warn!("Registration {} not claimed for payment ({})", registration_id, other);
                return Ok(false);
            }
            None => return Err(DomainError::RegistrationNotFound),
        }

        insert_restaurant(&mut tx, &provisioning.restaurant).await?;
        insert_branch(&mut tx, &provisioning.branch).await?;
        insert_admin_user(&mut tx, &provisioning.admin).await?;
        update_payment(&mut tx, payment).await?;

        sqlx::query(
            r#"
            UPDATE registrations
            SET status = 'completed', restaurant_id = $2, completed_at = NOW()
            WHERE id = $1
            "#
        )
        .bind(registration_id)
        .bind(provisioning.restaurant.id)
        .execute(&mut *tx)
        .await
        .map_err(db_error("completing registration"))?;

        tx.commit().await.map_err(db_error("committing registration completion"))?;

        info!(
            "Registration {} completed as restaurant {} ({})",
            registration_id, provisioning.restaurant.slug, provisioning.restaurant.id
        );
        Ok(true)
    }

    async fn expire_stale(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let expired: i64 = sqlx::query_scalar(
            r#"
            WITH expired AS (
                UPDATE registrations SET status = 'expired'
                WHERE status IN ('pending_payment', 'processing') AND expires_at <= $1
                RETURNING id
            ), failed AS (
                UPDATE payments SET status = 'failed', failure_reason = 'registration_expired', processed_at = $1
                WHERE status = 'pending' AND registration_id IN (SELECT id FROM expired)
            )
            SELECT COUNT(*) FROM expired
            "#
        )
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("expiring registrations"))?;

        Ok(expired as u64)
    }
}

pub struct PgPaymentRepository {
    pool: PgPool,
}

impl PgPaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PaymentRow {
    pub id: Uuid,
    pub registration_id: Uuid,
    pub amount_cents: i64,
    pub currency: String,
    pub status: String,
    pub provider_reference: Option<String>,
    pub failure_reason: Option<String>,
    pub card_brand: Option<String>,
    pub card_last4: Option<String>,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl From<PaymentRow> for Payment {
    fn from(row: PaymentRow) -> Self {
        Payment {
            id: row.id,
            registration_id: row.registration_id,
            amount_cents: row.amount_cents,
            currency: row.currency,
            status: PaymentStatus::from_str(&row.status).unwrap_or_default(),
            provider_reference: row.provider_reference,
            failure_reason: row.failure_reason,
            card_brand: row.card_brand,
            card_last4: row.card_last4,
            created_at: row.created_at,
            processed_at: row.processed_at,
        }
    }
}

#[async_trait]
impl PaymentRepository for PgPaymentRepository {
    async fn create(&self, payment: &Payment) -> Result<(), DomainError> {
        let mut conn = self.pool.acquire().await.map_err(db_error("acquiring connection"))?;
        insert_payment(&mut conn, payment).await
    }

    async fn update(&self, payment: &Payment) -> Result<(), DomainError> {
        let mut conn = self.pool.acquire().await.map_err(db_error("acquiring connection"))?;
        update_payment(&mut conn, payment).await
    }

    async fn find_pending(&self, registration_id: &Uuid) -> Result<Option<Payment>, DomainError> {
        let row: Option<PaymentRow> = sqlx::query_as(
            r#"
            SELECT id, registration_id, amount_cents, currency, status, provider_reference,
                   failure_reason, card_brand, card_last4, created_at, processed_at
            FROM payments
            WHERE registration_id = $1 AND status = 'pending'
            ORDER BY created_at DESC
            LIMIT 1
            "#
        )
        .bind(registration_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("finding pending payment"))?;

        Ok(row.map(|r| r.into()))
    }

    async fn list_for_registration(&self, registration_id: &Uuid) -> Result<Vec<Payment>, DomainError> {
        let rows: Vec<PaymentRow> = sqlx::query_as(
            r#"
            SELECT id, registration_id, amount_cents, currency, status, provider_reference,
                   failure_reason, card_brand, card_last4, created_at, processed_at
            FROM payments
            WHERE registration_id = $1
            ORDER BY created_at
            "#
        )
        .bind(registration_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("listing payments"))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }
}
