// ============================================================================
// Resto Infrastructure - PostgreSQL Session & Password Reset Repositories
// File: crates/resto-infrastructure/src/database/postgres/session_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use resto_core::domain::{PasswordResetToken, Session};
use resto_core::error::DomainError;
use resto_core::repositories::{PasswordResetRepository, SessionRepository};

use super::db_error;

pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct SessionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: Option<DateTime<Utc>>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Session {
            id: row.id,
            user_id: row.user_id,
            token_hash: row.token_hash,
            expires_at: row.expires_at,
            created_at: row.created_at,
            last_seen_at: row.last_seen_at,
            ip_address: row.ip_address,
            user_agent: row.user_agent,
        }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn create(&self, session: &Session) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO sessions (
                id, user_id, token_hash, expires_at, created_at,
                last_seen_at, ip_address, user_agent
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#
        )
        .bind(session.id)
        .bind(session.user_id)
        .bind(&session.token_hash)
        .bind(session.expires_at)
        .bind(session.created_at)
        .bind(session.last_seen_at)
        .bind(&session.ip_address)
        .bind(&session.user_agent)
        .execute(&self.pool)
        .await
        .map_err(db_error("creating session"))?;

        Ok(())
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, DomainError> {
        let row: Option<SessionRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, token_hash, expires_at, created_at,
                   last_seen_at, ip_address, user_agent
            FROM sessions
            WHERE token_hash = $1
            "#
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("finding session"))?;

        Ok(row.map(|r| r.into()))
    }

    async fn touch(&self, id: &Uuid, seen_at: DateTime<Utc>) -> Result<(), DomainError> {
        sqlx::query("UPDATE sessions SET last_seen_at = $2 WHERE id = $1")
            .bind(id)
            .bind(seen_at)
            .execute(&self.pool)
            .await
            .map_err(db_error("touching session"))?;

        Ok(())
    }

    async fn delete_by_token_hash(&self, token_hash: &str) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&self.pool)
            .await
            .map_err(db_error("deleting session"))?;

        Ok(())
    }

    async fn delete_for_user(&self, user_id: &Uuid) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(db_error("revoking user sessions"))?;

        Ok(result.rows_affected())
    }

    async fn delete_for_user_except(&self, user_id: &Uuid, keep: &Uuid) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM sessions WHERE user_id = $1 AND id <> $2")
            .bind(user_id)
            .bind(keep)
            .execute(&self.pool)
            .await
            .map_err(db_error("revoking other user sessions"))?;

        Ok(result.rows_affected())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(db_error("purging expired sessions"))?;

        Ok(result.rows_affected())
    }
}

pub struct PgPasswordResetRepository {
    pool: PgPool,
}

impl PgPasswordResetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PasswordResetRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<PasswordResetRow> for PasswordResetToken {
    fn from(row: PasswordResetRow) -> Self {
        PasswordResetToken {
            id: row.id,
            user_id: row.user_id,
            token_hash: row.token_hash,
            expires_at: row.expires_at,
            used_at: row.used_at,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl PasswordResetRepository for PgPasswordResetRepository {
    async fn create(&self, token: &PasswordResetToken) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO password_reset_tokens (id, user_id, token_hash, expires_at, used_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#
        )
        .bind(token.id)
        .bind(token.user_id)
        .bind(&token.token_hash)
        .bind(token.expires_at)
        .bind(token.used_at)
        .bind(token.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("creating password reset token"))?;

        Ok(())
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<PasswordResetToken>, DomainError> {
        let row: Option<PasswordResetRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, token_hash, expires_at, used_at, created_at
            FROM password_reset_tokens
            WHERE token_hash = $1
            "#
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("finding password reset token"))?;

        Ok(row.map(|r| r.into()))
    }

    async fn redeem(
        &self,
        id: &Uuid,
        user_id: &Uuid,
        password_hash: &str,
        used_at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error("starting transaction"))?;

        let claimed = sqlx::query("UPDATE password_reset_tokens SET used_at = $2 WHERE id = $1 AND used_at IS NULL")
            .bind(id)
            .bind(used_at)
            .execute(&mut *tx)
            .await
            .map_err(db_error("marking password reset token used"))?;
        if claimed.rows_affected() == 0 {
            return Ok(false);
        }

        let updated = sqlx::query(
            r#"
            UPDATE admin_users SET
                password_hash = $2, failed_login_attempts = 0, locked_until = NULL, modified_at = NOW()
            WHERE id = $1 AND removed_at IS NULL
            "#
        )
        .bind(user_id)
        .bind(password_hash)
        .execute(&mut *tx)
        .await
        .map_err(db_error("storing reset password"))?;
        if updated.rows_affected() == 0 {
            // Rolls back the claim so the token stays usable
            return Err(DomainError::UserNotFound);
        }

        tx.commit().await.map_err(db_error("committing password reset"))?;
        Ok(true)
    }

    async fn purge(&self, before: DateTime<Utc>) -> Result<u64, DomainError> {
        let result = sqlx::query(
            "DELETE FROM password_reset_tokens WHERE expires_at < $1 OR used_at < $1"
        )
        .bind(before)
        .execute(&self.pool)
        .await
        .map_err(db_error("purging password reset tokens"))?;

        Ok(result.rows_affected())
    }
}
