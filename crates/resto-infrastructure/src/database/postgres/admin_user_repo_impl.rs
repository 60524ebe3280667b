// ============================================================================
// Resto Infrastructure - PostgreSQL Admin User Repository
// File: crates/resto-infrastructure/src/database/postgres/admin_user_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;

use resto_core::domain::{AdminUser, UserRole};
use resto_core::error::DomainError;
use resto_core::repositories::AdminUserRepository;

use super::{db_error, unique_violation};

pub struct PgAdminUserRepository {
    pool: PgPool,
}

impl PgAdminUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct AdminUserRow {
    pub id: Uuid,
    pub restaurant_id: Option<Uuid>,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub failed_login_attempts: i32,
    pub locked_until: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
    pub removed_at: Option<DateTime<Utc>>,
}

impl From<AdminUserRow> for AdminUser {
    fn from(row: AdminUserRow) -> Self {
        AdminUser {
            id: row.id,
            restaurant_id: row.restaurant_id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            role: UserRole::from_str(&row.role).unwrap_or_default(),
            is_active: row.is_active,
            failed_login_attempts: row.failed_login_attempts,
            locked_until: row.locked_until,
            last_login_at: row.last_login_at,
            created_at: row.created_at,
            modified_at: row.modified_at,
            removed_at: row.removed_at,
        }
    }
}

/// Maps unique index violations onto the matching domain error
fn map_write_error<'a>(user: &'a AdminUser, context: &'static str) -> impl FnOnce(sqlx::Error) -> DomainError + 'a {
    move |e| match unique_violation(&e).as_deref() {
        Some("ux_admin_users_username") => DomainError::UsernameAlreadyExists(user.username.clone()),
        Some("ux_admin_users_email") => DomainError::EmailAlreadyExists(user.email.clone()),
        Some(_) => DomainError::Conflict(format!("admin user {} already exists", user.username)),
        None => db_error(context)(e),
    }
}

/// Inserts an admin user inside a caller-owned transaction
pub(crate) async fn insert_admin_user(conn: &mut PgConnection, user: &AdminUser) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO admin_users (
            id, restaurant_id, username, email, password_hash, role,
            is_active, failed_login_attempts, locked_until, last_login_at, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        "#
    )
    .bind(user.id)
    .bind(user.restaurant_id)
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.role.as_str())
    .bind(user.is_active)
    .bind(user.failed_login_attempts)
    .bind(user.locked_until)
    .bind(user.last_login_at)
    .bind(user.created_at)
    .execute(&mut *conn)
    .await
    .map_err(map_write_error(user, "inserting admin user"))?;

    Ok(())
}

#[async_trait]
impl AdminUserRepository for PgAdminUserRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<AdminUser>, DomainError> {
        let row: Option<AdminUserRow> = sqlx::query_as(
            r#"
            SELECT
                id, restaurant_id, username, email, password_hash, role,
                is_active, failed_login_attempts, locked_until, last_login_at,
                created_at, modified_at, removed_at
            FROM admin_users
            WHERE id = $1 AND removed_at IS NULL
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("finding admin user by id"))?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<AdminUser>, DomainError> {
        let row: Option<AdminUserRow> = sqlx::query_as(
            r#"
            SELECT
                id, restaurant_id, username, email, password_hash, role,
                is_active, failed_login_attempts, locked_until, last_login_at,
                created_at, modified_at, removed_at
            FROM admin_users
            WHERE LOWER(username) = LOWER($1) AND removed_at IS NULL
            "#
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("finding admin user by username"))?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<AdminUser>, DomainError> {
        let row: Option<AdminUserRow> = sqlx::query_as(
            r#"
            SELECT
                id, restaurant_id, username, email, password_hash, role,
                is_active, failed_login_attempts, locked_until, last_login_at,
                created_at, modified_at, removed_at
            FROM admin_users
            WHERE LOWER(email) = LOWER($1) AND removed_at IS NULL
            "#
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("finding admin user by email"))?;

        Ok(row.map(|r| r.into()))
    }

    async fn list_by_restaurant(&self, restaurant_id: &Uuid) -> Result<Vec<AdminUser>, DomainError> {
        let rows: Vec<AdminUserRow> = sqlx::query_as(
            r#"
            SELECT
                id, restaurant_id, username, email, password_hash, role,
                is_active, failed_login_attempts, locked_until, last_login_at,
                created_at, modified_at, removed_at
            FROM admin_users
            WHERE restaurant_id = $1 AND removed_at IS NULL
            ORDER BY created_at
            "#
        )
        .bind(restaurant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("listing admin users"))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn create(&self, user: &AdminUser) -> Result<AdminUser, DomainError> {
        let mut conn = self.pool.acquire().await.map_err(db_error("acquiring connection"))?;
        insert_admin_user(&mut conn, user).await?;

        info!("Admin user created: {} ({})", user.username, user.id);
        Ok(user.clone())
    }

    async fn update(&self, user: &AdminUser) -> Result<AdminUser, DomainError> {
        let row: Option<AdminUserRow> = sqlx::query_as(
            r#"
            UPDATE admin_users SET
                username = $2, email = $3, password_hash = $4, is_active = $5,
                failed_login_attempts = $6, locked_until = $7, last_login_at = $8,
                modified_at = NOW()
            WHERE id = $1 AND removed_at IS NULL
            RETURNING
                id, restaurant_id, username, email, password_hash, role,
                is_active, failed_login_attempts, locked_until, last_login_at,
                created_at, modified_at, removed_at
            "#
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_active)
        .bind(user.failed_login_attempts)
        .bind(user.locked_until)
        .bind(user.last_login_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error(user, "updating admin user"))?;

        row.map(|r| r.into()).ok_or(DomainError::UserNotFound)
    }

    async fn root_admin_exists(&self) -> Result<bool, DomainError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM admin_users WHERE role = 'root_admin' AND removed_at IS NULL)"
        )
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("checking root admin"))?;

        Ok(exists)
    }
}
