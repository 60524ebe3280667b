// ============================================================================
// Resto Infrastructure - PostgreSQL Branch Repository
// File: crates/resto-infrastructure/src/database/postgres/branch_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;

use resto_core::domain::Branch;
use resto_core::error::DomainError;
use resto_core::repositories::BranchRepository;

use super::{db_error, unique_violation};

pub struct PgBranchRepository {
    pool: PgPool,
}

impl PgBranchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct BranchRow {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub whatsapp_number: Option<String>,
    pub is_main: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
    pub removed_at: Option<DateTime<Utc>>,
}

impl From<BranchRow> for Branch {
    fn from(row: BranchRow) -> Self {
        Branch {
            id: row.id,
            restaurant_id: row.restaurant_id,
            name: row.name,
            address: row.address,
            phone: row.phone,
            whatsapp_number: row.whatsapp_number,
            is_main: row.is_main,
            is_active: row.is_active,
            created_at: row.created_at,
            modified_at: row.modified_at,
            removed_at: row.removed_at,
        }
    }
}

/// Inserts a branch inside a caller-owned transaction or connection
pub(crate) async fn insert_branch(conn: &mut PgConnection, branch: &Branch) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO branches (
            id, restaurant_id, name, address, phone, whatsapp_number,
            is_main, is_active, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#
    )
    .bind(branch.id)
    .bind(branch.restaurant_id)
    .bind(&branch.name)
    .bind(&branch.address)
    .bind(&branch.phone)
    .bind(&branch.whatsapp_number)
    .bind(branch.is_main)
    .bind(branch.is_active)
    .bind(branch.created_at)
    .execute(&mut *conn)
    .await
    .map_err(|e| match unique_violation(&e) {
        Some(_) => DomainError::Conflict("restaurant already has a main branch".into()),
        None => db_error("inserting branch")(e),
    })?;

    Ok(())
}

#[async_trait]
impl BranchRepository for PgBranchRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Branch>, DomainError> {
        let row: Option<BranchRow> = sqlx::query_as(
            r#"
            SELECT id, restaurant_id, name, address, phone, whatsapp_number,
                   is_main, is_active, created_at, modified_at, removed_at
            FROM branches
            WHERE id = $1 AND removed_at IS NULL
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("finding branch by id"))?;

        Ok(row.map(|r| r.into()))
    }

    async fn list_by_restaurant(&self, restaurant_id: &Uuid) -> Result<Vec<Branch>, DomainError> {
        let rows: Vec<BranchRow> = sqlx::query_as(
            r#"
            SELECT id, restaurant_id, name, address, phone, whatsapp_number,
                   is_main, is_active, created_at, modified_at, removed_at
            FROM branches
            WHERE restaurant_id = $1 AND removed_at IS NULL
            ORDER BY is_main DESC, created_at
            "#
        )
        .bind(restaurant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("listing branches"))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn count_by_restaurant(&self, restaurant_id: &Uuid) -> Result<i64, DomainError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM branches WHERE restaurant_id = $1 AND removed_at IS NULL"
        )
        .bind(restaurant_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("counting branches"))?;

        Ok(count)
    }

    async fn create(&self, branch: &Branch) -> Result<Branch, DomainError> {
        let mut conn = self.pool.acquire().await.map_err(db_error("acquiring connection"))?;
        insert_branch(&mut conn, branch).await?;

        info!("Branch created: {} for restaurant {}", branch.id, branch.restaurant_id);
        Ok(branch.clone())
    }

    async fn update(&self, branch: &Branch) -> Result<Branch, DomainError> {
        let row: Option<BranchRow> = sqlx::query_as(
            r#"
            UPDATE branches SET
                name = $2, address = $3, phone = $4, whatsapp_number = $5,
                is_active = $6, modified_at = NOW()
            WHERE id = $1 AND removed_at IS NULL
            RETURNING id, restaurant_id, name, address, phone, whatsapp_number,
                      is_main, is_active, created_at, modified_at, removed_at
            "#
        )
        .bind(branch.id)
        .bind(&branch.name)
        .bind(&branch.address)
        .bind(&branch.phone)
        .bind(&branch.whatsapp_number)
        .bind(branch.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("updating branch"))?;

        row.map(|r| r.into()).ok_or(DomainError::BranchNotFound)
    }

    async fn set_main(&self, restaurant_id: &Uuid, branch_id: &Uuid) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error("starting transaction"))?;

        // Clear first: the partial unique index allows one live main branch
        sqlx::query(
            r#"
            UPDATE branches SET is_main = FALSE, modified_at = NOW()
            WHERE restaurant_id = $1 AND is_main AND id <> $2
            "#
        )
        .bind(restaurant_id)
        .bind(branch_id)
        .execute(&mut *tx)
        .await
        .map_err(db_error("clearing main branch"))?;

        let result = sqlx::query(
            r#"
            UPDATE branches SET is_main = TRUE, modified_at = NOW()
            WHERE id = $1 AND restaurant_id = $2 AND removed_at IS NULL
            "#
        )
        .bind(branch_id)
        .bind(restaurant_id)
        .execute(&mut *tx)
        .await
        .map_err(db_error("setting main branch"))?;

        if result.rows_affected() == 0 {
            // Dropping the transaction rolls back the cleared flag
            return Err(DomainError::BranchNotFound);
        }

        tx.commit().await.map_err(db_error("committing main branch change"))?;

        info!("Main branch of restaurant {} moved to {}", restaurant_id, branch_id);
        Ok(())
    }

    async fn soft_delete(&self, id: &Uuid) -> Result<(), DomainError> {
        // `NOT is_main` is re-checked under the row lock, so a concurrent
        // `set_main` on this branch cannot leave the restaurant without one
        let result = sqlx::query(
            r#"
            UPDATE branches SET removed_at = NOW(), is_active = FALSE
            WHERE id = $1 AND removed_at IS NULL AND NOT is_main
            "#
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(db_error("deleting branch"))?;

        if result.rows_affected() == 0 {
            let is_main: Option<bool> =
                sqlx::query_scalar("SELECT is_main FROM branches WHERE id = $1 AND removed_at IS NULL")
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(db_error("re-reading branch"))?;
            return Err(match is_main {
                Some(true) => DomainError::CannotDeleteMainBranch,
                _ => DomainError::BranchNotFound,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::postgres::restaurant_repo_impl::insert_restaurant;
    use resto_core::domain::{BillingCycle, BranchInput, Plan, Restaurant};

    async fn connect() -> Option<PgPool> {
        let url = match std::env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => {
                eprintln!("skipping: DATABASE_URL not set");
                return None;
            }
        };
        let pool = PgPool::connect(&url).await.expect("connect");
        crate::run_migrations(&pool).await.expect("migrate");
        Some(pool)
    }

    fn branch(restaurant_id: Uuid, name: &str, is_main: bool) -> Branch {
        let input = BranchInput {
            name: name.to_string(),
            address: None,
            phone: None,
            whatsapp_number: None,
            is_active: true,
        };
        Branch::new(restaurant_id, input, is_main).expect("branch")
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL and a local PostgreSQL"]
    async fn test_branch_made_main_after_load_is_not_deleted() {
        let Some(pool) = connect().await else { return };
        let slug = format!("warung-{}", &Uuid::new_v4().simple().to_string()[..8]);
        let restaurant = Restaurant::new(
            "Warung Test".to_string(),
            slug,
            None,
            None,
            "USD".to_string(),
            Plan::Pro,
            BillingCycle::Monthly,
        )
        .expect("restaurant");
        let mut conn = pool.acquire().await.expect("acquire");
        insert_restaurant(&mut conn, &restaurant).await.expect("insert restaurant");
        drop(conn);

        let repo = PgBranchRepository::new(pool.clone());
        let first = repo.create(&branch(restaurant.id, "Pusat", true)).await.expect("main");
        let second = repo.create(&branch(restaurant.id, "Cabang", false)).await.expect("second");

        // The caller saw `second` as non-main; it becomes main before the delete runs
        repo.set_main(&restaurant.id, &second.id).await.expect("set main");
        let err = repo.soft_delete(&second.id).await.unwrap_err();
        assert!(matches!(err, DomainError::CannotDeleteMainBranch));

        let live = repo.list_by_restaurant(&restaurant.id).await.expect("list");
        assert_eq!(live.iter().filter(|b| b.is_main).count(), 1);
        assert!(live.iter().any(|b| b.id == second.id && b.is_main));

        repo.soft_delete(&first.id).await.expect("delete former main");
        let err = repo.soft_delete(&first.id).await.unwrap_err();
        assert!(matches!(err, DomainError::BranchNotFound));
    }
}
