//! Account repository implementation

use chrono::Utc;
use sqlx::{PgConnection, PgPool};

use crate::models::account::{Account, CreateAccountRequest};
use crate::models::YesNo;
use crate::utils::errors::PortalError;

const ACCOUNT_COLUMNS: &str = "id, email, first_name, middle_name, last_name, barangay, is_verified, is_volunteer, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new account
    pub async fn create(&self, request: CreateAccountRequest) -> Result<Account, PortalError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            r#"
            INSERT INTO accounts (email, first_name, middle_name, last_name, barangay, is_verified, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(request.email)
        .bind(request.first_name)
        .bind(request.middle_name)
        .bind(request.last_name)
        .bind(request.barangay)
        .bind(request.is_verified)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(account)
    }

    /// Find account by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Account>, PortalError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    /// Find account by ID inside a transaction
    pub async fn find_by_id_in(&self, conn: &mut PgConnection, id: i64) -> Result<Option<Account>, PortalError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(account)
    }

    /// Find and row-lock an account until the surrounding transaction ends
    pub async fn lock_in(&self, conn: &mut PgConnection, id: i64) -> Result<Option<Account>, PortalError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(account)
    }

    /// Toggle the volunteer flag
    pub async fn set_volunteer_status(&self, id: i64, is_volunteer: YesNo) -> Result<Option<Account>, PortalError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            r#"
            UPDATE accounts
            SET is_volunteer = $2, updated_at = $3
            WHERE id = $1
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(is_volunteer)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }
}
