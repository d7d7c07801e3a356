use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AccountRow {
    pub account_id: i64,
    pub name: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

#[derive(Debug)]
pub struct NewAccount<'a> {
    pub name: Option<&'a str>,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
    pub email_verified: bool,
}

pub struct AccountRepo;

impl AccountRepo {
    pub async fn create(pool: &PgPool, new: NewAccount<'_>) -> Result<AccountRow> {
        let row = sqlx::query_as::<_, AccountRow>(
            "INSERT INTO account (name, email, password_hash, role, email_verified) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING account_id, name, email, password_hash, role, email_verified, created_at, updated_at, last_login_at",
        )
        .bind(new.name)
        .bind(new.email)
        .bind(new.password_hash)
        .bind(new.role)
        .bind(new.email_verified)
        .fetch_one(pool)
        .await
        .context("Failed to create account")?;
        Ok(row)
    }

    /// Case-insensitive lookup; pairs with the unique index on lower(email).
    pub async fn get_by_email(pool: &PgPool, email: &str) -> Result<Option<AccountRow>> {
        let row = sqlx::query_as::<_, AccountRow>(
            "SELECT account_id, name, email, password_hash, role, email_verified, created_at, updated_at, last_login_at \
             FROM account WHERE lower(email) = lower($1)",
        )
        .bind(email)
        .fetch_optional(pool)
        .await
        .context("Failed to get account by email")?;
        Ok(row)
    }

    pub async fn get_by_id(pool: &PgPool, account_id: i64) -> Result<Option<AccountRow>> {
        let row = sqlx::query_as::<_, AccountRow>(
            "SELECT account_id, name, email, password_hash, role, email_verified, created_at, updated_at, last_login_at \
             FROM account WHERE account_id = $1",
        )
        .bind(account_id)
        .fetch_optional(pool)
        .await
        .context("Failed to get account by id")?;
        Ok(row)
    }

    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<AccountRow>> {
        let rows = sqlx::query_as::<_, AccountRow>(
            "SELECT account_id, name, email, password_hash, role, email_verified, created_at, updated_at, last_login_at \
             FROM account ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .context("Failed to list accounts")?;
        Ok(rows)
    }

    pub async fn update_password_hash(
        pool: &PgPool,
        account_id: i64,
        password_hash: &str,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE account SET password_hash = $2, updated_at = now() WHERE account_id = $1",
        )
        .bind(account_id)
        .bind(password_hash)
        .execute(pool)
        .await
        .context("Failed to update password hash")?;
        Ok(())
    }

    pub async fn touch_last_login(pool: &PgPool, account_id: i64) -> Result<()> {
        sqlx::query("UPDATE account SET last_login_at = now() WHERE account_id = $1")
            .bind(account_id)
            .execute(pool)
            .await
            .context("Failed to update last_login_at")?;
        Ok(())
    }
}
