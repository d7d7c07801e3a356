use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ClientRow {
    pub client_id: i64,
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Writable client columns, shared by create and update.
#[derive(Debug)]
pub struct ClientFields<'a> {
    pub name: &'a str,
    pub company: Option<&'a str>,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub address: Option<&'a str>,
    pub notes: Option<&'a str>,
}

pub struct ClientRepo;

impl ClientRepo {
    pub async fn create(pool: &PgPool, fields: ClientFields<'_>) -> Result<ClientRow> {
        let row = sqlx::query_as::<_, ClientRow>(
            "INSERT INTO client (name, company, email, phone, address, notes) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING client_id, name, company, email, phone, address, notes, created_at, updated_at",
        )
        .bind(fields.name)
        .bind(fields.company)
        .bind(fields.email)
        .bind(fields.phone)
        .bind(fields.address)
        .bind(fields.notes)
        .fetch_one(pool)
        .await
        .context("Failed to create client")?;
        Ok(row)
    }

    pub async fn get(pool: &PgPool, client_id: i64) -> Result<Option<ClientRow>> {
        let row = sqlx::query_as::<_, ClientRow>(
            "SELECT client_id, name, company, email, phone, address, notes, created_at, updated_at \
             FROM client WHERE client_id = $1",
        )
        .bind(client_id)
        .fetch_optional(pool)
        .await
        .context("Failed to get client")?;
        Ok(row)
    }

    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<ClientRow>> {
        let rows = sqlx::query_as::<_, ClientRow>(
            "SELECT client_id, name, company, email, phone, address, notes, created_at, updated_at \
             FROM client ORDER BY name LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .context("Failed to list clients")?;
        Ok(rows)
    }

    pub async fn count(pool: &PgPool) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM client")
            .fetch_one(pool)
            .await
            .context("Failed to count clients")?;
        Ok(count.0)
    }

    pub async fn update(
        pool: &PgPool,
        client_id: i64,
        fields: ClientFields<'_>,
    ) -> Result<Option<ClientRow>> {
        let row = sqlx::query_as::<_, ClientRow>(
            "UPDATE client SET name = $2, company = $3, email = $4, phone = $5, address = $6, notes = $7, updated_at = now() \
             WHERE client_id = $1 \
             RETURNING client_id, name, company, email, phone, address, notes, created_at, updated_at",
        )
        .bind(client_id)
        .bind(fields.name)
        .bind(fields.company)
        .bind(fields.email)
        .bind(fields.phone)
        .bind(fields.address)
        .bind(fields.notes)
        .fetch_optional(pool)
        .await
        .context("Failed to update client")?;
        Ok(row)
    }

    /// Dependent projects, services and hosting rows go with the FK cascade.
    pub async fn delete(pool: &PgPool, client_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM client WHERE client_id = $1")
            .bind(client_id)
            .execute(pool)
            .await
            .context("Failed to delete client")?;
        Ok(result.rows_affected() > 0)
    }
}
