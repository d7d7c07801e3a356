use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HostingRow {
    pub hosting_id: i64,
    pub client_id: i64,
    pub domain: String,
    pub provider: Option<String>,
    pub expires_on: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct HostingFields<'a> {
    pub client_id: i64,
    pub domain: &'a str,
    pub provider: Option<&'a str>,
    pub expires_on: Option<NaiveDate>,
    pub notes: Option<&'a str>,
}

pub struct HostingRepo;

impl HostingRepo {
    pub async fn create(pool: &PgPool, fields: HostingFields<'_>) -> Result<HostingRow> {
        let row = sqlx::query_as::<_, HostingRow>(
            "INSERT INTO hosting (client_id, domain, provider, expires_on, notes) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING hosting_id, client_id, domain, provider, expires_on, notes, created_at, updated_at",
        )
        .bind(fields.client_id)
        .bind(fields.domain)
        .bind(fields.provider)
        .bind(fields.expires_on)
        .bind(fields.notes)
        .fetch_one(pool)
        .await
        .context("Failed to create hosting entry")?;
        Ok(row)
    }

    pub async fn get(pool: &PgPool, hosting_id: i64) -> Result<Option<HostingRow>> {
        let row = sqlx::query_as::<_, HostingRow>(
            "SELECT hosting_id, client_id, domain, provider, expires_on, notes, created_at, updated_at \
             FROM hosting WHERE hosting_id = $1",
        )
        .bind(hosting_id)
        .fetch_optional(pool)
        .await
        .context("Failed to get hosting entry")?;
        Ok(row)
    }

    pub async fn list(
        pool: &PgPool,
        client_id: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<HostingRow>> {
        let rows = sqlx::query_as::<_, HostingRow>(
            "SELECT hosting_id, client_id, domain, provider, expires_on, notes, created_at, updated_at \
             FROM hosting WHERE ($1::BIGINT IS NULL OR client_id = $1) \
             ORDER BY expires_on NULLS LAST, domain LIMIT $2 OFFSET $3",
        )
        .bind(client_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .context("Failed to list hosting entries")?;
        Ok(rows)
    }

    pub async fn update(
        pool: &PgPool,
        hosting_id: i64,
        fields: HostingFields<'_>,
    ) -> Result<Option<HostingRow>> {
        let row = sqlx::query_as::<_, HostingRow>(
            "UPDATE hosting SET client_id = $2, domain = $3, provider = $4, expires_on = $5, notes = $6, updated_at = now() \
             WHERE hosting_id = $1 \
             RETURNING hosting_id, client_id, domain, provider, expires_on, notes, created_at, updated_at",
        )
        .bind(hosting_id)
        .bind(fields.client_id)
        .bind(fields.domain)
        .bind(fields.provider)
        .bind(fields.expires_on)
        .bind(fields.notes)
        .fetch_optional(pool)
        .await
        .context("Failed to update hosting entry")?;
        Ok(row)
    }

    pub async fn delete(pool: &PgPool, hosting_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM hosting WHERE hosting_id = $1")
            .bind(hosting_id)
            .execute(pool)
            .await
            .context("Failed to delete hosting entry")?;
        Ok(result.rows_affected() > 0)
    }
}
