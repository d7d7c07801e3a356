use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ServiceRow {
    pub service_id: i64,
    pub client_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub billing_period: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct ServiceFields<'a> {
    pub client_id: i64,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub price_cents: i64,
    pub billing_period: &'a str,
}

pub struct ServiceRepo;

impl ServiceRepo {
    pub async fn create(pool: &PgPool, fields: ServiceFields<'_>) -> Result<ServiceRow> {
        let row = sqlx::query_as::<_, ServiceRow>(
            "INSERT INTO service (client_id, name, description, price_cents, billing_period) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING service_id, client_id, name, description, price_cents, billing_period, created_at, updated_at",
        )
        .bind(fields.client_id)
        .bind(fields.name)
        .bind(fields.description)
        .bind(fields.price_cents)
        .bind(fields.billing_period)
        .fetch_one(pool)
        .await
        .context("Failed to create service")?;
        Ok(row)
    }

    pub async fn get(pool: &PgPool, service_id: i64) -> Result<Option<ServiceRow>> {
        let row = sqlx::query_as::<_, ServiceRow>(
            "SELECT service_id, client_id, name, description, price_cents, billing_period, created_at, updated_at \
             FROM service WHERE service_id = $1",
        )
        .bind(service_id)
        .fetch_optional(pool)
        .await
        .context("Failed to get service")?;
        Ok(row)
    }

    pub async fn list(
        pool: &PgPool,
        client_id: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ServiceRow>> {
        let rows = sqlx::query_as::<_, ServiceRow>(
            "SELECT service_id, client_id, name, description, price_cents, billing_period, created_at, updated_at \
             FROM service WHERE ($1::BIGINT IS NULL OR client_id = $1) \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(client_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .context("Failed to list services")?;
        Ok(rows)
    }

    pub async fn update(
        pool: &PgPool,
        service_id: i64,
        fields: ServiceFields<'_>,
    ) -> Result<Option<ServiceRow>> {
        let row = sqlx::query_as::<_, ServiceRow>(
            "UPDATE service SET client_id = $2, name = $3, description = $4, price_cents = $5, billing_period = $6, updated_at = now() \
             WHERE service_id = $1 \
             RETURNING service_id, client_id, name, description, price_cents, billing_period, created_at, updated_at",
        )
        .bind(service_id)
        .bind(fields.client_id)
        .bind(fields.name)
        .bind(fields.description)
        .bind(fields.price_cents)
        .bind(fields.billing_period)
        .fetch_optional(pool)
        .await
        .context("Failed to update service")?;
        Ok(row)
    }

    pub async fn delete(pool: &PgPool, service_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM service WHERE service_id = $1")
            .bind(service_id)
            .execute(pool)
            .await
            .context("Failed to delete service")?;
        Ok(result.rows_affected() > 0)
    }
}
