use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProjectRow {
    pub project_id: i64,
    pub client_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct ProjectFields<'a> {
    pub client_id: i64,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub status: &'a str,
    pub deadline: Option<NaiveDate>,
}

pub struct ProjectRepo;

impl ProjectRepo {
    pub async fn create(pool: &PgPool, fields: ProjectFields<'_>) -> Result<ProjectRow> {
        let row = sqlx::query_as::<_, ProjectRow>(
            "INSERT INTO project (client_id, name, description, status, deadline) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING project_id, client_id, name, description, status, deadline, created_at, updated_at",
        )
        .bind(fields.client_id)
        .bind(fields.name)
        .bind(fields.description)
        .bind(fields.status)
        .bind(fields.deadline)
        .fetch_one(pool)
        .await
        .context("Failed to create project")?;
        Ok(row)
    }

    pub async fn get(pool: &PgPool, project_id: i64) -> Result<Option<ProjectRow>> {
        let row = sqlx::query_as::<_, ProjectRow>(
            "SELECT project_id, client_id, name, description, status, deadline, created_at, updated_at \
             FROM project WHERE project_id = $1",
        )
        .bind(project_id)
        .fetch_optional(pool)
        .await
        .context("Failed to get project")?;
        Ok(row)
    }

    pub async fn list(
        pool: &PgPool,
        client_id: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProjectRow>> {
        let rows = sqlx::query_as::<_, ProjectRow>(
            "SELECT project_id, client_id, name, description, status, deadline, created_at, updated_at \
             FROM project WHERE ($1::BIGINT IS NULL OR client_id = $1) \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(client_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .context("Failed to list projects")?;
        Ok(rows)
    }

    pub async fn update(
        pool: &PgPool,
        project_id: i64,
        fields: ProjectFields<'_>,
    ) -> Result<Option<ProjectRow>> {
        let row = sqlx::query_as::<_, ProjectRow>(
            "UPDATE project SET client_id = $2, name = $3, description = $4, status = $5, deadline = $6, updated_at = now() \
             WHERE project_id = $1 \
             RETURNING project_id, client_id, name, description, status, deadline, created_at, updated_at",
        )
        .bind(project_id)
        .bind(fields.client_id)
        .bind(fields.name)
        .bind(fields.description)
        .bind(fields.status)
        .bind(fields.deadline)
        .fetch_optional(pool)
        .await
        .context("Failed to update project")?;
        Ok(row)
    }

    pub async fn delete(pool: &PgPool, project_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM project WHERE project_id = $1")
            .bind(project_id)
            .execute(pool)
            .await
            .context("Failed to delete project")?;
        Ok(result.rows_affected() > 0)
    }
}
