use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CalendarEventRow {
    pub event_id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct NewCalendarEvent<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
}

/// Calendar events are user-owned: every statement here filters on
/// user_id together with the primary key. There is no get-by-id-alone.
pub struct CalendarEventRepo;

impl CalendarEventRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: i64,
        event: NewCalendarEvent<'_>,
    ) -> Result<CalendarEventRow> {
        let row = sqlx::query_as::<_, CalendarEventRow>(
            "INSERT INTO calendar_event (user_id, title, description, starts_at, ends_at) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING event_id, user_id, title, description, starts_at, ends_at, created_at, updated_at",
        )
        .bind(user_id)
        .bind(event.title)
        .bind(event.description)
        .bind(event.starts_at)
        .bind(event.ends_at)
        .fetch_one(pool)
        .await
        .context("Failed to create calendar event")?;
        Ok(row)
    }

    pub async fn get_owned(
        pool: &PgPool,
        event_id: i64,
        user_id: i64,
    ) -> Result<Option<CalendarEventRow>> {
        let row = sqlx::query_as::<_, CalendarEventRow>(
            "SELECT event_id, user_id, title, description, starts_at, ends_at, created_at, updated_at \
             FROM calendar_event WHERE event_id = $1 AND user_id = $2",
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .context("Failed to get calendar event")?;
        Ok(row)
    }

    pub async fn list_for_user(
        pool: &PgPool,
        user_id: i64,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<CalendarEventRow>> {
        let rows = sqlx::query_as::<_, CalendarEventRow>(
            "SELECT event_id, user_id, title, description, starts_at, ends_at, created_at, updated_at \
             FROM calendar_event \
             WHERE user_id = $1 \
               AND ($2::TIMESTAMPTZ IS NULL OR starts_at >= $2) \
               AND ($3::TIMESTAMPTZ IS NULL OR starts_at <= $3) \
             ORDER BY starts_at",
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await
        .context("Failed to list calendar events")?;
        Ok(rows)
    }

    pub async fn update_owned(
        pool: &PgPool,
        event_id: i64,
        user_id: i64,
        event: NewCalendarEvent<'_>,
    ) -> Result<Option<CalendarEventRow>> {
        let row = sqlx::query_as::<_, CalendarEventRow>(
            "UPDATE calendar_event SET title = $3, description = $4, starts_at = $5, ends_at = $6, updated_at = now() \
             WHERE event_id = $1 AND user_id = $2 \
             RETURNING event_id, user_id, title, description, starts_at, ends_at, created_at, updated_at",
        )
        .bind(event_id)
        .bind(user_id)
        .bind(event.title)
        .bind(event.description)
        .bind(event.starts_at)
        .bind(event.ends_at)
        .fetch_optional(pool)
        .await
        .context("Failed to update calendar event")?;
        Ok(row)
    }

    pub async fn delete_owned(pool: &PgPool, event_id: i64, user_id: i64) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM calendar_event WHERE event_id = $1 AND user_id = $2")
                .bind(event_id)
                .bind(user_id)
                .execute(pool)
                .await
                .context("Failed to delete calendar event")?;
        Ok(result.rows_affected() > 0)
    }
}
