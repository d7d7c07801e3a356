use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NotificationRow {
    pub notification_id: i64,
    pub user_id: i64,
    pub title: String,
    pub body: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Notifications are user-owned; mutations filter on user_id and the
/// primary key in the same statement.
pub struct NotificationRepo;

impl NotificationRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: i64,
        title: &str,
        body: Option<&str>,
    ) -> Result<NotificationRow> {
        let row = sqlx::query_as::<_, NotificationRow>(
            "INSERT INTO notification (user_id, title, body) VALUES ($1, $2, $3) \
             RETURNING notification_id, user_id, title, body, read, created_at",
        )
        .bind(user_id)
        .bind(title)
        .bind(body)
        .fetch_one(pool)
        .await
        .context("Failed to create notification")?;
        Ok(row)
    }

    /// One insert per account, in a single statement.
    pub async fn broadcast(pool: &PgPool, title: &str, body: Option<&str>) -> Result<u64> {
        let result = sqlx::query(
            "INSERT INTO notification (user_id, title, body) \
             SELECT account_id, $1, $2 FROM account",
        )
        .bind(title)
        .bind(body)
        .execute(pool)
        .await
        .context("Failed to broadcast notification")?;
        Ok(result.rows_affected())
    }

    pub async fn list_for_user(
        pool: &PgPool,
        user_id: i64,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<NotificationRow>> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            "SELECT notification_id, user_id, title, body, read, created_at \
             FROM notification \
             WHERE user_id = $1 AND (NOT $2 OR read = FALSE) \
             ORDER BY created_at DESC LIMIT $3 OFFSET $4",
        )
        .bind(user_id)
        .bind(unread_only)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .context("Failed to list notifications")?;
        Ok(rows)
    }

    pub async fn mark_read_owned(
        pool: &PgPool,
        notification_id: i64,
        user_id: i64,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE notification SET read = TRUE WHERE notification_id = $1 AND user_id = $2",
        )
        .bind(notification_id)
        .bind(user_id)
        .execute(pool)
        .await
        .context("Failed to mark notification read")?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_owned(pool: &PgPool, notification_id: i64, user_id: i64) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM notification WHERE notification_id = $1 AND user_id = $2")
                .bind(notification_id)
                .bind(user_id)
                .execute(pool)
                .await
                .context("Failed to delete notification")?;
        Ok(result.rows_affected() > 0)
    }
}
