use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserSettingsRow {
    pub user_id: i64,
    pub locale: String,
    pub timezone: String,
    pub email_notifications: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct SettingsUpdate<'a> {
    pub locale: &'a str,
    pub timezone: &'a str,
    pub email_notifications: bool,
}

/// Zero-or-one settings row per account, keyed by user_id.
pub struct UserSettingsRepo;

impl UserSettingsRepo {
    pub async fn get(pool: &PgPool, user_id: i64) -> Result<Option<UserSettingsRow>> {
        let row = sqlx::query_as::<_, UserSettingsRow>(
            "SELECT user_id, locale, timezone, email_notifications, updated_at \
             FROM user_settings WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .context("Failed to get user settings")?;
        Ok(row)
    }

    pub async fn upsert(
        pool: &PgPool,
        user_id: i64,
        update: SettingsUpdate<'_>,
    ) -> Result<UserSettingsRow> {
        let row = sqlx::query_as::<_, UserSettingsRow>(
            "INSERT INTO user_settings (user_id, locale, timezone, email_notifications) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id) DO UPDATE \
             SET locale = EXCLUDED.locale, timezone = EXCLUDED.timezone, \
                 email_notifications = EXCLUDED.email_notifications, updated_at = now() \
             RETURNING user_id, locale, timezone, email_notifications, updated_at",
        )
        .bind(user_id)
        .bind(update.locale)
        .bind(update.timezone)
        .bind(update.email_notifications)
        .fetch_one(pool)
        .await
        .context("Failed to upsert user settings")?;
        Ok(row)
    }
}
