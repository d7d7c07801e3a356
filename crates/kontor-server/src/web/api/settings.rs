use crate::error::ApiError;
use crate::state::AppState;
use crate::web::api::middleware::Identity;
use axum::{extract::State, Json};
use kontor_common::validation::require_trimmed;
use kontor_db::{SettingsUpdate, UserSettingsRepo};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct SettingsBody {
    pub locale: String,
    pub timezone: String,
    #[serde(default = "default_true")]
    pub email_notifications: bool,
}

fn default_true() -> bool {
    true
}

/// GET /api/settings -- defaults until the first save
#[tracing::instrument(skip(state, identity))]
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
    identity: Identity,
) -> Result<Json<Value>, ApiError> {
    match UserSettingsRepo::get(&state.pool, identity.account_id).await? {
        Some(row) => Ok(Json(json!({
            "locale": row.locale,
            "timezone": row.timezone,
            "email_notifications": row.email_notifications,
            "updated_at": row.updated_at,
        }))),
        None => Ok(Json(json!({
            "locale": "en",
            "timezone": "UTC",
            "email_notifications": true,
            "updated_at": null,
        }))),
    }
}

/// PUT /api/settings -- upsert, keyed by the requester
#[tracing::instrument(skip(state, identity, body))]
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Json(body): Json<SettingsBody>,
) -> Result<Json<Value>, ApiError> {
    let locale = require_trimmed(&body.locale, "locale").map_err(ApiError::Validation)?;
    let timezone = require_trimmed(&body.timezone, "timezone").map_err(ApiError::Validation)?;

    let row = UserSettingsRepo::upsert(
        &state.pool,
        identity.account_id,
        SettingsUpdate {
            locale,
            timezone,
            email_notifications: body.email_notifications,
        },
    )
    .await?;

    Ok(Json(json!({
        "locale": row.locale,
        "timezone": row.timezone,
        "email_notifications": row.email_notifications,
        "updated_at": row.updated_at,
    })))
}
