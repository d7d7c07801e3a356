use crate::error::ApiError;
use crate::state::AppState;
use crate::web::api::{default_limit, middleware::Identity};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use kontor_common::validation::require_trimmed;
use kontor_db::{NotificationRepo, NotificationRow};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct ListNotificationsQuery {
    #[serde(default)]
    pub unread: bool,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

#[derive(Debug, Deserialize)]
pub struct BroadcastRequest {
    pub title: String,
    pub body: Option<String>,
}

fn notification_json(n: &NotificationRow) -> Value {
    json!({
        "id": n.notification_id,
        "title": n.title,
        "body": n.body,
        "read": n.read,
        "created_at": n.created_at,
    })
}

/// GET /api/notifications -- the requester's own, newest first
#[tracing::instrument(skip(state, identity))]
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Query(query): Query<ListNotificationsQuery>,
) -> Result<Json<Value>, ApiError> {
    let rows = NotificationRepo::list_for_user(
        &state.pool,
        identity.account_id,
        query.unread,
        query.limit,
        query.offset,
    )
    .await?;
    let items: Vec<Value> = rows.iter().map(notification_json).collect();
    Ok(Json(json!({"items": items})))
}

/// PUT /api/notifications/:id/read
#[tracing::instrument(skip(state, identity))]
pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    if !NotificationRepo::mark_read_owned(&state.pool, id, identity.account_id).await? {
        return Err(ApiError::NotFound("notification"));
    }
    Ok(Json(json!({"status": "ok"})))
}

/// DELETE /api/notifications/:id
#[tracing::instrument(skip(state, identity))]
pub async fn delete_notification(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    if !NotificationRepo::delete_owned(&state.pool, id, identity.account_id).await? {
        return Err(ApiError::NotFound("notification"));
    }
    Ok(Json(json!({"status": "ok"})))
}

/// POST /api/notifications/broadcast -- admin; one notification per account
#[tracing::instrument(skip(state, identity, req))]
pub async fn broadcast(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Json(req): Json<BroadcastRequest>,
) -> Result<Json<Value>, ApiError> {
    identity.require_admin()?;
    let title = require_trimmed(&req.title, "title").map_err(ApiError::Validation)?;

    let inserted = NotificationRepo::broadcast(&state.pool, title, req.body.as_deref()).await?;
    tracing::info!("Broadcast notification to {} accounts", inserted);

    Ok(Json(json!({"inserted": inserted})))
}
