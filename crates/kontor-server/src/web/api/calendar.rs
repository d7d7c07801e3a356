use crate::error::ApiError;
use crate::state::AppState;
use crate::web::api::middleware::Identity;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use kontor_common::validation::require_trimmed;
use kontor_db::{CalendarEventRepo, CalendarEventRow, NewCalendarEvent};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct ListEventsQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct EventBody {
    pub title: String,
    pub description: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
}

impl EventBody {
    fn event(&self) -> Result<NewCalendarEvent<'_>, ApiError> {
        let title = require_trimmed(&self.title, "title").map_err(ApiError::Validation)?;
        if let Some(ends_at) = self.ends_at {
            if ends_at < self.starts_at {
                return Err(ApiError::validation("ends_at must not precede starts_at"));
            }
        }
        Ok(NewCalendarEvent {
            title,
            description: self.description.as_deref(),
            starts_at: self.starts_at,
            ends_at: self.ends_at,
        })
    }
}

fn event_json(e: &CalendarEventRow) -> Value {
    json!({
        "id": e.event_id,
        "title": e.title,
        "description": e.description,
        "starts_at": e.starts_at,
        "ends_at": e.ends_at,
        "created_at": e.created_at,
        "updated_at": e.updated_at,
    })
}

/// GET /api/calendar -- the requester's own events only
#[tracing::instrument(skip(state, identity))]
pub async fn list_events(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Query(query): Query<ListEventsQuery>,
) -> Result<Json<Value>, ApiError> {
    let events =
        CalendarEventRepo::list_for_user(&state.pool, identity.account_id, query.from, query.to)
            .await?;
    let items: Vec<Value> = events.iter().map(event_json).collect();
    Ok(Json(json!({"items": items})))
}

/// POST /api/calendar
#[tracing::instrument(skip(state, identity, body))]
pub async fn create_event(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Json(body): Json<EventBody>,
) -> Result<Json<Value>, ApiError> {
    let event =
        CalendarEventRepo::create(&state.pool, identity.account_id, body.event()?).await?;
    Ok(Json(event_json(&event)))
}

/// GET /api/calendar/:id
#[tracing::instrument(skip(state, identity))]
pub async fn get_event(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let event = CalendarEventRepo::get_owned(&state.pool, id, identity.account_id)
        .await?
        .ok_or(ApiError::NotFound("event"))?;
    Ok(Json(event_json(&event)))
}

/// PUT /api/calendar/:id
#[tracing::instrument(skip(state, identity, body))]
pub async fn update_event(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<i64>,
    Json(body): Json<EventBody>,
) -> Result<Json<Value>, ApiError> {
    let event = CalendarEventRepo::update_owned(&state.pool, id, identity.account_id, body.event()?)
        .await?
        .ok_or(ApiError::NotFound("event"))?;
    Ok(Json(event_json(&event)))
}

/// DELETE /api/calendar/:id
#[tracing::instrument(skip(state, identity))]
pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    if !CalendarEventRepo::delete_owned(&state.pool, id, identity.account_id).await? {
        return Err(ApiError::NotFound("event"));
    }
    Ok(Json(json!({"status": "ok"})))
}
