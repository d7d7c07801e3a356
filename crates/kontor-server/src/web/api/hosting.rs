use crate::error::ApiError;
use crate::state::AppState;
use crate::web::api::{default_limit, middleware::Identity, require_client};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use kontor_common::validation::require_trimmed;
use kontor_db::{HostingFields, HostingRepo, HostingRow};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct ListHostingQuery {
    pub client_id: Option<i64>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

#[derive(Debug, Deserialize)]
pub struct HostingBody {
    pub client_id: i64,
    pub domain: String,
    pub provider: Option<String>,
    pub expires_on: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl HostingBody {
    fn fields(&self) -> Result<HostingFields<'_>, ApiError> {
        let domain = require_trimmed(&self.domain, "domain").map_err(ApiError::Validation)?;
        Ok(HostingFields {
            client_id: self.client_id,
            domain,
            provider: self.provider.as_deref(),
            expires_on: self.expires_on,
            notes: self.notes.as_deref(),
        })
    }
}

fn hosting_json(h: &HostingRow) -> Value {
    json!({
        "id": h.hosting_id,
        "client_id": h.client_id,
        "domain": h.domain,
        "provider": h.provider,
        "expires_on": h.expires_on,
        "notes": h.notes,
        "created_at": h.created_at,
        "updated_at": h.updated_at,
    })
}

/// GET /api/hosting
#[tracing::instrument(skip(state, _identity))]
pub async fn list_hosting(
    State(state): State<Arc<AppState>>,
    _identity: Identity,
    Query(query): Query<ListHostingQuery>,
) -> Result<Json<Value>, ApiError> {
    let rows = HostingRepo::list(&state.pool, query.client_id, query.limit, query.offset).await?;
    let items: Vec<Value> = rows.iter().map(hosting_json).collect();
    Ok(Json(json!({"items": items})))
}

/// POST /api/hosting
#[tracing::instrument(skip(state, _identity, body))]
pub async fn create_hosting(
    State(state): State<Arc<AppState>>,
    _identity: Identity,
    Json(body): Json<HostingBody>,
) -> Result<Json<Value>, ApiError> {
    let fields = body.fields()?;
    require_client(&state, fields.client_id).await?;
    let row = HostingRepo::create(&state.pool, fields).await?;
    Ok(Json(hosting_json(&row)))
}

/// GET /api/hosting/:id
#[tracing::instrument(skip(state, _identity))]
pub async fn get_hosting(
    State(state): State<Arc<AppState>>,
    _identity: Identity,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let row = HostingRepo::get(&state.pool, id)
        .await?
        .ok_or(ApiError::NotFound("hosting entry"))?;
    Ok(Json(hosting_json(&row)))
}

/// PUT /api/hosting/:id
#[tracing::instrument(skip(state, _identity, body))]
pub async fn update_hosting(
    State(state): State<Arc<AppState>>,
    _identity: Identity,
    Path(id): Path<i64>,
    Json(body): Json<HostingBody>,
) -> Result<Json<Value>, ApiError> {
    let fields = body.fields()?;
    require_client(&state, fields.client_id).await?;
    let row = HostingRepo::update(&state.pool, id, fields)
        .await?
        .ok_or(ApiError::NotFound("hosting entry"))?;
    Ok(Json(hosting_json(&row)))
}

/// DELETE /api/hosting/:id
#[tracing::instrument(skip(state, _identity))]
pub async fn delete_hosting(
    State(state): State<Arc<AppState>>,
    _identity: Identity,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    if !HostingRepo::delete(&state.pool, id).await? {
        return Err(ApiError::NotFound("hosting entry"));
    }
    Ok(Json(json!({"status": "ok"})))
}
