use crate::error::ApiError;
use crate::state::AppState;
use crate::web::api::{default_limit, middleware::Identity};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use kontor_common::validation::require_trimmed;
use kontor_db::{ClientFields, ClientRepo, ClientRow};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct ListClientsQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

#[derive(Debug, Deserialize)]
pub struct ClientBody {
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl ClientBody {
    fn fields(&self) -> Result<ClientFields<'_>, ApiError> {
        let name = require_trimmed(&self.name, "name").map_err(ApiError::Validation)?;
        Ok(ClientFields {
            name,
            company: self.company.as_deref(),
            email: self.email.as_deref(),
            phone: self.phone.as_deref(),
            address: self.address.as_deref(),
            notes: self.notes.as_deref(),
        })
    }
}

fn client_json(c: &ClientRow) -> Value {
    json!({
        "id": c.client_id,
        "name": c.name,
        "company": c.company,
        "email": c.email,
        "phone": c.phone,
        "address": c.address,
        "notes": c.notes,
        "created_at": c.created_at,
        "updated_at": c.updated_at,
    })
}

/// GET /api/clients
#[tracing::instrument(skip(state, _identity))]
pub async fn list_clients(
    State(state): State<Arc<AppState>>,
    _identity: Identity,
    Query(query): Query<ListClientsQuery>,
) -> Result<Json<Value>, ApiError> {
    let clients = ClientRepo::list(&state.pool, query.limit, query.offset).await?;
    let total = ClientRepo::count(&state.pool).await?;
    let items: Vec<Value> = clients.iter().map(client_json).collect();
    Ok(Json(json!({"items": items, "total": total})))
}

/// POST /api/clients
#[tracing::instrument(skip(state, _identity, body))]
pub async fn create_client(
    State(state): State<Arc<AppState>>,
    _identity: Identity,
    Json(body): Json<ClientBody>,
) -> Result<Json<Value>, ApiError> {
    let client = ClientRepo::create(&state.pool, body.fields()?).await?;
    Ok(Json(client_json(&client)))
}

/// GET /api/clients/:id
#[tracing::instrument(skip(state, _identity))]
pub async fn get_client(
    State(state): State<Arc<AppState>>,
    _identity: Identity,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let client = ClientRepo::get(&state.pool, id)
        .await?
        .ok_or(ApiError::NotFound("client"))?;
    Ok(Json(client_json(&client)))
}

/// PUT /api/clients/:id
#[tracing::instrument(skip(state, _identity, body))]
pub async fn update_client(
    State(state): State<Arc<AppState>>,
    _identity: Identity,
    Path(id): Path<i64>,
    Json(body): Json<ClientBody>,
) -> Result<Json<Value>, ApiError> {
    let client = ClientRepo::update(&state.pool, id, body.fields()?)
        .await?
        .ok_or(ApiError::NotFound("client"))?;
    Ok(Json(client_json(&client)))
}

/// DELETE /api/clients/:id -- admin only; also drops the document folder
#[tracing::instrument(skip(state, identity))]
pub async fn delete_client(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    identity.require_admin()?;

    if !ClientRepo::delete(&state.pool, id).await? {
        return Err(ApiError::NotFound("client"));
    }

    // The row is gone either way; folder removal is best-effort
    if let Err(e) = state.docs.remove_client_dir(id).await {
        tracing::warn!("Failed to remove document folder for client {}: {:#}", id, e);
    }

    Ok(Json(json!({"status": "ok"})))
}
