use crate::error::ApiError;
use crate::state::AppState;
use crate::web::api::{default_limit, middleware::Identity, require_client};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use kontor_common::validation::require_trimmed;
use kontor_db::{ServiceFields, ServiceRepo, ServiceRow};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

const BILLING_PERIODS: &[&str] = &["monthly", "yearly", "once"];

#[derive(Debug, Deserialize)]
pub struct ListServicesQuery {
    pub client_id: Option<i64>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

#[derive(Debug, Deserialize)]
pub struct ServiceBody {
    pub client_id: i64,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub price_cents: i64,
    #[serde(default = "default_billing_period")]
    pub billing_period: String,
}

fn default_billing_period() -> String {
    "monthly".to_string()
}

impl ServiceBody {
    fn fields(&self) -> Result<ServiceFields<'_>, ApiError> {
        let name = require_trimmed(&self.name, "name").map_err(ApiError::Validation)?;
        if self.price_cents < 0 {
            return Err(ApiError::validation("price_cents must not be negative"));
        }
        if !BILLING_PERIODS.contains(&self.billing_period.as_str()) {
            return Err(ApiError::validation(format!(
                "billing_period must be one of: {}",
                BILLING_PERIODS.join(", ")
            )));
        }
        Ok(ServiceFields {
            client_id: self.client_id,
            name,
            description: self.description.as_deref(),
            price_cents: self.price_cents,
            billing_period: &self.billing_period,
        })
    }
}

fn service_json(s: &ServiceRow) -> Value {
    json!({
        "id": s.service_id,
        "client_id": s.client_id,
        "name": s.name,
        "description": s.description,
        "price_cents": s.price_cents,
        "billing_period": s.billing_period,
        "created_at": s.created_at,
        "updated_at": s.updated_at,
    })
}

/// GET /api/services
#[tracing::instrument(skip(state, _identity))]
pub async fn list_services(
    State(state): State<Arc<AppState>>,
    _identity: Identity,
    Query(query): Query<ListServicesQuery>,
) -> Result<Json<Value>, ApiError> {
    let services =
        ServiceRepo::list(&state.pool, query.client_id, query.limit, query.offset).await?;
    let items: Vec<Value> = services.iter().map(service_json).collect();
    Ok(Json(json!({"items": items})))
}

/// POST /api/services
#[tracing::instrument(skip(state, _identity, body))]
pub async fn create_service(
    State(state): State<Arc<AppState>>,
    _identity: Identity,
    Json(body): Json<ServiceBody>,
) -> Result<Json<Value>, ApiError> {
    let fields = body.fields()?;
    require_client(&state, fields.client_id).await?;
    let service = ServiceRepo::create(&state.pool, fields).await?;
    Ok(Json(service_json(&service)))
}

/// GET /api/services/:id
#[tracing::instrument(skip(state, _identity))]
pub async fn get_service(
    State(state): State<Arc<AppState>>,
    _identity: Identity,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let service = ServiceRepo::get(&state.pool, id)
        .await?
        .ok_or(ApiError::NotFound("service"))?;
    Ok(Json(service_json(&service)))
}

/// PUT /api/services/:id
#[tracing::instrument(skip(state, _identity, body))]
pub async fn update_service(
    State(state): State<Arc<AppState>>,
    _identity: Identity,
    Path(id): Path<i64>,
    Json(body): Json<ServiceBody>,
) -> Result<Json<Value>, ApiError> {
    let fields = body.fields()?;
    require_client(&state, fields.client_id).await?;
    let service = ServiceRepo::update(&state.pool, id, fields)
        .await?
        .ok_or(ApiError::NotFound("service"))?;
    Ok(Json(service_json(&service)))
}

/// DELETE /api/services/:id
#[tracing::instrument(skip(state, _identity))]
pub async fn delete_service(
    State(state): State<Arc<AppState>>,
    _identity: Identity,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    if !ServiceRepo::delete(&state.pool, id).await? {
        return Err(ApiError::NotFound("service"));
    }
    Ok(Json(json!({"status": "ok"})))
}
