use crate::error::ApiError;
use crate::state::AppState;
use crate::web::api::{default_limit, middleware::Identity, require_client};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use kontor_common::validation::require_trimmed;
use kontor_db::{ProjectFields, ProjectRepo, ProjectRow};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

const STATUSES: &[&str] = &["active", "paused", "done"];

#[derive(Debug, Deserialize)]
pub struct ListProjectsQuery {
    pub client_id: Option<i64>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

#[derive(Debug, Deserialize)]
pub struct ProjectBody {
    pub client_id: i64,
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
    pub deadline: Option<NaiveDate>,
}

fn default_status() -> String {
    "active".to_string()
}

impl ProjectBody {
    fn fields(&self) -> Result<ProjectFields<'_>, ApiError> {
        let name = require_trimmed(&self.name, "name").map_err(ApiError::Validation)?;
        if !STATUSES.contains(&self.status.as_str()) {
            return Err(ApiError::validation(format!(
                "status must be one of: {}",
                STATUSES.join(", ")
            )));
        }
        Ok(ProjectFields {
            client_id: self.client_id,
            name,
            description: self.description.as_deref(),
            status: &self.status,
            deadline: self.deadline,
        })
    }
}

fn project_json(p: &ProjectRow) -> Value {
    json!({
        "id": p.project_id,
        "client_id": p.client_id,
        "name": p.name,
        "description": p.description,
        "status": p.status,
        "deadline": p.deadline,
        "created_at": p.created_at,
        "updated_at": p.updated_at,
    })
}

/// GET /api/projects
#[tracing::instrument(skip(state, _identity))]
pub async fn list_projects(
    State(state): State<Arc<AppState>>,
    _identity: Identity,
    Query(query): Query<ListProjectsQuery>,
) -> Result<Json<Value>, ApiError> {
    let projects =
        ProjectRepo::list(&state.pool, query.client_id, query.limit, query.offset).await?;
    let items: Vec<Value> = projects.iter().map(project_json).collect();
    Ok(Json(json!({"items": items})))
}

/// POST /api/projects
#[tracing::instrument(skip(state, _identity, body))]
pub async fn create_project(
    State(state): State<Arc<AppState>>,
    _identity: Identity,
    Json(body): Json<ProjectBody>,
) -> Result<Json<Value>, ApiError> {
    let fields = body.fields()?;
    require_client(&state, fields.client_id).await?;
    let project = ProjectRepo::create(&state.pool, fields).await?;
    Ok(Json(project_json(&project)))
}

/// GET /api/projects/:id
#[tracing::instrument(skip(state, _identity))]
pub async fn get_project(
    State(state): State<Arc<AppState>>,
    _identity: Identity,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let project = ProjectRepo::get(&state.pool, id)
        .await?
        .ok_or(ApiError::NotFound("project"))?;
    Ok(Json(project_json(&project)))
}

/// PUT /api/projects/:id
#[tracing::instrument(skip(state, _identity, body))]
pub async fn update_project(
    State(state): State<Arc<AppState>>,
    _identity: Identity,
    Path(id): Path<i64>,
    Json(body): Json<ProjectBody>,
) -> Result<Json<Value>, ApiError> {
    let fields = body.fields()?;
    require_client(&state, fields.client_id).await?;
    let project = ProjectRepo::update(&state.pool, id, fields)
        .await?
        .ok_or(ApiError::NotFound("project"))?;
    Ok(Json(project_json(&project)))
}

/// DELETE /api/projects/:id
#[tracing::instrument(skip(state, _identity))]
pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    _identity: Identity,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    if !ProjectRepo::delete(&state.pool, id).await? {
        return Err(ApiError::NotFound("project"));
    }
    Ok(Json(json!({"status": "ok"})))
}
