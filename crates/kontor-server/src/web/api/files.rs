use crate::error::ApiError;
use crate::state::AppState;
use crate::uploads::sanitize_filename;
use crate::web::api::{middleware::Identity, require_client};
use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

/// GET /api/clients/:id/files
#[tracing::instrument(skip(state, _identity))]
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    _identity: Identity,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    require_client(&state, id).await?;
    let docs = state.docs.list(id).await?;
    Ok(Json(json!({"items": docs})))
}

/// POST /api/clients/:id/files -- multipart upload into the client's folder
#[tracing::instrument(skip(state, _identity, multipart))]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    _identity: Identity,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    require_client(&state, id).await?;

    let mut saved: Vec<Value> = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("invalid multipart body: {}", e)))?
    {
        let Some(raw_name) = field.file_name().map(str::to_owned) else {
            // Non-file fields are ignored
            continue;
        };
        let name = sanitize_filename(&raw_name).map_err(ApiError::Validation)?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::validation(format!("failed to read upload: {}", e)))?;

        state.docs.save(id, &name, &bytes).await?;
        tracing::info!("Stored document {} for client {}", name, id);
        saved.push(json!({"name": name, "size": bytes.len()}));
    }

    if saved.is_empty() {
        return Err(ApiError::validation("no file in request"));
    }

    Ok(Json(json!({"items": saved})))
}

/// DELETE /api/clients/:id/files/:name
#[tracing::instrument(skip(state, _identity))]
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    _identity: Identity,
    Path((id, name)): Path<(i64, String)>,
) -> Result<Json<Value>, ApiError> {
    require_client(&state, id).await?;
    let name = sanitize_filename(&name).map_err(ApiError::Validation)?;

    if !state.docs.delete(id, &name).await? {
        return Err(ApiError::NotFound("document"));
    }
    Ok(Json(json!({"status": "ok"})))
}
