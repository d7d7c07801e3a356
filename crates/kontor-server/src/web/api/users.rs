use crate::auth::hash_password;
use crate::error::ApiError;
use crate::state::AppState;
use crate::web::api::{account_info, default_limit, middleware::Identity};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use kontor_common::models::auth::Role;
use kontor_common::validation::{require_trimmed, validate_email, validate_password};
use kontor_db::{AccountRepo, NewAccount};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub email_verified: bool,
}

/// GET /api/users - admin only
#[tracing::instrument(skip(state, identity))]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<Value>, ApiError> {
    identity.require_admin()?;

    let accounts = AccountRepo::list(&state.pool, query.limit, query.offset).await?;
    let mut items = Vec::with_capacity(accounts.len());
    for account in &accounts {
        items.push(json!({
            "user": account_info(account)?,
            "last_login_at": account.last_login_at,
        }));
    }
    Ok(Json(json!({"items": items})))
}

/// POST /api/users - admin only
#[tracing::instrument(skip(state, identity, req))]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<Value>, ApiError> {
    identity.require_admin()?;

    let email = require_trimmed(&req.email, "email").map_err(ApiError::Validation)?;
    validate_email(email).map_err(ApiError::Validation)?;
    validate_password(&req.password).map_err(ApiError::Validation)?;
    let name = req.name.as_deref().map(str::trim).filter(|n| !n.is_empty());

    if AccountRepo::get_by_email(&state.pool, email).await?.is_some() {
        return Err(ApiError::validation("email already registered"));
    }

    let password_hash = hash_password(&req.password)?;
    let account = AccountRepo::create(
        &state.pool,
        NewAccount {
            name,
            email,
            password_hash: &password_hash,
            role: req.role.as_str(),
            email_verified: req.email_verified,
        },
    )
    .await?;

    tracing::info!(
        "Admin {} created account {} with role {}",
        identity.account_id,
        account.account_id,
        req.role
    );

    Ok(Json(json!({"user": account_info(&account)?})))
}

/// GET /api/users/:id - admin only
#[tracing::instrument(skip(state, identity))]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    identity.require_admin()?;

    let account = AccountRepo::get_by_id(&state.pool, id)
        .await?
        .ok_or(ApiError::NotFound("user"))?;
    Ok(Json(json!({
        "user": account_info(&account)?,
        "last_login_at": account.last_login_at,
    })))
}
