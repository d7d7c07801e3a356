use crate::auth::{create_token, hash_password, verify_password};
use crate::error::ApiError;
use crate::state::AppState;
use crate::web::api::{account_info, middleware::Identity};
use axum::{extract::State, Json};
use kontor_common::validation::{require_trimmed, validate_email, validate_password};
use kontor_db::{AccountRepo, NewAccount};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// POST /api/auth/login
#[tracing::instrument(skip(state, req))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let email = require_trimmed(&req.email, "email").map_err(ApiError::Validation)?;
    if req.password.is_empty() {
        return Err(ApiError::validation("password is required"));
    }

    // Unknown email and wrong password take the same exit
    let account = AccountRepo::get_by_email(&state.pool, email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !verify_password(&req.password, &account.password_hash)? {
        return Err(ApiError::InvalidCredentials);
    }

    let user = account_info(&account)?;
    let token = create_token(account.account_id, user.role, &state.config.auth.jwt_secret)?;

    // Login telemetry only; a failure here must not fail the login
    if let Err(e) = AccountRepo::touch_last_login(&state.pool, account.account_id).await {
        tracing::warn!("Failed to update last_login_at: {:#}", e);
    }

    Ok(Json(json!({"token": token, "user": user})))
}

/// POST /api/auth/register
#[tracing::instrument(skip(state, req))]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<Value>, ApiError> {
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
            // Self-registration never grants elevation
            role: "user",
            email_verified: false,
        },
    )
    .await?;

    tracing::info!("Registered account {} ({})", account.account_id, email);

    let user = account_info(&account)?;
    let token = create_token(account.account_id, user.role, &state.config.auth.jwt_secret)?;
    Ok(Json(json!({"token": token, "user": user})))
}

/// GET /api/auth/me
#[tracing::instrument(skip(state, identity))]
pub async fn me(
    State(state): State<Arc<AppState>>,
    identity: Identity,
) -> Result<Json<Value>, ApiError> {
    let account = AccountRepo::get_by_id(&state.pool, identity.account_id)
        .await?
        .ok_or(ApiError::NotFound("account"))?;
    Ok(Json(json!({"user": account_info(&account)?})))
}

/// POST /api/auth/change-password
#[tracing::instrument(skip(state, identity, req))]
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<Value>, ApiError> {
    validate_password(&req.new_password).map_err(ApiError::Validation)?;

    let account = AccountRepo::get_by_id(&state.pool, identity.account_id)
        .await?
        .ok_or(ApiError::NotFound("account"))?;

    if !verify_password(&req.current_password, &account.password_hash)? {
        return Err(ApiError::InvalidCredentials);
    }

    let new_hash = hash_password(&req.new_password)?;
    AccountRepo::update_password_hash(&state.pool, identity.account_id, &new_hash).await?;

    Ok(Json(json!({"status": "ok"})))
}
