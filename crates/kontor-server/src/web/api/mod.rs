pub mod auth_routes;
pub mod calendar;
pub mod clients;
pub mod files;
pub mod hosting;
pub mod middleware;
pub mod notifications;
pub mod projects;
pub mod services;
pub mod settings;
pub mod users;

use crate::error::ApiError;
use crate::state::AppState;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use kontor_common::models::auth::AccountInfo;
use kontor_db::AccountRow;
use serde_json::json;
use std::sync::Arc;

pub(crate) fn default_limit() -> i64 {
    50
}

/// 404 unless the client row exists. Shared by the routes that hang
/// resources off a client.
pub(crate) async fn require_client(state: &AppState, id: i64) -> Result<(), ApiError> {
    kontor_db::ClientRepo::get(&state.pool, id)
        .await?
        .ok_or(ApiError::NotFound("client"))?;
    Ok(())
}

/// Wire view of an account row; the password hash stays behind.
pub(crate) fn account_info(row: &AccountRow) -> Result<AccountInfo, ApiError> {
    let role = row
        .role
        .parse()
        .map_err(|e: String| ApiError::Internal(anyhow::anyhow!(e)))?;
    Ok(AccountInfo {
        id: row.account_id,
        name: row.name.clone(),
        email: row.email.clone(),
        role,
        email_verified: row.email_verified,
        created_at: row.created_at,
    })
}

/// GET /api/health -- public liveness endpoint
async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

pub fn build_api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        // Public endpoints
        .route("/health", get(health))
        .route("/auth/login", post(auth_routes::login))
        .route("/auth/register", post(auth_routes::register))
        // Session
        .route("/auth/me", get(auth_routes::me))
        .route("/auth/change-password", post(auth_routes::change_password))
        // Clients and their document folders
        .route(
            "/clients",
            get(clients::list_clients).post(clients::create_client),
        )
        .route(
            "/clients/{id}",
            get(clients::get_client)
                .put(clients::update_client)
                .delete(clients::delete_client),
        )
        .route(
            "/clients/{id}/files",
            get(files::list_files).post(files::upload_file),
        )
        .route("/clients/{id}/files/{name}", delete(files::delete_file))
        // Business entities
        .route(
            "/projects",
            get(projects::list_projects).post(projects::create_project),
        )
        .route(
            "/projects/{id}",
            get(projects::get_project)
                .put(projects::update_project)
                .delete(projects::delete_project),
        )
        .route(
            "/services",
            get(services::list_services).post(services::create_service),
        )
        .route(
            "/services/{id}",
            get(services::get_service)
                .put(services::update_service)
                .delete(services::delete_service),
        )
        .route(
            "/hosting",
            get(hosting::list_hosting).post(hosting::create_hosting),
        )
        .route(
            "/hosting/{id}",
            get(hosting::get_hosting)
                .put(hosting::update_hosting)
                .delete(hosting::delete_hosting),
        )
        // User-owned resources
        .route(
            "/calendar",
            get(calendar::list_events).post(calendar::create_event),
        )
        .route(
            "/calendar/{id}",
            get(calendar::get_event)
                .put(calendar::update_event)
                .delete(calendar::delete_event),
        )
        .route("/notifications", get(notifications::list_notifications))
        .route(
            "/notifications/broadcast",
            post(notifications::broadcast),
        )
        .route("/notifications/{id}/read", put(notifications::mark_read))
        .route(
            "/notifications/{id}",
            delete(notifications::delete_notification),
        )
        .route(
            "/settings",
            get(settings::get_settings).put(settings::update_settings),
        )
        // User management (admin)
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/{id}", get(users::get_user))
        .with_state(state)
}
