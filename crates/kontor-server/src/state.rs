use crate::config::ServerConfig;
use crate::uploads::DocumentStore;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state. Built once at startup, cloned per request;
/// nothing in here is mutated after boot.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<ServerConfig>,
    pub docs: Arc<DocumentStore>,
}

impl AppState {
    pub fn new(pool: PgPool, config: ServerConfig, docs: DocumentStore) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            docs: Arc::new(docs),
        }
    }
}
