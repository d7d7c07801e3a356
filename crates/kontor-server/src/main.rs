use anyhow::{Context, Result};
use kontor_db::{create_pool, run_migrations, AccountRepo, NewAccount};
use kontor_server::auth::hash_password;
use kontor_server::config::load_config;
use kontor_server::state::AppState;
use kontor_server::uploads::DocumentStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting kontor server");

    // Load configuration
    let config_path =
        std::env::var("KONTOR_CONFIG").unwrap_or_else(|_| "server-config.yaml".to_string());

    tracing::info!("Loading config from: {}", config_path);
    let config = load_config(&config_path)?;

    // Create database pool
    tracing::info!("Connecting to database...");
    let pool = create_pool(&config.db.url)
        .await
        .context("Failed to create database pool")?;

    // Run migrations
    tracing::info!("Running database migrations...");
    run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    // Seed initial admin if configured
    if let Some(initial_admin) = &config.auth.initial_admin {
        match AccountRepo::get_by_email(&pool, &initial_admin.email).await {
            Ok(Some(_)) => {
                tracing::info!(
                    "Initial admin '{}' already exists, skipping seed",
                    initial_admin.email
                );
            }
            Ok(None) => {
                let password_hash = hash_password(&initial_admin.password)
                    .context("Failed to hash initial admin password")?;
                AccountRepo::create(
                    &pool,
                    NewAccount {
                        name: None,
                        email: &initial_admin.email,
                        password_hash: &password_hash,
                        role: "admin",
                        email_verified: true,
                    },
                )
                .await
                .context("Failed to create initial admin")?;
                tracing::info!("Created initial admin: {}", initial_admin.email);
            }
            Err(e) => {
                tracing::warn!("Failed to check for initial admin: {}", e);
            }
        }
    }

    let docs = DocumentStore::new(&config.uploads.root_dir);
    let listen = config.listen.clone();

    // Build application state and router
    let state = AppState::new(pool.clone(), config, docs);
    let app = kontor_server::web::build_router(state);

    // Start server with graceful shutdown
    let listener = tokio::net::TcpListener::bind(&listen)
        .await
        .with_context(|| format!("Failed to bind to {}", listen))?;

    tracing::info!("Server listening on {}", listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    pool.close().await;
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, stopping...");
}
