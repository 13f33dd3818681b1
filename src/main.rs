use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use keystone_api::{
    auth::SessionKeys,
    cli::{Cli, Commands},
    config::AppConfig,
    database::{DatabaseManager, PgStore},
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so local runs pick up DATABASE_URL, SESSION_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,keystone_api=debug")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env().context("failed to load configuration")?;
    tracing::info!("Starting Keystone API in {:?} mode", config.environment);

    let database = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to the database")?;

    match cli.command() {
        Commands::Migrate => {
            database.migrate().await.context("migration failed")?;
            database.close().await;
            Ok(())
        }
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.api.port = port;
            }
            if config.database.run_migrations {
                database.migrate().await.context("migration failed")?;
            }
            let result = serve(config, &database).await;
            database.close().await;
            result
        }
    }
}

async fn serve(config: AppConfig, database: &DatabaseManager) -> anyhow::Result<()> {
    let sessions = SessionKeys::new(&config.security.session_secret, config.security.session_expiry_hours)
        .context("invalid session configuration")?;
    let port = config.api.port;
    let state = AppState::new(Arc::new(PgStore::new(database)), config, sessions);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Keystone API listening on http://{}", bind_addr);

    axum::serve(listener, keystone_api::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
