use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use scheduler_api::app::{router, AppState};
use scheduler_api::auth::TokenService;
use scheduler_api::config::config;
use scheduler_api::database::{DatabaseManager, PgStore};
use scheduler_api::search::EntitySearcher;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config();
    config.validate().map_err(anyhow::Error::msg).context("invalid configuration")?;
    info!("Starting Project Scheduler API in {:?} mode", config.environment);
    info!("Database: {}", config.redacted_database_url());

    let pool = DatabaseManager::connect(&config.database)?;

    let startup = DatabaseManager::prepare(&pool, &config.database).await;
    info!("Database startup: {:?}", startup);

    let tokens = TokenService::from_config(&config.security)?;
    let state = AppState::new(
        Arc::new(PgStore::new(pool)),
        tokens,
        EntitySearcher::new(config.search.max_criteria),
    );
    let app = router(state, &config.security.cors_origins);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Project Scheduler API listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
