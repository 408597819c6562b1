use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use students_api::config::{AppConfig, Environment};
use students_api::database::{DatabaseManager, PgStudentStore};
use students_api::{router, AppState};

#[derive(Parser)]
#[command(name = "students-api")]
#[command(about = "Student records API with bearer-token auth and JSON/XML responses")]
#[command(version)]
struct Args {
    #[arg(long, help = "Configuration profile: development, staging or production")]
    env: Option<Environment>,

    #[arg(long, help = "Address to bind (overrides HOST)")]
    host: Option<String>,

    #[arg(long, help = "Port to bind (overrides PORT)")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("students_api=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match args.env {
        Some(environment) => AppConfig::for_environment(environment).with_env_overrides()?,
        None => AppConfig::from_env()?,
    };
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.validate().context("invalid configuration")?;

    tracing::info!("Starting Students API in {:?} mode", config.environment);

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    DatabaseManager::health_check(&pool)
        .await
        .context("database did not answer the startup ping")?;

    let bind_addr = config.bind_addr();
    let state = AppState::new(Arc::new(PgStudentStore::new(pool.clone())), config);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Students API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    pool.close().await;
    tracing::info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
