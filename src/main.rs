//! Blockfall Leaderboard Server
//!
//! HTTP entry point: initializes logging, creates the database schema if
//! absent, and serves the JSON API.

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use blockfall::api::{self, AppState, ServerConfig};
use blockfall::store::{schema, Database};
use blockfall::VERSION;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    let config = ServerConfig::from_env();

    info!("Blockfall Leaderboard Server v{}", VERSION);
    info!("Database: {}", config.db_path.display());

    // Schema init runs once before serving; safe to repeat across restarts.
    let db = Database::new(config.db_path.clone());
    let conn = db.connect().context("failed to open database")?;
    schema::init_schema(&conn).context("failed to initialize schema")?;
    drop(conn);

    let app = api::router(AppState { db });
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!("Listening on http://{}", config.bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
