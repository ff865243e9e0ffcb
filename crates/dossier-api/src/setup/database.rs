//! Document store setup

use anyhow::{Context, Result};
use dossier_core::Config;
use dossier_db::{DocumentStore, MemoryDocumentStore, PgDocumentStore};
use sqlx::postgres::PgPoolOptions;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Connect to Postgres and run migrations, or fall back to the in-memory
/// store when `DATABASE_URL` is unset.
pub async fn setup_store(config: &Config) -> Result<Arc<dyn DocumentStore>> {
    let Some(database_url) = config.database_url() else {
        tracing::warn!("DATABASE_URL not set - records are kept in memory and lost on restart");
        return Ok(Arc::new(MemoryDocumentStore::new()));
    };

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections())
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds()))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(database_url)
        .await?;

    tracing::info!(
        max_connections = config.db_max_connections(),
        "Database connected successfully"
    );

    // Path: workspace migrations/ from crate root
    let migrations_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../migrations");
    let migrator = sqlx::migrate::Migrator::new(migrations_dir)
        .await
        .context("Failed to load migrations")?;
    migrator
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    let store = PgDocumentStore::new(pool);
    store
        .spawn_listener()
        .await
        .context("Failed to start document change listener")?;

    Ok(Arc::new(store))
}
