use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{info, warn};

/// Create a PostgreSQL connection pool and run migrations.
/// Returns None if PostgreSQL is not configured (no `PG_USERNAME`).
pub async fn init_pg_pool(config: &alertgen_core::config::PostgresConfig) -> anyhow::Result<Option<PgPool>> {
    if !config.is_configured() {
        warn!("PostgreSQL not configured, persisted rules are kept in memory only");
        return Ok(None);
    }

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.connection_string())
        .await
        .with_context(|| format!("failed to connect to PostgreSQL at {}", config.host))?;
    info!("PostgreSQL connected: {}", config.host);

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .context("failed to run database migrations")?;
    info!("Database migrations applied successfully");

    Ok(Some(pool))
}
