//! Database pool construction and schema migrations.

use log::info;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::Config;

/// Opens the process-wide connection pool.
pub async fn connect(config: &Config) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await?;
    info!(
        "Connected to database (max {} connections)",
        config.db_max_connections
    );
    Ok(pool)
}

/// Applies the migrations embedded from `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}
