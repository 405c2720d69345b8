//! Persistence layer: sqlx/Postgres row models and repositories, plus
//! pool and migration helpers for embedding applications.

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Database configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Postgres connection string.
    pub database_url: String,
    /// Maximum pool size (default: `20`).
    pub max_connections: u32,
}

impl DbConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var               | Default      |
    /// |-----------------------|--------------|
    /// | `DATABASE_URL`        | *(required)* |
    /// | `DB_MAX_CONNECTIONS`  | `20`         |
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set".to_string())?;

        let max_connections: u32 = std::env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "20".into())
            .parse()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid u32".to_string())?;

        Ok(Self {
            database_url,
            max_connections,
        })
    }
}

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Create a connection pool from a [`DbConfig`].
pub async fn create_pool_with_config(config: &DbConfig) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
}

/// Verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply any pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await?;
    tracing::info!("Database migrations applied");
    Ok(())
}
