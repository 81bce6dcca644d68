//! CLI subcommands.

pub mod admin;
pub mod migrate;

use corner_store_api::config::{ConfigError, get_database_url};
use secrecy::ExposeSecret;
use sqlx::PgPool;

/// Environment variable holding the database URL (falls back to `DATABASE_URL`).
pub const DATABASE_URL_VAR: &str = "CORNER_STORE_DATABASE_URL";

/// Connect to the database named by the environment.
async fn connect() -> Result<PgPool, ConnectError> {
    dotenvy::dotenv().ok();

    let database_url = get_database_url(DATABASE_URL_VAR)?;

    tracing::info!("Connecting to database...");
    Ok(PgPool::connect(database_url.expose_secret()).await?)
}

/// Errors opening the database connection.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    /// Database URL not configured.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),
}
