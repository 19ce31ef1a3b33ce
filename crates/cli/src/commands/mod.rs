//! CLI command implementations.

pub mod migrate;
pub mod products;
pub mod seed;

use nightbox_storefront::config::{ConfigError, StorefrontConfig};
use nightbox_storefront::db::{self, RepositoryError};
use sqlx::SqlitePool;
use thiserror::Error;

/// Errors shared by all commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Environment could not be turned into a configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Repository operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Connect to the storefront database configured in the environment.
async fn connect() -> Result<SqlitePool, CommandError> {
    let config = StorefrontConfig::from_env()?;

    tracing::info!("Connecting to storefront database...");
    Ok(db::create_pool(&config.database_url).await?)
}
