//! Database operations for the storefront `SQLite` store.
//!
//! ## Tables
//!
//! - `users` - Registered shoppers (email, display name, Argon2 hash)
//! - `products` - Catalog, seeded once on first start
//! - `cart_items` - One row per (user, product) pair
//! - `tower_sessions` - Session records, owned by the session store
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/`, embedded into the
//! binary, and applied by [`init`] on startup or explicitly via:
//! ```bash
//! cargo run -p nightbox-cli -- migrate
//! ```

pub mod cart;
pub mod products;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

pub use cart::CartRepository;
pub use products::ProductRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map unique-constraint violations to `Conflict`, everything else to `Database`.
    pub(crate) fn from_insert(err: sqlx::Error, what: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.is_unique_violation()
        {
            return Self::Conflict(format!("{what} already exists"));
        }
        Self::Database(err)
    }
}

/// Create a `SQLite` connection pool.
///
/// The database file is created if missing and foreign keys are enforced.
/// In-memory databases live only as long as their connection, so they are
/// pinned to a single connection that is never recycled.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the connection cannot be established.
pub async fn create_pool(database_url: &SecretString) -> Result<SqlitePool, sqlx::Error> {
    let url = database_url.expose_secret();
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let in_memory = url.contains(":memory:") || url.contains("mode=memory");
    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
    } else {
        SqlitePoolOptions::new().max_connections(10)
    };

    pool_options
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Apply the embedded schema migrations.
///
/// # Errors
///
/// Returns `sqlx::migrate::MigrateError` if a migration fails to apply.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Prepare a database for serving: migrate the schema, then seed the catalog
/// if it is empty. Safe to call on every startup.
///
/// # Errors
///
/// Returns `RepositoryError` if migrating or seeding fails.
pub async fn init(pool: &SqlitePool) -> Result<(), RepositoryError> {
    run_migrations(pool)
        .await
        .map_err(|e| RepositoryError::Database(e.into()))?;

    let inserted = ProductRepository::new(pool).seed_if_empty().await?;
    if inserted > 0 {
        tracing::info!(inserted, "Seeded product catalog");
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use secrecy::SecretString;
    use sqlx::SqlitePool;

    /// Fresh, migrated and seeded in-memory database.
    #[allow(clippy::unwrap_used)]
    pub async fn pool() -> SqlitePool {
        let pool = super::create_pool(&SecretString::from("sqlite::memory:"))
            .await
            .unwrap();
        super::init(&pool).await.unwrap();
        pool
    }
}
