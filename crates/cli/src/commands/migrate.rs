//! Database migration command.
//!
//! Applies `crates/storefront/migrations/` (embedded in the storefront
//! crate) and creates the tower-sessions table.

use nightbox_storefront::{db, middleware};

use super::{CommandError, connect};

/// Run storefront database migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running storefront migrations...");
    db::run_migrations(&pool).await?;
    middleware::create_session_store(&pool).await?;

    tracing::info!("Storefront migrations complete!");
    Ok(())
}
