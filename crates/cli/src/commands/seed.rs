//! Seed the product catalog.
//!
//! Runs migrations first, then inserts the starter products only if the
//! products table is empty, so the command is safe to repeat.

use nightbox_storefront::db::{self, ProductRepository};

use super::{CommandError, connect};

/// Seed the starter products.
///
/// # Errors
///
/// Returns an error if migrations or the insert fail.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;
    db::run_migrations(&pool).await?;

    let inserted = ProductRepository::new(&pool).seed_if_empty().await?;
    if inserted == 0 {
        tracing::info!("Products already present, nothing to seed");
    } else {
        tracing::info!(inserted, "Seeded products");
    }

    Ok(())
}
