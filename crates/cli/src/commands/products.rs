//! Product inspection commands.

use nightbox_storefront::db::ProductRepository;

use super::{CommandError, connect};

/// Log every product with its id and price.
///
/// # Errors
///
/// Returns an error if the products cannot be read.
pub async fn list() -> Result<(), CommandError> {
    let pool = connect().await?;
    let products = ProductRepository::new(&pool).list(None).await?;

    if products.is_empty() {
        tracing::warn!("No products found. Run `nightbox-cli seed` first.");
        return Ok(());
    }

    for product in products {
        tracing::info!(
            id = %product.id,
            price = %product.price,
            "{}",
            product.name
        );
    }

    Ok(())
}
