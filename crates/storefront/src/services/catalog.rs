//! Catalog service: read-only product listings.

use sqlx::SqlitePool;

use crate::db::{ProductRepository, RepositoryError};
use crate::models::Product;

/// How many products the landing page shows.
pub const FEATURED_COUNT: u32 = 3;

/// Read-only access to the product catalog.
pub struct CatalogService<'a> {
    products: ProductRepository<'a>,
}

impl<'a> CatalogService<'a> {
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            products: ProductRepository::new(pool),
        }
    }

    /// Up to [`FEATURED_COUNT`] products for the landing page.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the catalog cannot be read.
    pub async fn list_featured(&self) -> Result<Vec<Product>, RepositoryError> {
        self.products.list(Some(FEATURED_COUNT)).await
    }

    /// Every product, for the catalog page.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the catalog cannot be read.
    pub async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        self.products.list(None).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_support;

    #[tokio::test]
    async fn test_featured_is_a_prefix_of_all() {
        let pool = test_support::pool().await;
        let catalog = CatalogService::new(&pool);

        let featured = catalog.list_featured().await.unwrap();
        let all = catalog.list_all().await.unwrap();

        assert_eq!(featured.len(), 3);
        assert_eq!(all.len(), 4);
        assert_eq!(featured.as_slice(), &all[..3]);
    }
}
