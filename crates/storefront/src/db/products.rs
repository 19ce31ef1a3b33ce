//! Product repository: catalog reads and the one-time seed.

use sqlx::SqlitePool;
use tracing::instrument;

use nightbox_core::{Price, ProductId};

use super::RepositoryError;
use crate::models::Product;

/// The catalog a fresh database starts with: (name, description, price).
pub const SEED_PRODUCTS: [(&str, &str, &str); 4] = [
    (
        "Pizza Margherita",
        "Classic pizza with tomatoes and cheese.",
        "499.00",
    ),
    (
        "NightBox Burger",
        "Juicy beef burger with house sauce.",
        "389.00",
    ),
    ("Roll Set", "A set of 24 rolls for the whole company.", "899.00"),
    ("Homemade Lemonade", "Refreshing lemonade, 1 l.", "199.00"),
];

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

/// Internal row type for the `products` table.
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    description: String,
    price: String,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let price = Price::parse(&row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("product {}: {e}", row.id))
        })?;

        Ok(Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            price,
        })
    }
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this ID.
    /// Returns `RepositoryError::DataCorruption` if the stored price is invalid.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, description, price
            FROM products
            WHERE id = ?1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Product::try_from(row)
    }

    /// List products in ID order, optionally capped at `limit` rows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if a stored price is invalid.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, limit: Option<u32>) -> Result<Vec<Product>, RepositoryError> {
        // SQLite treats a negative LIMIT as "no limit".
        let limit = limit.map_or(-1, i64::from);

        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, description, price
            FROM products
            ORDER BY id
            LIMIT ?1
            ",
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Count products in the catalog.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Insert [`SEED_PRODUCTS`] if the catalog is empty.
    ///
    /// Runs in one transaction so repeated or concurrent startups never
    /// duplicate the seed. Returns the number of rows inserted (0 or 4).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails.
    #[instrument(skip(self))]
    pub async fn seed_if_empty(&self) -> Result<u64, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let (existing,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(&mut *tx)
            .await?;
        if existing > 0 {
            tracing::debug!(existing, "Catalog already seeded");
            return Ok(0);
        }

        let mut inserted = 0u64;
        for (name, description, price) in SEED_PRODUCTS {
            let result = sqlx::query(
                r"
                INSERT INTO products (name, description, price)
                VALUES (?1, ?2, ?3)
                ",
            )
            .bind(name)
            .bind(description)
            .bind(price)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_support;

    #[tokio::test]
    async fn test_seed_prices() {
        let pool = test_support::pool().await;
        let products = ProductRepository::new(&pool).list(None).await.unwrap();

        let prices: Vec<String> = products
            .iter()
            .map(|p| p.price.to_storage_string())
            .collect();
        assert_eq!(prices, ["499.00", "389.00", "899.00", "199.00"]);
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let pool = test_support::pool().await;
        let repo = ProductRepository::new(&pool);

        // test_support already seeded once
        assert_eq!(repo.seed_if_empty().await.unwrap(), 0);
        assert_eq!(repo.seed_if_empty().await.unwrap(), 0);
        assert_eq!(repo.count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_list_respects_limit() {
        let pool = test_support::pool().await;
        let repo = ProductRepository::new(&pool);

        let featured = repo.list(Some(3)).await.unwrap();
        assert_eq!(featured.len(), 3);
        assert_eq!(featured[0].name, "Pizza Margherita");
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let pool = test_support::pool().await;
        let err = ProductRepository::new(&pool)
            .get(ProductId::new(42))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_corrupt_price_is_reported() {
        let pool = test_support::pool().await;
        sqlx::query("UPDATE products SET price = 'free' WHERE id = 1")
            .execute(&pool)
            .await
            .unwrap();

        let err = ProductRepository::new(&pool)
            .get(ProductId::new(1))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::DataCorruption(_)));
    }
}
