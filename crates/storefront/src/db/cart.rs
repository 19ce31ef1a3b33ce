//! Cart repository.
//!
//! Every query is scoped by the owning user. Adding is a single upsert
//! against the `UNIQUE (user_id, product_id)` constraint, so a user never
//! has two rows for the same product.

use sqlx::SqlitePool;
use tracing::instrument;

use nightbox_core::{CartItemId, Price, ProductId, Quantity, UserId};

use super::RepositoryError;
use crate::models::{CartItem, CartLine, Product};

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a SqlitePool,
}

/// Internal row type for the `cart_items` table.
#[derive(sqlx::FromRow)]
struct CartItemRow {
    id: i64,
    user_id: i64,
    product_id: i64,
    quantity: i64,
}

impl TryFrom<CartItemRow> for CartItem {
    type Error = RepositoryError;

    fn try_from(row: CartItemRow) -> Result<Self, Self::Error> {
        let quantity = Quantity::new(row.quantity).map_err(|e| {
            RepositoryError::DataCorruption(format!("cart item {}: {e}", row.id))
        })?;

        Ok(Self {
            id: CartItemId::new(row.id),
            user_id: UserId::new(row.user_id),
            product_id: ProductId::new(row.product_id),
            quantity,
        })
    }
}

/// Internal row type for the cart/product join.
#[derive(sqlx::FromRow)]
struct CartLineRow {
    id: i64,
    user_id: i64,
    product_id: i64,
    quantity: i64,
    product_name: String,
    product_description: String,
    product_price: String,
}

impl TryFrom<CartLineRow> for CartLine {
    type Error = RepositoryError;

    fn try_from(row: CartLineRow) -> Result<Self, Self::Error> {
        let price = Price::parse(&row.product_price).map_err(|e| {
            RepositoryError::DataCorruption(format!("product {}: {e}", row.product_id))
        })?;

        let product = Product {
            id: ProductId::new(row.product_id),
            name: row.product_name,
            description: row.product_description,
            price,
        };
        let item = CartItem::try_from(CartItemRow {
            id: row.id,
            user_id: row.user_id,
            product_id: row.product_id,
            quantity: row.quantity,
        })?;

        Ok(Self { item, product })
    }
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Find the cart item for a (user, product) pair.
    #[cfg(test)]
    pub(crate) async fn find(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<Option<CartItem>, RepositoryError> {
        let row = sqlx::query_as::<_, CartItemRow>(
            r"
            SELECT id, user_id, product_id, quantity
            FROM cart_items
            WHERE user_id = ?1 AND product_id = ?2
            ",
        )
        .bind(user_id)
        .bind(product_id)
        .fetch_optional(self.pool)
        .await?;

        row.map(CartItem::try_from).transpose()
    }

    /// Add one unit of a product: create the row with quantity 1, or
    /// increment the existing row.
    ///
    /// The product must exist; a dangling `product_id` fails the foreign key.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    #[instrument(skip(self))]
    pub async fn add_or_increment(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<CartItem, RepositoryError> {
        let row = sqlx::query_as::<_, CartItemRow>(
            r"
            INSERT INTO cart_items (user_id, product_id, quantity)
            VALUES (?1, ?2, 1)
            ON CONFLICT (user_id, product_id)
            DO UPDATE SET quantity = quantity + 1
            RETURNING id, user_id, product_id, quantity
            ",
        )
        .bind(user_id)
        .bind(product_id)
        .fetch_one(self.pool)
        .await?;

        CartItem::try_from(row)
    }

    /// All of a user's cart items joined with their products, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if a row holds invalid data.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_lines(&self, user_id: UserId) -> Result<Vec<CartLine>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartLineRow>(
            r"
            SELECT c.id, c.user_id, c.product_id, c.quantity,
                   p.name AS product_name,
                   p.description AS product_description,
                   p.price AS product_price
            FROM cart_items c
            JOIN products p ON p.id = c.product_id
            WHERE c.user_id = ?1
            ORDER BY c.id
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(CartLine::try_from).collect()
    }

    /// Delete a cart item if, and only if, it belongs to `user_id`.
    ///
    /// # Returns
    ///
    /// Returns `true` if the item was deleted, `false` if no such item is
    /// owned by the user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    #[instrument(skip(self))]
    pub async fn delete_owned(
        &self,
        item_id: CartItemId,
        user_id: UserId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM cart_items
            WHERE id = ?1 AND user_id = ?2
            ",
        )
        .bind(item_id)
        .bind(user_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::{UserRepository, test_support};

    async fn user(pool: &SqlitePool, email: &str) -> UserId {
        UserRepository::new(pool)
            .create(email, "Shopper", "hash")
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_add_creates_then_increments_single_row() {
        let pool = test_support::pool().await;
        let uid = user(&pool, "a@example.com").await;
        let cart = CartRepository::new(&pool);
        let pizza = ProductId::new(1);

        let first = cart.add_or_increment(uid, pizza).await.unwrap();
        assert_eq!(first.quantity, Quantity::ONE);

        let mut last = first.clone();
        for _ in 0..4 {
            last = cart.add_or_increment(uid, pizza).await.unwrap();
        }

        assert_eq!(last.id, first.id);
        assert_eq!(last.quantity.get(), 5);
        assert_eq!(cart.list_lines(uid).await.unwrap().len(), 1);
        assert_eq!(cart.find(uid, pizza).await.unwrap(), Some(last));
    }

    #[tokio::test]
    async fn test_lines_are_scoped_to_user() {
        let pool = test_support::pool().await;
        let alice = user(&pool, "alice@example.com").await;
        let bob = user(&pool, "bob@example.com").await;
        let cart = CartRepository::new(&pool);

        cart.add_or_increment(alice, ProductId::new(1)).await.unwrap();
        cart.add_or_increment(bob, ProductId::new(2)).await.unwrap();

        let lines = cart.list_lines(alice).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].product.name, "Pizza Margherita");
    }

    #[tokio::test]
    async fn test_delete_owned_refuses_foreign_item() {
        let pool = test_support::pool().await;
        let alice = user(&pool, "alice@example.com").await;
        let mallory = user(&pool, "mallory@example.com").await;
        let cart = CartRepository::new(&pool);

        let item = cart.add_or_increment(alice, ProductId::new(3)).await.unwrap();

        assert!(!cart.delete_owned(item.id, mallory).await.unwrap());
        assert!(cart.find(alice, ProductId::new(3)).await.unwrap().is_some());

        assert!(cart.delete_owned(item.id, alice).await.unwrap());
        assert!(cart.find(alice, ProductId::new(3)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_product_violates_foreign_key() {
        let pool = test_support::pool().await;
        let uid = user(&pool, "fk@example.com").await;

        let result = CartRepository::new(&pool)
            .add_or_increment(uid, ProductId::new(404))
            .await;

        assert!(matches!(result, Err(RepositoryError::Database(_))));
    }
}
