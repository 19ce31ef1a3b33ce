//! Cart service.
//!
//! A cart item moves through exactly these states:
//!
//! ```text
//! absent --add--> quantity 1 --add--> quantity N+1 --remove--> absent
//! ```
//!
//! There is no decrement and no direct quantity edit.

use sqlx::SqlitePool;
use thiserror::Error;
use tracing::instrument;

use nightbox_core::{CartItemId, ProductId, UserId};

use crate::db::{CartRepository, ProductRepository, RepositoryError};
use crate::models::{Cart, CartItem};

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The product to add does not exist.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// No cart item with this ID belongs to the user.
    #[error("cart item {0} not found")]
    ItemNotFound(CartItemId),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Per-user cart operations.
pub struct CartService<'a> {
    cart: CartRepository<'a>,
    products: ProductRepository<'a>,
}

impl<'a> CartService<'a> {
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            cart: CartRepository::new(pool),
            products: ProductRepository::new(pool),
        }
    }

    /// The user's cart lines with their total.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the cart cannot be read.
    pub async fn view(&self, user_id: UserId) -> Result<Cart, CartError> {
        let lines = self.cart.list_lines(user_id).await?;
        Ok(Cart::from_lines(lines))
    }

    /// Add one unit of a product to the user's cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ProductNotFound` if the product does not exist.
    /// Returns `CartError::Repository` if the cart cannot be written.
    #[instrument(skip(self))]
    pub async fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<CartItem, CartError> {
        let product = self.products.get(product_id).await.map_err(|e| match e {
            RepositoryError::NotFound => CartError::ProductNotFound(product_id),
            other => CartError::Repository(other),
        })?;

        let item = self.cart.add_or_increment(user_id, product.id).await?;
        tracing::debug!(item_id = %item.id, quantity = %item.quantity, "Cart item added");
        Ok(item)
    }

    /// Remove a cart item owned by the user, whatever its quantity.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ItemNotFound` if the item does not exist or belongs
    /// to someone else; the row is never touched in that case.
    #[instrument(skip(self))]
    pub async fn remove_item(&self, user_id: UserId, item_id: CartItemId) -> Result<(), CartError> {
        if self.cart.delete_owned(item_id, user_id).await? {
            Ok(())
        } else {
            Err(CartError::ItemNotFound(item_id))
        }
    }
}
