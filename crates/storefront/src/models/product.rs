//! Catalog product.

use nightbox_core::{Price, ProductId};

/// A product in the catalog. Read-only once seeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
}
