//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Registration and password login
//! - `catalog` - Product listings for the landing and catalog pages
//! - `cart` - Per-user cart: view, add-or-increment, remove
//!
//! Services borrow the pool and wrap the repositories in [`crate::db`];
//! handlers construct them per request.

pub mod auth;
pub mod cart;
pub mod catalog;

pub use auth::{AuthError, AuthService};
pub use cart::{CartError, CartService};
pub use catalog::CatalogService;
