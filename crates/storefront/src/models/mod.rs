//! Domain models for the storefront.
//!
//! These types represent validated domain objects, separate from the
//! database row types in [`crate::db`].

pub mod cart;
pub mod product;
pub mod session;
pub mod user;

pub use cart::{Cart, CartItem, CartLine};
pub use product::Product;
pub use session::keys as session_keys;
pub use user::User;
