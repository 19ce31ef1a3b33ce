//! User domain types.

use nightbox_core::UserId;

/// A registered shopper.
///
/// The password hash is deliberately absent; it only leaves the database
/// through [`crate::db::UserRepository::get_password_hash`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Email address, unique across users.
    pub email: String,
    /// Display name.
    pub name: String,
}
