//! Session-related types.

/// Session keys for authentication data.
///
/// The session stores the user's ID only; the full [`super::User`] is loaded
/// fresh on every request by the identity middleware.
pub mod keys {
    /// Key for the logged-in user's [`nightbox_core::UserId`].
    pub const USER_ID: &str = "user_id";
}
