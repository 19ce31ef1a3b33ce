//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during registration and login.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email, name or password left blank.
    #[error("fields required")]
    MissingFields,

    /// Password and confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// Email is already registered.
    #[error("a user with this email already exists")]
    UserAlreadyExists,

    /// Invalid credentials (wrong password or unknown email).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl AuthError {
    /// Whether this error is the user's to fix, shown inline on the form.
    ///
    /// Everything else is a server fault.
    #[must_use]
    pub const fn is_form_error(&self) -> bool {
        matches!(
            self,
            Self::MissingFields
                | Self::PasswordMismatch
                | Self::UserAlreadyExists
                | Self::InvalidCredentials
        )
    }
}
