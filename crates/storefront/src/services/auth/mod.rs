//! Authentication service.
//!
//! Provides email/password registration and login. Passwords are hashed with
//! Argon2id; only the PHC-format hash is stored.

mod error;

pub use error::AuthError;

use std::sync::LazyLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::SqlitePool;
use tracing::instrument;

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::User;

/// Hash verified against when the email is unknown, so a miss costs the same
/// Argon2 work as a wrong password.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("nightbox-unknown-account").ok());

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new user.
    ///
    /// Email and name are trimmed; the password is taken as typed. Checks run
    /// in order and the first failure wins: blank fields, then password
    /// confirmation, then email uniqueness.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingFields` if email, name or password is blank.
    /// Returns `AuthError::PasswordMismatch` if `confirm` differs from `password`.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    #[instrument(skip(self, password, confirm))]
    pub async fn register(
        &self,
        email: &str,
        name: &str,
        password: &str,
        confirm: &str,
    ) -> Result<User, AuthError> {
        let email = email.trim();
        let name = name.trim();

        if email.is_empty() || name.is_empty() || password.is_empty() {
            return Err(AuthError::MissingFields);
        }
        if password != confirm {
            return Err(AuthError::PasswordMismatch);
        }
        if self.users.get_by_email(email).await?.is_some() {
            return Err(AuthError::UserAlreadyExists);
        }

        let password_hash = hash_password(password)?;

        // The unique index still guards against a concurrent registration.
        let user = self
            .users
            .create(email, name, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email is unknown or the
    /// password is wrong; the two cases are indistinguishable to the caller.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let Some((user, password_hash)) = self.users.get_password_hash(email.trim()).await?
        else {
            if let Some(dummy) = DUMMY_HASH.as_deref() {
                let _ = verify_password(password, dummy);
            }
            return Err(AuthError::InvalidCredentials);
        };

        verify_password(password, &password_hash)?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(user)
    }
}

/// Hash a password using Argon2id with a random salt.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
