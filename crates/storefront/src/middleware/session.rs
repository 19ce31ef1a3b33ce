//! Session middleware configuration.
//!
//! Sets up `SQLite`-backed sessions using tower-sessions. The cookie carries
//! only an opaque, signed session id; the user id lives server-side.

use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha512};
use sqlx::SqlitePool;
use tower_sessions::cookie::Key;
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "nightbox_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the `SQLite` session store and its table.
///
/// # Errors
///
/// Returns an error if the session table cannot be created.
pub async fn create_session_store(pool: &SqlitePool) -> Result<SqliteStore, sqlx::Error> {
    let store = SqliteStore::new(pool.clone());
    store.migrate().await?;
    Ok(store)
}

/// Create the session layer around an existing store.
///
/// # Arguments
///
/// * `store` - `SQLite` session store (already migrated)
/// * `config` - Storefront configuration (for session secret and HTTPS)
#[must_use]
pub fn create_session_layer(
    store: SqliteStore,
    config: &StorefrontConfig,
) -> SessionManagerLayer<SqliteStore, SignedCookie> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(signing_key(config.session_secret.as_ref()))
}

/// Derive the cookie signing key.
///
/// Without a configured secret a random key is used, so sessions do not
/// survive a restart.
fn signing_key(secret: Option<&SecretString>) -> Key {
    secret.map_or_else(
        || {
            tracing::warn!(
                "STOREFRONT_SESSION_SECRET not set, using an ephemeral signing key"
            );
            Key::generate()
        },
        |secret| Key::from(Sha512::digest(secret.expose_secret().as_bytes()).as_slice()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signing_key_is_stable_for_a_secret() {
        let secret = SecretString::from("k7#mP9$vL2@nQ4&wR6*xT8!yU0^zA3%bC5");
        let a = signing_key(Some(&secret));
        let b = signing_key(Some(&secret));
        assert_eq!(a.master(), b.master());
    }

    #[test]
    fn test_ephemeral_keys_differ() {
        assert_ne!(signing_key(None).master(), signing_key(None).master());
    }
}
