//! Authentication middleware, extractors and session helpers.
//!
//! The session holds only the user id. `identity_middleware` resolves it
//! against the users table once per request and stores the result as a
//! `CurrentIdentity` extension; a stale id (user deleted) reads as anonymous.
//! Handlers get at it through the `RequireAuth`/`OptionalAuth` extractors.

use axum::{
    extract::{FromRequestParts, OriginalUri, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::Span;

use nightbox_core::UserId;

use crate::db::UserRepository;
use crate::error::AppError;
use crate::models::{User, session_keys};
use crate::state::AppState;

/// Where a signed-in user lands when no usable `next` was supplied.
pub const DEFAULT_AFTER_LOGIN: &str = "/profile";

/// Identity resolved for the current request.
#[derive(Debug, Clone, Default)]
pub struct CurrentIdentity(pub Option<User>);

/// Middleware that resolves the session's user before any handler runs.
///
/// Must sit inside the session layer.
///
/// # Errors
///
/// Returns `AppError` if the session store or the users table cannot be read.
pub async fn identity_middleware(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = match session.get::<UserId>(session_keys::USER_ID).await? {
        Some(user_id) => {
            let user = UserRepository::new(state.pool()).get_by_id(user_id).await?;
            if user.is_none() {
                tracing::debug!(user_id = %user_id, "Session refers to a missing user");
            }
            user
        }
        None => None,
    };

    if let Some(user) = &user {
        Span::current().record("user_id", user.id.as_i64());
    }

    request.extensions_mut().insert(CurrentIdentity(user));
    Ok(next.run(request).await)
}

fn current_user(parts: &Parts) -> Option<User> {
    parts
        .extensions
        .get::<CurrentIdentity>()
        .and_then(|identity| identity.0.clone())
}

/// Extractor that requires an authenticated user.
///
/// Anonymous requests are redirected to `/login?next=<path>`.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
#[derive(Debug)]
pub struct RequireAuth(pub User);

/// Error returned when authentication is required but the user is not logged in.
#[derive(Debug)]
pub enum AuthRejection {
    /// Redirect to the login page, remembering the requested path.
    RedirectToLogin {
        /// Path the user originally asked for.
        next: String,
    },
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin { next } => Redirect::to(&login_url(&next)).into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        current_user(parts).map(Self).ok_or_else(|| {
            let next = parts
                .extensions
                .get::<OriginalUri>()
                .map_or_else(|| parts.uri.path(), |uri| uri.0.path())
                .to_owned();
            AuthRejection::RedirectToLogin { next }
        })
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this never rejects.
#[derive(Debug)]
pub struct OptionalAuth(pub Option<User>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(current_user(parts)))
    }
}

/// Bind the session to `user`.
///
/// The session id is rotated first so a pre-login id cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn sign_in(session: &Session, user: &User) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::USER_ID, user.id).await
}

/// End the session entirely (logout). Safe to call when nobody is signed in.
///
/// # Errors
///
/// Returns an error if the session store cannot be updated.
pub async fn sign_out(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

/// Login URL that sends the user back to `next` afterwards.
#[must_use]
pub fn login_url(next: &str) -> String {
    format!("/login?next={}", urlencoding::encode(next))
}

/// Accept `next` only if it points back into this site.
///
/// Anything that could leave the origin (`https://...`, `//host`, backslash
/// tricks) is dropped. Control characters are rejected too: browsers strip
/// tabs and newlines, turning `/\t/host` into `//host`, and they cannot be
/// put in a `Location` header anyway.
#[must_use]
pub fn local_redirect_target(next: Option<&str>) -> Option<&str> {
    next.filter(|n| {
        n.starts_with('/')
            && !n.starts_with("//")
            && !n.contains('\\')
            && !n.chars().any(char::is_control)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::{self, StatusCode, header};

    fn parts_for(path: &str, identity: Option<CurrentIdentity>) -> Parts {
        let (mut parts, ()) = http::Request::builder()
            .uri(path)
            .body(())
            .unwrap()
            .into_parts();
        if let Some(identity) = identity {
            parts.extensions.insert(identity);
        }
        parts
    }

    fn alice() -> User {
        User {
            id: UserId::new(1),
            email: "alice@example.com".to_string(),
            name: "Alice".to_string(),
        }
    }

    #[tokio::test]
    async fn test_require_auth_passes_signed_in_user() {
        let mut parts = parts_for("/profile", Some(CurrentIdentity(Some(alice()))));
        let RequireAuth(user) = RequireAuth::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(user, alice());
    }

    #[tokio::test]
    async fn test_require_auth_rejects_anonymous_with_path() {
        let mut parts = parts_for("/cart?x=1", Some(CurrentIdentity(None)));
        let rejection = RequireAuth::from_request_parts(&mut parts, &()).await;
        assert!(matches!(
            rejection,
            Err(AuthRejection::RedirectToLogin { ref next }) if next == "/cart"
        ));
    }

    #[tokio::test]
    async fn test_optional_auth_without_identity_is_anonymous() {
        let mut parts = parts_for("/", None);
        let OptionalAuth(user) = OptionalAuth::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(user.is_none());
    }

    #[test]
    fn test_login_url_encodes_next() {
        assert_eq!(login_url("/cart"), "/login?next=%2Fcart");
        assert_eq!(login_url("/cart/add/2"), "/login?next=%2Fcart%2Fadd%2F2");
    }

    #[test]
    fn test_local_redirect_target() {
        assert_eq!(local_redirect_target(Some("/cart")), Some("/cart"));
        assert_eq!(local_redirect_target(Some("/")), Some("/"));
        assert_eq!(local_redirect_target(Some("https://evil.example")), None);
        assert_eq!(local_redirect_target(Some("//evil.example")), None);
        assert_eq!(local_redirect_target(Some("/\t/evil.example")), None);
        assert_eq!(local_redirect_target(Some("/\n/evil.example")), None);
        assert_eq!(local_redirect_target(Some("/a\nb")), None);
        assert_eq!(local_redirect_target(Some("/\\evil.example")), None);
        assert_eq!(local_redirect_target(Some("")), None);
        assert_eq!(local_redirect_target(None), None);
    }

    #[test]
    fn test_rejection_redirects_to_login() {
        let response = AuthRejection::RedirectToLogin {
            next: "/profile".to_string(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response
                .headers()
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok()),
            Some("/login?next=%2Fprofile")
        );
    }
}
