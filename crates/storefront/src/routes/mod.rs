//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Home page (first few products)
//! GET  /catalog                 - Full menu
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (database)
//!
//! # Auth
//! GET  /register                - Registration page
//! POST /register                - Registration action
//! GET  /login                   - Login page (honors ?next=)
//! POST /login                   - Login action
//! GET  /logout                  - Logout
//!
//! # Account (requires auth)
//! GET  /profile                 - Profile page
//!
//! # Cart (requires auth)
//! GET  /cart                    - Cart page
//! POST /cart/add/{product_id}   - Add one unit, redirect to /cart
//! POST /cart/remove/{item_id}   - Remove a line, redirect to /cart
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod health;
pub mod home;

use axum::{
    Router,
    body::Body,
    http::Request,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::middleware::{create_session_layer, identity_middleware, request_id_middleware};
use crate::models::User;
use crate::state::AppState;

/// User display data for templates.
#[derive(Clone)]
pub struct UserView {
    pub name: String,
    pub email: String,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add/{product_id}", post(cart::add))
        .route("/remove/{item_id}", post(cart::remove))
}

/// Create all page routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/catalog", get(home::catalog))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/profile", get(account::profile))
        .nest("/cart", cart_routes())
}

/// Build the complete application.
///
/// Static files and health checks sit outside the session layer, so they
/// never touch the session store.
pub fn app(state: AppState, session_store: SqliteStore) -> Router {
    let session_layer = create_session_layer(session_store, state.config());
    let static_dir = state.config().static_dir.clone();

    Router::new()
        .merge(routes())
        .layer(from_fn_with_state(state.clone(), identity_middleware))
        .layer(session_layer)
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                    user_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}
