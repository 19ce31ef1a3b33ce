//! Integration tests for the NightBox storefront.
//!
//! Each test builds its own [`TestContext`]: a fresh in-memory database
//! (migrated and seeded), the full application router served on an
//! ephemeral port, and an HTTP client that keeps cookies but does not
//! follow redirects, so tests can assert on `Location` headers.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p nightbox-integration-tests
//! ```

use std::net::SocketAddr;

use nightbox_storefront::config::StorefrontConfig;
use nightbox_storefront::state::AppState;
use nightbox_storefront::{db, middleware};
use reqwest::{Client, Response, redirect};
use secrecy::SecretString;
use sqlx::SqlitePool;

/// A running storefront plus a cookie-keeping client.
pub struct TestContext {
    pub client: Client,
    pub addr: SocketAddr,
    pub pool: SqlitePool,
}

impl TestContext {
    /// Start the storefront on `127.0.0.1:0` backed by an in-memory database.
    ///
    /// # Panics
    ///
    /// Panics if the database or the listener cannot be set up.
    pub async fn new() -> Self {
        let config = StorefrontConfig::new(SecretString::from("sqlite::memory:"));

        let pool = db::create_pool(&config.database_url)
            .await
            .expect("Failed to create test database");
        db::init(&pool).await.expect("Failed to initialize test database");
        let session_store = middleware::create_session_store(&pool)
            .await
            .expect("Failed to create session store");

        let app = nightbox_storefront::app(AppState::new(config, pool.clone()), session_store);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server failed");
        });

        Self {
            client: new_client(),
            addr,
            pool,
        }
    }

    /// Absolute URL for `path` on the test server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// A second browser: separate cookie jar, same server.
    #[must_use]
    pub fn another_client(&self) -> Client {
        new_client()
    }

    /// GET `path` with the default client.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// POST an empty form to `path` with the default client.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn post(&self, path: &str) -> Response {
        post_form(&self.client, &self.url(path), &[]).await
    }

    /// Register through the HTTP form with the default client.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn register(&self, email: &str, name: &str, password: &str) -> Response {
        self.register_with(&self.client, email, name, password, password)
            .await
    }

    /// Register through the HTTP form with an explicit client and confirmation.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn register_with(
        &self,
        client: &Client,
        email: &str,
        name: &str,
        password: &str,
        confirm: &str,
    ) -> Response {
        post_form(
            client,
            &self.url("/register"),
            &[
                ("email", email),
                ("name", name),
                ("password", password),
                ("confirm", confirm),
            ],
        )
        .await
    }

    /// Log in through the HTTP form; `next` is passed as a query parameter.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn login(&self, email: &str, password: &str, next: Option<&str>) -> Response {
        let url = self.url("/login");
        let url = match next {
            Some(next) => reqwest::Url::parse_with_params(&url, &[("next", next)]),
            None => reqwest::Url::parse(&url),
        }
        .expect("Invalid login URL");

        self.client
            .post(url)
            .form(&[("email", email), ("password", password)])
            .send()
            .await
            .expect("Login request failed")
    }

    /// Number of registered users with `email`.
    ///
    /// # Panics
    ///
    /// Panics if the query fails.
    pub async fn count_users(&self, email: &str) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?1")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count users")
    }
}

/// `Location` header of a redirect response.
#[must_use]
pub fn location(response: &Response) -> Option<String> {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(String::from)
}

fn new_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

async fn post_form(client: &Client, url: &str, fields: &[(&str, &str)]) -> Response {
    client
        .post(url)
        .form(fields)
        .send()
        .await
        .expect("POST request failed")
}
