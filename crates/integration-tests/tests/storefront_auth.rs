//! Integration tests for registration, login, logout and protected routes.
//!
//! Run with: cargo test -p nightbox-integration-tests

use nightbox_integration_tests::{TestContext, location};
use reqwest::StatusCode;

const PASSWORD: &str = "correct horse battery";

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn test_register_signs_user_in() {
    let ctx = TestContext::new().await;

    let resp = ctx.register("alice@example.com", "Alice", PASSWORD).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp).as_deref(), Some("/profile"));

    let resp = ctx.get("/profile").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Alice"));
    assert!(body.contains("alice@example.com"));
}

#[tokio::test]
async fn test_register_duplicate_email_is_rejected() {
    let ctx = TestContext::new().await;
    ctx.register("dup@example.com", "First", PASSWORD).await;

    let other = ctx.another_client();
    let resp = ctx
        .register_with(&other, "dup@example.com", "Second", PASSWORD, PASSWORD)
        .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("a user with this email already exists"));
    assert_eq!(ctx.count_users("dup@example.com").await, 1);
}

#[tokio::test]
async fn test_register_validation_rerenders_form() {
    let ctx = TestContext::new().await;
    let client = ctx.another_client();

    let resp = ctx
        .register_with(&client, "bob@example.com", "", PASSWORD, PASSWORD)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("fields required"));
    assert!(body.contains("value=\"bob@example.com\""));

    let resp = ctx
        .register_with(&client, "bob@example.com", "Bob", PASSWORD, "different")
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("passwords do not match"));
    assert!(body.contains("value=\"Bob\""));

    assert_eq!(ctx.count_users("bob@example.com").await, 0);

    // Still anonymous
    let resp = client
        .get(ctx.url("/profile"))
        .send()
        .await
        .expect("Failed to get profile");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
}

// ============================================================================
// Login / Logout
// ============================================================================

#[tokio::test]
async fn test_login_failures_share_one_message() {
    let ctx = TestContext::new().await;
    ctx.register_with(
        &ctx.another_client(),
        "carol@example.com",
        "Carol",
        PASSWORD,
        PASSWORD,
    )
    .await;

    let wrong_password = ctx.login("carol@example.com", "nope", None).await;
    assert_eq!(wrong_password.status(), StatusCode::OK);
    let wrong_password = wrong_password.text().await.expect("Failed to read response");

    let unknown_email = ctx.login("nobody@example.com", PASSWORD, None).await;
    assert_eq!(unknown_email.status(), StatusCode::OK);
    let unknown_email = unknown_email.text().await.expect("Failed to read response");

    assert!(wrong_password.contains("invalid credentials"));
    assert!(unknown_email.contains("invalid credentials"));
    assert!(!wrong_password.contains("not found"));
    assert!(!unknown_email.contains("not found"));
}

#[tokio::test]
async fn test_login_defaults_to_profile() {
    let ctx = TestContext::new().await;
    ctx.register_with(
        &ctx.another_client(),
        "dave@example.com",
        "Dave",
        PASSWORD,
        PASSWORD,
    )
    .await;

    let resp = ctx.login("  dave@example.com ", PASSWORD, None).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp).as_deref(), Some("/profile"));

    let resp = ctx.get("/profile").await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_ignores_offsite_next() {
    let ctx = TestContext::new().await;
    ctx.register_with(
        &ctx.another_client(),
        "erin@example.com",
        "Erin",
        PASSWORD,
        PASSWORD,
    )
    .await;

    let resp = ctx
        .login("erin@example.com", PASSWORD, Some("https://evil.example"))
        .await;
    assert_eq!(location(&resp).as_deref(), Some("/profile"));

    let resp = ctx
        .login("erin@example.com", PASSWORD, Some("//evil.example"))
        .await;
    assert_eq!(location(&resp).as_deref(), Some("/profile"));

    // Browsers drop the tab, which would leave `//evil.example`
    let resp = ctx
        .login("erin@example.com", PASSWORD, Some("/\t/evil.example"))
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp).as_deref(), Some("/profile"));

    let resp = ctx.login("erin@example.com", PASSWORD, Some("/a\nb")).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp).as_deref(), Some("/profile"));
}

#[tokio::test]
async fn test_logout_clears_session() {
    let ctx = TestContext::new().await;
    ctx.register("frank@example.com", "Frank", PASSWORD).await;
    assert_eq!(ctx.get("/profile").await.status(), StatusCode::OK);

    let resp = ctx.get("/logout").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp).as_deref(), Some("/"));

    let resp = ctx.get("/profile").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    // Logging out again is harmless
    let resp = ctx.get("/logout").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp).as_deref(), Some("/"));
}

#[tokio::test]
async fn test_session_for_deleted_user_is_anonymous() {
    let ctx = TestContext::new().await;
    ctx.register("olga@example.com", "Olga", PASSWORD).await;
    assert_eq!(ctx.get("/profile").await.status(), StatusCode::OK);

    sqlx::query("DELETE FROM users WHERE email = ?1")
        .bind("olga@example.com")
        .execute(&ctx.pool)
        .await
        .expect("Failed to delete user");

    let resp = ctx.get("/profile").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp).as_deref(), Some("/login?next=%2Fprofile"));

    let resp = ctx.get("/").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("href=\"/login\""));
    assert!(!body.contains("Olga"));
}

// ============================================================================
// Protected routes
// ============================================================================

#[tokio::test]
async fn test_protected_routes_redirect_with_next() {
    let ctx = TestContext::new().await;

    let resp = ctx.get("/cart").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp).as_deref(), Some("/login?next=%2Fcart"));

    let resp = ctx.get("/profile").await;
    assert_eq!(location(&resp).as_deref(), Some("/login?next=%2Fprofile"));

    let resp = ctx.post("/cart/add/1").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&resp).as_deref(),
        Some("/login?next=%2Fcart%2Fadd%2F1")
    );
}

#[tokio::test]
async fn test_login_forwards_to_next() {
    let ctx = TestContext::new().await;
    ctx.register_with(
        &ctx.another_client(),
        "grace@example.com",
        "Grace",
        PASSWORD,
        PASSWORD,
    )
    .await;

    let resp = ctx.get("/cart").await;
    assert_eq!(location(&resp).as_deref(), Some("/login?next=%2Fcart"));

    let resp = ctx.login("grace@example.com", PASSWORD, Some("/cart")).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp).as_deref(), Some("/cart"));

    assert_eq!(ctx.get("/cart").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_page_keeps_next_in_form_action() {
    let ctx = TestContext::new().await;

    let resp = ctx.get("/login?next=%2Fcart").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("action=\"/login?next=%2Fcart\""));
}
