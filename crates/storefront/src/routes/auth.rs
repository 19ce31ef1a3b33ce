//! Authentication route handlers.
//!
//! Handles registration, login and logout against the local users table.
//! Form failures re-render the form with an inline message (HTTP 200) and
//! the previously typed email/name.

use std::fmt;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::middleware::auth::{DEFAULT_AFTER_LOGIN, local_redirect_target, sign_in, sign_out};
use crate::models::User;
use crate::routes::UserView;
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Registration form data.
///
/// Missing fields deserialize as empty strings so they surface as
/// "fields required" rather than a 422.
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub email: String,
    pub name: String,
    pub password: String,
    pub confirm: String,
}

impl fmt::Debug for RegisterForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterForm")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("password", &"[REDACTED]")
            .field("confirm", &"[REDACTED]")
            .finish()
    }
}

/// Login form data.
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters carrying the post-login destination.
#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

impl NextQuery {
    /// Form action for the login page, keeping a local `next` across the POST.
    fn login_action(&self) -> String {
        local_redirect_target(self.next.as_deref()).map_or_else(
            || "/login".to_string(),
            crate::middleware::auth::login_url,
        )
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub current_user: Option<UserView>,
    pub error: Option<String>,
    pub email: String,
    pub action: String,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub current_user: Option<UserView>,
    pub error: Option<String>,
    pub email: String,
    pub name: String,
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(OptionalAuth(user): OptionalAuth) -> RegisterTemplate {
    RegisterTemplate {
        current_user: user.as_ref().map(UserView::from),
        error: None,
        email: String::new(),
        name: String::new(),
    }
}

/// Handle registration form submission.
///
/// On success the new user is signed in and sent to the profile page.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(current): OptionalAuth,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    let result = AuthService::new(state.pool())
        .register(&form.email, &form.name, &form.password, &form.confirm)
        .await;

    match result {
        Ok(user) => {
            establish(&session, &user).await?;
            Ok(Redirect::to(DEFAULT_AFTER_LOGIN).into_response())
        }
        Err(err) if err.is_form_error() => {
            tracing::debug!(error = %err, "Registration rejected");
            Ok(RegisterTemplate {
                current_user: current.as_ref().map(UserView::from),
                error: Some(err.to_string()),
                email: form.email.trim().to_string(),
                name: form.name.trim().to_string(),
            }
            .into_response())
        }
        Err(err) => Err(err.into()),
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<NextQuery>,
) -> LoginTemplate {
    LoginTemplate {
        current_user: user.as_ref().map(UserView::from),
        error: None,
        email: String::new(),
        action: query.login_action(),
    }
}

/// Handle login form submission.
///
/// Redirects to a local `next` when given, otherwise to the profile page.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(current): OptionalAuth,
    Query(query): Query<NextQuery>,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    match AuthService::new(state.pool())
        .login(&form.email, &form.password)
        .await
    {
        Ok(user) => {
            establish(&session, &user).await?;
            let target =
                local_redirect_target(query.next.as_deref()).unwrap_or(DEFAULT_AFTER_LOGIN);
            Ok(Redirect::to(target).into_response())
        }
        Err(err @ AuthError::InvalidCredentials) => {
            tracing::info!("Login failed");
            Ok(LoginTemplate {
                current_user: current.as_ref().map(UserView::from),
                error: Some(err.to_string()),
                email: form.email.trim().to_string(),
                action: query.login_action(),
            }
            .into_response())
        }
        Err(err) => Err(err.into()),
    }
}

/// Handle logout. Works whether or not anyone is signed in.
pub async fn logout(session: Session) -> Result<Redirect> {
    sign_out(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to("/"))
}

async fn establish(session: &Session, user: &User) -> Result<()> {
    sign_in(session, user).await?;
    set_sentry_user(&user.id, Some(&user.email));
    Ok(())
}
