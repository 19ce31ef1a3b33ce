//! Account route handlers.
//!
//! These routes require authentication.

use askama::Template;
use askama_web::WebTemplate;

use crate::filters;
use crate::middleware::RequireAuth;
use crate::routes::UserView;

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/profile.html")]
pub struct ProfileTemplate {
    pub current_user: Option<UserView>,
    pub user: UserView,
}

/// Display the signed-in user's name and email.
pub async fn profile(RequireAuth(user): RequireAuth) -> ProfileTemplate {
    let user = UserView::from(&user);

    ProfileTemplate {
        current_user: Some(user.clone()),
        user,
    }
}
