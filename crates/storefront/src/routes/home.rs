//! Home page and catalog route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::Product;
use crate::routes::UserView;
use crate::services::CatalogService;
use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: String,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.as_i64(),
            name: product.name,
            description: product.description,
            price: product.price.to_string(),
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct HomeTemplate {
    pub current_user: Option<UserView>,
    pub products: Vec<ProductView>,
}

/// Full catalog template.
#[derive(Template, WebTemplate)]
#[template(path = "catalog.html")]
pub struct CatalogTemplate {
    pub current_user: Option<UserView>,
    pub products: Vec<ProductView>,
}

/// Display the home page with the first few products.
#[instrument(skip_all)]
pub async fn home(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
) -> Result<HomeTemplate> {
    let products = CatalogService::new(state.pool()).list_featured().await?;

    Ok(HomeTemplate {
        current_user: user.as_ref().map(UserView::from),
        products: products.into_iter().map(ProductView::from).collect(),
    })
}

/// Display every product.
#[instrument(skip_all)]
pub async fn catalog(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
) -> Result<CatalogTemplate> {
    let products = CatalogService::new(state.pool()).list_all().await?;

    Ok(CatalogTemplate {
        current_user: user.as_ref().map(UserView::from),
        products: products.into_iter().map(ProductView::from).collect(),
    })
}
