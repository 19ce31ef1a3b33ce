//! Cart route handlers.
//!
//! Every cart route requires a signed-in user. Mutations answer with a
//! redirect back to the cart page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State, rejection::PathRejection},
    response::Redirect,
};
use tracing::instrument;

use nightbox_core::{CartItemId, ProductId};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{Cart, CartLine};
use crate::routes::UserView;
use crate::services::CartService;
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub item_id: i64,
    pub name: String,
    pub unit_price: String,
    pub quantity: i64,
    pub line_total: String,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            item_id: line.item.id.as_i64(),
            name: line.product.name.clone(),
            unit_price: line.product.price.to_string(),
            quantity: line.item.quantity.get(),
            line_total: line.line_total().to_string(),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total: String,
    pub unit_count: i64,
    pub is_empty: bool,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart.lines.iter().map(CartLineView::from).collect(),
            total: cart.total.to_string(),
            unit_count: cart.unit_count(),
            is_empty: cart.is_empty(),
        }
    }
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartTemplate {
    pub current_user: Option<UserView>,
    pub cart: CartView,
}

/// Display the user's cart.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<CartTemplate> {
    let cart = CartService::new(state.pool()).view(user.id).await?;

    Ok(CartTemplate {
        current_user: Some(UserView::from(&user)),
        cart: CartView::from(&cart),
    })
}

/// Add one unit of a product to the cart.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    product_id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Redirect> {
    let Path(product_id) =
        product_id.map_err(|_| AppError::NotFound("product".to_string()))?;
    let product_id = ProductId::new(product_id);

    CartService::new(state.pool())
        .add_item(user.id, product_id)
        .await?;

    add_breadcrumb(
        "cart",
        "Added product to cart",
        Some(&[("product_id", &product_id.to_string())]),
    );

    Ok(Redirect::to("/cart"))
}

/// Remove a whole line from the cart.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    item_id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Redirect> {
    let Path(item_id) = item_id.map_err(|_| AppError::NotFound("cart item".to_string()))?;

    CartService::new(state.pool())
        .remove_item(user.id, CartItemId::new(item_id))
        .await?;

    Ok(Redirect::to("/cart"))
}
