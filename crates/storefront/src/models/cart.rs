//! Cart domain types.

use nightbox_core::{CartItemId, Price, ProductId, Quantity, UserId};

use super::Product;

/// One (user, product) row of a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub id: CartItemId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: Quantity,
}

/// A cart item joined with the product it refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub item: CartItem,
    pub product: Product,
}

impl CartLine {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.item.quantity)
    }
}

/// A user's whole cart with its total.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    pub lines: Vec<CartLine>,
    pub total: Price,
}

impl Cart {
    /// Build a cart from its lines, computing the total.
    #[must_use]
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let total = lines.iter().map(CartLine::line_total).sum();
        Self { lines, total }
    }

    /// Number of units across all lines.
    #[must_use]
    pub fn unit_count(&self) -> i64 {
        self.lines.iter().map(|line| line.item.quantity.get()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(id: i64, price: &str, quantity: i64) -> CartLine {
        CartLine {
            item: CartItem {
                id: CartItemId::new(id),
                user_id: UserId::new(1),
                product_id: ProductId::new(id),
                quantity: Quantity::new(quantity).unwrap(),
            },
            product: Product {
                id: ProductId::new(id),
                name: format!("product {id}"),
                description: String::new(),
                price: Price::parse(price).unwrap(),
            },
        }
    }

    #[test]
    fn test_empty_cart_totals_zero() {
        let cart = Cart::from_lines(Vec::new());
        assert!(cart.is_empty());
        assert_eq!(cart.total, Price::ZERO);
        assert_eq!(cart.unit_count(), 0);
    }

    #[test]
    fn test_total_is_sum_of_price_times_quantity() {
        let cart = Cart::from_lines(vec![line(1, "499.0", 2), line(2, "389.0", 1)]);
        assert_eq!(cart.total, Price::parse("1387").unwrap());
        assert_eq!(cart.unit_count(), 3);
    }

    #[test]
    fn test_decimal_total_has_no_float_drift() {
        let cart = Cart::from_lines(vec![line(1, "0.10", 3), line(2, "0.20", 1)]);
        assert_eq!(cart.total, Price::parse("0.50").unwrap());
    }
}
