//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are stored in the database as canonical decimal strings and parsed
//! into [`Price`] on read, so cart totals are computed without floating point
//! rounding.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Quantity;

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
    /// Prices cannot be negative.
    #[error("price cannot be negative")]
    Negative,
}

/// A non-negative amount of money in the shop's currency (rubles).
///
/// ## Examples
///
/// ```
/// use nightbox_core::{Price, Quantity};
///
/// let pizza = Price::parse("499.00").unwrap();
/// let two = Quantity::new(2).unwrap();
/// assert_eq!(pizza.times(two).to_string(), "998.00 ₽");
///
/// assert!(Price::parse("-1").is_err());
/// assert!(Price::parse("abc").is_err());
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// A price of zero (the total of an empty cart).
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Currency symbol used when displaying prices.
    pub const CURRENCY_SYMBOL: &'static str = "₽";

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }

    /// Parse a price from its decimal string form (e.g. `"499.00"`).
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Invalid` if the string is not a decimal number,
    /// or `PriceError::Negative` if it is below zero.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let amount =
            Decimal::from_str(s.trim()).map_err(|_| PriceError::Invalid(s.to_owned()))?;
        Self::new(amount)
    }

    /// Returns the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units at this unit price.
    #[must_use]
    pub fn times(self, quantity: Quantity) -> Self {
        Self(self.0 * Decimal::from(quantity.get()))
    }

    /// Canonical string used for storage (two decimal places).
    #[must_use]
    pub fn to_storage_string(&self) -> String {
        format!("{:.2}", self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.0, Self::CURRENCY_SYMBOL)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}
