//! Cart line quantity.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// Quantities start at one; a line with nothing in it does not exist.
    #[error("quantity must be at least 1 (got {0})")]
    TooSmall(i64),
}

/// Number of units of a product in a cart line. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Quantity(i64);

impl Quantity {
    /// A single unit, the quantity of a freshly added cart line.
    pub const ONE: Self = Self(1);

    /// Create a quantity.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::TooSmall` if `value` is below 1.
    pub const fn new(value: i64) -> Result<Self, QuantityError> {
        if value < 1 {
            return Err(QuantityError::TooSmall(value));
        }
        Ok(Self(value))
    }

    /// Get the underlying count.
    #[must_use]
    pub const fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for Quantity {
    type Error = QuantityError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for i64 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_and_negative_rejected() {
        assert_eq!(Quantity::new(0), Err(QuantityError::TooSmall(0)));
        assert_eq!(Quantity::new(-3), Err(QuantityError::TooSmall(-3)));
    }

    #[test]
    fn test_one_is_smallest() {
        assert_eq!(Quantity::new(1), Ok(Quantity::ONE));
    }

    #[test]
    fn test_deserialize_validates() {
        assert!(serde_json::from_str::<Quantity>("0").is_err());
        assert!(matches!(serde_json::from_str::<Quantity>("4"), Ok(q) if q.get() == 4));
    }
}
