//! Order quantity.

use serde::{Deserialize, Serialize};

/// Errors produced when reading an order quantity.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// The value is not a whole number.
    #[error("quantity must be a whole number")]
    NotANumber,
    /// The value is outside [`Quantity::MIN`, `Quantity::MAX`].
    #[error("quantity must be between {min} and {max}", min = Quantity::MIN, max = Quantity::MAX)]
    OutOfRange(i64),
}

/// Number of units in an order, always within `1..=100`.
///
/// Input that is missing defaults to one unit; input that is present but
/// not a whole number is rejected rather than silently replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Quantity(i32);

impl Quantity {
    pub const MIN: i32 = 1;
    pub const MAX: i32 = 100;

    /// Validate a raw integer.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::OutOfRange`] outside `1..=100`.
    pub fn new(value: i64) -> Result<Self, QuantityError> {
        i32::try_from(value)
            .ok()
            .filter(|v| (Self::MIN..=Self::MAX).contains(v))
            .map(Self)
            .ok_or(QuantityError::OutOfRange(value))
    }

    /// Parse a quantity typed into a form field.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::NotANumber`] for non-integer text and
    /// [`QuantityError::OutOfRange`] for integers outside `1..=100`.
    pub fn parse(s: &str) -> Result<Self, QuantityError> {
        let value = s
            .trim()
            .parse::<i64>()
            .map_err(|_| QuantityError::NotANumber)?;
        Self::new(value)
    }

    /// Read a quantity from a JSON value (number or numeric string).
    ///
    /// # Errors
    ///
    /// Returns an error for fractional numbers, booleans, objects, and any
    /// value [`Quantity::parse`] or [`Quantity::new`] rejects.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, QuantityError> {
        match value {
            serde_json::Value::Number(n) => {
                let raw = n.as_i64().ok_or(QuantityError::NotANumber)?;
                Self::new(raw)
            }
            serde_json::Value::String(s) => Self::parse(s),
            _ => Err(QuantityError::NotANumber),
        }
    }

    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = i64::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}
