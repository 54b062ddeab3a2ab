//! Unit pricing for pre-orders.
//!
//! Buyers who filled in the feedback survey pay the reduced tier; everyone
//! else pays the standard tier. Amounts are whole euros held as [`Decimal`]
//! so the store can keep them in a `NUMERIC` column.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors produced when resolving the unit price of an order.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The requested price matches neither tier.
    #[error("price per unit must be {with_data} or {without_data}", with_data = PriceTier::WithData.unit_price(), without_data = PriceTier::WithoutData.unit_price())]
    UnknownPrice(Decimal),
    /// The requested price contradicts the survey answer.
    #[error("price per unit {requested} does not match the {expected} tier")]
    TierMismatch {
        requested: Decimal,
        expected: Decimal,
    },
}

/// Price tier of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PriceTier {
    /// Buyer shared survey data: 1€ per unit.
    #[default]
    WithData,
    /// Buyer did not share survey data: 2€ per unit.
    WithoutData,
}

impl PriceTier {
    #[must_use]
    pub const fn from_gave_data(gave_data: bool) -> Self {
        if gave_data {
            Self::WithData
        } else {
            Self::WithoutData
        }
    }

    #[must_use]
    pub fn unit_price(self) -> Decimal {
        match self {
            Self::WithData => Decimal::ONE,
            Self::WithoutData => Decimal::TWO,
        }
    }

    fn from_unit_price(price: Decimal) -> Option<Self> {
        [Self::WithData, Self::WithoutData]
            .into_iter()
            .find(|tier| tier.unit_price() == price)
    }

    /// Resolve the unit price from what the order form sent.
    ///
    /// `gave_data` defaults to `true`. An explicit `price_per_unit` must name
    /// one of the tiers and, when `gave_data` is also present, the tier that
    /// answer selects.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError`] when the requested price is unknown or
    /// contradicts `gave_data`.
    pub fn resolve(
        gave_data: Option<bool>,
        requested: Option<Decimal>,
    ) -> Result<Decimal, PriceError> {
        match (gave_data, requested) {
            (gave_data, None) => Ok(Self::from_gave_data(gave_data.unwrap_or(true)).unit_price()),
            (None, Some(price)) => Self::from_unit_price(price)
                .map(Self::unit_price)
                .ok_or(PriceError::UnknownPrice(price)),
            (Some(gave_data), Some(price)) => {
                let expected = Self::from_gave_data(gave_data).unit_price();
                if price == expected {
                    Ok(expected)
                } else if Self::from_unit_price(price).is_none() {
                    Err(PriceError::UnknownPrice(price))
                } else {
                    Err(PriceError::TierMismatch {
                        requested: price,
                        expected,
                    })
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tier_is_with_data() {
        assert_eq!(PriceTier::resolve(None, None), Ok(Decimal::ONE));
    }

    #[test]
    fn test_gave_data_selects_tier() {
        assert_eq!(PriceTier::resolve(Some(true), None), Ok(Decimal::ONE));
        assert_eq!(PriceTier::resolve(Some(false), None), Ok(Decimal::TWO));
    }

    #[test]
    fn test_explicit_price_must_be_a_tier() {
        assert_eq!(PriceTier::resolve(None, Some(Decimal::TWO)), Ok(Decimal::TWO));
        assert_eq!(
            PriceTier::resolve(None, Some(Decimal::ZERO)),
            Err(PriceError::UnknownPrice(Decimal::ZERO))
        );
    }

    #[test]
    fn test_explicit_price_must_match_gave_data() {
        assert_eq!(
            PriceTier::resolve(Some(false), Some(Decimal::TWO)),
            Ok(Decimal::TWO)
        );
        assert_eq!(
            PriceTier::resolve(Some(true), Some(Decimal::TWO)),
            Err(PriceError::TierMismatch {
                requested: Decimal::TWO,
                expected: Decimal::ONE,
            })
        );
    }
}
