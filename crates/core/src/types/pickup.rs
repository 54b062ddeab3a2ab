//! Where an order is collected.

use serde::{Deserialize, Serialize};

/// Error returned for an unknown pickup location.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid pickup location: {0}")]
pub struct PickupLocationError(pub String);

/// Courier delivery or one of the pickup points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "pickup_location", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum PickupLocation {
    Courier,
    Tallinn,
    Parnu,
    Tartu,
    Vantaa,
}

impl PickupLocation {
    pub const ALL: [Self; 5] = [
        Self::Courier,
        Self::Tallinn,
        Self::Parnu,
        Self::Tartu,
        Self::Vantaa,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Courier => "courier",
            Self::Tallinn => "tallinn",
            Self::Parnu => "parnu",
            Self::Tartu => "tartu",
            Self::Vantaa => "vantaa",
        }
    }
}

impl std::fmt::Display for PickupLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PickupLocation {
    type Err = PickupLocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|location| location.as_str() == s)
            .ok_or_else(|| PickupLocationError(s.to_owned()))
    }
}
