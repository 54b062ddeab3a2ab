//! How a tester felt after trying the product.

use serde::{Deserialize, Serialize};

/// Error returned when a feedback answer is not one of the known values.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid feeling: {0} (expected nothing, energy or other)")]
pub struct FeelingError(pub String);

/// Feedback answer to "how did you feel?".
///
/// The aggregate stats treat `Energy` as positive, `Nothing` as negative and
/// `Other` as neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "feeling", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum Feeling {
    Nothing,
    Energy,
    Other,
}

impl Feeling {
    /// All accepted values, in form order.
    pub const ALL: [Self; 3] = [Self::Nothing, Self::Energy, Self::Other];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nothing => "nothing",
            Self::Energy => "energy",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for Feeling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Feeling {
    type Err = FeelingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|feeling| feeling.as_str() == s)
            .ok_or_else(|| FeelingError(s.to_owned()))
    }
}
