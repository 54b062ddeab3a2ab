//! Record categories addressed by the admin data API.

use serde::{Deserialize, Serialize};

/// Error returned for an unknown `type` query value.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid type: {0}")]
pub struct CategoryError(pub String);

/// What a read or export request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DataCategory {
    #[default]
    All,
    Feedback,
    Orders,
    Testers,
    Stats,
}

impl DataCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Feedback => "feedback",
            Self::Orders => "orders",
            Self::Testers => "testers",
            Self::Stats => "stats",
        }
    }

    /// Whether a request for `self` should include `part`.
    #[must_use]
    pub fn includes(self, part: Self) -> bool {
        self == Self::All || self == part
    }
}

impl std::fmt::Display for DataCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DataCategory {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "feedback" => Ok(Self::Feedback),
            "orders" => Ok(Self::Orders),
            "testers" => Ok(Self::Testers),
            "stats" => Ok(Self::Stats),
            _ => Err(CategoryError(s.to_owned())),
        }
    }
}

/// A single record type that can be erased or updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Tester,
    Feedback,
    Order,
}

impl RecordKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tester => "tester",
            Self::Feedback => "feedback",
            Self::Order => "order",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RecordKind {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tester" => Ok(Self::Tester),
            "feedback" => Ok(Self::Feedback),
            "order" => Ok(Self::Order),
            _ => Err(CategoryError(s.to_owned())),
        }
    }
}
