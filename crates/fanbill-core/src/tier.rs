//! Subscription tiers.
//!
//! Tiers form a total order from the free tier up to the most privileged
//! paid tier. All privilege checks go through [`Tier::meets`] rather than
//! per-call-site string comparison.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An ordered subscription privilege level.
///
/// The derived `Ord` follows declaration order, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Free tier. Every subscriber falls back here on cancellation.
    Bronze,

    /// Entry paid tier.
    Prata,

    /// Mid paid tier.
    Gold,

    /// Upper paid tier.
    Platinum,

    /// Highest paid tier.
    Diamante,
}

impl Tier {
    /// The lowest (free) tier.
    #[must_use]
    pub const fn lowest() -> Self {
        Self::Bronze
    }

    /// Check whether this tier grants at least the privileges of `required`.
    #[must_use]
    pub fn meets(self, required: Self) -> bool {
        self >= required
    }

    /// Whether this is a paid tier.
    #[must_use]
    pub fn is_paid(self) -> bool {
        self > Self::Bronze
    }

    /// Canonical lowercase name, as carried in processor metadata.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bronze => "bronze",
            Self::Prata => "prata",
            Self::Gold => "gold",
            Self::Platinum => "platinum",
            Self::Diamante => "diamante",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = TierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bronze" => Ok(Self::Bronze),
            "prata" => Ok(Self::Prata),
            "gold" => Ok(Self::Gold),
            "platinum" => Ok(Self::Platinum),
            "diamante" => Ok(Self::Diamante),
            other => Err(TierError::Unknown(other.to_string())),
        }
    }
}

/// Errors that can occur when parsing a tier name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TierError {
    /// The input is not a known tier name.
    #[error("unknown tier: {0}")]
    Unknown(String),
}
