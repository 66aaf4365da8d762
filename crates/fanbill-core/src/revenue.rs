//! Revenue split and commission policy.
//!
//! All rates live here as named configuration rather than inline constants.
//! Share computation truncates to two decimal places (floor, never
//! round-half-up) so the platform can never pay out fractional-cent
//! overages. Because the creator and platform shares are truncated
//! independently, their sum may fall up to 0.02 short of the gross amount;
//! that slippage is accepted, not an error.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Ledger amounts are truncated to whole cents.
const CURRENCY_SCALE: u32 = 2;

/// Revenue split rates and referral commission policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueConfig {
    /// Fraction of gross credited to the creator.
    pub creator_share_rate: Decimal,

    /// Fraction of gross retained by the platform before commissions.
    pub platform_share_rate: Decimal,

    /// Referral commission policy.
    pub commission: CommissionPolicy,
}

impl Default for RevenueConfig {
    fn default() -> Self {
        Self {
            creator_share_rate: Decimal::new(70, 2),  // 0.70
            platform_share_rate: Decimal::new(30, 2), // 0.30
            commission: CommissionPolicy::default(),
        }
    }
}

impl RevenueConfig {
    /// Partition a gross amount into creator and platform shares.
    #[must_use]
    pub fn split(&self, gross: Decimal) -> RevenueSplit {
        RevenueSplit {
            gross,
            creator_share: truncate_share(gross, self.creator_share_rate),
            platform_share: truncate_share(gross, self.platform_share_rate),
        }
    }

    /// Commission owed to one referring ancestor for a gross amount.
    #[must_use]
    pub fn commission_amount(&self, gross: Decimal) -> Decimal {
        truncate_share(gross, self.commission.rate)
    }
}

/// Referral commission policy.
///
/// The source platform only demonstrates a single referral hop; the flat
/// per-level rate and depth bound generalize it while keeping the payout
/// arithmetic auditable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommissionPolicy {
    /// Fraction of gross paid to each referring ancestor.
    pub rate: Decimal,

    /// Maximum number of referral generations paid per invoice.
    pub max_depth: u32,
}

impl Default for CommissionPolicy {
    fn default() -> Self {
        Self {
            rate: Decimal::new(5, 2), // 0.05
            max_depth: 1,
        }
    }
}

/// The computed partition of one gross invoice amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevenueSplit {
    /// The gross amount charged to the subscriber.
    pub gross: Decimal,

    /// Creator share, truncated to whole cents.
    pub creator_share: Decimal,

    /// Platform share before commissions, truncated to whole cents.
    pub platform_share: Decimal,
}

impl RevenueSplit {
    /// Rounding slippage lost to independent truncation.
    #[must_use]
    pub fn slippage(&self) -> Decimal {
        self.gross - self.creator_share - self.platform_share
    }
}

/// `floor(gross * rate * 100) / 100` in exact decimal arithmetic.
fn truncate_share(gross: Decimal, rate: Decimal) -> Decimal {
    (gross * rate).trunc_with_scale(CURRENCY_SCALE)
}
