//! Ledger transaction types.
//!
//! Every monetary movement the settlement pipeline performs creates one
//! append-only transaction record. Amounts are decimal currency values;
//! the processor's integer minor units are converted at ingestion.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{CreatorId, PayeeId, TransactionId, UserId};

/// An append-only ledger entry crediting a payee.
///
/// Transactions use ULIDs for time-ordered IDs and are never mutated after
/// creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction ID (ULID for time-ordering).
    pub id: TransactionId,

    /// The identity credited with `amount`.
    pub payee_id: PayeeId,

    /// What kind of movement this entry records.
    pub kind: TransactionKind,

    /// Credited amount in the platform's base currency. Non-negative for
    /// every kind except `PlatformRevenue`, which may go negative when
    /// commission obligations exceed the platform share.
    pub amount: Decimal,

    /// Human-readable description for the audit trail. Never machine-parsed.
    pub description: String,

    /// The paying subscriber, when the entry is funded by a specific payment.
    pub payer_id: Option<UserId>,

    /// Settlement status. The pipeline only ever writes completed entries;
    /// failure paths never reach the ledger.
    pub status: TransactionStatus,

    /// When the transaction was created.
    pub created_at: DateTime<Utc>,

    /// Auxiliary audit fields (gross amount, computed shares, source
    /// creator). Preserved for reconstruction, never read back by logic.
    pub metadata: serde_json::Value,
}

impl Transaction {
    /// Create a creator-share entry for one paid invoice.
    #[must_use]
    pub fn subscription_charge(
        creator_id: CreatorId,
        amount: Decimal,
        payer_id: UserId,
        description: String,
        metadata: serde_json::Value,
    ) -> Self {
        Self {
            id: TransactionId::generate(),
            payee_id: PayeeId::Creator(creator_id),
            kind: TransactionKind::SubscriptionCharge,
            amount,
            description,
            payer_id: Some(payer_id),
            status: TransactionStatus::Completed,
            created_at: Utc::now(),
            metadata,
        }
    }

    /// Create a referral-commission entry crediting a referring ancestor.
    #[must_use]
    pub fn referral_commission(
        referrer_id: CreatorId,
        amount: Decimal,
        payer_id: UserId,
        description: String,
        metadata: serde_json::Value,
    ) -> Self {
        Self {
            id: TransactionId::generate(),
            payee_id: PayeeId::Creator(referrer_id),
            kind: TransactionKind::ReferralCommission,
            amount,
            description,
            payer_id: Some(payer_id),
            status: TransactionStatus::Completed,
            created_at: Utc::now(),
            metadata,
        }
    }

    /// Create the platform-profit entry closing out one paid invoice.
    #[must_use]
    pub fn platform_revenue(
        amount: Decimal,
        payer_id: UserId,
        description: String,
        metadata: serde_json::Value,
    ) -> Self {
        Self {
            id: TransactionId::generate(),
            payee_id: PayeeId::Platform,
            kind: TransactionKind::PlatformRevenue,
            amount,
            description,
            payer_id: Some(payer_id),
            status: TransactionStatus::Completed,
            created_at: Utc::now(),
            metadata,
        }
    }
}

/// Kind of ledger transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Creator share of a subscriber's recurring charge.
    SubscriptionCharge,

    /// Platform profit after commissions for one charge.
    PlatformRevenue,

    /// Commission paid to a referring creator.
    ReferralCommission,
}

/// Status of a ledger transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// The movement settled. The only status the pipeline writes.
    Completed,
}
