//! Database schema definitions and column families.
//!
//! This module defines the column families used in `RocksDB` storage.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Subscription records, keyed by `user_id`.
    pub const SUBSCRIPTIONS: &str = "subscriptions";

    /// Ledger transactions, keyed by `transaction_id` (ULID).
    pub const TRANSACTIONS: &str = "transactions";

    /// Index: transactions by payee, keyed by `payee_tag || transaction_id`.
    /// Value is empty (index only).
    pub const TRANSACTIONS_BY_PAYEE: &str = "transactions_by_payee";

    /// Referral parent pointers, keyed by `creator_id`.
    pub const REFERRALS: &str = "referrals";

    /// Settled webhook events for idempotency, keyed by the processor's
    /// event ID.
    pub const WEBHOOK_EVENTS: &str = "webhook_events";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        cf::SUBSCRIPTIONS,
        cf::TRANSACTIONS,
        cf::TRANSACTIONS_BY_PAYEE,
        cf::REFERRALS,
        cf::WEBHOOK_EVENTS,
    ]
}
