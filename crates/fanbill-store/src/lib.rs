//! `RocksDB` storage layer for fanbill.
//!
//! This crate provides persistent storage for subscription records, the
//! transaction ledger, referral links, and settled webhook events, using
//! `RocksDB` with column families for efficient indexing.
//!
//! # Architecture
//!
//! The storage uses the following column families:
//!
//! - `subscriptions`: Subscription records, keyed by `user_id`
//! - `transactions`: Ledger transactions, keyed by `transaction_id` (ULID)
//! - `transactions_by_payee`: Index for listing transactions by payee
//! - `referrals`: Single-parent referral pointers, keyed by `creator_id`
//! - `webhook_events`: Settled event IDs for idempotency
//!
//! # Example
//!
//! ```no_run
//! use fanbill_store::{RocksStore, Store};
//! use fanbill_core::{SubscriptionRecord, UserId};
//!
//! let store = RocksStore::open("/tmp/fanbill-db").unwrap();
//!
//! let user_id = UserId::generate();
//! store.put_subscription(&SubscriptionRecord::new(user_id)).unwrap();
//!
//! let record = store.get_subscription(&user_id).unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use rocks::RocksStore;

use fanbill_core::{
    CreatorId, PayeeId, SubscriptionPatch, SubscriptionRecord, Transaction, TransactionId, UserId,
};

/// The storage trait defining all database operations.
///
/// This trait abstracts the storage layer, allowing for different
/// implementations (e.g., `RocksDB`, in-memory for testing).
pub trait Store: Send + Sync {
    // =========================================================================
    // Subscription Operations
    // =========================================================================

    /// Insert or replace a subscription record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_subscription(&self, record: &SubscriptionRecord) -> Result<()>;

    /// Get a subscription record by user ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_subscription(&self, user_id: &UserId) -> Result<Option<SubscriptionRecord>>;

    /// Apply a partial patch to an existing subscription record.
    ///
    /// Returns the record after the patch.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no record exists for the user;
    /// patches never create records.
    fn patch_subscription(
        &self,
        user_id: &UserId,
        patch: &SubscriptionPatch,
    ) -> Result<SubscriptionRecord>;

    // =========================================================================
    // Ledger Operations
    // =========================================================================

    /// Append a single ledger transaction.
    ///
    /// This also maintains the payee index.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn append_transaction(&self, transaction: &Transaction) -> Result<()>;

    /// Get a transaction by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_transaction(&self, transaction_id: &TransactionId) -> Result<Option<Transaction>>;

    /// List transactions for a payee, ordered by time (newest first).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_transactions_by_payee(
        &self,
        payee: &PayeeId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Transaction>>;

    // =========================================================================
    // Referral Network Operations
    // =========================================================================

    /// Get the referring parent of a creator, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_referrer(&self, creator_id: &CreatorId) -> Result<Option<CreatorId>>;

    /// Set the referring parent of a creator.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_referral(&self, creator_id: &CreatorId, referred_by: &CreatorId) -> Result<()>;

    // =========================================================================
    // Settlement Operations (idempotency)
    // =========================================================================

    /// Check if a webhook event has already been settled.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn has_webhook_event(&self, event_id: &str) -> Result<bool>;

    /// Commit every ledger write for one settled invoice atomically,
    /// together with the event marker that makes replays detectable.
    ///
    /// Either all transactions and the marker land, or none do.
    ///
    /// # Errors
    ///
    /// - `StoreError::DuplicateEvent` if the event was already settled.
    /// - `StoreError::Database` if the write fails.
    fn commit_settlement(&self, event_id: &str, transactions: &[Transaction]) -> Result<()>;
}
