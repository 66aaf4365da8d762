//! Key encoding utilities for `RocksDB`.
//!
//! This module provides functions for encoding and decoding keys used in
//! column families.

use fanbill_core::{CreatorId, PayeeId, TransactionId, UserId};

/// Tag byte prefixing platform-payee index keys.
const PAYEE_TAG_PLATFORM: u8 = 0x00;

/// Tag byte prefixing creator-payee index keys.
const PAYEE_TAG_CREATOR: u8 = 0x01;

/// Create a subscription key from a user ID.
#[must_use]
pub fn subscription_key(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Create a transaction key from a transaction ID.
#[must_use]
pub fn transaction_key(transaction_id: &TransactionId) -> Vec<u8> {
    transaction_id.to_bytes().to_vec()
}

/// Create a prefix for iterating all transactions for a payee.
///
/// Format: `tag (1 byte) || creator_id (16 bytes, creators only)`.
/// The tag byte keeps the platform prefix disjoint from every creator
/// prefix.
#[must_use]
pub fn payee_prefix(payee: &PayeeId) -> Vec<u8> {
    match payee {
        PayeeId::Platform => vec![PAYEE_TAG_PLATFORM],
        PayeeId::Creator(creator_id) => {
            let mut prefix = Vec::with_capacity(17);
            prefix.push(PAYEE_TAG_CREATOR);
            prefix.extend_from_slice(creator_id.as_bytes());
            prefix
        }
    }
}

/// Create a payee-transaction index key.
///
/// Format: `payee_prefix || transaction_id (16 bytes)`.
///
/// Since ULIDs are time-ordered, transactions for a payee sort by time.
#[must_use]
pub fn payee_transaction_key(payee: &PayeeId, transaction_id: &TransactionId) -> Vec<u8> {
    let mut key = payee_prefix(payee);
    key.extend_from_slice(&transaction_id.to_bytes());
    key
}

/// Extract the transaction ID from a payee-transaction index key.
///
/// # Panics
///
/// Panics if the key does not end in 16 ULID bytes.
#[must_use]
pub fn extract_transaction_id_from_payee_key(key: &[u8]) -> TransactionId {
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&key[key.len() - 16..]);
    TransactionId::from_bytes(bytes).expect("valid ULID bytes")
}

/// Create a referral key from a creator ID.
#[must_use]
pub fn referral_key(creator_id: &CreatorId) -> Vec<u8> {
    creator_id.as_bytes().to_vec()
}

/// Create a webhook event key from the processor's event ID.
#[must_use]
pub fn webhook_event_key(event_id: &str) -> Vec<u8> {
    event_id.as_bytes().to_vec()
}
