//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store`
//! trait.

use std::path::Path;
use std::sync::Arc;

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, IteratorMode, MultiThreaded,
    Options, WriteBatch,
};

use fanbill_core::{
    CreatorId, PayeeId, SubscriptionPatch, SubscriptionRecord, Transaction, TransactionId, UserId,
};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::Store;

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}

impl Store for RocksStore {
    // =========================================================================
    // Subscription Operations
    // =========================================================================

    fn put_subscription(&self, record: &SubscriptionRecord) -> Result<()> {
        let cf = self.cf(cf::SUBSCRIPTIONS)?;
        let key = keys::subscription_key(&record.user_id);
        let value = Self::serialize(record)?;

        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_subscription(&self, user_id: &UserId) -> Result<Option<SubscriptionRecord>> {
        let cf = self.cf(cf::SUBSCRIPTIONS)?;
        let key = keys::subscription_key(user_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn patch_subscription(
        &self,
        user_id: &UserId,
        patch: &SubscriptionPatch,
    ) -> Result<SubscriptionRecord> {
        let cf = self.cf(cf::SUBSCRIPTIONS)?;
        let key = keys::subscription_key(user_id);

        let mut record = self.get_subscription(user_id)?.ok_or(StoreError::NotFound)?;
        record.apply(patch);

        let value = Self::serialize(&record)?;
        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(record)
    }

    // =========================================================================
    // Ledger Operations
    // =========================================================================

    fn append_transaction(&self, transaction: &Transaction) -> Result<()> {
        let cf_tx = self.cf(cf::TRANSACTIONS)?;
        let cf_by_payee = self.cf(cf::TRANSACTIONS_BY_PAYEE)?;

        let tx_key = keys::transaction_key(&transaction.id);
        let payee_tx_key = keys::payee_transaction_key(&transaction.payee_id, &transaction.id);
        let value = Self::serialize(transaction)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_tx, &tx_key, &value);
        batch.put_cf(&cf_by_payee, &payee_tx_key, []); // Index entry (empty value)

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_transaction(&self, transaction_id: &TransactionId) -> Result<Option<Transaction>> {
        let cf = self.cf(cf::TRANSACTIONS)?;
        let key = keys::transaction_key(transaction_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn list_transactions_by_payee(
        &self,
        payee: &PayeeId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Transaction>> {
        let cf_by_payee = self.cf(cf::TRANSACTIONS_BY_PAYEE)?;
        let prefix = keys::payee_prefix(payee);

        let iter = self.db.iterator_cf(
            &cf_by_payee,
            IteratorMode::From(&prefix, rocksdb::Direction::Forward),
        );

        // Collect all matching keys first (ULIDs are naturally time-ordered)
        let mut all_keys: Vec<Vec<u8>> = Vec::new();
        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;

            if !key.starts_with(&prefix) {
                break;
            }

            all_keys.push(key.to_vec());
        }

        // Reverse to get newest first
        all_keys.reverse();

        let mut transactions = Vec::new();
        for key in all_keys.into_iter().skip(offset) {
            if transactions.len() >= limit {
                break;
            }

            let tx_id = keys::extract_transaction_id_from_payee_key(&key);
            if let Some(tx) = self.get_transaction(&tx_id)? {
                transactions.push(tx);
            }
        }

        Ok(transactions)
    }

    // =========================================================================
    // Referral Network Operations
    // =========================================================================

    fn get_referrer(&self, creator_id: &CreatorId) -> Result<Option<CreatorId>> {
        let cf = self.cf(cf::REFERRALS)?;
        let key = keys::referral_key(creator_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn put_referral(&self, creator_id: &CreatorId, referred_by: &CreatorId) -> Result<()> {
        let cf = self.cf(cf::REFERRALS)?;
        let key = keys::referral_key(creator_id);
        let value = Self::serialize(referred_by)?;

        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    // =========================================================================
    // Settlement Operations
    // =========================================================================

    fn has_webhook_event(&self, event_id: &str) -> Result<bool> {
        let cf = self.cf(cf::WEBHOOK_EVENTS)?;
        let key = keys::webhook_event_key(event_id);

        let exists = self
            .db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .is_some();

        Ok(exists)
    }

    fn commit_settlement(&self, event_id: &str, transactions: &[Transaction]) -> Result<()> {
        // Check for a replayed event before writing anything
        if self.has_webhook_event(event_id)? {
            return Err(StoreError::DuplicateEvent {
                event_id: event_id.to_string(),
            });
        }

        let cf_tx = self.cf(cf::TRANSACTIONS)?;
        let cf_by_payee = self.cf(cf::TRANSACTIONS_BY_PAYEE)?;
        let cf_events = self.cf(cf::WEBHOOK_EVENTS)?;

        let mut batch = WriteBatch::default();
        for transaction in transactions {
            let tx_key = keys::transaction_key(&transaction.id);
            let payee_tx_key = keys::payee_transaction_key(&transaction.payee_id, &transaction.id);
            let value = Self::serialize(transaction)?;

            batch.put_cf(&cf_tx, &tx_key, &value);
            batch.put_cf(&cf_by_payee, &payee_tx_key, []);
        }

        // The event marker rides in the same batch: the settlement and its
        // replay guard commit together or not at all.
        let event_key = keys::webhook_event_key(event_id);
        let settled_at = Self::serialize(&chrono::Utc::now())?;
        batch.put_cf(&cf_events, &event_key, &settled_at);

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }
}
