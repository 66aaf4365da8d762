//! Core types for the fanbill payment ledger.
//!
//! This crate defines the domain model shared by the storage layer and the
//! HTTP service:
//!
//! - Strongly-typed identifiers for users, creators, payees, and ledger
//!   transactions
//! - The ordered subscription [`Tier`] ladder
//! - The append-only ledger [`Transaction`] record
//! - Subscription records and the partial patches applied to them by
//!   payment lifecycle events
//! - The [`PaymentEvent`] sum type carrying exactly the fields each
//!   processor event kind guarantees
//! - [`RevenueConfig`], the split rates and referral commission policy

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod event;
pub mod ids;
pub mod revenue;
pub mod subscription;
pub mod tier;
pub mod transaction;

pub use event::PaymentEvent;
pub use ids::{CreatorId, IdError, PayeeId, TransactionId, UserId};
pub use revenue::{CommissionPolicy, RevenueConfig, RevenueSplit};
pub use subscription::{SubscriptionPatch, SubscriptionRecord, SubscriptionStatus};
pub use tier::{Tier, TierError};
pub use transaction::{Transaction, TransactionKind, TransactionStatus};
