//! HTTP request handlers.

pub mod health;
pub mod ledger;
pub mod referrals;
pub mod subscriptions;
pub mod webhooks;
