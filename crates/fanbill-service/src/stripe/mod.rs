//! Payment processor integration.
//!
//! The processor is a trusted event source: webhook payloads are verified
//! against its signature scheme, parsed into typed [`fanbill_core::PaymentEvent`]s,
//! and invoice events are resolved back through its API to recover the
//! identities stored in subscription metadata.

pub mod client;
pub mod events;
pub mod types;

pub use client::{StripeClient, StripeError};
pub use events::{parse_event, EventError};
pub use types::{StripeSubscription, StripeWebhook, WebhookResponse};
