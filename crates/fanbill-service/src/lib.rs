//! Fanbill HTTP API service.
//!
//! This crate provides the payment-event side of the fanbill platform:
//!
//! - The payment processor webhook endpoint (event routing, always-ack)
//! - Subscription state projection from lifecycle events
//! - Revenue split and referral commission settlement into the ledger
//! - Operational read API for the ledger, subscriptions, and referrals
//!
//! # Authentication
//!
//! The webhook endpoint is guarded by processor signature verification;
//! the operational endpoints use a service API key.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Some handlers need async only for routing consistency

pub mod auth;
pub mod config;
pub mod crypto;
pub mod error;
pub mod handlers;
pub mod payout;
pub mod routes;
pub mod state;
pub mod stripe;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use payout::Settlement;
pub use routes::create_router;
pub use state::AppState;
pub use stripe::{StripeClient, StripeError};
