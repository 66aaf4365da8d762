//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{health, ledger, referrals, subscriptions, webhooks};
use crate::state::AppState;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
///
/// ## Ledger (Service API Key auth)
/// - `GET /v1/ledger/transactions` - List transactions by payee
/// - `GET /v1/ledger/transactions/{id}` - Fetch one transaction
///
/// ## Subscriptions (Service API Key auth)
/// - `GET /v1/subscriptions/{user_id}` - Fetch a subscription record
///
/// ## Referrals (Service API Key auth)
/// - `PUT /v1/referrals/{creator_id}` - Set a referral pointer
/// - `GET /v1/referrals/{creator_id}` - Get a referral pointer
///
/// ## Webhooks (Signature verification)
/// - `POST /webhooks/stripe` - Payment processor webhooks
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    // Build CORS layer
    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    Router::new()
        // Health (public)
        .route("/health", get(health::health))
        // Ledger
        .route("/v1/ledger/transactions", get(ledger::list_transactions))
        .route(
            "/v1/ledger/transactions/:transaction_id",
            get(ledger::get_transaction),
        )
        // Subscriptions
        .route(
            "/v1/subscriptions/:user_id",
            get(subscriptions::get_subscription),
        )
        // Referrals
        .route("/v1/referrals/:creator_id", put(referrals::put_referral))
        .route("/v1/referrals/:creator_id", get(referrals::get_referral))
        // Webhooks
        .route("/webhooks/stripe", post(webhooks::stripe_webhook))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
