//! Application state.

use std::sync::Arc;

use fanbill_store::RocksStore;

use crate::config::ServiceConfig;
use crate::stripe::StripeClient;

/// Application state shared across handlers.
///
/// All external client handles are constructed once at process startup and
/// live for the process lifetime.
#[derive(Clone)]
pub struct AppState {
    /// The storage backend.
    pub store: Arc<RocksStore>,

    /// Service configuration.
    pub config: ServiceConfig,

    /// Payment processor client for subscription lookups and signature
    /// verification (optional).
    pub stripe: Option<Arc<StripeClient>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(store: Arc<RocksStore>, config: ServiceConfig) -> Self {
        // Create the processor client if configured
        let stripe = config.stripe_api_key.as_ref().map(|key| {
            tracing::info!(api_url = %config.stripe_api_url, "Stripe integration enabled");
            Arc::new(StripeClient::new(
                &config.stripe_api_url,
                key,
                config.stripe_webhook_secret.clone(),
            ))
        });

        if stripe.is_none() {
            tracing::warn!("Stripe not configured - invoice events cannot be resolved");
        }

        Self {
            store,
            config,
            stripe,
        }
    }

    /// Check if the payment processor client is configured.
    #[must_use]
    pub fn has_stripe(&self) -> bool {
        self.stripe.is_some()
    }
}
