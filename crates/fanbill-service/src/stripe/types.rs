//! Payment processor wire types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Stripe webhook envelope (simplified).
#[derive(Debug, Deserialize)]
pub struct StripeWebhook {
    /// Event type.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Event ID.
    pub id: String,
    /// Event data.
    pub data: StripeEventData,
}

/// Stripe event data container.
#[derive(Debug, Deserialize)]
pub struct StripeEventData {
    /// Event object.
    pub object: serde_json::Value,
}

/// Webhook acknowledgment body.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    /// Whether the webhook was received.
    pub received: bool,
}

/// A Stripe subscription object, reduced to the fields the router reads.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeSubscription {
    /// Subscription ID (`sub_...`).
    pub id: String,
    /// Subscription status string.
    pub status: String,
    /// Checkout metadata: `userId`, `creatorId`, `tier`.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// Stripe API error envelope.
#[derive(Debug, Deserialize)]
pub struct StripeErrorResponse {
    /// The error payload.
    pub error: StripeErrorBody,
}

/// Stripe API error payload.
#[derive(Debug, Deserialize)]
pub struct StripeErrorBody {
    /// Error type.
    #[serde(rename = "type")]
    pub error_type: String,
    /// Error message.
    #[serde(default)]
    pub message: String,
    /// Error code.
    #[serde(default)]
    pub code: Option<String>,
}
