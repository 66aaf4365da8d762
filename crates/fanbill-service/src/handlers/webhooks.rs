//! Payment processor webhook endpoint and event router.
//!
//! The endpoint acknowledges every event it can read, recognized or not,
//! well-formed or not, with `{"received": true}`. Only signature failures
//! are rejected; every other failure is logged server-side and absorbed, so
//! a permanently malformed event can never trigger a redelivery storm.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use rust_decimal::Decimal;

use fanbill_core::{
    CreatorId, PaymentEvent, SubscriptionPatch, SubscriptionRecord, SubscriptionStatus, Tier,
    UserId,
};
use fanbill_store::{Store, StoreError};

use crate::error::ApiError;
use crate::payout;
use crate::state::AppState;
use crate::stripe::types::{StripeWebhook, WebhookResponse};
use crate::stripe::{events, StripeSubscription};

/// Handle payment processor webhooks.
pub async fn stripe_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<WebhookResponse>, ApiError> {
    // Get signature header (required even if we skip verification)
    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok());

    // Verify signature if webhook_secret is configured
    if state.config.stripe_webhook_secret.is_some() {
        let sig = signature.ok_or_else(|| ApiError::BadRequest("Missing Stripe signature".into()))?;

        if let Some(stripe) = &state.stripe {
            stripe.verify_webhook_signature(&body, sig).map_err(|e| {
                tracing::warn!(error = %e, "Invalid Stripe webhook signature");
                ApiError::BadRequest("Invalid webhook signature".into())
            })?;
        } else {
            tracing::warn!(
                "Stripe webhook_secret configured but client not available - skipping verification"
            );
        }
    } else {
        // No webhook_secret configured - skip verification (development mode)
        tracing::warn!("Stripe webhook_secret not configured - skipping signature verification");
    }

    // Parse webhook envelope. An unreadable body is logged and acknowledged:
    // redelivering it would fail the same way forever.
    let webhook: StripeWebhook = match serde_json::from_str(&body) {
        Ok(webhook) => webhook,
        Err(e) => {
            tracing::warn!(error = %e, "Unparseable webhook body, dropping");
            return Ok(Json(WebhookResponse { received: true }));
        }
    };

    tracing::info!(
        event_type = %webhook.event_type,
        event_id = %webhook.id,
        "Received Stripe webhook"
    );

    // Extract the typed event
    let event = match events::parse_event(&webhook.event_type, &webhook.data.object) {
        Ok(Some(event)) => event,
        Ok(None) => {
            tracing::debug!(event_type = %webhook.event_type, "Unhandled Stripe event");
            return Ok(Json(WebhookResponse { received: true }));
        }
        Err(e) => {
            tracing::error!(
                event_type = %webhook.event_type,
                event_id = %webhook.id,
                error = %e,
                "Malformed webhook event, dropping"
            );
            return Ok(Json(WebhookResponse { received: true }));
        }
    };

    // Dispatch. Internal failures are absorbed here: the processor gets an
    // acknowledgment either way and failures live in the logs.
    if let Err(e) = route_event(&state, &webhook.id, event).await {
        tracing::error!(
            event_type = %webhook.event_type,
            event_id = %webhook.id,
            error = %e,
            "Webhook event processing failed"
        );
    }

    Ok(Json(WebhookResponse { received: true }))
}

/// Dispatch one typed event to its handler.
async fn route_event(state: &AppState, event_id: &str, event: PaymentEvent) -> Result<(), ApiError> {
    let kind = event.kind();
    match event {
        PaymentEvent::CheckoutCompleted {
            user_id,
            creator_id,
            tier,
            customer_ref,
            subscription_ref,
        } => {
            handle_checkout_completed(
                state,
                user_id,
                creator_id,
                tier,
                customer_ref,
                subscription_ref,
            )?;
        }
        PaymentEvent::SubscriptionCreated {
            user_id,
            tier,
            status,
            subscription_ref,
        }
        | PaymentEvent::SubscriptionUpdated {
            user_id,
            tier,
            status,
            subscription_ref,
        } => {
            apply_patch(
                state,
                kind,
                user_id,
                &SubscriptionPatch {
                    tier: Some(tier),
                    status: Some(status),
                    billing_subscription_ref: Some(subscription_ref),
                    ..SubscriptionPatch::default()
                },
            )?;
        }
        PaymentEvent::SubscriptionDeleted { user_id } => {
            apply_patch(state, kind, user_id, &SubscriptionPatch::cancellation())?;
        }
        PaymentEvent::InvoicePaid {
            invoice_ref,
            subscription_ref,
            gross,
        } => {
            handle_invoice_paid(state, event_id, &invoice_ref, &subscription_ref, gross).await?;
        }
        PaymentEvent::InvoicePaymentFailed {
            invoice_ref,
            subscription_ref,
        } => {
            handle_invoice_payment_failed(state, &invoice_ref, &subscription_ref).await?;
        }
    }

    Ok(())
}

/// First successful checkout: upsert the subscription record and activate
/// the purchased tier.
fn handle_checkout_completed(
    state: &AppState,
    user_id: UserId,
    creator_id: CreatorId,
    tier: Tier,
    customer_ref: Option<String>,
    subscription_ref: Option<String>,
) -> Result<(), ApiError> {
    // The only place a subscription record comes into existence
    if state.store.get_subscription(&user_id)?.is_none() {
        state
            .store
            .put_subscription(&SubscriptionRecord::new(user_id))?;
    }

    let record = state.store.patch_subscription(
        &user_id,
        &SubscriptionPatch {
            tier: Some(tier),
            status: Some(SubscriptionStatus::Active),
            billing_customer_ref: customer_ref,
            billing_subscription_ref: subscription_ref,
        },
    )?;

    tracing::info!(
        user_id = %user_id,
        creator_id = %creator_id,
        tier = %record.tier,
        "Checkout completed, subscription activated"
    );

    Ok(())
}

/// Apply a lifecycle patch, logging and dropping `NotFound`. Lifecycle
/// events never create records.
fn apply_patch(
    state: &AppState,
    kind: &str,
    user_id: UserId,
    patch: &SubscriptionPatch,
) -> Result<(), ApiError> {
    match state.store.patch_subscription(&user_id, patch) {
        Ok(record) => {
            tracing::info!(
                event_kind = %kind,
                user_id = %user_id,
                tier = %record.tier,
                status = ?record.status,
                "Subscription updated"
            );
            Ok(())
        }
        Err(StoreError::NotFound) => {
            tracing::warn!(
                event_kind = %kind,
                user_id = %user_id,
                "No subscription record for user, dropping event"
            );
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// A recurring charge settled: resolve the identity triple through the
/// processor, then split the gross amount into the ledger.
async fn handle_invoice_paid(
    state: &AppState,
    event_id: &str,
    invoice_ref: &str,
    subscription_ref: &str,
    gross: Decimal,
) -> Result<(), ApiError> {
    let subscription = resolve_subscription(state, subscription_ref).await?;

    let Some((user_id, creator_id)) = subscription_identities(&subscription) else {
        tracing::error!(
            invoice_ref = %invoice_ref,
            subscription_ref = %subscription_ref,
            "Missing identity metadata on subscription, dropping invoice"
        );
        return Ok(());
    };
    let tier = subscription_tier(&subscription);

    match payout::settle_invoice(
        state.store.as_ref(),
        &state.config.revenue,
        event_id,
        user_id,
        creator_id,
        tier,
        gross,
    ) {
        Ok(_) => Ok(()),
        Err(StoreError::DuplicateEvent { event_id }) => {
            tracing::info!(
                event_id = %event_id,
                invoice_ref = %invoice_ref,
                "Invoice event already settled, skipping replay"
            );
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// A recurring charge failed: mark the subscription past due, tier
/// untouched.
async fn handle_invoice_payment_failed(
    state: &AppState,
    invoice_ref: &str,
    subscription_ref: &str,
) -> Result<(), ApiError> {
    let subscription = resolve_subscription(state, subscription_ref).await?;

    let Some(user_id) = subscription_user(&subscription) else {
        tracing::error!(
            invoice_ref = %invoice_ref,
            subscription_ref = %subscription_ref,
            "Missing userId metadata on subscription, dropping invoice"
        );
        return Ok(());
    };

    tracing::warn!(
        invoice_ref = %invoice_ref,
        user_id = %user_id,
        "Payment failed - user may need to update payment method"
    );

    apply_patch(
        state,
        "invoice_payment_failed",
        user_id,
        &SubscriptionPatch {
            status: Some(SubscriptionStatus::PastDue),
            ..SubscriptionPatch::default()
        },
    )
}

/// Retrieve the subscription object behind an invoice event.
async fn resolve_subscription(
    state: &AppState,
    subscription_ref: &str,
) -> Result<StripeSubscription, ApiError> {
    let stripe = state
        .stripe
        .as_ref()
        .ok_or_else(|| ApiError::ExternalService("Stripe client not configured".into()))?;

    stripe
        .get_subscription(subscription_ref)
        .await
        .map_err(|e| ApiError::ExternalService(e.to_string()))
}

/// Pull `(userId, creatorId)` out of subscription metadata.
fn subscription_identities(subscription: &StripeSubscription) -> Option<(UserId, CreatorId)> {
    let user_id = subscription_user(subscription)?;
    let creator_id = subscription
        .metadata
        .get("creatorId")
        .and_then(|s| s.parse().ok())?;
    Some((user_id, creator_id))
}

/// Pull `userId` out of subscription metadata.
fn subscription_user(subscription: &StripeSubscription) -> Option<UserId> {
    subscription
        .metadata
        .get("userId")
        .and_then(|s| s.parse().ok())
}

/// Pull the tier out of subscription metadata, falling back to the lowest
/// tier when absent or unreadable (the ledger description still needs one).
fn subscription_tier(subscription: &StripeSubscription) -> Tier {
    subscription
        .metadata
        .get("tier")
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(Tier::lowest)
}
