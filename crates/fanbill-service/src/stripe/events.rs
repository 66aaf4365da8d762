//! Webhook payload to typed event conversion.
//!
//! Each recognized event type is mapped to the [`PaymentEvent`] variant
//! carrying exactly the fields that event guarantees. Missing or invalid
//! required fields produce an [`EventError`]; the router logs and drops
//! those events rather than surfacing a failure to the processor.

use fanbill_core::{PaymentEvent, SubscriptionStatus};
use rust_decimal::Decimal;
use serde_json::Value;

/// Errors produced while extracting a typed event from a webhook payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventError {
    /// A required field is absent from the payload.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A required field is present but unparseable.
    #[error("invalid field {field}: {value}")]
    InvalidField {
        /// The field name.
        field: &'static str,
        /// The offending value.
        value: String,
    },
}

/// Convert a webhook payload into a typed payment event.
///
/// Returns `Ok(None)` for event types outside the closed set the router
/// handles; new processor event types must never crash the endpoint.
///
/// # Errors
///
/// Returns [`EventError`] when a required field is missing or invalid.
pub fn parse_event(event_type: &str, object: &Value) -> Result<Option<PaymentEvent>, EventError> {
    let event = match event_type {
        "checkout.session.completed" => PaymentEvent::CheckoutCompleted {
            user_id: parse_field("userId", metadata_str(object, "userId")?)?,
            creator_id: parse_field("creatorId", metadata_str(object, "creatorId")?)?,
            tier: parse_field("tier", metadata_str(object, "tier")?)?,
            customer_ref: top_level_str(object, "customer").map(String::from),
            subscription_ref: top_level_str(object, "subscription").map(String::from),
        },
        "customer.subscription.created" | "customer.subscription.updated" => {
            let user_id = parse_field("userId", metadata_str(object, "userId")?)?;
            let tier = parse_field("tier", metadata_str(object, "tier")?)?;
            let status = map_subscription_status(
                top_level_str(object, "status").ok_or(EventError::MissingField("status"))?,
            );
            let subscription_ref = top_level_str(object, "id")
                .ok_or(EventError::MissingField("id"))?
                .to_string();

            if event_type == "customer.subscription.created" {
                PaymentEvent::SubscriptionCreated {
                    user_id,
                    tier,
                    status,
                    subscription_ref,
                }
            } else {
                PaymentEvent::SubscriptionUpdated {
                    user_id,
                    tier,
                    status,
                    subscription_ref,
                }
            }
        }
        "customer.subscription.deleted" => PaymentEvent::SubscriptionDeleted {
            user_id: parse_field("userId", metadata_str(object, "userId")?)?,
        },
        "invoice.paid" => {
            let amount_paid = object
                .get("amount_paid")
                .and_then(Value::as_i64)
                .ok_or(EventError::MissingField("amount_paid"))?;

            PaymentEvent::InvoicePaid {
                invoice_ref: top_level_str(object, "id")
                    .ok_or(EventError::MissingField("id"))?
                    .to_string(),
                subscription_ref: top_level_str(object, "subscription")
                    .ok_or(EventError::MissingField("subscription"))?
                    .to_string(),
                // Minor units leave the pipeline here; everything downstream
                // is decimal currency.
                gross: Decimal::new(amount_paid, 2),
            }
        }
        "invoice.payment_failed" => PaymentEvent::InvoicePaymentFailed {
            invoice_ref: top_level_str(object, "id")
                .ok_or(EventError::MissingField("id"))?
                .to_string(),
            subscription_ref: top_level_str(object, "subscription")
                .ok_or(EventError::MissingField("subscription"))?
                .to_string(),
        },
        _ => return Ok(None),
    };

    Ok(Some(event))
}

/// Map a processor subscription status string onto the closed status enum.
///
/// `trialing` bills as active; anything unrecognized is treated as ended.
#[must_use]
pub fn map_subscription_status(status: &str) -> SubscriptionStatus {
    match status {
        "active" | "trialing" => SubscriptionStatus::Active,
        "past_due" => SubscriptionStatus::PastDue,
        _ => SubscriptionStatus::Canceled,
    }
}

/// Read a required string from the payload's `metadata` map.
fn metadata_str<'a>(object: &'a Value, field: &'static str) -> Result<&'a str, EventError> {
    object
        .get("metadata")
        .and_then(|m| m.get(field))
        .and_then(Value::as_str)
        .ok_or(EventError::MissingField(field))
}

/// Read an optional top-level string field.
fn top_level_str<'a>(object: &'a Value, field: &str) -> Option<&'a str> {
    object.get(field).and_then(Value::as_str)
}

/// Parse a metadata string into its typed form.
fn parse_field<T: std::str::FromStr>(field: &'static str, raw: &str) -> Result<T, EventError> {
    raw.parse().map_err(|_| EventError::InvalidField {
        field,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fanbill_core::{CreatorId, Tier, UserId};
    use serde_json::json;

    #[test]
    fn parses_checkout_completed() {
        let user = UserId::generate();
        let creator = CreatorId::generate();
        let object = json!({
            "id": "cs_test_1",
            "customer": "cus_1",
            "subscription": "sub_1",
            "metadata": {
                "userId": user.to_string(),
                "creatorId": creator.to_string(),
                "tier": "gold"
            }
        });

        let event = parse_event("checkout.session.completed", &object)
            .unwrap()
            .unwrap();
        match event {
            PaymentEvent::CheckoutCompleted {
                user_id,
                creator_id,
                tier,
                customer_ref,
                subscription_ref,
            } => {
                assert_eq!(user_id, user);
                assert_eq!(creator_id, creator);
                assert_eq!(tier, Tier::Gold);
                assert_eq!(customer_ref.as_deref(), Some("cus_1"));
                assert_eq!(subscription_ref.as_deref(), Some("sub_1"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn checkout_missing_creator_is_malformed() {
        let object = json!({
            "metadata": {
                "userId": UserId::generate().to_string(),
                "tier": "prata"
            }
        });

        let result = parse_event("checkout.session.completed", &object);
        assert_eq!(result, Err(EventError::MissingField("creatorId")));
    }

    #[test]
    fn parses_subscription_updated_with_status_mapping() {
        let user = UserId::generate();
        let object = json!({
            "id": "sub_42",
            "status": "trialing",
            "metadata": {
                "userId": user.to_string(),
                "tier": "diamante"
            }
        });

        let event = parse_event("customer.subscription.updated", &object)
            .unwrap()
            .unwrap();
        match event {
            PaymentEvent::SubscriptionUpdated {
                user_id,
                tier,
                status,
                subscription_ref,
            } => {
                assert_eq!(user_id, user);
                assert_eq!(tier, Tier::Diamante);
                assert_eq!(status, SubscriptionStatus::Active);
                assert_eq!(subscription_ref, "sub_42");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn parses_invoice_paid_converting_minor_units() {
        let object = json!({
            "id": "in_7",
            "subscription": "sub_7",
            "amount_paid": 3333
        });

        let event = parse_event("invoice.paid", &object).unwrap().unwrap();
        match event {
            PaymentEvent::InvoicePaid { gross, .. } => {
                assert_eq!(gross, Decimal::new(3333, 2));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn invoice_without_subscription_is_malformed() {
        let object = json!({"id": "in_8", "amount_paid": 100});
        let result = parse_event("invoice.paid", &object);
        assert_eq!(result, Err(EventError::MissingField("subscription")));
    }

    #[test]
    fn unknown_event_type_is_ignored() {
        let result = parse_event("customer.created", &json!({})).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn invalid_tier_is_invalid_field() {
        let object = json!({
            "metadata": {
                "userId": UserId::generate().to_string(),
                "creatorId": CreatorId::generate().to_string(),
                "tier": "silver"
            }
        });

        let result = parse_event("checkout.session.completed", &object);
        assert!(matches!(
            result,
            Err(EventError::InvalidField { field: "tier", .. })
        ));
    }

    #[test]
    fn status_mapping_is_total() {
        assert_eq!(map_subscription_status("active"), SubscriptionStatus::Active);
        assert_eq!(
            map_subscription_status("past_due"),
            SubscriptionStatus::PastDue
        );
        assert_eq!(
            map_subscription_status("canceled"),
            SubscriptionStatus::Canceled
        );
        assert_eq!(
            map_subscription_status("incomplete_expired"),
            SubscriptionStatus::Canceled
        );
    }
}
