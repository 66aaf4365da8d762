//! Payment lifecycle events.
//!
//! One variant per processor event kind, each carrying exactly the fields
//! that kind guarantees after metadata extraction. The service's processor
//! integration builds these from raw webhook payloads; everything past the
//! router works on this type and never inspects raw JSON.

use rust_decimal::Decimal;

use crate::{CreatorId, SubscriptionStatus, Tier, UserId};

/// A verified, typed payment-lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentEvent {
    /// A subscriber completed checkout for a creator's tier.
    CheckoutCompleted {
        /// The paying subscriber.
        user_id: UserId,
        /// The creator being subscribed to.
        creator_id: CreatorId,
        /// The purchased tier.
        tier: Tier,
        /// Processor customer reference.
        customer_ref: Option<String>,
        /// Processor subscription reference.
        subscription_ref: Option<String>,
    },

    /// The processor created a subscription object.
    SubscriptionCreated {
        /// The subscriber.
        user_id: UserId,
        /// The subscribed tier.
        tier: Tier,
        /// Status reported by the processor.
        status: SubscriptionStatus,
        /// Processor subscription reference.
        subscription_ref: String,
    },

    /// The processor updated a subscription object.
    SubscriptionUpdated {
        /// The subscriber.
        user_id: UserId,
        /// The subscribed tier.
        tier: Tier,
        /// Status reported by the processor.
        status: SubscriptionStatus,
        /// Processor subscription reference.
        subscription_ref: String,
    },

    /// The subscription ended; the subscriber drops to the free tier.
    SubscriptionDeleted {
        /// The subscriber.
        user_id: UserId,
    },

    /// A recurring charge settled. Carries only the subscription reference;
    /// the router resolves the identity triple through the processor.
    InvoicePaid {
        /// Processor invoice reference.
        invoice_ref: String,
        /// Processor subscription reference.
        subscription_ref: String,
        /// Gross charged amount, already converted from minor units.
        gross: Decimal,
    },

    /// A recurring charge failed.
    InvoicePaymentFailed {
        /// Processor invoice reference.
        invoice_ref: String,
        /// Processor subscription reference.
        subscription_ref: String,
    },
}

impl PaymentEvent {
    /// Stable name of the event kind, for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::CheckoutCompleted { .. } => "checkout_completed",
            Self::SubscriptionCreated { .. } => "subscription_created",
            Self::SubscriptionUpdated { .. } => "subscription_updated",
            Self::SubscriptionDeleted { .. } => "subscription_deleted",
            Self::InvoicePaid { .. } => "invoice_paid",
            Self::InvoicePaymentFailed { .. } => "invoice_payment_failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_are_stable() {
        let event = PaymentEvent::SubscriptionDeleted {
            user_id: UserId::generate(),
        };
        assert_eq!(event.kind(), "subscription_deleted");

        let event = PaymentEvent::InvoicePaid {
            invoice_ref: "in_1".into(),
            subscription_ref: "sub_1".into(),
            gross: Decimal::new(10_000, 2),
        };
        assert_eq!(event.kind(), "invoice_paid");
    }
}
