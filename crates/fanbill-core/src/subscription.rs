//! Subscription records and lifecycle patches.
//!
//! A subscriber holds at most one subscription record. Payment lifecycle
//! events mutate it through [`SubscriptionPatch`], a partial update where
//! absent fields are left untouched. Records are never hard-deleted;
//! cancellation downgrades to the lowest tier instead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Tier, UserId};

/// A subscriber's subscription state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    /// The subscriber.
    pub user_id: UserId,

    /// Current privilege tier.
    pub tier: Tier,

    /// Current billing status.
    pub status: SubscriptionStatus,

    /// Opaque customer reference at the payment processor.
    pub billing_customer_ref: Option<String>,

    /// Opaque subscription reference at the payment processor.
    pub billing_subscription_ref: Option<String>,

    /// When the record was created.
    pub created_at: DateTime<Utc>,

    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl SubscriptionRecord {
    /// Create a fresh record at the free tier.
    ///
    /// Records come into existence on a subscriber's first successful
    /// checkout; the checkout patch is applied immediately after.
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            tier: Tier::lowest(),
            status: SubscriptionStatus::Canceled,
            billing_customer_ref: None,
            billing_subscription_ref: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial patch. Absent fields keep their current values.
    ///
    /// Applying the same patch twice yields the same final state.
    pub fn apply(&mut self, patch: &SubscriptionPatch) {
        if let Some(tier) = patch.tier {
            self.tier = tier;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(customer_ref) = &patch.billing_customer_ref {
            self.billing_customer_ref = Some(customer_ref.clone());
        }
        if let Some(subscription_ref) = &patch.billing_subscription_ref {
            self.billing_subscription_ref = Some(subscription_ref.clone());
        }
        self.updated_at = Utc::now();
    }
}

/// Status of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Billing is current.
    Active,

    /// The most recent recurring charge failed.
    PastDue,

    /// The subscription ended. The record stays at the free tier.
    Canceled,
}

/// A partial update to a subscription record.
///
/// Only provided fields are changed; no tier-transition constraints are
/// enforced (processor event ordering is not guaranteed sequential).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubscriptionPatch {
    /// New tier, if the event carries one.
    pub tier: Option<Tier>,

    /// New status, if the event carries one.
    pub status: Option<SubscriptionStatus>,

    /// New customer reference, if the event carries one.
    pub billing_customer_ref: Option<String>,

    /// New subscription reference, if the event carries one.
    pub billing_subscription_ref: Option<String>,
}

impl SubscriptionPatch {
    /// The patch applied on `subscription_deleted`: lowest tier, canceled
    /// status, all other fields untouched.
    #[must_use]
    pub fn cancellation() -> Self {
        Self {
            tier: Some(Tier::lowest()),
            status: Some(SubscriptionStatus::Canceled),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_only_touches_provided_fields() {
        let mut record = SubscriptionRecord::new(UserId::generate());
        record.apply(&SubscriptionPatch {
            tier: Some(Tier::Gold),
            status: Some(SubscriptionStatus::Active),
            billing_customer_ref: Some("cus_123".into()),
            billing_subscription_ref: Some("sub_456".into()),
        });

        record.apply(&SubscriptionPatch {
            status: Some(SubscriptionStatus::PastDue),
            ..SubscriptionPatch::default()
        });

        assert_eq!(record.tier, Tier::Gold);
        assert_eq!(record.status, SubscriptionStatus::PastDue);
        assert_eq!(record.billing_customer_ref.as_deref(), Some("cus_123"));
        assert_eq!(record.billing_subscription_ref.as_deref(), Some("sub_456"));
    }

    #[test]
    fn patch_is_idempotent() {
        let mut record = SubscriptionRecord::new(UserId::generate());
        let patch = SubscriptionPatch {
            tier: Some(Tier::Diamante),
            status: Some(SubscriptionStatus::Active),
            ..SubscriptionPatch::default()
        };

        record.apply(&patch);
        let tier = record.tier;
        let status = record.status;
        record.apply(&patch);

        assert_eq!(record.tier, tier);
        assert_eq!(record.status, status);
    }

    #[test]
    fn cancellation_downgrades_to_lowest_tier() {
        let mut record = SubscriptionRecord::new(UserId::generate());
        record.apply(&SubscriptionPatch {
            tier: Some(Tier::Diamante),
            status: Some(SubscriptionStatus::Active),
            billing_subscription_ref: Some("sub_789".into()),
            ..SubscriptionPatch::default()
        });

        record.apply(&SubscriptionPatch::cancellation());

        assert_eq!(record.tier, Tier::Bronze);
        assert_eq!(record.status, SubscriptionStatus::Canceled);
        // Billing references survive cancellation.
        assert_eq!(record.billing_subscription_ref.as_deref(), Some("sub_789"));
    }

    #[test]
    fn any_tier_can_follow_any_tier() {
        let mut record = SubscriptionRecord::new(UserId::generate());
        record.apply(&SubscriptionPatch {
            tier: Some(Tier::Diamante),
            ..SubscriptionPatch::default()
        });
        record.apply(&SubscriptionPatch {
            tier: Some(Tier::Prata),
            ..SubscriptionPatch::default()
        });
        assert_eq!(record.tier, Tier::Prata);
    }
}
