//! Invoice settlement: revenue split and referral commission cascade.
//!
//! One paid invoice produces one atomic batch of ledger writes:
//!
//! 1. The creator's share of the gross amount (`subscription_charge`)
//! 2. Zero or more referral commissions, one per referring ancestor within
//!    the configured depth (`referral_commission`)
//! 3. The platform's remaining profit (`platform_revenue`)
//!
//! Shares truncate to whole cents, never round up. Platform profit is
//! `platform share − total commissions` and is deliberately not clamped at
//! zero: a negative entry is the audit trail's signal that the referral
//! depth is economically unsustainable.
//!
//! The batch is committed together with the processor's event ID, so a
//! redelivered invoice event settles exactly once.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde_json::json;

use fanbill_core::{CreatorId, RevenueConfig, Tier, Transaction, UserId};
use fanbill_store::{Result, Store};

/// Outcome of settling one paid invoice.
#[derive(Debug, Clone)]
pub struct Settlement {
    /// Every ledger transaction written for this invoice.
    pub transactions: Vec<Transaction>,

    /// The creator's share of the gross amount.
    pub creator_share: Decimal,

    /// Total commissions paid across the referral chain.
    pub commission_total: Decimal,

    /// Platform share minus commissions. May be negative.
    pub platform_profit: Decimal,
}

/// Settle one paid invoice into the ledger.
///
/// # Errors
///
/// - `StoreError::DuplicateEvent` if `event_id` was already settled;
///   nothing is written.
/// - `StoreError` variants from the referral lookups or the batch commit.
pub fn settle_invoice(
    store: &dyn Store,
    revenue: &RevenueConfig,
    event_id: &str,
    payer_id: UserId,
    creator_id: CreatorId,
    tier: Tier,
    gross: Decimal,
) -> Result<Settlement> {
    let split = revenue.split(gross);

    let mut transactions = vec![Transaction::subscription_charge(
        creator_id,
        split.creator_share,
        payer_id,
        format!(
            "{tier} subscription - {payer_id} ({}% of gross)",
            rate_percent(revenue.creator_share_rate)
        ),
        json!({
            "gross_amount": gross,
            "creator_share": split.creator_share,
            "platform_share": split.platform_share,
            "tier": tier,
        }),
    )];

    let (mut commissions, commission_total) =
        collect_commissions(store, revenue, creator_id, gross, payer_id)?;
    transactions.append(&mut commissions);

    let platform_profit = split.platform_share - commission_total;
    transactions.push(Transaction::platform_revenue(
        platform_profit,
        payer_id,
        format!("Platform revenue - {tier} subscription"),
        json!({
            "gross_amount": gross,
            "platform_share": split.platform_share,
            "total_commissions_paid": commission_total,
            "platform_profit": platform_profit,
            "source_creator_id": creator_id,
        }),
    ));

    store.commit_settlement(event_id, &transactions)?;

    tracing::info!(
        event_id = %event_id,
        creator_id = %creator_id,
        gross = %gross,
        creator_share = %split.creator_share,
        commission_total = %commission_total,
        platform_profit = %platform_profit,
        "Invoice settled"
    );

    if platform_profit.is_sign_negative() {
        tracing::warn!(
            event_id = %event_id,
            creator_id = %creator_id,
            platform_profit = %platform_profit,
            "Commissions exceeded platform share"
        );
    }

    Ok(Settlement {
        transactions,
        creator_share: split.creator_share,
        commission_total,
        platform_profit,
    })
}

/// Walk the referral chain upward from `creator_id`, building one
/// commission transaction per ancestor.
///
/// The walk stops at the configured depth, at the first creator without a
/// referrer, or at the first identity already seen in this invocation, so
/// referral cycles terminate and nobody is paid twice per invoice.
///
/// Returns the transactions and their sum.
///
/// # Errors
///
/// Returns an error if a referral lookup fails.
pub fn collect_commissions(
    store: &dyn Store,
    revenue: &RevenueConfig,
    creator_id: CreatorId,
    gross: Decimal,
    payer_id: UserId,
) -> Result<(Vec<Transaction>, Decimal)> {
    let commission = revenue.commission_amount(gross);

    let mut visited = HashSet::from([creator_id]);
    let mut transactions = Vec::new();
    let mut total = Decimal::ZERO;
    let mut current = creator_id;

    for level in 1..=revenue.commission.max_depth {
        let Some(referrer) = store.get_referrer(&current)? else {
            break;
        };

        if !visited.insert(referrer) {
            tracing::warn!(
                creator_id = %creator_id,
                referrer = %referrer,
                level = %level,
                "Referral cycle detected, stopping cascade"
            );
            break;
        }

        transactions.push(Transaction::referral_commission(
            referrer,
            commission,
            payer_id,
            format!(
                "Referral commission (level {level}) - subscription to {current} ({}% of gross)",
                rate_percent(revenue.commission.rate)
            ),
            json!({
                "gross_amount": gross,
                "source_creator_id": creator_id,
                "referred_creator_id": current,
                "level": level,
            }),
        ));
        total += commission;
        current = referrer;
    }

    Ok((transactions, total))
}

/// Render a fractional rate as a percentage for descriptions.
fn rate_percent(rate: Decimal) -> Decimal {
    (rate * Decimal::ONE_HUNDRED).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fanbill_core::{CommissionPolicy, PayeeId, TransactionKind};
    use fanbill_store::RocksStore;
    use tempfile::TempDir;

    fn dec(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    fn create_test_store() -> (RocksStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();
        (store, dir)
    }

    fn deep_config(max_depth: u32) -> RevenueConfig {
        RevenueConfig {
            commission: CommissionPolicy {
                rate: dec(5),
                max_depth,
            },
            ..RevenueConfig::default()
        }
    }

    fn ledger_sum(settlement: &Settlement) -> Decimal {
        settlement.transactions.iter().map(|tx| tx.amount).sum()
    }

    #[test]
    fn conservation_without_referrer() {
        let (store, _dir) = create_test_store();
        let settlement = settle_invoice(
            &store,
            &RevenueConfig::default(),
            "evt_1",
            UserId::generate(),
            CreatorId::generate(),
            Tier::Gold,
            dec(10_000),
        )
        .unwrap();

        assert_eq!(settlement.creator_share, dec(7_000));
        assert_eq!(settlement.commission_total, Decimal::ZERO);
        assert_eq!(settlement.platform_profit, dec(3_000));
        assert_eq!(settlement.transactions.len(), 2);
        assert_eq!(ledger_sum(&settlement), dec(10_000));
    }

    #[test]
    fn shares_truncate_never_round() {
        let (store, _dir) = create_test_store();
        let settlement = settle_invoice(
            &store,
            &RevenueConfig::default(),
            "evt_2",
            UserId::generate(),
            CreatorId::generate(),
            Tier::Prata,
            dec(3_333),
        )
        .unwrap();

        assert_eq!(settlement.creator_share, dec(2_333));
        assert_eq!(settlement.platform_profit, dec(999));
        // Independent truncation loses a cent of the gross
        assert_eq!(ledger_sum(&settlement), dec(3_332));
    }

    #[test]
    fn commission_reduces_platform_profit_not_creator_share() {
        let (store, _dir) = create_test_store();
        let creator = CreatorId::generate();
        let referrer = CreatorId::generate();
        store.put_referral(&creator, &referrer).unwrap();

        let settlement = settle_invoice(
            &store,
            &RevenueConfig::default(),
            "evt_3",
            UserId::generate(),
            creator,
            Tier::Gold,
            dec(10_000),
        )
        .unwrap();

        // Creator share matches the no-referral case for the same gross
        assert_eq!(settlement.creator_share, dec(7_000));
        assert_eq!(settlement.commission_total, dec(500));
        assert_eq!(settlement.platform_profit, dec(2_500));
        assert_eq!(ledger_sum(&settlement), dec(10_000));

        let commission = settlement
            .transactions
            .iter()
            .find(|tx| tx.kind == TransactionKind::ReferralCommission)
            .unwrap();
        assert_eq!(commission.payee_id, PayeeId::Creator(referrer));
        assert_eq!(commission.amount, dec(500));
    }

    #[test]
    fn cascade_pays_each_generation_up_to_depth() {
        let (store, _dir) = create_test_store();
        let a = CreatorId::generate();
        let b = CreatorId::generate();
        let c = CreatorId::generate();
        let d = CreatorId::generate();
        store.put_referral(&a, &b).unwrap();
        store.put_referral(&b, &c).unwrap();
        store.put_referral(&c, &d).unwrap();

        // Depth 2: only b and c get paid
        let settlement = settle_invoice(
            &store,
            &deep_config(2),
            "evt_4",
            UserId::generate(),
            a,
            Tier::Diamante,
            dec(10_000),
        )
        .unwrap();

        assert_eq!(settlement.commission_total, dec(1_000));
        let payees: Vec<_> = settlement
            .transactions
            .iter()
            .filter(|tx| tx.kind == TransactionKind::ReferralCommission)
            .map(|tx| tx.payee_id)
            .collect();
        assert_eq!(payees, vec![PayeeId::Creator(b), PayeeId::Creator(c)]);
    }

    #[test]
    fn referral_cycle_terminates_and_pays_nobody_twice() {
        let (store, _dir) = create_test_store();
        let a = CreatorId::generate();
        let b = CreatorId::generate();
        store.put_referral(&a, &b).unwrap();
        store.put_referral(&b, &a).unwrap();

        let (transactions, total) = collect_commissions(
            &store,
            &deep_config(10),
            a,
            dec(10_000),
            UserId::generate(),
        )
        .unwrap();

        // Only b is paid: a is the origin and already visited
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].payee_id, PayeeId::Creator(b));
        assert_eq!(total, dec(500));
    }

    #[test]
    fn negative_platform_profit_is_not_clamped() {
        let (store, _dir) = create_test_store();
        let chain: Vec<CreatorId> = (0..8).map(|_| CreatorId::generate()).collect();
        for pair in chain.windows(2) {
            store.put_referral(&pair[0], &pair[1]).unwrap();
        }

        // 7 levels at 5% = 35% of gross, above the 30% platform share
        let settlement = settle_invoice(
            &store,
            &deep_config(7),
            "evt_5",
            UserId::generate(),
            chain[0],
            Tier::Gold,
            dec(10_000),
        )
        .unwrap();

        assert_eq!(settlement.commission_total, dec(3_500));
        assert_eq!(settlement.platform_profit, dec(-500));
        assert_eq!(ledger_sum(&settlement), dec(10_000));
    }

    #[test]
    fn replayed_event_settles_nothing() {
        let (store, _dir) = create_test_store();
        let creator = CreatorId::generate();
        let payer = UserId::generate();

        settle_invoice(
            &store,
            &RevenueConfig::default(),
            "evt_6",
            payer,
            creator,
            Tier::Gold,
            dec(10_000),
        )
        .unwrap();

        let replay = settle_invoice(
            &store,
            &RevenueConfig::default(),
            "evt_6",
            payer,
            creator,
            Tier::Gold,
            dec(10_000),
        );
        assert!(matches!(
            replay,
            Err(fanbill_store::StoreError::DuplicateEvent { .. })
        ));

        let creator_txs = store
            .list_transactions_by_payee(&PayeeId::Creator(creator), 10, 0)
            .unwrap();
        assert_eq!(creator_txs.len(), 1);
    }
}
