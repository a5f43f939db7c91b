//! Greedy nearest-date transfer pairing.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;

use super::transfers_model::{
    NewTransfer, RejectedPair, TransferCandidate, TransferMatchConfig, TransferStatus,
};
use crate::entries::EntryKind;

struct ScoredPair<'a> {
    inflow: &'a TransferCandidate,
    outflow: &'a TransferCandidate,
    distance: i64,
}

/// Plans the transfer links for one family's candidates.
///
/// A pair qualifies when one leg is an inflow and the other an outflow of the
/// exact same magnitude and currency, the legs sit in different accounts,
/// both are plain transactions, their dates are at most
/// `config.date_window_days` apart and the pair was never rejected.
///
/// Qualifying pairs are consumed greedily ordered by
/// `(date distance, inflow date, inflow id, outflow id)`. An entry used by an
/// accepted pair is skipped by every later pair.
pub fn plan_transfer_matches(
    candidates: &[TransferCandidate],
    rejected: &HashSet<RejectedPair>,
    config: &TransferMatchConfig,
) -> Vec<NewTransfer> {
    // Bucket legs by (currency, magnitude) so only equal amounts are compared.
    let mut buckets: HashMap<(&str, Decimal), (Vec<&TransferCandidate>, Vec<&TransferCandidate>)> =
        HashMap::new();
    for candidate in candidates {
        if candidate.kind != EntryKind::Transaction || candidate.amount.is_zero() {
            continue;
        }
        let key = (
            candidate.currency.as_str(),
            candidate.amount.abs().normalize(),
        );
        let (inflows, outflows) = buckets.entry(key).or_default();
        if candidate.amount.is_sign_negative() {
            inflows.push(candidate);
        } else {
            outflows.push(candidate);
        }
    }

    let mut pairs: Vec<ScoredPair> = Vec::new();
    for (inflows, outflows) in buckets.values() {
        for &inflow in inflows.iter() {
            for &outflow in outflows.iter() {
                if inflow.account_id == outflow.account_id {
                    continue;
                }
                let distance = (inflow.date - outflow.date).num_days().abs();
                if distance > config.date_window_days {
                    continue;
                }
                let pair = RejectedPair {
                    inflow_entry_id: inflow.entry_id.clone(),
                    outflow_entry_id: outflow.entry_id.clone(),
                };
                if rejected.contains(&pair) {
                    continue;
                }
                pairs.push(ScoredPair {
                    inflow,
                    outflow,
                    distance,
                });
            }
        }
    }

    pairs.sort_by(|a, b| {
        a.distance
            .cmp(&b.distance)
            .then_with(|| a.inflow.date.cmp(&b.inflow.date))
            .then_with(|| a.inflow.entry_id.cmp(&b.inflow.entry_id))
            .then_with(|| a.outflow.entry_id.cmp(&b.outflow.entry_id))
    });

    let mut used: HashSet<&str> = HashSet::new();
    let mut planned = Vec::new();
    for pair in pairs {
        if used.contains(pair.inflow.entry_id.as_str())
            || used.contains(pair.outflow.entry_id.as_str())
        {
            continue;
        }
        used.insert(pair.inflow.entry_id.as_str());
        used.insert(pair.outflow.entry_id.as_str());
        planned.push(NewTransfer {
            inflow_entry_id: pair.inflow.entry_id.clone(),
            outflow_entry_id: pair.outflow.entry_id.clone(),
            status: TransferStatus::Unconfirmed,
        });
    }
    planned
}
