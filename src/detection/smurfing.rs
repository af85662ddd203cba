use crate::core::account::AccountId;
use crate::core::config::DetectionConfig;
use crate::core::transaction::{Transaction, TransactionSet};
use crate::detection::ring::{PatternType, RawRing, RingSequence};
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Detect temporal concentration of counterparties around one focus
/// account: fan-in (many senders → one receiver) and fan-out (one
/// sender → many receivers), each within the configured window.
///
/// # Algorithm
///
/// Per orientation, transactions are grouped by the focus column and
/// each group is swept with a two-pointer sliding window (inclusive
/// width). A window holding at least the configured number of distinct
/// partners emits a ring of the focus plus those partners. Member sets
/// are deduplicated within the orientation pass, so a focus account can
/// still produce several rings when successive windows capture
/// different partner sets.
pub fn detect_smurfing(
    set: &TransactionSet,
    config: &DetectionConfig,
    sequence: &mut RingSequence,
) -> Vec<RawRing> {
    let mut rings = Vec::new();

    // Fan-in: many senders → one receiver
    sliding_window_pass(
        set,
        Transaction::receiver,
        Transaction::sender,
        "fan_in_smurfing",
        config,
        sequence,
        &mut rings,
    );

    // Fan-out: one sender → many receivers
    sliding_window_pass(
        set,
        Transaction::sender,
        Transaction::receiver,
        "fan_out_smurfing",
        config,
        sequence,
        &mut rings,
    );

    rings
}

fn sliding_window_pass(
    set: &TransactionSet,
    focus_of: fn(&Transaction) -> &AccountId,
    partner_of: fn(&Transaction) -> &AccountId,
    label: &str,
    config: &DetectionConfig,
    sequence: &mut RingSequence,
    rings: &mut Vec<RawRing>,
) {
    // Group by focus account, keeping (timestamp, partner) in input order
    // so the stable sort below breaks timestamp ties deterministically.
    let mut groups: HashMap<AccountId, Vec<(DateTime<Utc>, AccountId)>> = HashMap::new();
    for tx in set.transactions() {
        groups
            .entry(focus_of(tx).clone())
            .or_default()
            .push((tx.timestamp(), partner_of(tx).clone()));
    }

    let mut focuses: Vec<AccountId> = groups.keys().cloned().collect();
    focuses.sort();

    let mut already_flagged: HashSet<BTreeSet<AccountId>> = HashSet::new();

    for focus in focuses {
        let mut events = groups.remove(&focus).unwrap_or_default();
        events.sort_by_key(|(at, _)| *at);

        let mut left = 0;
        for right in 0..events.len() {
            while events[right].0 - events[left].0 > config.smurfing_window {
                left += 1;
            }

            let window_partners: HashSet<&AccountId> =
                events[left..=right].iter().map(|(_, p)| p).collect();
            if window_partners.len() < config.smurfing_min_partners {
                continue;
            }

            let mut member_set: BTreeSet<AccountId> =
                window_partners.into_iter().cloned().collect();
            member_set.insert(focus.clone());
            if already_flagged.contains(&member_set) {
                continue;
            }

            // Focus first, then partners in sorted order.
            let mut members = vec![focus.clone()];
            members.extend(member_set.iter().filter(|a| **a != focus).cloned());

            already_flagged.insert(member_set);
            rings.push(RawRing::uniform(
                sequence.next_id(),
                members,
                PatternType::Smurfing,
                label,
            ));
        }
    }
}
