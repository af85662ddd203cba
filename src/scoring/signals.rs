use crate::core::account::AccountId;
use crate::core::config::DetectionConfig;
use crate::core::transaction::TransactionSet;
use crate::graph::transaction_graph::TransactionGraph;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

/// Accounts with a velocity burst: at least the configured number of
/// transactions (as sender or receiver, union) inside one sliding
/// window. A self-transfer counts once.
pub fn velocity_burst_accounts(
    set: &TransactionSet,
    config: &DetectionConfig,
) -> HashSet<AccountId> {
    let mut activity: HashMap<AccountId, Vec<DateTime<Utc>>> = HashMap::new();
    for tx in set.transactions() {
        activity
            .entry(tx.sender().clone())
            .or_default()
            .push(tx.timestamp());
        if !tx.is_self_transfer() {
            activity
                .entry(tx.receiver().clone())
                .or_default()
                .push(tx.timestamp());
        }
    }

    let mut burst = HashSet::new();
    for (account, mut timestamps) in activity {
        timestamps.sort();
        let mut left = 0;
        for right in 0..timestamps.len() {
            while timestamps[right] - timestamps[left] > config.velocity_window {
                left += 1;
            }
            if right - left + 1 >= config.velocity_min_transactions {
                burst.insert(account);
                break;
            }
        }
    }
    burst
}

/// Accounts in the top fraction by in-degree, excluding accounts that
/// receive nothing. The cutoff rank is computed over the population of
/// nodes with in-degree > 0 only.
pub fn centrality_anomaly_accounts(
    graph: &TransactionGraph,
    config: &DetectionConfig,
) -> HashSet<AccountId> {
    let in_degrees = graph.in_degree_map();
    let mut receiving: Vec<usize> = in_degrees
        .values()
        .copied()
        .filter(|degree| *degree > 0)
        .collect();
    if receiving.is_empty() {
        return HashSet::new();
    }

    receiving.sort_unstable_by(|a, b| b.cmp(a));
    let k = ((receiving.len() as f64) * config.centrality_top_fraction).floor() as usize;
    let threshold = receiving[k.max(1) - 1];

    in_degrees
        .into_iter()
        .filter(|(_, degree)| *degree >= threshold && *degree > 0)
        .map(|(account, _)| account)
        .collect()
}

/// Accounts whose activity looks like a legitimate high-volume
/// merchant: long-lived, with consistent amounts and evenly spaced
/// transactions in at least one role (sender or receiver).
pub fn merchant_like_accounts(
    set: &TransactionSet,
    config: &DetectionConfig,
) -> HashSet<AccountId> {
    let mut merchants = HashSet::new();

    for role_is_sender in [true, false] {
        let mut groups: HashMap<AccountId, Vec<(DateTime<Utc>, f64)>> = HashMap::new();
        for tx in set.transactions() {
            let account = if role_is_sender {
                tx.sender()
            } else {
                tx.receiver()
            };
            let amount = tx.amount().to_string().parse::<f64>().unwrap_or(0.0);
            groups
                .entry(account.clone())
                .or_default()
                .push((tx.timestamp(), amount));
        }

        for (account, mut events) in groups {
            if events.len() < 2 {
                continue;
            }
            events.sort_by_key(|(at, _)| *at);

            let first = events[0].0;
            let last = events[events.len() - 1].0;
            if last - first < config.merchant_min_lifetime {
                continue;
            }

            let amounts: Vec<f64> = events.iter().map(|(_, amount)| *amount).collect();
            if coefficient_of_variation(&amounts) > config.merchant_amount_cv_max {
                continue;
            }

            let spacings: Vec<f64> = events
                .windows(2)
                .map(|pair| (pair[1].0 - pair[0].0).num_milliseconds() as f64 / 1000.0)
                .collect();
            if coefficient_of_variation(&spacings) <= config.merchant_spacing_cv_max {
                merchants.insert(account);
            }
        }
    }

    merchants
}

/// Sample-stddev coefficient of variation, defined as 0 when the mean
/// or the deviation is 0, or when fewer than two values exist.
fn coefficient_of_variation(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    if mean == 0.0 {
        return 0.0;
    }
    let variance = values
        .iter()
        .map(|v| (v - mean).powi(2))
        .sum::<f64>()
        / (values.len() - 1) as f64;
    let stddev = variance.sqrt();
    if stddev == 0.0 {
        0.0
    } else {
        stddev / mean
    }
}
