//! Scenario generation utilities for the forensics engine.
//!
//! Generates random transaction batches, optionally seeded with known
//! muling patterns, to exercise the detectors in benches and demos.

use crate::core::account::AccountId;
use crate::core::transaction::{Transaction, TransactionSet};
use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Configuration for generating a random transaction batch.
#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    /// Number of accounts in the background population.
    pub account_count: usize,
    /// Number of background transactions.
    pub transaction_count: usize,
    /// Minimum transaction amount.
    pub min_amount: Decimal,
    /// Maximum transaction amount.
    pub max_amount: Decimal,
    /// Timestamp of the earliest possible transaction.
    pub start: DateTime<Utc>,
    /// Period over which transactions are spread.
    pub span: Duration,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            account_count: 20,
            transaction_count: 100,
            min_amount: Decimal::from(50),
            max_amount: Decimal::from(5_000),
            start: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            span: Duration::days(30),
        }
    }
}

/// Generate a random background batch with no intentional patterns.
pub fn generate_random_batch(config: &ScenarioConfig) -> TransactionSet {
    let mut rng = rand::thread_rng();
    let mut set = TransactionSet::new();

    let accounts: Vec<AccountId> = (0..config.account_count)
        .map(|i| AccountId::new(format!("ACC-{:04}", i)))
        .collect();

    let span_seconds = config.span.num_seconds().max(1);

    for _ in 0..config.transaction_count {
        let sender_idx = rng.gen_range(0..accounts.len());
        let mut receiver_idx = rng.gen_range(0..accounts.len());
        while receiver_idx == sender_idx {
            receiver_idx = rng.gen_range(0..accounts.len());
        }

        let min_f64: f64 = config.min_amount.to_string().parse().unwrap_or(50.0);
        let max_f64: f64 = config.max_amount.to_string().parse().unwrap_or(5_000.0);
        let amount = Decimal::from_f64_retain(rng.gen_range(min_f64..max_f64))
            .unwrap_or(Decimal::from(100))
            .round_dp(2);
        let at = config.start + Duration::seconds(rng.gen_range(0..span_seconds));

        if amount > Decimal::ZERO {
            set.add(Transaction::new(
                Uuid::new_v4().to_string(),
                accounts[sender_idx].clone(),
                accounts[receiver_idx].clone(),
                amount,
                at,
            ));
        }
    }

    set
}

/// Append a circular routing pattern: consecutive transfers one hour
/// apart through `accounts`, closing back to the first.
pub fn inject_cycle(set: &mut TransactionSet, accounts: &[AccountId], start: DateTime<Utc>) {
    for (i, sender) in accounts.iter().enumerate() {
        let receiver = &accounts[(i + 1) % accounts.len()];
        set.add(Transaction::new(
            Uuid::new_v4().to_string(),
            sender.clone(),
            receiver.clone(),
            Decimal::from(10_000),
            start + Duration::hours(i as i64),
        ));
    }
}

/// Append a fan-in burst: `senders` accounts each paying `focus` within
/// a six-hour spread.
pub fn inject_fan_in(
    set: &mut TransactionSet,
    focus: &AccountId,
    senders: &[AccountId],
    start: DateTime<Utc>,
) {
    for (i, sender) in senders.iter().enumerate() {
        set.add(Transaction::new(
            Uuid::new_v4().to_string(),
            sender.clone(),
            focus.clone(),
            Decimal::from(500),
            start + Duration::minutes(i as i64 * 30),
        ));
    }
}

/// Append a layered chain through `accounts` in order, one transfer per
/// hour. Intermediaries stay low-degree as long as the background batch
/// does not touch them.
pub fn inject_shell_chain(
    set: &mut TransactionSet,
    accounts: &[AccountId],
    start: DateTime<Utc>,
) {
    for (i, window) in accounts.windows(2).enumerate() {
        set.add(Transaction::new(
            Uuid::new_v4().to_string(),
            window[0].clone(),
            window[1].clone(),
            Decimal::from(9_500),
            start + Duration::hours(i as i64),
        ));
    }
}
