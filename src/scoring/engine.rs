use crate::core::account::AccountId;
use crate::core::config::DetectionConfig;
use crate::core::transaction::TransactionSet;
use crate::detection::ring::{PatternType, RawRing};
use crate::graph::transaction_graph::TransactionGraph;
use crate::scoring::signals;
use std::collections::{BTreeSet, HashMap};

/// Per-account output of the scoring engine.
///
/// Only accounts touched by at least one ring appear here; auxiliary
/// signals adjust suspicion but never create it on their own.
#[derive(Debug, Clone, Default)]
pub struct AccountScores {
    scores: HashMap<AccountId, f64>,
    patterns: HashMap<AccountId, BTreeSet<String>>,
    first_ring: HashMap<AccountId, String>,
}

impl AccountScores {
    /// Final clamped, one-decimal score for an account, if it was
    /// flagged by any ring.
    pub fn score(&self, account: &AccountId) -> Option<f64> {
        self.scores.get(account).copied()
    }

    /// Fine-grained pattern labels collected for an account.
    pub fn patterns(&self, account: &AccountId) -> Option<&BTreeSet<String>> {
        self.patterns.get(account)
    }

    /// The lowest-numbered ring the account appeared in.
    pub fn first_ring(&self, account: &AccountId) -> Option<&str> {
        self.first_ring.get(account).map(String::as_str)
    }

    /// Number of flagged accounts.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Flagged accounts ordered by score descending, account id
    /// ascending as the tie-break.
    pub fn ranked_accounts(&self) -> Vec<(AccountId, f64)> {
        let mut ranked: Vec<(AccountId, f64)> = self
            .scores
            .iter()
            .map(|(account, score)| (account.clone(), *score))
            .collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        ranked
    }
}

/// A detected ring enriched with its aggregate risk score.
#[derive(Debug, Clone)]
pub struct ScoredRing {
    pub ring: RawRing,
    pub risk_score: f64,
}

/// Compute suspicion scores for every account touched by a ring.
///
/// Ring membership contributes a pattern-type delta once per ring;
/// velocity, centrality and merchant signals then adjust accounts that
/// already carry ring suspicion. Scores are clamped to the configured
/// band and rounded to one decimal.
pub fn score_accounts(
    rings: &[RawRing],
    graph: &TransactionGraph,
    set: &TransactionSet,
    config: &DetectionConfig,
) -> AccountScores {
    let mut raw_scores: HashMap<AccountId, f64> = HashMap::new();
    let mut patterns: HashMap<AccountId, BTreeSet<String>> = HashMap::new();
    let mut first_ring: HashMap<AccountId, String> = HashMap::new();

    let burst = signals::velocity_burst_accounts(set, config);
    let central = signals::centrality_anomaly_accounts(graph, config);
    let merchants = signals::merchant_like_accounts(set, config);

    for ring in rings {
        let delta = pattern_delta(ring.pattern_type, config);
        for account in &ring.member_accounts {
            *raw_scores.entry(account.clone()).or_insert(0.0) += delta;
            if let Some(labels) = ring.patterns_by_account.get(account) {
                patterns
                    .entry(account.clone())
                    .or_default()
                    .extend(labels.iter().cloned());
            }
            first_ring
                .entry(account.clone())
                .or_insert_with(|| ring.ring_id.clone());
        }
    }

    for account in &burst {
        if let Some(score) = raw_scores.get_mut(account) {
            *score += config.score_velocity;
            patterns
                .entry(account.clone())
                .or_default()
                .insert("high_velocity".to_string());
        }
    }

    for account in &central {
        if let Some(score) = raw_scores.get_mut(account) {
            *score += config.score_centrality;
            patterns
                .entry(account.clone())
                .or_default()
                .insert("degree_centrality_anomaly".to_string());
        }
    }

    for account in &merchants {
        if let Some(score) = raw_scores.get_mut(account) {
            *score += config.score_fp_merchant;
            patterns
                .entry(account.clone())
                .or_default()
                .insert("merchant_pattern_fp_reduction".to_string());
        }
    }

    let scores = raw_scores
        .into_iter()
        .map(|(account, score)| (account, round_to_tenth(config.clamp_score(score))))
        .collect();

    AccountScores {
        scores,
        patterns,
        first_ring,
    }
}

/// Attach a risk score — the mean of members' final suspicion scores,
/// clamped and rounded — to every ring.
pub fn attach_risk_scores(
    rings: Vec<RawRing>,
    scores: &AccountScores,
    config: &DetectionConfig,
) -> Vec<ScoredRing> {
    rings
        .into_iter()
        .map(|ring| {
            let member_total: f64 = ring
                .member_accounts
                .iter()
                .map(|account| scores.score(account).unwrap_or(0.0))
                .sum();
            let mean = if ring.member_accounts.is_empty() {
                0.0
            } else {
                member_total / ring.member_accounts.len() as f64
            };
            ScoredRing {
                ring,
                risk_score: round_to_tenth(config.clamp_score(mean)),
            }
        })
        .collect()
}

fn pattern_delta(pattern_type: PatternType, config: &DetectionConfig) -> f64 {
    match pattern_type {
        PatternType::Cycle => config.score_cycle,
        PatternType::Smurfing => config.score_smurfing,
        PatternType::LayeredShell => config.score_shell,
        PatternType::Hybrid => config
            .score_cycle
            .max(config.score_smurfing)
            .max(config.score_shell),
    }
}

/// Round to one decimal place.
fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transaction::Transaction;
    use crate::detection::ring::RingSequence;
    use approx::assert_relative_eq;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn tx(id: &str, from: &str, to: &str, hours: i64) -> Transaction {
        Transaction::new(
            id,
            AccountId::new(from),
            AccountId::new(to),
            dec!(100),
            base() + Duration::hours(hours),
        )
    }

    fn cycle_ring(sequence: &mut RingSequence, members: &[&str]) -> RawRing {
        RawRing::uniform(
            sequence.next_id(),
            members.iter().map(|m| AccountId::new(*m)).collect(),
            PatternType::Cycle,
            &format!("cycle_length_{}", members.len()),
        )
    }

    fn shell_ring(sequence: &mut RingSequence, members: &[&str]) -> RawRing {
        RawRing::uniform(
            sequence.next_id(),
            members.iter().map(|m| AccountId::new(*m)).collect(),
            PatternType::LayeredShell,
            "layered_shell_chain",
        )
    }

    fn empty_frame() -> (TransactionGraph, TransactionSet) {
        let set = TransactionSet::new();
        let graph = TransactionGraph::from_transactions(&set);
        (graph, set)
    }

    #[test]
    fn test_cycle_membership_scores_forty() {
        let (graph, set) = empty_frame();
        let mut sequence = RingSequence::new("RING");
        let rings = vec![cycle_ring(&mut sequence, &["A", "B", "C", "D"])];

        let scores = score_accounts(&rings, &graph, &set, &DetectionConfig::default());
        assert_eq!(scores.len(), 4);
        assert_relative_eq!(scores.score(&AccountId::new("A")).unwrap(), 40.0);
        assert_eq!(scores.first_ring(&AccountId::new("A")), Some("RING_001"));
    }

    #[test]
    fn test_overlapping_rings_accumulate() {
        let (graph, set) = empty_frame();
        let mut sequence = RingSequence::new("RING");
        let rings = vec![
            cycle_ring(&mut sequence, &["A", "B", "C", "D"]),
            shell_ring(&mut sequence, &["A", "X", "Y", "Z"]),
        ];

        let scores = score_accounts(&rings, &graph, &set, &DetectionConfig::default());
        assert_relative_eq!(scores.score(&AccountId::new("A")).unwrap(), 65.0);
        assert_relative_eq!(scores.score(&AccountId::new("X")).unwrap(), 25.0);
        // First ring follows emission order: the cycle came first.
        assert_eq!(scores.first_ring(&AccountId::new("A")), Some("RING_001"));
        assert_eq!(scores.first_ring(&AccountId::new("X")), Some("RING_002"));
    }

    #[test]
    fn test_hybrid_delta_is_max_of_components() {
        let config = DetectionConfig::default();
        assert_relative_eq!(pattern_delta(PatternType::Hybrid, &config), 40.0);
    }

    #[test]
    fn test_score_clamped_to_hundred() {
        let (graph, set) = empty_frame();
        let mut sequence = RingSequence::new("RING");
        let rings: Vec<RawRing> = (0..4)
            .map(|_| cycle_ring(&mut sequence, &["A", "B", "C"]))
            .collect();

        let scores = score_accounts(&rings, &graph, &set, &DetectionConfig::default());
        assert_relative_eq!(scores.score(&AccountId::new("A")).unwrap(), 100.0);
    }

    #[test]
    fn test_velocity_boost_gated_on_ring_membership() {
        // H sends 10 transactions inside a day; U does the same but is
        // in no ring and must stay unscored.
        let mut txs: Vec<Transaction> = (0..10)
            .map(|i| tx(&format!("H{}", i), "H", &format!("P{}", i), i))
            .collect();
        txs.extend((0..10).map(|i| tx(&format!("U{}", i), "U", &format!("Q{}", i), i)));
        let set: TransactionSet = txs.into_iter().collect();
        let graph = TransactionGraph::from_transactions(&set);

        let mut sequence = RingSequence::new("RING");
        let rings = vec![cycle_ring(&mut sequence, &["H", "B", "C"])];

        let scores = score_accounts(&rings, &graph, &set, &DetectionConfig::default());
        assert_relative_eq!(scores.score(&AccountId::new("H")).unwrap(), 60.0);
        assert!(scores
            .patterns(&AccountId::new("H"))
            .unwrap()
            .contains("high_velocity"));
        assert!(scores.score(&AccountId::new("U")).is_none());
    }

    #[test]
    fn test_merchant_reduction_applies() {
        // SHOP receives steady daily amounts for 60 days and sits in a
        // smurfing ring: 30 - 25 = 5.0. A larger unrelated hub keeps the
        // centrality cutoff above SHOP's in-degree.
        let mut txs: Vec<Transaction> = (0..60)
            .map(|i| tx(&format!("T{}", i), &format!("C{}", i % 7), "SHOP", i * 24))
            .collect();
        txs.extend(
            (0..20).map(|i| tx(&format!("D{}", i), &format!("D{}", i), "HUB", i * 100)),
        );
        let set: TransactionSet = txs.into_iter().collect();
        let graph = TransactionGraph::from_transactions(&set);

        let mut sequence = RingSequence::new("RING");
        let mut members = vec!["SHOP".to_string()];
        members.extend((0..10).map(|i| format!("C{}", i)));
        let member_refs: Vec<&str> = members.iter().map(String::as_str).collect();
        let rings = vec![RawRing::uniform(
            sequence.next_id(),
            member_refs.iter().map(|m| AccountId::new(*m)).collect(),
            PatternType::Smurfing,
            "fan_in_smurfing",
        )];

        let scores = score_accounts(&rings, &graph, &set, &DetectionConfig::default());
        assert_relative_eq!(scores.score(&AccountId::new("SHOP")).unwrap(), 5.0);
        assert!(scores
            .patterns(&AccountId::new("SHOP"))
            .unwrap()
            .contains("merchant_pattern_fp_reduction"));
    }

    #[test]
    fn test_score_clamped_at_zero() {
        let mut config = DetectionConfig::default();
        config.score_fp_merchant = -60.0;

        let set: TransactionSet = (0..60)
            .map(|i| tx(&format!("T{}", i), "C", "SHOP", i * 24))
            .collect();
        let graph = TransactionGraph::from_transactions(&set);

        let mut sequence = RingSequence::new("RING");
        let rings = vec![RawRing::uniform(
            sequence.next_id(),
            vec![AccountId::new("SHOP"), AccountId::new("C")],
            PatternType::Smurfing,
            "fan_in_smurfing",
        )];

        let scores = score_accounts(&rings, &graph, &set, &config);
        assert_relative_eq!(scores.score(&AccountId::new("SHOP")).unwrap(), 0.0);
    }

    #[test]
    fn test_ring_risk_is_member_mean() {
        let (graph, set) = empty_frame();
        let mut sequence = RingSequence::new("RING");
        let rings = vec![
            cycle_ring(&mut sequence, &["A", "B", "C"]),
            shell_ring(&mut sequence, &["A", "X", "Y", "Z"]),
        ];

        let config = DetectionConfig::default();
        let scores = score_accounts(&rings, &graph, &set, &config);
        let scored = attach_risk_scores(rings, &scores, &config);

        // Cycle members: A = 65 (40 + 25), B = C = 40 → mean 48.3.
        assert_relative_eq!(scored[0].risk_score, 48.3);
        // Shell members: A = 65, X = Y = Z = 25 → mean 35.0.
        assert_relative_eq!(scored[1].risk_score, 35.0);
    }

    #[test]
    fn test_ranked_accounts_ordering() {
        let (graph, set) = empty_frame();
        let mut sequence = RingSequence::new("RING");
        let rings = vec![
            cycle_ring(&mut sequence, &["B", "C", "D"]),
            shell_ring(&mut sequence, &["A", "C", "E", "F"]),
        ];

        let scores = score_accounts(&rings, &graph, &set, &DetectionConfig::default());
        let ranked = scores.ranked_accounts();
        // C leads at 65; the 40s follow in lexicographic order, then the 25s.
        assert_eq!(ranked[0].0.as_str(), "C");
        assert_eq!(ranked[1].0.as_str(), "B");
        assert_eq!(ranked[2].0.as_str(), "D");
        assert_eq!(ranked[3].0.as_str(), "A");
    }

    #[test]
    fn test_rounding_to_one_decimal() {
        assert_relative_eq!(round_to_tenth(48.333333), 48.3);
        assert_relative_eq!(round_to_tenth(48.35), 48.4);
        assert_relative_eq!(round_to_tenth(0.0), 0.0);
    }
}
