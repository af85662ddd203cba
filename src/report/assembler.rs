use crate::core::transaction::TransactionSet;
use crate::graph::transaction_graph::TransactionGraph;
use crate::report::types::{
    AnalysisReport, FraudRing, Summary, SuspiciousAccount, TransactionRecord,
};
use crate::scoring::engine::{AccountScores, ScoredRing};
use chrono::SecondsFormat;
use std::collections::{BTreeSet, HashSet};

/// Assemble the final report from scored rings and account scores.
///
/// Rings are deduplicated by member set, first emission winning, so two
/// detectors flagging the same group produce a single entry under the
/// earlier ring id and pattern type. Accounts are ordered by score
/// descending with account id ascending as the tie-break.
pub fn assemble_report(
    scored_rings: &[ScoredRing],
    scores: &AccountScores,
    graph: &TransactionGraph,
    processing_time_seconds: f64,
    echo: Option<&TransactionSet>,
) -> AnalysisReport {
    let suspicious_accounts: Vec<SuspiciousAccount> = scores
        .ranked_accounts()
        .into_iter()
        .map(|(account, score)| SuspiciousAccount {
            account_id: account.to_string(),
            suspicion_score: score,
            detected_patterns: scores
                .patterns(&account)
                .map(|labels| labels.iter().cloned().collect())
                .unwrap_or_default(),
            ring_id: scores.first_ring(&account).map(str::to_string),
        })
        .collect();

    let mut seen_member_sets: HashSet<BTreeSet<String>> = HashSet::new();
    let mut fraud_rings = Vec::new();
    for scored in scored_rings {
        let member_set: BTreeSet<String> = scored
            .ring
            .member_accounts
            .iter()
            .map(|account| account.to_string())
            .collect();
        if !seen_member_sets.insert(member_set) {
            continue;
        }
        fraud_rings.push(FraudRing {
            ring_id: scored.ring.ring_id.clone(),
            member_accounts: scored
                .ring
                .member_accounts
                .iter()
                .map(|account| account.to_string())
                .collect(),
            pattern_type: scored.ring.pattern_type,
            risk_score: scored.risk_score,
            member_count: scored.ring.member_count(),
        });
    }

    let summary = Summary {
        total_accounts_analyzed: graph.node_count(),
        suspicious_accounts_flagged: suspicious_accounts.len(),
        fraud_rings_detected: fraud_rings.len(),
        processing_time_seconds: (processing_time_seconds * 1000.0).round() / 1000.0,
    };

    let transactions = echo.map(echo_transactions).unwrap_or_default();

    AnalysisReport {
        suspicious_accounts,
        fraud_rings,
        summary,
        transactions,
    }
}

fn echo_transactions(set: &TransactionSet) -> Vec<TransactionRecord> {
    set.transactions()
        .iter()
        .map(|tx| TransactionRecord {
            transaction_id: tx.transaction_id().to_string(),
            sender_id: tx.sender().to_string(),
            receiver_id: tx.receiver().to_string(),
            amount: tx.amount().to_string().parse::<f64>().unwrap_or(0.0),
            timestamp: tx
                .timestamp()
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        })
        .collect()
}
