use crate::core::config::DetectionConfig;
use crate::core::transaction::TransactionSet;
use crate::detection::run_all_detectors;
use crate::graph::transaction_graph::TransactionGraph;
use crate::report::assembler::assemble_report;
use crate::report::types::AnalysisReport;
use crate::scoring::engine::{attach_risk_scores, score_accounts};
use log::info;
use std::time::Instant;

/// The full analysis pipeline over one validated transaction batch.
///
/// Runs the straight-line fold: graph + degree map → detectors in fixed
/// order → account scoring → ring risk enrichment → report assembly.
/// Each analysis is self-contained; nothing persists between calls.
///
/// # Examples
///
/// ```
/// use forensics_engine::core::account::AccountId;
/// use forensics_engine::core::transaction::{Transaction, TransactionSet};
/// use forensics_engine::engine::AnalysisEngine;
/// use chrono::{TimeZone, Utc};
/// use rust_decimal_macros::dec;
///
/// let mut set = TransactionSet::new();
/// let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
/// set.add(Transaction::new("T1", AccountId::new("A"), AccountId::new("B"), dec!(100), at));
///
/// let report = AnalysisEngine::new().analyze(&set);
/// assert_eq!(report.summary.total_accounts_analyzed, 2);
/// assert!(report.suspicious_accounts.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct AnalysisEngine {
    config: DetectionConfig,
}

impl AnalysisEngine {
    /// Engine with the calibrated default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with custom thresholds and weights.
    pub fn with_config(config: DetectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Analyze a validated batch and produce the forensic report.
    pub fn analyze(&self, set: &TransactionSet) -> AnalysisReport {
        self.run(set, false)
    }

    /// As [`AnalysisEngine::analyze`], additionally echoing the input
    /// transactions in the report for timeline consumers.
    pub fn analyze_with_transactions(&self, set: &TransactionSet) -> AnalysisReport {
        self.run(set, true)
    }

    fn run(&self, set: &TransactionSet, include_transactions: bool) -> AnalysisReport {
        let started = Instant::now();

        let graph = TransactionGraph::from_transactions(set);
        let degrees = graph.degree_map();
        info!(
            "analyzing {} transaction(s) across {} account(s)",
            set.len(),
            graph.node_count()
        );

        let rings = run_all_detectors(&graph, set, &degrees, &self.config);
        let scores = score_accounts(&rings, &graph, set, &self.config);
        let scored_rings = attach_risk_scores(rings, &scores, &self.config);

        let report = assemble_report(
            &scored_rings,
            &scores,
            &graph,
            started.elapsed().as_secs_f64(),
            include_transactions.then_some(set),
        );
        info!(
            "flagged {} account(s) in {} ring(s)",
            report.summary.suspicious_accounts_flagged,
            report.summary.fraud_rings_detected
        );
        report
    }
}
