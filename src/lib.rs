//! # forensics-engine
//!
//! Financial forensics engine detecting money-muling rings in batches
//! of transactions.
//!
//! Given a validated table of transfers, the engine folds it into a
//! directed account graph, runs three pattern detectors — bounded
//! simple-cycle enumeration, temporal smurfing windows, and
//! layered-shell chain search — and fuses their output with auxiliary
//! velocity, centrality and merchant signals into calibrated suspicion
//! scores per account and risk scores per ring.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: accounts, transactions, configuration
//! - **graph** — Transaction graph, strongly connected components
//! - **detection** — Cycle, smurfing and layered-shell ring detectors
//! - **scoring** — Auxiliary signals and the weighted scoring model
//! - **report** — Deduplication, ordering and the JSON output contract
//! - **engine** — The straight-line analysis pipeline
//! - **simulation** — Scenario generation for benches and demos

pub mod core;
pub mod detection;
pub mod engine;
pub mod graph;
pub mod report;
pub mod scoring;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::account::AccountId;
    pub use crate::core::config::DetectionConfig;
    pub use crate::core::transaction::{Transaction, TransactionSet, ValidationError};
    pub use crate::engine::AnalysisEngine;
    pub use crate::graph::transaction_graph::TransactionGraph;
    pub use crate::report::types::AnalysisReport;
}
