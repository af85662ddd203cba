//! Pattern detectors and the ring model they emit.
//!
//! The three detectors run in the fixed order cycles → smurfing →
//! shells, drawing ring ids from one shared [`ring::RingSequence`].
//! That order is part of the output contract: it fixes ring numbering
//! and therefore the first ring assigned to each account by the
//! scoring engine.

pub mod cycles;
pub mod ring;
pub mod shells;
pub mod smurfing;

use crate::core::account::AccountId;
use crate::core::config::DetectionConfig;
use crate::core::transaction::TransactionSet;
use crate::detection::ring::{RawRing, RingSequence};
use crate::graph::transaction_graph::{DegreeMap, TransactionGraph};
use log::debug;
use std::collections::{BTreeSet, HashSet};

/// Execute all three detectors in sequence over one analysis frame.
///
/// The union is deduplicated by member set before scoring, first
/// emission winning, so a group flagged by two detectors contributes
/// its pattern delta once, under the earlier ring id and pattern type.
pub fn run_all_detectors(
    graph: &TransactionGraph,
    set: &TransactionSet,
    degrees: &DegreeMap,
    config: &DetectionConfig,
) -> Vec<RawRing> {
    let mut sequence = RingSequence::new(config.ring_id_prefix.clone());
    let mut rings = Vec::new();

    let cycle_rings = cycles::detect_cycles(graph, config, &mut sequence);
    debug!("cycle detector emitted {} ring(s)", cycle_rings.len());
    rings.extend(cycle_rings);

    let smurf_rings = smurfing::detect_smurfing(set, config, &mut sequence);
    debug!("smurfing detector emitted {} ring(s)", smurf_rings.len());
    rings.extend(smurf_rings);

    let shell_rings = shells::detect_layered_shells(graph, degrees, config, &mut sequence);
    debug!("shell detector emitted {} ring(s)", shell_rings.len());
    rings.extend(shell_rings);

    dedupe_by_member_set(rings)
}

fn dedupe_by_member_set(rings: Vec<RawRing>) -> Vec<RawRing> {
    let mut seen: HashSet<BTreeSet<AccountId>> = HashSet::new();
    rings
        .into_iter()
        .filter(|ring| seen.insert(ring.member_set()))
        .collect()
}
