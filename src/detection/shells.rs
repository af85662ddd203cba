use crate::core::account::AccountId;
use crate::core::config::DetectionConfig;
use crate::detection::ring::{PatternType, RawRing, RingSequence};
use crate::graph::transaction_graph::{DegreeMap, TransactionGraph};
use std::collections::{BTreeSet, HashSet};

/// Enumerate layered-shell chains: directed simple paths of 3–5 edges
/// whose interior nodes all have combined degree at or below the shell
/// threshold.
///
/// # Algorithm
///
/// An explicit-stack DFS runs from every account with at least one
/// outgoing edge, tracking the path and its visited set so no account
/// repeats. Any path at qualifying length whose intermediaries pass the
/// degree test is emitted, deduplicated by member set across all
/// sources. Endpoints are deliberately unconstrained: the accounts that
/// feed a chain and collect from it are usually well-connected; only
/// the pass-through intermediaries look like shells.
pub fn detect_layered_shells(
    graph: &TransactionGraph,
    degrees: &DegreeMap,
    config: &DetectionConfig,
    sequence: &mut RingSequence,
) -> Vec<RawRing> {
    let adj = graph.adjacency_list();
    let mut rings = Vec::new();
    let mut seen_member_sets: HashSet<BTreeSet<AccountId>> = HashSet::new();

    let mut sources: Vec<&AccountId> = adj
        .iter()
        .filter(|(_, successors)| !successors.is_empty())
        .map(|(account, _)| account)
        .collect();
    sources.sort();

    for source in sources {
        let mut stack: Vec<(Vec<AccountId>, HashSet<AccountId>)> = vec![(
            vec![source.clone()],
            HashSet::from([source.clone()]),
        )];

        while let Some((path, visited)) = stack.pop() {
            let edges = path.len() - 1;

            if edges >= config.shell_min_hops && chain_is_shell(&path, degrees, config) {
                let member_set: BTreeSet<AccountId> = path.iter().cloned().collect();
                if !seen_member_sets.contains(&member_set) {
                    seen_member_sets.insert(member_set);
                    rings.push(RawRing::uniform(
                        sequence.next_id(),
                        path.clone(),
                        PatternType::LayeredShell,
                        "layered_shell_chain",
                    ));
                }
            }

            if edges < config.shell_max_hops {
                let current = &path[path.len() - 1];
                if let Some(successors) = adj.get(current) {
                    // Reverse push so the stack explores successors in
                    // ascending account order.
                    for next in successors.iter().rev() {
                        if !visited.contains(next) {
                            let mut next_path = path.clone();
                            next_path.push(next.clone());
                            let mut next_visited = visited.clone();
                            next_visited.insert(next.clone());
                            stack.push((next_path, next_visited));
                        }
                    }
                }
            }
        }
    }

    rings
}

/// Every interior node of the path must be a low-degree shell.
fn chain_is_shell(path: &[AccountId], degrees: &DegreeMap, config: &DetectionConfig) -> bool {
    path[1..path.len() - 1]
        .iter()
        .all(|account| degrees.get(account).copied().unwrap_or(0) <= config.shell_max_degree)
}
