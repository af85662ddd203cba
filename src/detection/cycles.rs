use crate::core::account::AccountId;
use crate::core::config::DetectionConfig;
use crate::detection::ring::{PatternType, RawRing, RingSequence};
use crate::graph::scc::find_sccs;
use crate::graph::transaction_graph::TransactionGraph;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Enumerate simple directed cycles within the configured length band
/// and emit one ring per distinct member set.
///
/// # Algorithm
///
/// A length-bounded variant of Johnson's circuit search: Tarjan's SCC
/// decomposition first restricts the search space, then within each
/// component a DFS rooted at every node explores only accounts ordered
/// after the root, so each circuit is discovered exactly once with its
/// smallest account first. Paths are abandoned as soon as they exceed
/// the maximum length, which keeps the search bounded on dense graphs.
///
/// Cycles are equivalent under set-of-members; the first rotation
/// observed fixes the stored member order. Every member is labeled
/// `cycle_length_{L}`.
pub fn detect_cycles(
    graph: &TransactionGraph,
    config: &DetectionConfig,
    sequence: &mut RingSequence,
) -> Vec<RawRing> {
    let adj = graph.adjacency_list();
    let mut rings = Vec::new();
    let mut seen_member_sets: HashSet<BTreeSet<AccountId>> = HashSet::new();

    for component in find_sccs(graph) {
        if !component.is_cyclic_candidate() {
            continue;
        }
        let members = component.member_set();

        // Roots in sorted order; each circuit is found from its
        // smallest member, so ring numbering is stable per graph.
        for start in &component.accounts {
            let mut path = vec![start.clone()];
            let mut path_set = HashSet::from([start.clone()]);
            dfs_circuits(
                start,
                start,
                &adj,
                &members,
                config,
                &mut path,
                &mut path_set,
                &mut seen_member_sets,
                sequence,
                &mut rings,
            );
        }
    }

    rings
}

fn dfs_circuits(
    current: &AccountId,
    start: &AccountId,
    adj: &HashMap<AccountId, Vec<AccountId>>,
    scc_members: &HashSet<AccountId>,
    config: &DetectionConfig,
    path: &mut Vec<AccountId>,
    path_set: &mut HashSet<AccountId>,
    seen_member_sets: &mut HashSet<BTreeSet<AccountId>>,
    sequence: &mut RingSequence,
    rings: &mut Vec<RawRing>,
) {
    let Some(successors) = adj.get(current) else {
        return;
    };

    for next in successors {
        if !scc_members.contains(next) {
            continue;
        }
        if next == start {
            let length = path.len();
            if length >= config.min_cycle_length && length <= config.max_cycle_length {
                let key: BTreeSet<AccountId> = path.iter().cloned().collect();
                if seen_member_sets.insert(key) {
                    let label = format!("cycle_length_{}", length);
                    rings.push(RawRing::uniform(
                        sequence.next_id(),
                        path.clone(),
                        PatternType::Cycle,
                        &label,
                    ));
                }
            }
        } else if next > start
            && !path_set.contains(next)
            && path.len() < config.max_cycle_length
        {
            path.push(next.clone());
            path_set.insert(next.clone());
            dfs_circuits(
                next,
                start,
                adj,
                scc_members,
                config,
                path,
                path_set,
                seen_member_sets,
                sequence,
                rings,
            );
            path.pop();
            path_set.remove(next);
        }
    }
}
