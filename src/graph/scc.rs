use crate::core::account::AccountId;
use crate::graph::transaction_graph::TransactionGraph;
use std::collections::{HashMap, HashSet};

/// A strongly connected component of the transaction graph.
///
/// Every account in an SCC can reach every other through directed
/// transaction chains, which is the precondition for circular fund
/// routing. Cycle enumeration is restricted to components with more
/// than one member.
#[derive(Debug, Clone)]
pub struct StronglyConnectedComponent {
    pub accounts: Vec<AccountId>,
}

impl StronglyConnectedComponent {
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// True when this component can contain a directed cycle of length
    /// two or more.
    pub fn is_cyclic_candidate(&self) -> bool {
        self.accounts.len() > 1
    }

    pub fn member_set(&self) -> HashSet<AccountId> {
        self.accounts.iter().cloned().collect()
    }
}

/// Find all strongly connected components using Tarjan's algorithm.
///
/// Nodes are visited in sorted account order so the component list, and
/// everything downstream of it, is deterministic for a given graph.
pub fn find_sccs(graph: &TransactionGraph) -> Vec<StronglyConnectedComponent> {
    let adj = graph.adjacency_list();
    let accounts = graph.sorted_nodes();

    let mut state = TarjanState {
        index_counter: 0,
        stack: Vec::new(),
        on_stack: HashMap::new(),
        indices: HashMap::new(),
        lowlinks: HashMap::new(),
        result: Vec::new(),
    };

    for account in &accounts {
        if !state.indices.contains_key(account) {
            strongconnect(account, &adj, &mut state);
        }
    }

    state
        .result
        .into_iter()
        .map(|accounts| StronglyConnectedComponent { accounts })
        .collect()
}

struct TarjanState {
    index_counter: usize,
    stack: Vec<AccountId>,
    on_stack: HashMap<AccountId, bool>,
    indices: HashMap<AccountId, usize>,
    lowlinks: HashMap<AccountId, usize>,
    result: Vec<Vec<AccountId>>,
}

fn strongconnect(
    v: &AccountId,
    adj: &HashMap<AccountId, Vec<AccountId>>,
    state: &mut TarjanState,
) {
    state.indices.insert(v.clone(), state.index_counter);
    state.lowlinks.insert(v.clone(), state.index_counter);
    state.index_counter += 1;
    state.stack.push(v.clone());
    state.on_stack.insert(v.clone(), true);

    if let Some(successors) = adj.get(v) {
        for w in successors {
            if !state.indices.contains_key(w) {
                strongconnect(w, adj, state);
                let low_w = state.lowlinks[w];
                let low_v = state.lowlinks[v];
                state.lowlinks.insert(v.clone(), low_v.min(low_w));
            } else if *state.on_stack.get(w).unwrap_or(&false) {
                let idx_w = state.indices[w];
                let low_v = state.lowlinks[v];
                state.lowlinks.insert(v.clone(), low_v.min(idx_w));
            }
        }
    }

    // If v is a root node, pop the stack and emit an SCC
    if state.lowlinks[v] == state.indices[v] {
        let mut component = Vec::new();
        while let Some(w) = state.stack.pop() {
            state.on_stack.insert(w.clone(), false);
            let done = w == *v;
            component.push(w);
            if done {
                break;
            }
        }
        component.sort();
        state.result.push(component);
    }
}
