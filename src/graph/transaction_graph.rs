use crate::core::account::AccountId;
use crate::core::transaction::{Transaction, TransactionSet};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};

/// Account → combined (in + out) degree, computed once per graph.
pub type DegreeMap = HashMap<AccountId, usize>;

/// Aggregated edge between one ordered pair of accounts.
///
/// All transactions from the same sender to the same receiver share one
/// edge; the contributing transactions are kept in input order.
/// Invariant: `total_amount` equals the sum of the aggregated amounts.
#[derive(Debug, Clone)]
pub struct EdgeData {
    total_amount: Decimal,
    transactions: Vec<Transaction>,
}

impl EdgeData {
    fn new(tx: Transaction) -> Self {
        Self {
            total_amount: tx.amount(),
            transactions: vec![tx],
        }
    }

    fn absorb(&mut self, tx: Transaction) {
        self.total_amount += tx.amount();
        self.transactions.push(tx);
    }

    /// Sum of all transaction amounts aggregated on this edge.
    pub fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    /// The contributing transactions, in input order.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }
}

/// A directed graph of money movement between accounts.
///
/// Nodes are the union of all senders and receivers; there is at most
/// one edge per ordered account pair. Self-loops are permitted and count
/// toward both the in- and out-degree of their account.
///
/// The graph is built once by folding the transaction table in input
/// order and is read-only thereafter.
///
/// # Examples
///
/// ```
/// use forensics_engine::core::account::AccountId;
/// use forensics_engine::core::transaction::{Transaction, TransactionSet};
/// use forensics_engine::graph::transaction_graph::TransactionGraph;
/// use chrono::{TimeZone, Utc};
/// use rust_decimal_macros::dec;
///
/// let mut set = TransactionSet::new();
/// let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
/// set.add(Transaction::new("T1", AccountId::new("A"), AccountId::new("B"), dec!(100), at));
/// set.add(Transaction::new("T2", AccountId::new("A"), AccountId::new("B"), dec!(50), at));
///
/// let graph = TransactionGraph::from_transactions(&set);
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TransactionGraph {
    /// Aggregated edges: (sender, receiver) -> edge data
    edges: HashMap<(AccountId, AccountId), EdgeData>,
    /// All accounts appearing as sender or receiver
    nodes: HashSet<AccountId>,
}

impl TransactionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a validated transaction set into a graph, in input order.
    pub fn from_transactions(set: &TransactionSet) -> Self {
        let mut graph = Self::new();
        for tx in set.transactions() {
            graph.add_transaction(tx.clone());
        }
        graph
    }

    /// Add a single transaction, aggregating onto an existing edge when
    /// the ordered pair has been seen before.
    pub fn add_transaction(&mut self, tx: Transaction) {
        self.nodes.insert(tx.sender().clone());
        self.nodes.insert(tx.receiver().clone());

        let key = (tx.sender().clone(), tx.receiver().clone());
        match self.edges.get_mut(&key) {
            Some(edge) => edge.absorb(tx),
            None => {
                self.edges.insert(key, EdgeData::new(tx));
            }
        }
    }

    /// Number of unique accounts in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of aggregated edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All accounts in the graph.
    pub fn nodes(&self) -> &HashSet<AccountId> {
        &self.nodes
    }

    /// All accounts, sorted. Traversals iterate this to keep ring
    /// numbering stable across runs.
    pub fn sorted_nodes(&self) -> Vec<AccountId> {
        let mut nodes: Vec<AccountId> = self.nodes.iter().cloned().collect();
        nodes.sort();
        nodes
    }

    /// The aggregated edge from `sender` to `receiver`, if any.
    pub fn edge(&self, sender: &AccountId, receiver: &AccountId) -> Option<&EdgeData> {
        self.edges.get(&(sender.clone(), receiver.clone()))
    }

    /// Aggregated amount from `sender` to `receiver`, zero when no edge.
    pub fn edge_total(&self, sender: &AccountId, receiver: &AccountId) -> Decimal {
        self.edge(sender, receiver)
            .map(EdgeData::total_amount)
            .unwrap_or(Decimal::ZERO)
    }

    /// Build an adjacency list with sorted successor vectors.
    /// Returns: account -> [receiver, ...] for every node in the graph.
    pub fn adjacency_list(&self) -> HashMap<AccountId, Vec<AccountId>> {
        let mut adj: HashMap<AccountId, Vec<AccountId>> = HashMap::new();
        for node in &self.nodes {
            adj.entry(node.clone()).or_default();
        }
        for (sender, receiver) in self.edges.keys() {
            adj.entry(sender.clone()).or_default().push(receiver.clone());
        }
        for successors in adj.values_mut() {
            successors.sort();
        }
        adj
    }

    /// Unweighted out-degree of an account.
    pub fn out_degree(&self, account: &AccountId) -> usize {
        self.edges.keys().filter(|(s, _)| s == account).count()
    }

    /// Unweighted in-degree of an account.
    pub fn in_degree(&self, account: &AccountId) -> usize {
        self.edges.keys().filter(|(_, r)| r == account).count()
    }

    /// Combined in + out degree for every node, computed in one pass.
    /// A self-loop contributes to both degrees of its account.
    pub fn degree_map(&self) -> DegreeMap {
        let mut degrees: DegreeMap =
            self.nodes.iter().map(|n| (n.clone(), 0)).collect();
        for (sender, receiver) in self.edges.keys() {
            if let Some(d) = degrees.get_mut(sender) {
                *d += 1;
            }
            if let Some(d) = degrees.get_mut(receiver) {
                *d += 1;
            }
        }
        degrees
    }

    /// In-degree for every node, computed in one pass. Used by the
    /// centrality signal.
    pub fn in_degree_map(&self) -> HashMap<AccountId, usize> {
        let mut degrees: HashMap<AccountId, usize> =
            self.nodes.iter().map(|n| (n.clone(), 0)).collect();
        for (_, receiver) in self.edges.keys() {
            if let Some(d) = degrees.get_mut(receiver) {
                *d += 1;
            }
        }
        degrees
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn ts(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap()
    }

    fn tx(id: &str, from: &str, to: &str, amount: Decimal, hour: u32) -> Transaction {
        Transaction::new(id, AccountId::new(from), AccountId::new(to), amount, ts(hour))
    }

    #[test]
    fn test_graph_basic() {
        let mut set = TransactionSet::new();
        set.add(tx("T1", "A", "B", dec!(100), 9));
        set.add(tx("T2", "B", "C", dec!(200), 10));

        let graph = TransactionGraph::from_transactions(&set);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(
            graph.edge_total(&AccountId::new("A"), &AccountId::new("B")),
            dec!(100)
        );
    }

    #[test]
    fn test_edge_aggregation_preserves_order_and_total() {
        let mut set = TransactionSet::new();
        set.add(tx("T1", "A", "B", dec!(100), 9));
        set.add(tx("T2", "A", "B", dec!(50), 10));
        set.add(tx("T3", "A", "B", dec!(25), 11));

        let graph = TransactionGraph::from_transactions(&set);
        let edge = graph
            .edge(&AccountId::new("A"), &AccountId::new("B"))
            .unwrap();
        assert_eq!(edge.total_amount(), dec!(175));
        let ids: Vec<&str> = edge
            .transactions()
            .iter()
            .map(Transaction::transaction_id)
            .collect();
        assert_eq!(ids, vec!["T1", "T2", "T3"]);
    }

    #[test]
    fn test_degree_map_counts_both_directions() {
        let mut set = TransactionSet::new();
        set.add(tx("T1", "A", "B", dec!(100), 9));
        set.add(tx("T2", "B", "C", dec!(100), 10));
        set.add(tx("T3", "C", "B", dec!(100), 11));

        let graph = TransactionGraph::from_transactions(&set);
        let degrees = graph.degree_map();
        assert_eq!(degrees[&AccountId::new("A")], 1); // out only
        assert_eq!(degrees[&AccountId::new("B")], 3); // in A, out C, in C
        assert_eq!(degrees[&AccountId::new("C")], 2);
    }

    #[test]
    fn test_self_loop_counts_in_and_out() {
        let mut set = TransactionSet::new();
        set.add(tx("T1", "A", "A", dec!(100), 9));

        let graph = TransactionGraph::from_transactions(&set);
        assert_eq!(graph.node_count(), 1);
        let degrees = graph.degree_map();
        assert_eq!(degrees[&AccountId::new("A")], 2);
        assert_eq!(graph.in_degree_map()[&AccountId::new("A")], 1);
    }

    #[test]
    fn test_adjacency_list_sorted() {
        let mut set = TransactionSet::new();
        set.add(tx("T1", "A", "C", dec!(100), 9));
        set.add(tx("T2", "A", "B", dec!(100), 10));

        let graph = TransactionGraph::from_transactions(&set);
        let adj = graph.adjacency_list();
        let successors: Vec<&str> =
            adj[&AccountId::new("A")].iter().map(AccountId::as_str).collect();
        assert_eq!(successors, vec!["B", "C"]);
        assert!(adj[&AccountId::new("B")].is_empty());
    }

    #[test]
    fn test_empty_set_empty_graph() {
        let graph = TransactionGraph::from_transactions(&TransactionSet::new());
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
    }
}
