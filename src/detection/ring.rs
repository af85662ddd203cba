use crate::core::account::AccountId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// The class of money-muling behavior a ring was detected by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    /// Circular fund routing back to the origin account.
    Cycle,
    /// Fan-in or fan-out concentration around a focus account.
    Smurfing,
    /// Linear transit through low-degree shell intermediaries.
    LayeredShell,
    /// A ring implicated by more than one pattern class.
    Hybrid,
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PatternType::Cycle => "cycle",
            PatternType::Smurfing => "smurfing",
            PatternType::LayeredShell => "layered_shell",
            PatternType::Hybrid => "hybrid",
        };
        write!(f, "{}", label)
    }
}

/// A group of accounts jointly implicated by a single detector emission.
///
/// `member_accounts` is ordered: cycle order for cycles, path order for
/// shell chains, and focus-first for smurfing. `patterns_by_account`
/// carries the fine-grained labels (e.g. `cycle_length_4`) the scoring
/// engine folds into each account's detected-pattern set.
#[derive(Debug, Clone)]
pub struct RawRing {
    pub ring_id: String,
    pub member_accounts: Vec<AccountId>,
    pub pattern_type: PatternType,
    pub patterns_by_account: HashMap<AccountId, BTreeSet<String>>,
}

impl RawRing {
    /// Build a ring where every member carries the same single label,
    /// which is how all three detectors emit.
    pub fn uniform(
        ring_id: String,
        member_accounts: Vec<AccountId>,
        pattern_type: PatternType,
        label: &str,
    ) -> Self {
        let patterns_by_account = member_accounts
            .iter()
            .map(|acc| (acc.clone(), BTreeSet::from([label.to_string()])))
            .collect();
        Self {
            ring_id,
            member_accounts,
            pattern_type,
            patterns_by_account,
        }
    }

    /// The member set, order-insensitive. Rings are considered identical
    /// under this key for deduplication.
    pub fn member_set(&self) -> BTreeSet<AccountId> {
        self.member_accounts.iter().cloned().collect()
    }

    pub fn member_count(&self) -> usize {
        self.member_accounts.len()
    }
}

/// Monotonic ring-id allocator shared by all detectors in one analysis.
///
/// Ids are zero-padded to at least three digits (`RING_001`,
/// `RING_042`, `RING_1000`) and the fixed detector order cycles →
/// smurfing → shells governs their progression, so the numbering is
/// part of the output contract, not an incidental artifact.
#[derive(Debug)]
pub struct RingSequence {
    prefix: String,
    issued: usize,
}

impl RingSequence {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            issued: 0,
        }
    }

    /// Allocate the next ring id.
    pub fn next_id(&mut self) -> String {
        self.issued += 1;
        format!("{}_{:03}", self.prefix, self.issued)
    }

    /// Number of ids issued so far.
    pub fn issued(&self) -> usize {
        self.issued
    }
}
