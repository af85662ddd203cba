use crate::core::account::AccountId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single financial transaction between two accounts.
///
/// Represents the fact that `sender` moved `amount` to `receiver` at
/// `timestamp`. This is the atomic unit of the forensic analysis; the
/// detectors operate on a graph folded from collections of transactions.
///
/// Transactions are immutable once created. The sender and receiver may
/// be the same account (a self-transfer); the graph layer handles that
/// case explicitly.
///
/// # Examples
///
/// ```
/// use forensics_engine::core::account::AccountId;
/// use forensics_engine::core::transaction::Transaction;
/// use chrono::{TimeZone, Utc};
/// use rust_decimal_macros::dec;
///
/// let tx = Transaction::new(
///     "TX-00001",
///     AccountId::new("ACC-A"),
///     AccountId::new("ACC-B"),
///     dec!(2500),
///     Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
/// );
///
/// assert_eq!(tx.amount(), dec!(2500));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Caller-supplied unique identifier for this transaction.
    transaction_id: String,
    /// The account funds moved from.
    sender: AccountId,
    /// The account funds moved to.
    receiver: AccountId,
    /// The amount moved. Must be positive.
    amount: Decimal,
    /// When the transaction occurred.
    timestamp: DateTime<Utc>,
}

/// Errors raised while validating raw transaction input.
///
/// These belong to the ingestion contract: any of them must fail the
/// request before the analysis pipeline is invoked.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("transaction has an empty {field} field")]
    EmptyField { field: &'static str },
    #[error("transaction {transaction_id} has non-positive amount {amount}")]
    NonPositiveAmount {
        transaction_id: String,
        amount: Decimal,
    },
    #[error("duplicate transaction id {transaction_id}")]
    DuplicateTransactionId { transaction_id: String },
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// # Panics
    ///
    /// Panics if `amount` is not positive. Use [`Transaction::try_new`]
    /// when ingesting untrusted input.
    pub fn new(
        transaction_id: impl Into<String>,
        sender: AccountId,
        receiver: AccountId,
        amount: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Self {
        assert!(
            amount > Decimal::ZERO,
            "Transaction amount must be positive, got {}",
            amount
        );
        Self {
            transaction_id: transaction_id.into(),
            sender,
            receiver,
            amount,
            timestamp,
        }
    }

    /// Fallible constructor enforcing the ingestion contract on a single
    /// record: non-empty identifier fields and a strictly positive amount.
    pub fn try_new(
        transaction_id: impl Into<String>,
        sender: AccountId,
        receiver: AccountId,
        amount: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let transaction_id = transaction_id.into();
        if transaction_id.is_empty() {
            return Err(ValidationError::EmptyField {
                field: "transaction_id",
            });
        }
        if sender.is_empty() {
            return Err(ValidationError::EmptyField { field: "sender_id" });
        }
        if receiver.is_empty() {
            return Err(ValidationError::EmptyField {
                field: "receiver_id",
            });
        }
        if amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount {
                transaction_id,
                amount,
            });
        }
        Ok(Self {
            transaction_id,
            sender,
            receiver,
            amount,
            timestamp,
        })
    }

    // --- Accessors ---

    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    pub fn sender(&self) -> &AccountId {
        &self.sender
    }

    pub fn receiver(&self) -> &AccountId {
        &self.receiver
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// True when sender and receiver are the same account.
    pub fn is_self_transfer(&self) -> bool {
        self.sender == self.receiver
    }
}

/// The validated transaction table, in the order it was received.
///
/// Input order is significant: graph edges aggregate contributing
/// transactions in this order, and the report may echo it back.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionSet {
    transactions: Vec<Transaction>,
}

impl TransactionSet {
    pub fn new() -> Self {
        Self {
            transactions: Vec::new(),
        }
    }

    pub fn add(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    /// Build a validated set from individually valid transactions,
    /// rejecting duplicate transaction ids.
    pub fn from_transactions(
        transactions: Vec<Transaction>,
    ) -> Result<Self, ValidationError> {
        let mut seen = std::collections::HashSet::new();
        for tx in &transactions {
            if !seen.insert(tx.transaction_id().to_string()) {
                return Err(ValidationError::DuplicateTransactionId {
                    transaction_id: tx.transaction_id().to_string(),
                });
            }
        }
        Ok(Self { transactions })
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// All unique accounts referenced by this set, sorted.
    pub fn accounts(&self) -> Vec<AccountId> {
        let mut accounts: Vec<AccountId> = self
            .transactions
            .iter()
            .flat_map(|tx| [tx.sender().clone(), tx.receiver().clone()])
            .collect();
        accounts.sort();
        accounts.dedup();
        accounts
    }
}

impl FromIterator<Transaction> for TransactionSet {
    fn from_iter<T: IntoIterator<Item = Transaction>>(iter: T) -> Self {
        Self {
            transactions: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn ts(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap()
    }

    fn sample_transaction() -> Transaction {
        Transaction::new(
            "TX-001",
            AccountId::new("A"),
            AccountId::new("B"),
            dec!(1000),
            ts(9),
        )
    }

    #[test]
    fn test_transaction_creation() {
        let tx = sample_transaction();
        assert_eq!(tx.transaction_id(), "TX-001");
        assert_eq!(tx.sender().as_str(), "A");
        assert_eq!(tx.receiver().as_str(), "B");
        assert_eq!(tx.amount(), dec!(1000));
        assert!(!tx.is_self_transfer());
    }

    #[test]
    #[should_panic(expected = "must be positive")]
    fn test_transaction_zero_amount() {
        Transaction::new(
            "TX-002",
            AccountId::new("A"),
            AccountId::new("B"),
            Decimal::ZERO,
            ts(9),
        );
    }

    #[test]
    fn test_try_new_rejects_negative_amount() {
        let result = Transaction::try_new(
            "TX-003",
            AccountId::new("A"),
            AccountId::new("B"),
            dec!(-50),
            ts(9),
        );
        assert!(matches!(
            result,
            Err(ValidationError::NonPositiveAmount { .. })
        ));
    }

    #[test]
    fn test_try_new_rejects_empty_ids() {
        let result = Transaction::try_new(
            "",
            AccountId::new("A"),
            AccountId::new("B"),
            dec!(10),
            ts(9),
        );
        assert!(matches!(result, Err(ValidationError::EmptyField { .. })));

        let result = Transaction::try_new(
            "TX-004",
            AccountId::new(""),
            AccountId::new("B"),
            dec!(10),
            ts(9),
        );
        assert!(matches!(result, Err(ValidationError::EmptyField { .. })));
    }

    #[test]
    fn test_duplicate_transaction_id_rejected() {
        let result = TransactionSet::from_transactions(vec![
            sample_transaction(),
            sample_transaction(),
        ]);
        assert!(matches!(
            result,
            Err(ValidationError::DuplicateTransactionId { .. })
        ));
    }

    #[test]
    fn test_set_accounts_sorted_unique() {
        let mut set = TransactionSet::new();
        set.add(Transaction::new(
            "TX-1",
            AccountId::new("B"),
            AccountId::new("A"),
            dec!(100),
            ts(9),
        ));
        set.add(Transaction::new(
            "TX-2",
            AccountId::new("A"),
            AccountId::new("C"),
            dec!(200),
            ts(10),
        ));
        let accounts = set.accounts();
        assert_eq!(accounts.len(), 3);
        assert_eq!(accounts[0].as_str(), "A");
        assert_eq!(accounts[2].as_str(), "C");
    }

    #[test]
    fn test_self_transfer() {
        let tx = Transaction::new(
            "TX-5",
            AccountId::new("A"),
            AccountId::new("A"),
            dec!(10),
            ts(9),
        );
        assert!(tx.is_self_transfer());
    }
}
