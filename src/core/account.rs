use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an account in the transaction network.
///
/// An account is any string appearing in a sender or receiver field of
/// the input batch. There is no separate account entity; membership in
/// the analysis is derived from the transactions themselves.
///
/// # Examples
///
/// ```
/// use forensics_engine::core::account::AccountId;
///
/// let mule = AccountId::new("ACC-0451");
/// let merchant = AccountId::new("SHOP-MAIN");
/// assert_ne!(mule, merchant);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Create a new account identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation of this account ID.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the identifier is the empty string.
    ///
    /// Empty identifiers are rejected at ingestion; this exists so the
    /// validation layer can check without allocating.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_equality() {
        let a = AccountId::new("ACC-001");
        let b = AccountId::new("ACC-001");
        let c = AccountId::new("ACC-002");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_account_display() {
        let a = AccountId::new("ACC-042");
        assert_eq!(format!("{}", a), "ACC-042");
    }

    #[test]
    fn test_account_ordering() {
        let a = AccountId::new("ACC-001");
        let b = AccountId::new("ACC-002");
        assert!(a < b);
    }

    #[test]
    fn test_empty_detection() {
        assert!(AccountId::new("").is_empty());
        assert!(!AccountId::new("X").is_empty());
    }
}
