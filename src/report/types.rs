use crate::detection::ring::PatternType;
use serde::{Deserialize, Serialize};

/// One entry in the `suspicious_accounts` array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuspiciousAccount {
    pub account_id: String,
    /// Suspicion score in [0, 100], one decimal place.
    pub suspicion_score: f64,
    /// Fine-grained pattern labels, sorted ascending.
    pub detected_patterns: Vec<String>,
    /// The first ring this account appeared in, if any survives
    /// deduplication unchanged.
    pub ring_id: Option<String>,
}

/// One entry in the `fraud_rings` array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudRing {
    pub ring_id: String,
    pub member_accounts: Vec<String>,
    pub pattern_type: PatternType,
    /// Mean of member suspicion scores in [0, 100], one decimal place.
    pub risk_score: f64,
    pub member_count: usize,
}

/// Top-level summary block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub total_accounts_analyzed: usize,
    pub suspicious_accounts_flagged: usize,
    pub fraud_rings_detected: usize,
    /// Wall-clock seconds for the full pipeline, three decimal places.
    pub processing_time_seconds: f64,
}

/// Input transaction echoed back for timeline consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub transaction_id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub amount: f64,
    pub timestamp: String,
}

/// The complete forensic report for one analyzed batch.
///
/// Serializes to the stable JSON contract: accounts descending by
/// score, rings deduplicated by member set in emission order, and the
/// summary counts matching the array lengths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub suspicious_accounts: Vec<SuspiciousAccount>,
    pub fraud_rings: Vec<FraudRing>,
    pub summary: Summary,
    /// Optional echo of the input batch; omitted when not requested.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transactions: Vec<TransactionRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_serializes_to_contract_keys() {
        let report = AnalysisReport {
            suspicious_accounts: vec![SuspiciousAccount {
                account_id: "A".to_string(),
                suspicion_score: 40.0,
                detected_patterns: vec!["cycle_length_3".to_string()],
                ring_id: Some("RING_001".to_string()),
            }],
            fraud_rings: vec![FraudRing {
                ring_id: "RING_001".to_string(),
                member_accounts: vec!["A".to_string(), "B".to_string(), "C".to_string()],
                pattern_type: PatternType::Cycle,
                risk_score: 40.0,
                member_count: 3,
            }],
            summary: Summary {
                total_accounts_analyzed: 3,
                suspicious_accounts_flagged: 1,
                fraud_rings_detected: 1,
                processing_time_seconds: 0.012,
            },
            transactions: Vec::new(),
        };

        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&report).unwrap()).unwrap();
        assert_eq!(json["suspicious_accounts"][0]["account_id"], "A");
        assert_eq!(json["fraud_rings"][0]["pattern_type"], "cycle");
        assert_eq!(json["fraud_rings"][0]["member_count"], 3);
        assert_eq!(json["summary"]["fraud_rings_detected"], 1);
        // Empty transactions array is omitted entirely.
        assert!(json.get("transactions").is_none());
    }

    #[test]
    fn test_null_ring_id_serializes() {
        let account = SuspiciousAccount {
            account_id: "A".to_string(),
            suspicion_score: 40.0,
            detected_patterns: Vec::new(),
            ring_id: None,
        };
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&account).unwrap()).unwrap();
        assert!(json["ring_id"].is_null());
    }
}
