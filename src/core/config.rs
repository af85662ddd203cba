use chrono::Duration;

/// Tunable parameters for the detection and scoring pipeline.
///
/// The defaults are the calibrated production values; every threshold
/// the detectors or the scoring engine consult lives here so a host can
/// tighten or relax the model without touching algorithm code.
///
/// # Examples
///
/// ```
/// use forensics_engine::core::config::DetectionConfig;
///
/// let mut config = DetectionConfig::default();
/// config.smurfing_min_partners = 5; // more sensitive smurfing detection
/// assert_eq!(config.min_cycle_length, 3);
/// ```
#[derive(Debug, Clone)]
pub struct DetectionConfig {
    /// Shortest cycle reported by the cycle detector, in edges.
    pub min_cycle_length: usize,
    /// Longest cycle reported by the cycle detector, in edges.
    pub max_cycle_length: usize,

    /// Width of the smurfing sliding window (inclusive).
    pub smurfing_window: Duration,
    /// Minimum distinct counterparties in one window to flag smurfing.
    pub smurfing_min_partners: usize,

    /// Minimum shell-chain length, in edges.
    pub shell_min_hops: usize,
    /// Maximum shell-chain length, in edges.
    pub shell_max_hops: usize,
    /// Maximum combined degree for an interior node of a shell chain.
    pub shell_max_degree: usize,

    /// Width of the velocity-burst window.
    pub velocity_window: Duration,
    /// Minimum transactions in one window to flag a velocity burst.
    pub velocity_min_transactions: usize,

    /// Minimum account lifetime for the merchant heuristic.
    pub merchant_min_lifetime: Duration,
    /// Maximum amount coefficient of variation for merchant-like activity.
    pub merchant_amount_cv_max: f64,
    /// Maximum inter-arrival-time coefficient of variation for
    /// merchant-like activity.
    pub merchant_spacing_cv_max: f64,

    /// Score delta for cycle ring membership.
    pub score_cycle: f64,
    /// Score delta for smurfing ring membership.
    pub score_smurfing: f64,
    /// Score delta for layered-shell ring membership.
    pub score_shell: f64,
    /// Score delta for a velocity burst (gated on ring membership).
    pub score_velocity: f64,
    /// Score delta for a degree-centrality anomaly (gated on ring membership).
    pub score_centrality: f64,
    /// Negative score delta for merchant-like accounts (false-positive
    /// reduction, gated on ring membership).
    pub score_fp_merchant: f64,

    /// Lower clamp bound for account and ring scores.
    pub score_min: f64,
    /// Upper clamp bound for account and ring scores.
    pub score_max: f64,

    /// Fraction of highest in-degree nodes flagged by the centrality signal.
    pub centrality_top_fraction: f64,

    /// Prefix for generated ring identifiers.
    pub ring_id_prefix: String,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_cycle_length: 3,
            max_cycle_length: 5,
            smurfing_window: Duration::hours(72),
            smurfing_min_partners: 10,
            shell_min_hops: 3,
            shell_max_hops: 5,
            shell_max_degree: 3,
            velocity_window: Duration::hours(24),
            velocity_min_transactions: 10,
            merchant_min_lifetime: Duration::days(30),
            merchant_amount_cv_max: 0.3,
            merchant_spacing_cv_max: 0.5,
            score_cycle: 40.0,
            score_smurfing: 30.0,
            score_shell: 25.0,
            score_velocity: 20.0,
            score_centrality: 10.0,
            score_fp_merchant: -25.0,
            score_min: 0.0,
            score_max: 100.0,
            centrality_top_fraction: 0.05,
            ring_id_prefix: "RING".to_string(),
        }
    }
}

impl DetectionConfig {
    /// Clamp a raw score into the configured band.
    pub fn clamp_score(&self, score: f64) -> f64 {
        score.clamp(self.score_min, self.score_max)
    }
}
