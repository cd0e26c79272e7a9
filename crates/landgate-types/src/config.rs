//! Threshold configuration for the verification engine.
//!
//! Every cut-off the engine compares against lives here with a
//! production default, so deployments tune behaviour without code
//! changes. Components receive the sub-struct they need at
//! construction; nothing reads configuration globally.

use crate::boundary::GeoPoint;
use crate::outcome::ConfidenceLevel;
use serde::{Deserialize, Serialize};

/// Thresholds for spatial conflict classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictThresholds {
    /// IoU at or above which a pair is at least a warning.
    pub iou_warning: f64,
    /// IoU at or above which a pair is critical.
    pub iou_critical: f64,
    /// IoU at or above which a double sale is suspected.
    pub iou_double_sale: f64,
    /// Overlap percentage (of the smaller parcel) that flags a conflict.
    pub overlap_conflict_pct: f64,
    /// Overlap percentage that blocks the pipeline outright. Catches a
    /// small parcel swallowed by a much larger one, where IoU stays low.
    pub overlap_block_pct: f64,
    /// Budget for the boundary snapshot read.
    pub storage_timeout_ms: u64,
}

impl Default for ConflictThresholds {
    fn default() -> Self {
        Self {
            iou_warning: 0.05,
            iou_critical: 0.20,
            iou_double_sale: 0.50,
            overlap_conflict_pct: 5.0,
            overlap_block_pct: 50.0,
            storage_timeout_ms: 5_000,
        }
    }
}

/// Fraud heuristics configuration.
///
/// Penalties are multiplicative factors applied to a starting
/// confidence of 1.0; each failed check multiplies the running value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudConfig {
    /// OCR confidence below this triggers the low-OCR penalty.
    pub min_ocr_confidence: f64,
    pub low_ocr_penalty: f64,
    pub name_mismatch_penalty: f64,
    pub date_anomaly_penalty: f64,
    pub formatting_penalty: f64,
    pub no_match_penalty: f64,
    /// Fuzzy name similarity above this counts as a partial match.
    pub partial_match_threshold: f64,
    /// Fuzzy name similarity above this counts as an exact match.
    pub exact_match_threshold: f64,
    /// Documents older than this are treated as implausible.
    pub max_document_age_years: u32,
    /// Final confidence at or above this clears the document.
    pub clear_threshold: f64,
    /// Final confidence at or above this (but below clear) needs review.
    pub review_threshold: f64,
    /// Phrases whose presence is itself suspicious.
    pub suspicious_terms: Vec<String>,
    /// Terms anachronistic on documents older than `modern_term_age_years`.
    pub modern_terms: Vec<String>,
    pub modern_term_age_years: u32,
}

impl Default for FraudConfig {
    fn default() -> Self {
        Self {
            min_ocr_confidence: 0.5,
            low_ocr_penalty: 0.7,
            name_mismatch_penalty: 0.5,
            date_anomaly_penalty: 0.3,
            formatting_penalty: 0.5,
            no_match_penalty: 0.6,
            partial_match_threshold: 0.6,
            exact_match_threshold: 0.9,
            max_document_age_years: 99,
            clear_threshold: 0.85,
            review_threshold: 0.60,
            suspicious_terms: vec![
                "specimen".into(),
                "photoshop".into(),
                "edited copy".into(),
                "duplicate copy".into(),
                "void".into(),
            ],
            modern_terms: vec![
                "email".into(),
                "website".into(),
                "http".into(),
                "whatsapp".into(),
                "mobile money".into(),
                "digital address".into(),
            ],
            modern_term_age_years: 30,
        }
    }
}

/// Geographic bounds a parcel must fall within.
///
/// Default covers Ghana's mainland extent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionBounds {
    pub name: String,
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl RegionBounds {
    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.lat >= self.lat_min
            && point.lat <= self.lat_max
            && point.lon >= self.lon_min
            && point.lon <= self.lon_max
    }
}

impl Default for RegionBounds {
    fn default() -> Self {
        Self {
            name: "Ghana".into(),
            lat_min: 4.5,
            lat_max: 11.5,
            lon_min: -3.5,
            lon_max: 1.3,
        }
    }
}

/// Relative weight of each normative signal in the overall score.
///
/// Weights sum to 1.0. When a claim has no boundary the spatial weight
/// is redistributed proportionally across the other four signals.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SignalWeights {
    pub document: f64,
    pub fraud: f64,
    pub tampering: f64,
    pub gps: f64,
    pub spatial: f64,
}

impl SignalWeights {
    pub fn sum(&self) -> f64 {
        self.document + self.fraud + self.tampering + self.gps + self.spatial
    }

    /// Weights to use when no spatial signal is available.
    pub fn without_spatial(&self) -> Self {
        let scale = 1.0 / (1.0 - self.spatial);
        Self {
            document: self.document * scale,
            fraud: self.fraud * scale,
            tampering: self.tampering * scale,
            gps: self.gps * scale,
            spatial: 0.0,
        }
    }
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            document: 0.25,
            fraud: 0.30,
            tampering: 0.15,
            gps: 0.15,
            spatial: 0.15,
        }
    }
}

/// Recommendation cut-offs applied to the overall confidence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DecisionThresholds {
    /// At or above: auto-approve.
    pub auto_approve: f64,
    /// At or above (below auto-approve): human review.
    pub human_review: f64,
    /// Agent detection confidence above which a fraud or tampering
    /// verdict overrides the weighted score.
    pub override_confidence: f64,
}

impl DecisionThresholds {
    pub fn level_for(&self, score: f64) -> ConfidenceLevel {
        if score >= self.auto_approve {
            ConfidenceLevel::High
        } else if score >= self.human_review {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

impl Default for DecisionThresholds {
    fn default() -> Self {
        Self {
            auto_approve: 0.85,
            human_review: 0.60,
            override_confidence: 0.7,
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationConfig {
    pub conflict: ConflictThresholds,
    pub fraud: FraudConfig,
    pub region: RegionBounds,
    pub weights: SignalWeights,
    pub decision: DecisionThresholds,
    /// Per-agent execution budget during aggregation.
    pub agent_timeout_ms: u64,
    /// Budget for the ledger anchoring call at minting.
    pub anchor_timeout_ms: u64,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            conflict: ConflictThresholds::default(),
            fraud: FraudConfig::default(),
            region: RegionBounds::default(),
            weights: SignalWeights::default(),
            decision: DecisionThresholds::default(),
            agent_timeout_ms: 10_000,
            anchor_timeout_ms: 15_000,
        }
    }
}

impl VerificationConfig {
    pub fn new() -> Self {
        Self::default()
    }
}
