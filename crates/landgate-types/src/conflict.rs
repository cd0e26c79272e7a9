//! Spatial conflict records and severity classification.

use crate::ids::{ClaimId, ConflictId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregate spatial standing of a claim after a detector run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConflictStatus {
    Clear,
    PotentialDispute,
    HighRisk,
}

/// Severity of one overlapping pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConflictSeverity {
    Warning,
    Critical,
}

/// Alert classification emitted with a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertType {
    OverlapWarning,
    CriticalConflict,
    DoubleSaleSuspected,
}

/// Review state of a recorded conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolutionStatus {
    PendingReview,
    Resolved,
}

/// A recorded spatial conflict between two claims.
///
/// One record is created per conflicting pair. Overlap percentage is
/// measured against the smaller parcel; IoU against the union of both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictRecord {
    pub conflict_id: ConflictId,
    /// The claim whose intake triggered the detection run.
    pub claim_a: ClaimId,
    /// The previously registered claim it overlaps.
    pub claim_b: ClaimId,
    pub overlap_pct: f64,
    pub iou: f64,
    pub severity: ConflictSeverity,
    pub alert_type: AlertType,
    pub resolution: ResolutionStatus,
    pub detected_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolved_by: Option<String>,
    pub resolution_note: Option<String>,
}

impl ConflictRecord {
    pub fn new(
        claim_a: ClaimId,
        claim_b: ClaimId,
        overlap_pct: f64,
        iou: f64,
        severity: ConflictSeverity,
        alert_type: AlertType,
    ) -> Self {
        Self {
            conflict_id: ConflictId::generate(),
            claim_a,
            claim_b,
            overlap_pct,
            iou,
            severity,
            alert_type,
            resolution: ResolutionStatus::PendingReview,
            detected_at: Utc::now(),
            resolved_at: None,
            resolved_by: None,
            resolution_note: None,
        }
    }

    pub fn is_critical(&self) -> bool {
        self.severity == ConflictSeverity::Critical
    }
}
