//! Outcome of one conflict detection run.

use landgate_types::{ConflictRecord, ConflictStatus};
use serde::{Deserialize, Serialize};

/// What the detector found when a candidate boundary was compared
/// against every boundary on file.
///
/// `max_overlap_pct` and `max_iou` track the worst comparison seen,
/// including pairs that stayed below the conflict thresholds. A report
/// with `degraded` set means the boundary snapshot could not be read
/// and the claim was waved through with the caveat in `reasoning`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictReport {
    pub has_conflict: bool,
    /// Overlap of the smaller parcel crossed the blocking threshold.
    pub is_blocked: bool,
    pub max_overlap_pct: f64,
    pub max_iou: f64,
    pub status: ConflictStatus,
    /// One record per pair that crossed a conflict threshold.
    pub conflicts: Vec<ConflictRecord>,
    pub reasoning: Vec<String>,
    pub degraded: bool,
}

impl ConflictReport {
    /// A clean result: nothing on file overlaps the candidate.
    pub fn clear() -> Self {
        Self {
            has_conflict: false,
            is_blocked: false,
            max_overlap_pct: 0.0,
            max_iou: 0.0,
            status: ConflictStatus::Clear,
            conflicts: Vec::new(),
            reasoning: Vec::new(),
            degraded: false,
        }
    }

    /// A clear result returned because the boundary snapshot could not
    /// be read. Intake is never hard-blocked by an infrastructure
    /// fault; the caveat keeps the degradation visible downstream.
    pub fn clear_with_caveat(reason: impl Into<String>) -> Self {
        let mut report = Self::clear();
        report.degraded = true;
        report.reasoning.push(reason.into());
        report
    }

    /// Whether the claim needs a human decision before it can proceed.
    pub fn requires_escalation(&self) -> bool {
        self.has_conflict || self.is_blocked
    }

    /// Whether any conflicting pair was classified critical.
    pub fn has_critical(&self) -> bool {
        self.conflicts.iter().any(ConflictRecord::is_critical)
    }

    /// One-line rendering for audit trails and log lines.
    pub fn summary(&self) -> String {
        if self.degraded {
            let caveat = self
                .reasoning
                .first()
                .map(String::as_str)
                .unwrap_or("no detail recorded");
            return format!("spatial check degraded, treated as clear: {caveat}");
        }
        if !self.has_conflict {
            return "no spatial conflicts detected".to_string();
        }
        let blocked = if self.is_blocked {
            ", pipeline blocked"
        } else {
            ""
        };
        format!(
            "{} conflicting parcels, max overlap {:.1}% of the smaller parcel, max IoU {:.2}{}",
            self.conflicts.len(),
            self.max_overlap_pct,
            self.max_iou,
            blocked
        )
    }
}
