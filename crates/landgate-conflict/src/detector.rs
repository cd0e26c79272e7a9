//! Boundary comparison against the registered parcel set.

use crate::error::ConflictResult;
use crate::notify::NotificationDispatcher;
use crate::report::ConflictReport;
use landgate_geometry::{area, intersection_area, union_area, GeometryResult};
use landgate_storage::{BoundaryRecord, BoundaryStore, ConflictStore};
use landgate_types::{
    AlertType, Boundary, ClaimId, ConflictRecord, ConflictSeverity, ConflictStatus,
    ConflictThresholds,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Compares a candidate boundary against every boundary on file and
/// classifies each overlapping pair.
///
/// Overlap percentage is measured against the smaller parcel and backs
/// the pipeline-blocking rule; IoU backs the severity ladder. The two
/// are independent so a small parcel swallowed by a much larger one
/// still blocks even though its IoU stays low.
pub struct ConflictDetector {
    boundaries: Arc<dyn BoundaryStore>,
    conflicts: Arc<dyn ConflictStore>,
    alerts: Option<NotificationDispatcher>,
    thresholds: ConflictThresholds,
}

impl ConflictDetector {
    pub fn new(
        boundaries: Arc<dyn BoundaryStore>,
        conflicts: Arc<dyn ConflictStore>,
        thresholds: ConflictThresholds,
    ) -> Self {
        Self {
            boundaries,
            conflicts,
            alerts: None,
            thresholds,
        }
    }

    pub fn with_alerts(mut self, dispatcher: NotificationDispatcher) -> Self {
        self.alerts = Some(dispatcher);
        self
    }

    /// Run one detection pass for a candidate boundary.
    ///
    /// The claim's own id is excluded from the comparison set so a
    /// re-run never conflicts with itself. A storage fault or timeout
    /// downgrades to a clear-with-caveat report; only the candidate's
    /// own invalid geometry is a hard error.
    pub async fn check(
        &self,
        claim_id: &ClaimId,
        boundary: &Boundary,
    ) -> ConflictResult<ConflictReport> {
        let candidate_area = area(boundary)?;

        let snapshot = match tokio::time::timeout(
            Duration::from_millis(self.thresholds.storage_timeout_ms),
            self.boundaries.list_boundaries(Some(claim_id)),
        )
        .await
        {
            Ok(Ok(records)) => records,
            Ok(Err(error)) => {
                warn!(claim_id = %claim_id, error = %error, "boundary snapshot read failed");
                return Ok(ConflictReport::clear_with_caveat(format!(
                    "boundary lookup failed: {error}"
                )));
            }
            Err(_) => {
                warn!(
                    claim_id = %claim_id,
                    timeout_ms = self.thresholds.storage_timeout_ms,
                    "boundary snapshot read timed out"
                );
                return Ok(ConflictReport::clear_with_caveat(format!(
                    "boundary lookup timed out after {}ms",
                    self.thresholds.storage_timeout_ms
                )));
            }
        };

        let mut report = ConflictReport::clear();
        report.reasoning.push(format!(
            "compared against {} registered boundaries",
            snapshot.len()
        ));

        for record in &snapshot {
            let (overlap_pct, iou) = match measure_pair(boundary, candidate_area, record) {
                Ok(Some(pair)) => pair,
                Ok(None) => continue,
                Err(error) => {
                    warn!(
                        claim_id = %record.claim_id,
                        error = %error,
                        "stored boundary failed validation, skipping"
                    );
                    report.reasoning.push(format!(
                        "skipped claim {}: stored boundary invalid ({error})",
                        record.claim_id
                    ));
                    continue;
                }
            };

            report.max_overlap_pct = report.max_overlap_pct.max(overlap_pct);
            report.max_iou = report.max_iou.max(iou);

            let (severity, alert_type) = match classify(iou, overlap_pct, &self.thresholds) {
                Some(pair) => pair,
                None => {
                    debug!(
                        claim_id = %record.claim_id,
                        overlap_pct,
                        iou,
                        "overlap below conflict thresholds"
                    );
                    continue;
                }
            };

            report.reasoning.push(format!(
                "claim {} overlaps {:.1}% of the smaller parcel, IoU {:.2} ({})",
                record.claim_id,
                overlap_pct,
                iou,
                alert_label(alert_type)
            ));
            report.conflicts.push(ConflictRecord::new(
                claim_id.clone(),
                record.claim_id.clone(),
                overlap_pct,
                iou,
                severity,
                alert_type,
            ));
        }

        report.has_conflict = !report.conflicts.is_empty();
        report.is_blocked = report.max_overlap_pct >= self.thresholds.overlap_block_pct;
        report.status = if !report.has_conflict {
            ConflictStatus::Clear
        } else if report.is_blocked || report.has_critical() {
            ConflictStatus::HighRisk
        } else {
            ConflictStatus::PotentialDispute
        };

        if report.has_conflict {
            debug!(
                claim_id = %claim_id,
                pairs = report.conflicts.len(),
                max_overlap_pct = report.max_overlap_pct,
                max_iou = report.max_iou,
                blocked = report.is_blocked,
                "spatial conflict detected"
            );
            self.persist_and_alert(&report).await;
        }

        Ok(report)
    }

    /// Record every conflicting pair and alert on the worst one.
    /// Failures here are logged and swallowed: the report must still
    /// reach the caller.
    async fn persist_and_alert(&self, report: &ConflictReport) {
        for record in &report.conflicts {
            if let Err(error) = self.conflicts.create_conflict(record.clone()).await {
                warn!(
                    conflict_id = %record.conflict_id,
                    error = %error,
                    "failed to persist conflict record"
                );
            }
        }

        let dispatcher = match &self.alerts {
            Some(dispatcher) => dispatcher,
            None => return,
        };
        let worst = report
            .conflicts
            .iter()
            .max_by(|a, b| a.severity.cmp(&b.severity).then(a.iou.total_cmp(&b.iou)));
        if let Some(worst) = worst {
            let summary = dispatcher.dispatch(worst).await;
            if summary.success {
                debug!(conflict_id = %worst.conflict_id, "conflict alert dispatched");
            } else {
                warn!(conflict_id = %worst.conflict_id, "conflict alert dispatch failed");
            }
        }
    }
}

/// Overlap percentage (of the smaller parcel) and IoU for one pair.
/// `Ok(None)` means the pair does not intersect; `Err` means the
/// stored boundary itself is invalid.
fn measure_pair(
    candidate: &Boundary,
    candidate_area: f64,
    record: &BoundaryRecord,
) -> GeometryResult<Option<(f64, f64)>> {
    let intersection = intersection_area(candidate, &record.boundary)?;
    if intersection <= 0.0 {
        return Ok(None);
    }
    let existing_area = area(&record.boundary)?;
    let union = union_area(candidate, &record.boundary)?;
    let smaller = candidate_area.min(existing_area);
    if smaller <= 0.0 || union <= 0.0 {
        return Ok(None);
    }
    Ok(Some((intersection / smaller * 100.0, intersection / union)))
}

/// Severity ladder for one pair. Exact threshold values take the
/// higher severity, and a suspected double sale outranks a plain
/// critical conflict at the same score.
fn classify(
    iou: f64,
    overlap_pct: f64,
    thresholds: &ConflictThresholds,
) -> Option<(ConflictSeverity, AlertType)> {
    if iou >= thresholds.iou_double_sale {
        Some((ConflictSeverity::Critical, AlertType::DoubleSaleSuspected))
    } else if iou >= thresholds.iou_critical {
        Some((ConflictSeverity::Critical, AlertType::CriticalConflict))
    } else if iou >= thresholds.iou_warning || overlap_pct >= thresholds.overlap_conflict_pct {
        Some((ConflictSeverity::Warning, AlertType::OverlapWarning))
    } else {
        None
    }
}

fn alert_label(alert_type: AlertType) -> &'static str {
    match alert_type {
        AlertType::OverlapWarning => "overlap warning",
        AlertType::CriticalConflict => "critical conflict",
        AlertType::DoubleSaleSuspected => "double sale suspected",
    }
}
