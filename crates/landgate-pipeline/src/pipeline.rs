//! The claim lifecycle state machine.
//!
//! `ClaimPipeline` drives a claim through intake, AI verification,
//! spatial locking, minting, and government title sync. Every
//! transition loads the claim, checks where it stands, performs the
//! stage's work, and persists the result with an audit event. Repeating
//! a transition a claim has already passed is a no-op rather than an
//! error, so an at-least-once caller can retry safely.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use landgate_conflict::{AlertSink, ConflictDetector, ConflictReport, NotificationDispatcher};
use landgate_storage::{AuditAppend, RegistryStorage};
use landgate_types::{
    Claim, ClaimId, ClaimStatus, ConflictStatus, Recommendation, SignalKind, VerificationConfig,
};
use landgate_verify::{standard_agents, ConfidenceAggregator, VerificationRun};
use tokio::time::timeout;
use tracing::{info, warn};

use crate::anchor::{claim_content_hash, LedgerAnchor};
use crate::error::{PipelineError, PipelineResult};

/// Result of one transition attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionOutcome {
    /// The claim advanced.
    Transitioned { from: ClaimStatus, to: ClaimStatus },
    /// The claim was already at or past the target; nothing was written.
    NoOp { status: ClaimStatus },
    /// A policy check refused the transition; the claim is unchanged.
    Refused { status: ClaimStatus, reason: String },
}

/// Outcome of the verification transition.
///
/// `run` carries the full signal breakdown when verification actually
/// executed; a no-op repeat leaves it empty.
#[derive(Debug)]
pub struct VerifyReport {
    pub transition: TransitionOutcome,
    pub run: Option<VerificationRun>,
}

/// A human reviewer's ruling on a flagged claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    Approve,
    Reject,
}

/// Orchestrates the claim lifecycle over one storage backend.
///
/// The pipeline owns the transition rules; storage stays a dumb record
/// keeper. The same [`ConflictDetector`] is shared with the aggregator
/// so verification and locking score boundaries identically.
pub struct ClaimPipeline<S> {
    storage: Arc<S>,
    aggregator: ConfidenceAggregator,
    detector: Arc<ConflictDetector>,
    anchor: Arc<dyn LedgerAnchor>,
    config: VerificationConfig,
}

impl<S> ClaimPipeline<S>
where
    S: RegistryStorage + 'static,
{
    pub fn new(
        storage: Arc<S>,
        aggregator: ConfidenceAggregator,
        detector: Arc<ConflictDetector>,
        anchor: Arc<dyn LedgerAnchor>,
        config: VerificationConfig,
    ) -> Self {
        Self {
            storage,
            aggregator,
            detector,
            anchor,
            config,
        }
    }

    /// Fully wired pipeline: the standard agent set, a shared conflict
    /// detector with alert dispatch, and audit logging, all over the
    /// given storage backend.
    pub fn standard(
        storage: Arc<S>,
        anchor: Arc<dyn LedgerAnchor>,
        alerts: Arc<dyn AlertSink>,
        config: VerificationConfig,
    ) -> Self {
        let detector = Arc::new(
            ConflictDetector::new(storage.clone(), storage.clone(), config.conflict.clone())
                .with_alerts(NotificationDispatcher::new(alerts)),
        );
        let aggregator = ConfidenceAggregator::new(config.clone())
            .with_agents(standard_agents(&storage, &config))
            .with_detector(detector.clone())
            .with_audit(storage.clone());
        Self::new(storage, aggregator, detector, anchor, config)
    }

    /// Persist a freshly submitted claim and open its audit trail.
    pub async fn submit(&self, claim: Claim) -> PipelineResult<Claim> {
        self.storage.create_claim(claim.clone()).await?;
        self.audit(AuditAppend::for_claim(
            claim.claim_id.clone(),
            "intake",
            format!("claim submitted by {}", claim.claimant_id),
        ))
        .await;
        info!(
            claim_id = %claim.claim_id,
            grantor = %claim.grantor_name,
            "claim submitted"
        );
        Ok(claim)
    }

    /// Run the verification engine and advance the claim accordingly.
    ///
    /// `INTAKE_PENDING -> AI_VERIFIED` when the recommendation is
    /// auto-approve or human review (the latter also sets the review
    /// flag), `-> REJECTED` when the engine rejects. The derived scores
    /// and the spatial standing are persisted either way.
    pub async fn verify(&self, claim_id: &ClaimId) -> PipelineResult<VerifyReport> {
        let claim = self.load(claim_id).await?;
        if claim.status.is_terminal() {
            return Err(PipelineError::InvalidTransition {
                claim_id: claim_id.clone(),
                from: claim.status,
                to: ClaimStatus::AiVerified,
            });
        }
        if at_or_past(claim.status, ClaimStatus::AiVerified) {
            return Ok(VerifyReport {
                transition: TransitionOutcome::NoOp {
                    status: claim.status,
                },
                run: None,
            });
        }

        let run = self.aggregator.verify(&claim).await?;

        // The breakdown keeps fraud in good-space; the claim record
        // stores the detection-space score.
        let fraud_score = run
            .outcome
            .breakdown_for(SignalKind::FraudHeuristics)
            .map(|signal| 1.0 - signal.score)
            .unwrap_or(0.5);
        let review_required = run.outcome.recommendation == Recommendation::HumanReview;
        self.storage
            .record_verification(
                claim_id,
                run.outcome.overall_confidence,
                fraud_score,
                review_required,
                run.outcome.outcome_id.clone(),
            )
            .await?;
        if let Some(report) = &run.spatial {
            self.storage
                .record_spatial_status(claim_id, report.status)
                .await?;
            self.escalate_prior_claims(report).await;
        }

        let to = match run.outcome.recommendation {
            Recommendation::AutoApprove | Recommendation::HumanReview => {
                self.storage
                    .update_status(claim_id, ClaimStatus::AiVerified, Utc::now())
                    .await?;
                self.audit(AuditAppend::for_claim(
                    claim_id.clone(),
                    "ai_verified",
                    format!(
                        "verification complete: {:?} at confidence {:.2}",
                        run.outcome.recommendation, run.outcome.overall_confidence
                    ),
                ))
                .await;
                ClaimStatus::AiVerified
            }
            Recommendation::Reject => {
                self.storage
                    .update_status(claim_id, ClaimStatus::Rejected, Utc::now())
                    .await?;
                self.audit(AuditAppend::for_claim(
                    claim_id.clone(),
                    "rejected",
                    format!(
                        "claim rejected at verification: confidence {:.2}",
                        run.outcome.overall_confidence
                    ),
                ))
                .await;
                ClaimStatus::Rejected
            }
        };
        info!(
            claim_id = %claim_id,
            recommendation = ?run.outcome.recommendation,
            confidence = run.outcome.overall_confidence,
            "claim verified"
        );

        Ok(VerifyReport {
            transition: TransitionOutcome::Transitioned {
                from: claim.status,
                to,
            },
            run: Some(run),
        })
    }

    /// Lock the claim's boundary against future conflicting intakes.
    ///
    /// `AI_VERIFIED -> SPATIAL_LOCKED` only when a fresh conflict scan
    /// comes back without a critical or blocking overlap; otherwise the
    /// lock is refused and the claim stays verified while the conflict
    /// is worked.
    pub async fn lock_spatial(&self, claim_id: &ClaimId) -> PipelineResult<TransitionOutcome> {
        let claim = self.load(claim_id).await?;
        if claim.status.is_terminal() {
            return Err(PipelineError::InvalidTransition {
                claim_id: claim_id.clone(),
                from: claim.status,
                to: ClaimStatus::SpatialLocked,
            });
        }
        if at_or_past(claim.status, ClaimStatus::SpatialLocked) {
            return Ok(TransitionOutcome::NoOp {
                status: claim.status,
            });
        }
        if claim.status != ClaimStatus::AiVerified {
            return Err(PipelineError::InvalidTransition {
                claim_id: claim_id.clone(),
                from: claim.status,
                to: ClaimStatus::SpatialLocked,
            });
        }
        let boundary = claim
            .boundary
            .as_ref()
            .ok_or_else(|| PipelineError::MissingBoundary(claim_id.clone()))?;

        let report = self.detector.check(claim_id, boundary).await?;
        self.storage
            .record_spatial_status(claim_id, report.status)
            .await?;
        self.escalate_prior_claims(&report).await;

        if report.has_critical() || report.is_blocked {
            let reason = report.summary();
            warn!(claim_id = %claim_id, reason = %reason, "spatial lock refused");
            self.audit(
                AuditAppend::for_claim(
                    claim_id.clone(),
                    "spatial_lock",
                    format!("lock refused: {reason}"),
                )
                .failed(),
            )
            .await;
            return Ok(TransitionOutcome::Refused {
                status: claim.status,
                reason,
            });
        }

        self.storage
            .update_status(claim_id, ClaimStatus::SpatialLocked, Utc::now())
            .await?;
        self.audit(AuditAppend::for_claim(
            claim_id.clone(),
            "spatial_lock",
            format!("boundary locked: {}", report.summary()),
        ))
        .await;
        info!(claim_id = %claim_id, "claim spatially locked");
        Ok(TransitionOutcome::Transitioned {
            from: claim.status,
            to: ClaimStatus::SpatialLocked,
        })
    }

    /// Anchor the claim content on the ledger and mark it minted.
    ///
    /// `SPATIAL_LOCKED -> MINTED`. The anchor call runs under
    /// `anchor_timeout_ms`; on failure or timeout the claim stays
    /// locked so the mint can be retried.
    pub async fn mint(&self, claim_id: &ClaimId) -> PipelineResult<TransitionOutcome> {
        let claim = self.load(claim_id).await?;
        if claim.status.is_terminal() {
            return Err(PipelineError::InvalidTransition {
                claim_id: claim_id.clone(),
                from: claim.status,
                to: ClaimStatus::Minted,
            });
        }
        if at_or_past(claim.status, ClaimStatus::Minted) {
            return Ok(TransitionOutcome::NoOp {
                status: claim.status,
            });
        }
        if claim.status != ClaimStatus::SpatialLocked {
            return Err(PipelineError::InvalidTransition {
                claim_id: claim_id.clone(),
                from: claim.status,
                to: ClaimStatus::Minted,
            });
        }

        let content_hash = claim_content_hash(&claim)?;
        let budget = Duration::from_millis(self.config.anchor_timeout_ms);
        match timeout(budget, self.anchor.anchor(&content_hash)).await {
            Ok(Ok(receipt)) => {
                self.storage
                    .record_anchor(claim_id, &receipt.tx_reference)
                    .await?;
                self.storage
                    .update_status(claim_id, ClaimStatus::Minted, Utc::now())
                    .await?;
                self.audit(
                    AuditAppend::for_claim(
                        claim_id.clone(),
                        "mint",
                        format!("claim minted under {}", receipt.tx_reference),
                    )
                    .with_payload(serde_json::json!({
                        "tx_reference": receipt.tx_reference,
                        "content_hash": content_hash,
                    })),
                )
                .await;
                info!(
                    claim_id = %claim_id,
                    tx_reference = %receipt.tx_reference,
                    "claim minted"
                );
                Ok(TransitionOutcome::Transitioned {
                    from: claim.status,
                    to: ClaimStatus::Minted,
                })
            }
            Ok(Err(error)) => {
                self.audit(
                    AuditAppend::for_claim(
                        claim_id.clone(),
                        "mint",
                        format!("mint failed: {error}"),
                    )
                    .failed(),
                )
                .await;
                Err(error)
            }
            Err(_) => {
                let message = format!(
                    "ledger anchor timed out after {}ms",
                    self.config.anchor_timeout_ms
                );
                self.audit(
                    AuditAppend::for_claim(claim_id.clone(), "mint", message.clone()).failed(),
                )
                .await;
                Err(PipelineError::Anchor(message))
            }
        }
    }

    /// Mirror the minted title into the government registry.
    ///
    /// `MINTED -> GOVT_TITLE_SYNC`, the administrative tail of the
    /// happy path.
    pub async fn sync_govt_title(&self, claim_id: &ClaimId) -> PipelineResult<TransitionOutcome> {
        let claim = self.load(claim_id).await?;
        if claim.status.is_terminal() {
            return Err(PipelineError::InvalidTransition {
                claim_id: claim_id.clone(),
                from: claim.status,
                to: ClaimStatus::GovtTitleSync,
            });
        }
        if at_or_past(claim.status, ClaimStatus::GovtTitleSync) {
            return Ok(TransitionOutcome::NoOp {
                status: claim.status,
            });
        }
        if claim.status != ClaimStatus::Minted {
            return Err(PipelineError::InvalidTransition {
                claim_id: claim_id.clone(),
                from: claim.status,
                to: ClaimStatus::GovtTitleSync,
            });
        }

        self.storage
            .update_status(claim_id, ClaimStatus::GovtTitleSync, Utc::now())
            .await?;
        self.audit(AuditAppend::for_claim(
            claim_id.clone(),
            "govt_title_sync",
            "government title registry synchronised",
        ))
        .await;
        info!(claim_id = %claim_id, "government title synchronised");
        Ok(TransitionOutcome::Transitioned {
            from: claim.status,
            to: ClaimStatus::GovtTitleSync,
        })
    }

    /// Pull the claim into dispute, from any live state.
    ///
    /// Disputing an already disputed claim is a no-op; a rejected claim
    /// holds no title, so there is nothing to dispute.
    pub async fn mark_disputed(
        &self,
        claim_id: &ClaimId,
        reason: impl Into<String> + Send,
    ) -> PipelineResult<TransitionOutcome> {
        let claim = self.load(claim_id).await?;
        match claim.status {
            ClaimStatus::Disputed => {
                return Ok(TransitionOutcome::NoOp {
                    status: claim.status,
                })
            }
            ClaimStatus::Rejected => {
                return Ok(TransitionOutcome::Refused {
                    status: claim.status,
                    reason: "rejected claims hold no title to dispute".to_string(),
                })
            }
            _ => {}
        }

        let reason = reason.into();
        self.storage
            .update_status(claim_id, ClaimStatus::Disputed, Utc::now())
            .await?;
        self.storage
            .record_spatial_status(claim_id, ConflictStatus::HighRisk)
            .await?;
        self.audit(AuditAppend::for_claim(
            claim_id.clone(),
            "disputed",
            reason.clone(),
        ))
        .await;
        warn!(claim_id = %claim_id, reason = %reason, "claim disputed");
        Ok(TransitionOutcome::Transitioned {
            from: claim.status,
            to: ClaimStatus::Disputed,
        })
    }

    /// Apply a human reviewer's ruling to a review-flagged claim.
    ///
    /// Only claims sitting at `AI_VERIFIED` with the review flag set
    /// are reviewable here; disputed parcels go through conflict
    /// resolution instead. Approval clears the flag and leaves the
    /// claim verified, rejection ends it.
    pub async fn record_review(
        &self,
        claim_id: &ClaimId,
        reviewer: &str,
        decision: ReviewDecision,
        note: Option<String>,
    ) -> PipelineResult<Claim> {
        if reviewer.trim().is_empty() {
            return Err(PipelineError::MissingReviewer);
        }
        let claim = self.load(claim_id).await?;
        if claim.status != ClaimStatus::AiVerified || !claim.review_required {
            return Err(PipelineError::NotAwaitingReview(claim_id.clone()));
        }

        let note = note.unwrap_or_else(|| "no note recorded".to_string());
        self.storage.set_review_required(claim_id, false).await?;
        match decision {
            ReviewDecision::Approve => {
                self.audit(AuditAppend::for_claim(
                    claim_id.clone(),
                    "review",
                    format!("approved by {reviewer}: {note}"),
                ))
                .await;
                info!(claim_id = %claim_id, reviewer = %reviewer, "review approved");
            }
            ReviewDecision::Reject => {
                self.storage
                    .update_status(claim_id, ClaimStatus::Rejected, Utc::now())
                    .await?;
                self.audit(AuditAppend::for_claim(
                    claim_id.clone(),
                    "review",
                    format!("rejected by {reviewer}: {note}"),
                ))
                .await;
                info!(claim_id = %claim_id, reviewer = %reviewer, "review rejected");
            }
        }
        self.load(claim_id).await
    }

    /// Pull already locked or minted claims back into dispute when a
    /// fresh scan finds a critical overlap against them.
    ///
    /// This is how near-simultaneous submissions resolve: the later
    /// claim's scan implicates the earlier winner instead of letting
    /// both proceed to mint.
    async fn escalate_prior_claims(&self, report: &ConflictReport) {
        for record in report
            .conflicts
            .iter()
            .filter(|record| record.is_critical())
        {
            let prior = match self.storage.get_claim(&record.claim_b).await {
                Ok(Some(prior)) => prior,
                Ok(None) => continue,
                Err(error) => {
                    warn!(
                        claim_id = %record.claim_b,
                        error = %error,
                        "could not load prior claim for dispute escalation"
                    );
                    continue;
                }
            };
            if prior.status != ClaimStatus::SpatialLocked && !prior.status.is_minted() {
                continue;
            }
            let reason = format!("critical overlap with incoming claim {}", record.claim_a);
            if let Err(error) = self.mark_disputed(&record.claim_b, reason).await {
                warn!(
                    claim_id = %record.claim_b,
                    error = %error,
                    "dispute escalation failed"
                );
            }
        }
    }

    async fn load(&self, claim_id: &ClaimId) -> PipelineResult<Claim> {
        self.storage
            .get_claim(claim_id)
            .await?
            .ok_or_else(|| PipelineError::NotFound(claim_id.clone()))
    }

    /// Audit writes are best-effort; a dead audit log must not stall
    /// the lifecycle.
    async fn audit(&self, event: AuditAppend) {
        if let Err(error) = self.storage.append_audit(event).await {
            warn!(error = %error, "pipeline audit append failed");
        }
    }
}

fn at_or_past(status: ClaimStatus, target: ClaimStatus) -> bool {
    match (status.rank(), target.rank()) {
        (Some(current), Some(target)) => current >= target,
        _ => false,
    }
}
