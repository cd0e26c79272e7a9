//! End-to-end: the engine is availability-first. Dead collaborators
//! degrade a run and mark it partial; they never wedge intake.

use std::sync::Arc;

use async_trait::async_trait;
use landgate_integration::{
    standard_agents, BoundaryRecord, BoundaryStore, ClaimId, ClaimPipeline, ClaimStatus,
    ClaimStore, ConfidenceAggregator, ConflictDetector, ConflictStatus, ConflictStore,
    FailingAlertSink, MockLedgerAnchor, Recommendation, SignalKind, StorageError, StorageResult,
    TransitionOutcome, VerificationConfig,
};

use crate::support;

/// Boundary index whose backend is down.
struct DeadBoundaryIndex;

#[async_trait]
impl BoundaryStore for DeadBoundaryIndex {
    async fn list_boundaries(
        &self,
        _exclude: Option<&ClaimId>,
    ) -> StorageResult<Vec<BoundaryRecord>> {
        Err(StorageError::Backend("boundary index offline".to_string()))
    }
}

#[tokio::test]
async fn dead_boundary_index_degrades_the_run_but_claims_advance() {
    support::init_tracing();
    let registry = support::seeded_registry().await;
    let config = VerificationConfig::default();
    let detector = Arc::new(ConflictDetector::new(
        Arc::new(DeadBoundaryIndex),
        registry.clone(),
        config.conflict.clone(),
    ));
    let aggregator = ConfidenceAggregator::new(config.clone())
        .with_agents(standard_agents(&registry, &config))
        .with_detector(detector.clone())
        .with_audit(registry.clone());
    let pipeline = ClaimPipeline::new(
        registry.clone(),
        aggregator,
        detector,
        Arc::new(MockLedgerAnchor::default()),
        config,
    );

    let claim = pipeline.submit(support::deed_claim("buyer-1")).await.unwrap();
    let report = pipeline.verify(&claim.claim_id).await.unwrap();

    let run = report.run.expect("verification ran");
    assert_eq!(run.outcome.recommendation, Recommendation::AutoApprove);
    assert!(run.outcome.partial, "degraded spatial signal marks the run partial");
    let spatial = run
        .outcome
        .breakdown_for(SignalKind::SpatialConflict)
        .expect("spatial signal present");
    assert!(spatial.degraded);
    assert_eq!(spatial.score, 1.0);
    let caveat = run.spatial.expect("a caveat report is still produced");
    assert!(caveat.degraded);
    assert!(caveat.summary().contains("degraded"));

    // The scan found nothing blocking, so the lock proceeds with the
    // caveat on record.
    let locked = pipeline.lock_spatial(&claim.claim_id).await.unwrap();
    assert!(matches!(
        locked,
        TransitionOutcome::Transitioned {
            to: ClaimStatus::SpatialLocked,
            ..
        }
    ));
    let stored = registry.get_claim(&claim.claim_id).await.unwrap().unwrap();
    assert_eq!(stored.spatial_conflict_status, Some(ConflictStatus::Clear));
}

#[tokio::test]
async fn alert_outage_never_blocks_conflict_reporting() {
    support::init_tracing();
    let registry = support::seeded_registry().await;
    // Standard wiring, but every alert channel is down.
    let pipeline = ClaimPipeline::standard(
        registry.clone(),
        Arc::new(MockLedgerAnchor::default()),
        Arc::new(FailingAlertSink::all()),
        VerificationConfig::default(),
    );

    let first = pipeline.submit(support::deed_claim("buyer-1")).await.unwrap();
    pipeline.verify(&first.claim_id).await.unwrap();
    pipeline.lock_spatial(&first.claim_id).await.unwrap();

    let second = pipeline.submit(support::deed_claim("buyer-2")).await.unwrap();
    let report = pipeline.verify(&second.claim_id).await.unwrap();

    let run = report.run.expect("verification ran");
    assert_eq!(run.outcome.recommendation, Recommendation::HumanReview);
    let conflicts = registry
        .list_conflicts_for_claim(&second.claim_id)
        .await
        .unwrap();
    assert!(!conflicts.is_empty());
    let first_stored = registry.get_claim(&first.claim_id).await.unwrap().unwrap();
    assert_eq!(first_stored.status, ClaimStatus::Disputed);
}
