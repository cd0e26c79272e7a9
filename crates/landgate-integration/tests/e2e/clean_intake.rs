//! End-to-end: a clean deed travels intake -> AI verification ->
//! spatial lock -> mint -> government title sync, and the audit trail
//! records every step.

use landgate_integration::{
    AuditStore, ClaimStatus, ClaimStore, ConfidenceLevel, ConflictStatus, Recommendation,
    SignalKind,
};

use crate::support;

#[tokio::test]
async fn clean_deed_reaches_government_title_sync() {
    support::init_tracing();
    let harness = support::standard_harness().await;
    let claim = harness
        .pipeline
        .submit(support::deed_claim("buyer-1"))
        .await
        .unwrap();

    let report = harness.pipeline.verify(&claim.claim_id).await.unwrap();
    let run = report.run.expect("verification ran");
    assert_eq!(run.outcome.recommendation, Recommendation::AutoApprove);
    assert_eq!(run.outcome.confidence_level, ConfidenceLevel::High);
    assert!(!run.outcome.partial);
    // Five agents plus the spatial signal.
    assert_eq!(run.outcome.breakdown.len(), 6);
    let fraud = run
        .outcome
        .breakdown_for(SignalKind::FraudHeuristics)
        .expect("fraud signal present");
    assert!(fraud.score >= 0.9, "good-space fraud score was {}", fraud.score);

    harness.pipeline.lock_spatial(&claim.claim_id).await.unwrap();
    harness.pipeline.mint(&claim.claim_id).await.unwrap();
    harness.pipeline.sync_govt_title(&claim.claim_id).await.unwrap();

    let stored = harness
        .registry
        .get_claim(&claim.claim_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, ClaimStatus::GovtTitleSync);
    assert_eq!(stored.spatial_conflict_status, Some(ConflictStatus::Clear));
    assert!(stored.fraud_score.unwrap() <= 0.1);
    assert!(stored.overall_confidence.unwrap() >= 0.85);
    assert!(!stored.review_required);
    assert_eq!(stored.latest_outcome, Some(run.outcome.outcome_id.clone()));
    assert!(stored.anchor_ref.unwrap().starts_with("tx-"));

    // A clean parcel raises no alerts and anchors exactly once.
    assert!(harness.alerts.sent().is_empty());
    assert_eq!(harness.anchor.anchored().len(), 1);
}

#[tokio::test]
async fn the_audit_trail_records_every_stage() {
    support::init_tracing();
    let harness = support::standard_harness().await;
    let claim = harness
        .pipeline
        .submit(support::deed_claim("buyer-1"))
        .await
        .unwrap();
    harness.pipeline.verify(&claim.claim_id).await.unwrap();
    harness.pipeline.lock_spatial(&claim.claim_id).await.unwrap();
    harness.pipeline.mint(&claim.claim_id).await.unwrap();
    harness.pipeline.sync_govt_title(&claim.claim_id).await.unwrap();

    let trail = harness
        .registry
        .list_audit_for_claim(&claim.claim_id)
        .await
        .unwrap();
    let stages: Vec<&str> = trail.iter().map(|event| event.stage.as_str()).collect();

    assert_eq!(stages.first(), Some(&"intake"));
    for stage in [
        "document_analysis",
        "fraud_heuristics",
        "tampering_check",
        "gps_region",
        "grantor_history",
        "spatial_conflict",
        "verification",
        "ai_verified",
        "spatial_lock",
        "mint",
        "govt_title_sync",
    ] {
        assert!(stages.contains(&stage), "missing audit stage {stage}");
    }
    assert!(trail.iter().all(|event| event.success));

    let head = harness.registry.latest_audit_hash().await.unwrap();
    assert!(head.is_some(), "audit chain head advances with the trail");
}
