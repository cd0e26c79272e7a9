//! End-to-end: two buyers, one parcel. The second intake must surface
//! the double sale, refuse the lock, alert every channel, and pull the
//! already minted first claim into dispute.

use landgate_integration::{
    AlertChannel, AlertType, ClaimStatus, ClaimStore, ConflictSeverity, ConflictStatus,
    ConflictStore, Recommendation, ResolutionStatus, ReviewDecision, TransitionOutcome,
};

use crate::support;

#[tokio::test]
async fn identical_parcels_surface_a_double_sale() {
    support::init_tracing();
    let harness = support::standard_harness().await;

    // First buyer mints the parcel.
    let first = harness
        .pipeline
        .submit(support::deed_claim("buyer-1"))
        .await
        .unwrap();
    harness.pipeline.verify(&first.claim_id).await.unwrap();
    harness.pipeline.lock_spatial(&first.claim_id).await.unwrap();
    harness.pipeline.mint(&first.claim_id).await.unwrap();

    // Second buyer arrives with the same grantor and the same parcel.
    let second = harness
        .pipeline
        .submit(support::deed_claim("buyer-2"))
        .await
        .unwrap();
    let report = harness.pipeline.verify(&second.claim_id).await.unwrap();

    let run = report.run.expect("verification ran");
    assert_eq!(run.outcome.recommendation, Recommendation::HumanReview);
    let spatial = run.spatial.expect("boundary was scanned");
    assert!(spatial.is_blocked);
    assert!((spatial.max_iou - 1.0).abs() < 1e-9);
    assert_eq!(spatial.status, ConflictStatus::HighRisk);

    // The conflict record names both claims at critical severity.
    let conflicts = harness
        .registry
        .list_conflicts_for_claim(&second.claim_id)
        .await
        .unwrap();
    assert_eq!(conflicts.len(), 1);
    let record = &conflicts[0];
    assert_eq!(record.claim_a, second.claim_id);
    assert_eq!(record.claim_b, first.claim_id);
    assert_eq!(record.severity, ConflictSeverity::Critical);
    assert_eq!(record.alert_type, AlertType::DoubleSaleSuspected);

    // Locking is refused while the ground is contested.
    let locked = harness.pipeline.lock_spatial(&second.claim_id).await.unwrap();
    assert!(matches!(locked, TransitionOutcome::Refused { .. }));
    let second_stored = harness
        .registry
        .get_claim(&second.claim_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(second_stored.status, ClaimStatus::AiVerified);
    assert!(second_stored.review_required);

    // The minted winner is pulled back into dispute.
    let first_stored = harness
        .registry
        .get_claim(&first.claim_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first_stored.status, ClaimStatus::Disputed);
    assert_eq!(
        first_stored.spatial_conflict_status,
        Some(ConflictStatus::HighRisk)
    );

    // Buyer, legal contact, and seller audit were all alerted.
    let channels: Vec<AlertChannel> = harness
        .alerts
        .sent()
        .iter()
        .map(|alert| alert.channel)
        .collect();
    for channel in [
        AlertChannel::Buyer,
        AlertChannel::LegalContact,
        AlertChannel::SellerAudit,
    ] {
        assert!(channels.contains(&channel), "missing alert channel {channel:?}");
    }
}

#[tokio::test]
async fn resolving_the_paper_record_does_not_release_the_ground() {
    support::init_tracing();
    let harness = support::standard_harness().await;
    let first = harness
        .pipeline
        .submit(support::deed_claim("buyer-1"))
        .await
        .unwrap();
    harness.pipeline.verify(&first.claim_id).await.unwrap();
    harness.pipeline.lock_spatial(&first.claim_id).await.unwrap();
    let second = harness
        .pipeline
        .submit(support::deed_claim("buyer-2"))
        .await
        .unwrap();
    harness.pipeline.verify(&second.claim_id).await.unwrap();

    let conflicts = harness
        .registry
        .list_conflicts_for_claim(&second.claim_id)
        .await
        .unwrap();
    let resolved = harness
        .registry
        .resolve_conflict(
            &conflicts[0].conflict_id,
            "registrar-akua",
            Some("fraudulent second sale confirmed".to_string()),
        )
        .await
        .unwrap();
    assert_eq!(resolved.resolution, ResolutionStatus::Resolved);
    assert_eq!(resolved.resolved_by.as_deref(), Some("registrar-akua"));

    // A reviewer can clear the claim-level flag...
    let reviewed = harness
        .pipeline
        .record_review(
            &second.claim_id,
            "registrar-akua",
            ReviewDecision::Approve,
            None,
        )
        .await
        .unwrap();
    assert!(!reviewed.review_required);

    // ...but the disputed parcel still occupies the ground, so a fresh
    // scan refuses the lock again.
    let locked = harness.pipeline.lock_spatial(&second.claim_id).await.unwrap();
    assert!(matches!(locked, TransitionOutcome::Refused { .. }));
}
