//! Shared fixtures for the end-to-end scenarios.

use std::sync::Arc;

use landgate_integration::{
    Boundary, Claim, ClaimPipeline, ClaimantId, GrantorDirectory, GrantorRecord,
    InMemoryRegistry, MockLedgerAnchor, RecordingAlertSink, VerificationConfig,
};

/// A deed that extracts cleanly and matches the seeded grantor record.
pub const CLEAN_DEED: &str = "THIS INDENTURE made this 14th day of March, 1998 BETWEEN \
    Kofi Mensah (hereinafter called the Grantor) of Accra AND Ama Owusu. \
    Parcel No: GA-0412-889 situate at Teshie.";

/// Route engine logs through the test writer. Safe to call from every
/// test; only the first call installs the subscriber.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}

/// The parcel every scenario fights over.
pub fn accra_parcel() -> Boundary {
    Boundary::from_coords(vec![
        (5.600, -0.190),
        (5.610, -0.190),
        (5.610, -0.180),
        (5.600, -0.180),
    ])
}

/// Registry seeded with the grantor the clean deed names.
pub async fn seeded_registry() -> Arc<InMemoryRegistry> {
    let registry = Arc::new(InMemoryRegistry::new());
    registry
        .upsert_grantor_record(GrantorRecord::new("Kofi Mensah", "GA-0412-889"))
        .await
        .expect("in-memory upsert");
    registry
}

/// A clean claim over the contested parcel, for the named buyer.
pub fn deed_claim(buyer: &str) -> Claim {
    Claim::new(ClaimantId::new(buyer), "Kofi Mensah", CLEAN_DEED).with_boundary(accra_parcel())
}

/// Fully wired engine over one in-memory registry.
pub struct Harness {
    pub registry: Arc<InMemoryRegistry>,
    pub pipeline: ClaimPipeline<InMemoryRegistry>,
    pub anchor: Arc<MockLedgerAnchor>,
    pub alerts: Arc<RecordingAlertSink>,
}

pub async fn standard_harness() -> Harness {
    let registry = seeded_registry().await;
    let anchor = Arc::new(MockLedgerAnchor::default());
    let alerts = Arc::new(RecordingAlertSink::default());
    let pipeline = ClaimPipeline::standard(
        registry.clone(),
        anchor.clone(),
        alerts.clone(),
        VerificationConfig::default(),
    );
    Harness {
        registry,
        pipeline,
        anchor,
        alerts,
    }
}
