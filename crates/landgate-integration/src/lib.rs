//! LandGate, assembled.
//!
//! The member crates stay small and focused; applications that want the
//! whole engine import this one. Everything needed to take a claim from
//! intake to government title sync is re-exported here: the lifecycle
//! pipeline, the verification engine, the conflict detector, the
//! storage contract, the signal agents, and the domain types they
//! speak.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use landgate_integration::{
//!     Claim, ClaimPipeline, ClaimantId, InMemoryRegistry, MockLedgerAnchor,
//!     RecordingAlertSink, VerificationConfig,
//! };
//!
//! # async fn demo() -> Result<(), landgate_integration::PipelineError> {
//! let registry = Arc::new(InMemoryRegistry::new());
//! let pipeline = ClaimPipeline::standard(
//!     registry,
//!     Arc::new(MockLedgerAnchor::default()),
//!     Arc::new(RecordingAlertSink::default()),
//!     VerificationConfig::default(),
//! );
//! let claim = pipeline
//!     .submit(Claim::new(ClaimantId::new("buyer-1"), "Kofi Mensah", "DEED ..."))
//!     .await?;
//! pipeline.verify(&claim.claim_id).await?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

// Domain model and configuration.
pub use landgate_types::{
    AlertType, Boundary, Claim, ClaimId, ClaimStatus, ClaimantId, ConfidenceLevel, ConflictId,
    ConflictRecord, ConflictSeverity, ConflictStatus, ConflictThresholds, DecisionThresholds,
    DocumentAnalysis, DocumentInput, DocumentType, ExtractedFields, FraudConfig, GeoPoint,
    OutcomeId, Recommendation, RegionBounds, ResolutionStatus, SignalBreakdown, SignalKind,
    SignalResult, SignalVerdict, SignalWeights, VerificationConfig, VerificationOutcome,
};

// Geometry kernel.
pub use landgate_geometry::{area, centroid, intersection_area, union_area, GeometryError};

// Storage contract and the in-memory reference adapter.
pub use landgate_storage::{
    AuditAppend, AuditRecord, AuditStore, BoundaryRecord, BoundaryStore, ClaimStore,
    ConflictStore, GrantorDirectory, GrantorRecord, InMemoryRegistry, QueryWindow,
    RegistryStorage, StorageError, StorageResult,
};

// Signal agents and their collaborator seams.
pub use landgate_agents::{
    ClaimSnapshot, DocumentAgent, FraudAgent, GpsRegionAgent, GrantorHistoryAgent,
    MockVisionAnalyzer, SignalAgent, TamperingAgent, VisionAnalyzer,
};

// Conflict detection and alert dispatch.
pub use landgate_conflict::{
    AlertChannel, AlertSink, ConflictAlert, ConflictDetector, ConflictReport, DispatchSummary,
    FailingAlertSink, NotificationDispatcher, RecordingAlertSink,
};

// Verification engine.
pub use landgate_verify::{standard_agents, ConfidenceAggregator, VerificationRun, VerifyError};

// Lifecycle pipeline and ledger anchoring.
pub use landgate_pipeline::{
    claim_content_hash, AnchorReceipt, ClaimPipeline, LedgerAnchor, MockLedgerAnchor,
    PipelineError, ReviewDecision, TransitionOutcome, VerifyReport,
};
