use crate::model::{AuditAppend, AuditRecord, BoundaryRecord, GrantorRecord};
use crate::StorageResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use landgate_types::{
    Claim, ClaimId, ClaimStatus, ConflictId, ConflictRecord, ConflictStatus, OutcomeId,
};

/// Generic query window for paged reads.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryWindow {
    pub limit: usize,
    pub offset: usize,
}

/// Storage interface for claim records.
///
/// Submitted fields are written once at creation; the remaining
/// operations only touch derived verification fields.
#[async_trait]
pub trait ClaimStore: Send + Sync {
    /// Insert a newly submitted claim.
    async fn create_claim(&self, claim: Claim) -> StorageResult<()>;

    /// Get one claim by id.
    async fn get_claim(&self, claim_id: &ClaimId) -> StorageResult<Option<Claim>>;

    /// Move a claim to a new lifecycle status.
    async fn update_status(
        &self,
        claim_id: &ClaimId,
        to: ClaimStatus,
        updated_at: DateTime<Utc>,
    ) -> StorageResult<()>;

    /// Persist the derived fields of an aggregator run.
    async fn record_verification(
        &self,
        claim_id: &ClaimId,
        overall_confidence: f64,
        fraud_score: f64,
        review_required: bool,
        outcome_id: OutcomeId,
    ) -> StorageResult<()>;

    /// Persist the spatial standing from a detector run.
    async fn record_spatial_status(
        &self,
        claim_id: &ClaimId,
        status: ConflictStatus,
    ) -> StorageResult<()>;

    /// Persist the ledger reference assigned at minting.
    async fn record_anchor(&self, claim_id: &ClaimId, anchor_ref: &str) -> StorageResult<()>;

    /// Set or clear the human review flag.
    async fn set_review_required(&self, claim_id: &ClaimId, required: bool) -> StorageResult<()>;

    /// List claims newest-first.
    async fn list_claims(&self, window: QueryWindow) -> StorageResult<Vec<Claim>>;

    /// All claims naming this grantor, for history risk scoring.
    async fn list_claims_by_grantor(&self, grantor_name: &str) -> StorageResult<Vec<Claim>>;
}

/// Point-in-time boundary snapshots for conflict scans.
#[async_trait]
pub trait BoundaryStore: Send + Sync {
    /// Boundaries of all claims still occupying space (everything not
    /// rejected), excluding the given claim when set.
    async fn list_boundaries(
        &self,
        exclude: Option<&ClaimId>,
    ) -> StorageResult<Vec<BoundaryRecord>>;
}

/// Storage interface for spatial conflict records.
#[async_trait]
pub trait ConflictStore: Send + Sync {
    /// Insert a newly detected conflict.
    async fn create_conflict(&self, record: ConflictRecord) -> StorageResult<()>;

    /// Get one conflict record by id.
    async fn get_conflict(&self, conflict_id: &ConflictId)
        -> StorageResult<Option<ConflictRecord>>;

    /// Conflicts involving a claim, on either side of the pair.
    async fn list_conflicts_for_claim(
        &self,
        claim_id: &ClaimId,
    ) -> StorageResult<Vec<ConflictRecord>>;

    /// List conflict records newest-first.
    async fn list_conflicts(&self, window: QueryWindow) -> StorageResult<Vec<ConflictRecord>>;

    /// Close a pending conflict with the reviewer's identity and note.
    async fn resolve_conflict(
        &self,
        conflict_id: &ConflictId,
        resolved_by: &str,
        note: Option<String>,
    ) -> StorageResult<ConflictRecord>;
}

/// Storage interface for append-only audit events.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Append an event and return the canonical, hash-linked stored record.
    async fn append_audit(&self, event: AuditAppend) -> StorageResult<AuditRecord>;

    /// Read events newest-first.
    async fn list_audit(&self, window: QueryWindow) -> StorageResult<Vec<AuditRecord>>;

    /// Events touching one claim, oldest-first.
    async fn list_audit_for_claim(&self, claim_id: &ClaimId) -> StorageResult<Vec<AuditRecord>>;

    /// Get the latest audit hash anchor.
    async fn latest_audit_hash(&self) -> StorageResult<Option<String>>;
}

/// Read interface over the on-file grantor directory.
#[async_trait]
pub trait GrantorDirectory: Send + Sync {
    async fn list_grantor_records(&self) -> StorageResult<Vec<GrantorRecord>>;

    async fn upsert_grantor_record(&self, record: GrantorRecord) -> StorageResult<()>;
}

/// Unified storage bundle used by the verification engine.
pub trait RegistryStorage:
    ClaimStore + BoundaryStore + ConflictStore + AuditStore + GrantorDirectory + Send + Sync
{
}

impl<T> RegistryStorage for T where
    T: ClaimStore + BoundaryStore + ConflictStore + AuditStore + GrantorDirectory + Send + Sync
{
}
