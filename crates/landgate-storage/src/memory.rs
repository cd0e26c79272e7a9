//! In-memory reference implementation for LandGate storage traits.
//!
//! This adapter is deterministic and test-friendly. Production
//! deployments should use a transactional backend (e.g. PostgreSQL with
//! PostGIS) for source-of-truth data.

use crate::model::{AuditAppend, AuditRecord, BoundaryRecord, GrantorRecord};
use crate::traits::{
    AuditStore, BoundaryStore, ClaimStore, ConflictStore, GrantorDirectory, QueryWindow,
};
use crate::{StorageError, StorageResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use landgate_types::{
    Claim, ClaimId, ClaimStatus, ConflictId, ConflictRecord, ConflictStatus, OutcomeId,
    ResolutionStatus,
};
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// In-memory registry storage adapter.
#[derive(Default)]
pub struct InMemoryRegistry {
    claims: RwLock<HashMap<ClaimId, Claim>>,
    conflicts: RwLock<HashMap<ConflictId, ConflictRecord>>,
    audits: RwLock<Vec<AuditRecord>>,
    grantors: RwLock<HashMap<String, GrantorRecord>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_claim<R>(
        &self,
        claim_id: &ClaimId,
        f: impl FnOnce(&mut Claim) -> R,
    ) -> StorageResult<R> {
        let mut guard = self
            .claims
            .write()
            .map_err(|_| StorageError::Backend("claims lock poisoned".to_string()))?;
        let claim = guard
            .get_mut(claim_id)
            .ok_or_else(|| StorageError::NotFound(format!("claim {} not found", claim_id)))?;
        Ok(f(claim))
    }
}

#[async_trait]
impl ClaimStore for InMemoryRegistry {
    async fn create_claim(&self, claim: Claim) -> StorageResult<()> {
        let mut guard = self
            .claims
            .write()
            .map_err(|_| StorageError::Backend("claims lock poisoned".to_string()))?;

        if guard.contains_key(&claim.claim_id) {
            return Err(StorageError::Conflict(format!(
                "claim {} already exists",
                claim.claim_id
            )));
        }

        guard.insert(claim.claim_id.clone(), claim);
        Ok(())
    }

    async fn get_claim(&self, claim_id: &ClaimId) -> StorageResult<Option<Claim>> {
        let guard = self
            .claims
            .read()
            .map_err(|_| StorageError::Backend("claims lock poisoned".to_string()))?;
        Ok(guard.get(claim_id).cloned())
    }

    async fn update_status(
        &self,
        claim_id: &ClaimId,
        to: ClaimStatus,
        updated_at: DateTime<Utc>,
    ) -> StorageResult<()> {
        self.with_claim(claim_id, |claim| {
            claim.status = to;
            claim.updated_at = updated_at;
        })
    }

    async fn record_verification(
        &self,
        claim_id: &ClaimId,
        overall_confidence: f64,
        fraud_score: f64,
        review_required: bool,
        outcome_id: OutcomeId,
    ) -> StorageResult<()> {
        self.with_claim(claim_id, |claim| {
            claim.overall_confidence = Some(overall_confidence);
            claim.fraud_score = Some(fraud_score);
            claim.review_required = review_required;
            claim.latest_outcome = Some(outcome_id);
            claim.updated_at = Utc::now();
        })
    }

    async fn record_spatial_status(
        &self,
        claim_id: &ClaimId,
        status: ConflictStatus,
    ) -> StorageResult<()> {
        self.with_claim(claim_id, |claim| {
            claim.spatial_conflict_status = Some(status);
            claim.updated_at = Utc::now();
        })
    }

    async fn record_anchor(&self, claim_id: &ClaimId, anchor_ref: &str) -> StorageResult<()> {
        self.with_claim(claim_id, |claim| {
            claim.anchor_ref = Some(anchor_ref.to_string());
            claim.updated_at = Utc::now();
        })
    }

    async fn set_review_required(&self, claim_id: &ClaimId, required: bool) -> StorageResult<()> {
        self.with_claim(claim_id, |claim| {
            claim.review_required = required;
            claim.updated_at = Utc::now();
        })
    }

    async fn list_claims(&self, window: QueryWindow) -> StorageResult<Vec<Claim>> {
        let guard = self
            .claims
            .read()
            .map_err(|_| StorageError::Backend("claims lock poisoned".to_string()))?;
        let mut values = guard.values().cloned().collect::<Vec<_>>();
        values.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(apply_window(values, window))
    }

    async fn list_claims_by_grantor(&self, grantor_name: &str) -> StorageResult<Vec<Claim>> {
        let needle = grantor_name.trim().to_lowercase();
        let guard = self
            .claims
            .read()
            .map_err(|_| StorageError::Backend("claims lock poisoned".to_string()))?;
        let mut values = guard
            .values()
            .filter(|claim| claim.grantor_name.trim().to_lowercase() == needle)
            .cloned()
            .collect::<Vec<_>>();
        values.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(values)
    }
}

#[async_trait]
impl BoundaryStore for InMemoryRegistry {
    async fn list_boundaries(
        &self,
        exclude: Option<&ClaimId>,
    ) -> StorageResult<Vec<BoundaryRecord>> {
        let guard = self
            .claims
            .read()
            .map_err(|_| StorageError::Backend("claims lock poisoned".to_string()))?;

        let mut records = guard
            .values()
            .filter(|claim| Some(&claim.claim_id) != exclude)
            // Rejected claims no longer occupy space; everything else
            // (including disputed parcels) still does.
            .filter(|claim| claim.status != ClaimStatus::Rejected)
            .filter_map(|claim| {
                claim.boundary.as_ref().map(|boundary| BoundaryRecord {
                    claim_id: claim.claim_id.clone(),
                    boundary: boundary.clone(),
                    registered_at: claim.created_at,
                })
            })
            .collect::<Vec<_>>();
        records.sort_by(|a, b| a.registered_at.cmp(&b.registered_at));
        Ok(records)
    }
}

#[async_trait]
impl ConflictStore for InMemoryRegistry {
    async fn create_conflict(&self, record: ConflictRecord) -> StorageResult<()> {
        let mut guard = self
            .conflicts
            .write()
            .map_err(|_| StorageError::Backend("conflicts lock poisoned".to_string()))?;

        if guard.contains_key(&record.conflict_id) {
            return Err(StorageError::Conflict(format!(
                "conflict {} already exists",
                record.conflict_id
            )));
        }

        guard.insert(record.conflict_id.clone(), record);
        Ok(())
    }

    async fn get_conflict(
        &self,
        conflict_id: &ConflictId,
    ) -> StorageResult<Option<ConflictRecord>> {
        let guard = self
            .conflicts
            .read()
            .map_err(|_| StorageError::Backend("conflicts lock poisoned".to_string()))?;
        Ok(guard.get(conflict_id).cloned())
    }

    async fn list_conflicts_for_claim(
        &self,
        claim_id: &ClaimId,
    ) -> StorageResult<Vec<ConflictRecord>> {
        let guard = self
            .conflicts
            .read()
            .map_err(|_| StorageError::Backend("conflicts lock poisoned".to_string()))?;
        let mut values = guard
            .values()
            .filter(|record| &record.claim_a == claim_id || &record.claim_b == claim_id)
            .cloned()
            .collect::<Vec<_>>();
        values.sort_by(|a, b| b.detected_at.cmp(&a.detected_at));
        Ok(values)
    }

    async fn list_conflicts(&self, window: QueryWindow) -> StorageResult<Vec<ConflictRecord>> {
        let guard = self
            .conflicts
            .read()
            .map_err(|_| StorageError::Backend("conflicts lock poisoned".to_string()))?;
        let mut values = guard.values().cloned().collect::<Vec<_>>();
        values.sort_by(|a, b| b.detected_at.cmp(&a.detected_at));
        Ok(apply_window(values, window))
    }

    async fn resolve_conflict(
        &self,
        conflict_id: &ConflictId,
        resolved_by: &str,
        note: Option<String>,
    ) -> StorageResult<ConflictRecord> {
        if resolved_by.trim().is_empty() {
            return Err(StorageError::InvalidInput(
                "reviewer identity must not be empty".to_string(),
            ));
        }

        let mut guard = self
            .conflicts
            .write()
            .map_err(|_| StorageError::Backend("conflicts lock poisoned".to_string()))?;
        let record = guard.get_mut(conflict_id).ok_or_else(|| {
            StorageError::NotFound(format!("conflict {} not found", conflict_id))
        })?;

        if record.resolution == ResolutionStatus::Resolved {
            return Err(StorageError::InvariantViolation(format!(
                "conflict {} already resolved",
                conflict_id
            )));
        }

        record.resolution = ResolutionStatus::Resolved;
        record.resolved_at = Some(Utc::now());
        record.resolved_by = Some(resolved_by.to_string());
        record.resolution_note = note;
        Ok(record.clone())
    }
}

#[async_trait]
impl AuditStore for InMemoryRegistry {
    async fn append_audit(&self, event: AuditAppend) -> StorageResult<AuditRecord> {
        let mut guard = self
            .audits
            .write()
            .map_err(|_| StorageError::Backend("audit lock poisoned".to_string()))?;

        let previous_hash = guard.last().map(|e| e.hash.clone());
        let sequence = guard.len() as u64 + 1;
        let hash = compute_audit_hash(&event, previous_hash.as_deref(), sequence)?;

        let record = AuditRecord {
            event_id: format!("audit-{}", Uuid::new_v4()),
            sequence,
            timestamp: event.timestamp,
            actor: event.actor,
            stage: event.stage,
            success: event.success,
            message: event.message,
            claim_id: event.claim_id,
            payload: event.payload,
            previous_hash,
            hash,
        };

        guard.push(record.clone());
        Ok(record)
    }

    async fn list_audit(&self, window: QueryWindow) -> StorageResult<Vec<AuditRecord>> {
        let guard = self
            .audits
            .read()
            .map_err(|_| StorageError::Backend("audit lock poisoned".to_string()))?;
        let mut values = guard.clone();
        values.sort_by(|a, b| b.sequence.cmp(&a.sequence));
        Ok(apply_window(values, window))
    }

    async fn list_audit_for_claim(&self, claim_id: &ClaimId) -> StorageResult<Vec<AuditRecord>> {
        let guard = self
            .audits
            .read()
            .map_err(|_| StorageError::Backend("audit lock poisoned".to_string()))?;
        Ok(guard
            .iter()
            .filter(|record| record.claim_id.as_ref() == Some(claim_id))
            .cloned()
            .collect())
    }

    async fn latest_audit_hash(&self) -> StorageResult<Option<String>> {
        let guard = self
            .audits
            .read()
            .map_err(|_| StorageError::Backend("audit lock poisoned".to_string()))?;
        Ok(guard.last().map(|e| e.hash.clone()))
    }
}

#[async_trait]
impl GrantorDirectory for InMemoryRegistry {
    async fn list_grantor_records(&self) -> StorageResult<Vec<GrantorRecord>> {
        let guard = self
            .grantors
            .read()
            .map_err(|_| StorageError::Backend("grantor lock poisoned".to_string()))?;
        let mut values = guard.values().cloned().collect::<Vec<_>>();
        values.sort_by(|a, b| a.parcel_id.cmp(&b.parcel_id));
        Ok(values)
    }

    async fn upsert_grantor_record(&self, record: GrantorRecord) -> StorageResult<()> {
        if record.parcel_id.trim().is_empty() {
            return Err(StorageError::InvalidInput(
                "parcel id must not be empty".to_string(),
            ));
        }
        let mut guard = self
            .grantors
            .write()
            .map_err(|_| StorageError::Backend("grantor lock poisoned".to_string()))?;
        guard.insert(record.parcel_id.trim().to_lowercase(), record);
        Ok(())
    }
}

fn compute_audit_hash(
    event: &AuditAppend,
    previous_hash: Option<&str>,
    sequence: u64,
) -> StorageResult<String> {
    let serializable = serde_json::json!({
        "previous_hash": previous_hash,
        "sequence": sequence,
        "timestamp": event.timestamp,
        "actor": event.actor,
        "stage": event.stage,
        "success": event.success,
        "message": event.message,
        "claim_id": event.claim_id.as_ref().map(|id| id.to_string()),
        "payload": event.payload,
    });
    let serialized = serde_json::to_vec(&serializable)
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
    Ok(blake3::hash(&serialized).to_hex().to_string())
}

fn apply_window<T>(items: Vec<T>, window: QueryWindow) -> Vec<T> {
    let iter = items.into_iter().skip(window.offset);
    if window.limit == 0 {
        iter.collect()
    } else {
        iter.take(window.limit).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use landgate_types::{Boundary, ClaimantId};

    fn accra_boundary() -> Boundary {
        Boundary::from_coords([(5.60, -0.19), (5.60, -0.18), (5.61, -0.18), (5.61, -0.19)])
    }

    fn sample_claim(grantor: &str) -> Claim {
        Claim::new(ClaimantId::generate(), grantor, "INDENTURE ...")
            .with_boundary(accra_boundary())
    }

    #[tokio::test]
    async fn audit_chain_hashes_are_linked() {
        let storage = InMemoryRegistry::new();
        let claim_id = ClaimId::generate();
        let first = storage
            .append_audit(AuditAppend::for_claim(
                claim_id.clone(),
                "verification",
                "aggregated signals",
            ))
            .await
            .unwrap();
        let second = storage
            .append_audit(AuditAppend::for_claim(
                claim_id,
                "spatial_lock",
                "no conflicts found",
            ))
            .await
            .unwrap();

        assert_eq!(second.previous_hash, Some(first.hash));
        assert_eq!(second.sequence, 2);
    }

    #[tokio::test]
    async fn duplicate_claim_creation_is_a_conflict() {
        let storage = InMemoryRegistry::new();
        let claim = sample_claim("Kofi Mensah");
        storage.create_claim(claim.clone()).await.unwrap();

        let result = storage.create_claim(claim).await;
        assert!(matches!(result, Err(StorageError::Conflict(_))));
    }

    #[tokio::test]
    async fn boundary_snapshot_excludes_requested_and_rejected_claims() {
        let storage = InMemoryRegistry::new();
        let kept = sample_claim("Kofi Mensah");
        let excluded = sample_claim("Ama Owusu");
        let rejected = sample_claim("Yaw Darko");
        let rejected_id = rejected.claim_id.clone();

        storage.create_claim(kept.clone()).await.unwrap();
        storage.create_claim(excluded.clone()).await.unwrap();
        storage.create_claim(rejected).await.unwrap();
        storage
            .update_status(&rejected_id, ClaimStatus::Rejected, Utc::now())
            .await
            .unwrap();

        let records = storage
            .list_boundaries(Some(&excluded.claim_id))
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].claim_id, kept.claim_id);
    }

    #[tokio::test]
    async fn claims_without_boundaries_are_not_in_snapshot() {
        let storage = InMemoryRegistry::new();
        let claim = Claim::new(ClaimantId::generate(), "Kofi Mensah", "DEED ...");
        storage.create_claim(claim).await.unwrap();

        let records = storage.list_boundaries(None).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn conflict_resolution_is_one_shot() {
        let storage = InMemoryRegistry::new();
        let record = ConflictRecord::new(
            ClaimId::generate(),
            ClaimId::generate(),
            100.0,
            1.0,
            landgate_types::ConflictSeverity::Critical,
            landgate_types::AlertType::DoubleSaleSuspected,
        );
        let conflict_id = record.conflict_id.clone();
        storage.create_conflict(record).await.unwrap();

        let resolved = storage
            .resolve_conflict(&conflict_id, "reviewer-7", Some("survey re-run".into()))
            .await
            .unwrap();
        assert_eq!(resolved.resolution, ResolutionStatus::Resolved);
        assert_eq!(resolved.resolved_by.as_deref(), Some("reviewer-7"));

        let again = storage.resolve_conflict(&conflict_id, "reviewer-7", None).await;
        assert!(matches!(again, Err(StorageError::InvariantViolation(_))));
    }

    #[tokio::test]
    async fn grantor_directory_upserts_by_parcel() {
        let storage = InMemoryRegistry::new();
        storage
            .upsert_grantor_record(GrantorRecord::new("Kofi Mensah", "GA-0412-889"))
            .await
            .unwrap();
        storage
            .upsert_grantor_record(
                GrantorRecord::new("Kofi K. Mensah", "ga-0412-889").with_region("Greater Accra"),
            )
            .await
            .unwrap();

        let records = storage.list_grantor_records().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].full_name, "Kofi K. Mensah");
    }

    #[tokio::test]
    async fn grantor_history_lookup_is_case_insensitive() {
        let storage = InMemoryRegistry::new();
        storage.create_claim(sample_claim("Kofi Mensah")).await.unwrap();
        storage.create_claim(sample_claim("KOFI MENSAH")).await.unwrap();
        storage.create_claim(sample_claim("Ama Owusu")).await.unwrap();

        let claims = storage.list_claims_by_grantor("kofi mensah").await.unwrap();
        assert_eq!(claims.len(), 2);
    }

    #[tokio::test]
    async fn derived_fields_update_in_place() {
        let storage = InMemoryRegistry::new();
        let claim = sample_claim("Kofi Mensah");
        let claim_id = claim.claim_id.clone();
        storage.create_claim(claim).await.unwrap();

        let outcome_id = OutcomeId::generate();
        storage
            .record_verification(&claim_id, 0.91, 0.05, false, outcome_id.clone())
            .await
            .unwrap();
        storage
            .record_spatial_status(&claim_id, ConflictStatus::Clear)
            .await
            .unwrap();
        storage
            .record_anchor(&claim_id, "txn:0xabc123")
            .await
            .unwrap();

        let stored = storage.get_claim(&claim_id).await.unwrap().unwrap();
        assert_eq!(stored.overall_confidence, Some(0.91));
        assert_eq!(stored.fraud_score, Some(0.05));
        assert_eq!(stored.latest_outcome, Some(outcome_id));
        assert_eq!(stored.spatial_conflict_status, Some(ConflictStatus::Clear));
        assert_eq!(stored.anchor_ref.as_deref(), Some("txn:0xabc123"));
    }

    #[tokio::test]
    async fn missing_claim_update_is_not_found() {
        let storage = InMemoryRegistry::new();
        let result = storage
            .update_status(&ClaimId::generate(), ClaimStatus::AiVerified, Utc::now())
            .await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }
}
