use chrono::{DateTime, Utc};
use landgate_types::{Boundary, ClaimId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One registered parcel boundary, as returned by a snapshot read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundaryRecord {
    pub claim_id: ClaimId,
    pub boundary: Boundary,
    pub registered_at: DateTime<Utc>,
}

/// One on-file grantor identity in the registry directory.
///
/// The fraud heuristics match extracted document fields against these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrantorRecord {
    pub full_name: String,
    pub parcel_id: String,
    pub region: Option<String>,
    pub registered_at: DateTime<Utc>,
}

impl GrantorRecord {
    pub fn new(full_name: impl Into<String>, parcel_id: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            parcel_id: parcel_id.into(),
            region: None,
            registered_at: Utc::now(),
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }
}

/// Audit append payload. Hashes and sequencing are assigned by storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditAppend {
    pub timestamp: DateTime<Utc>,
    pub actor: String,
    pub stage: String,
    pub success: bool,
    pub message: String,
    pub claim_id: Option<ClaimId>,
    #[serde(default)]
    pub payload: Value,
}

impl AuditAppend {
    /// Audit event for one engine stage acting on one claim.
    pub fn for_claim(
        claim_id: ClaimId,
        stage: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            actor: "landgate-engine".to_string(),
            stage: stage.into(),
            success: true,
            message: message.into(),
            claim_id: Some(claim_id),
            payload: Value::Null,
        }
    }

    pub fn failed(mut self) -> Self {
        self.success = false;
        self
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }
}

/// Persistent tamper-evident audit record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub event_id: String,
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
    pub actor: String,
    pub stage: String,
    pub success: bool,
    pub message: String,
    pub claim_id: Option<ClaimId>,
    pub payload: Value,
    pub previous_hash: Option<String>,
    pub hash: String,
}
