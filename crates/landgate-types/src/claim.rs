//! The land claim record and its lifecycle states.

use crate::boundary::Boundary;
use crate::conflict::ConflictStatus;
use crate::ids::{ClaimId, ClaimantId, OutcomeId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a claim in the intake pipeline.
///
/// The happy path advances `IntakePending` through `GovtTitleSync` in
/// order. `Disputed` and `Rejected` are terminal: `Rejected` is only
/// reachable before minting, while `Disputed` can interrupt any state
/// when a later claim's conflict scan implicates this one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimStatus {
    IntakePending,
    AiVerified,
    SpatialLocked,
    Minted,
    GovtTitleSync,
    Disputed,
    Rejected,
}

impl ClaimStatus {
    /// Position in the forward progression, `None` for terminal states.
    pub fn rank(&self) -> Option<u8> {
        match self {
            ClaimStatus::IntakePending => Some(0),
            ClaimStatus::AiVerified => Some(1),
            ClaimStatus::SpatialLocked => Some(2),
            ClaimStatus::Minted => Some(3),
            ClaimStatus::GovtTitleSync => Some(4),
            ClaimStatus::Disputed | ClaimStatus::Rejected => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.rank().is_none()
    }

    /// Whether the claim has already been minted as a token.
    pub fn is_minted(&self) -> bool {
        matches!(self, ClaimStatus::Minted | ClaimStatus::GovtTitleSync)
    }
}

/// A land title claim as carried through verification.
///
/// Submitted fields are immutable once intake completes; the engine
/// only writes the derived fields (confidence scores, conflict status,
/// review flag, latest outcome reference, anchor reference).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    pub claim_id: ClaimId,
    pub claimant_id: ClaimantId,
    /// Parcel boundary, when a survey sketch was supplied at intake.
    pub boundary: Option<Boundary>,
    /// Grantor name as declared on the intake form.
    pub grantor_name: String,
    /// OCR text of the supporting document.
    pub document_text: String,
    pub document_image_ref: Option<String>,
    pub status: ClaimStatus,
    pub overall_confidence: Option<f64>,
    pub fraud_score: Option<f64>,
    pub spatial_conflict_status: Option<ConflictStatus>,
    pub review_required: bool,
    pub latest_outcome: Option<OutcomeId>,
    /// Ledger transaction reference, set at minting.
    pub anchor_ref: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Claim {
    pub fn new(
        claimant_id: ClaimantId,
        grantor_name: impl Into<String>,
        document_text: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            claim_id: ClaimId::generate(),
            claimant_id,
            boundary: None,
            grantor_name: grantor_name.into(),
            document_text: document_text.into(),
            document_image_ref: None,
            status: ClaimStatus::IntakePending,
            overall_confidence: None,
            fraud_score: None,
            spatial_conflict_status: None,
            review_required: false,
            latest_outcome: None,
            anchor_ref: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = Some(boundary);
        self
    }

    pub fn with_document_image(mut self, image_ref: impl Into<String>) -> Self {
        self.document_image_ref = Some(image_ref.into());
        self
    }
}
