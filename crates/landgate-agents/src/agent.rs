//! The signal agent contract and the claim snapshot agents receive.

use crate::error::AgentResult;
use async_trait::async_trait;
use landgate_types::{Boundary, Claim, ClaimId, ClaimantId, DocumentInput, SignalKind, SignalResult};

/// Immutable view of a claim handed to every agent in a verification
/// run.
///
/// Agents never see the live claim record and never write anything:
/// each run gets the same snapshot, so concurrently executing agents
/// cannot observe each other's effects.
#[derive(Debug, Clone)]
pub struct ClaimSnapshot {
    pub claim_id: ClaimId,
    pub claimant_id: ClaimantId,
    pub grantor_name: String,
    pub document: DocumentInput,
    pub boundary: Option<Boundary>,
}

impl ClaimSnapshot {
    /// Snapshot the submitted fields of a claim.
    pub fn of(claim: &Claim) -> Self {
        let mut document = DocumentInput::from_text(claim.document_text.clone());
        if let Some(image_ref) = &claim.document_image_ref {
            document = document.with_image_ref(image_ref.clone());
        }
        Self {
            claim_id: claim.claim_id.clone(),
            claimant_id: claim.claimant_id.clone(),
            grantor_name: claim.grantor_name.clone(),
            document,
            boundary: claim.boundary.clone(),
        }
    }

    pub fn with_ocr_confidence(mut self, confidence: f64) -> Self {
        self.document = self.document.with_ocr_confidence(confidence);
        self
    }
}

/// One independently executable verification check.
///
/// Implementations must be side-effect free with respect to the claim:
/// reads against storage are fine, writes are not. A returned error is
/// recovered by the aggregator with a neutral default, so agents should
/// only fail when they genuinely cannot evaluate.
#[async_trait]
pub trait SignalAgent: Send + Sync {
    /// Which signal this agent produces.
    fn kind(&self) -> SignalKind;

    /// Evaluate the claim snapshot and produce a signal.
    async fn evaluate(&self, snapshot: &ClaimSnapshot) -> AgentResult<SignalResult>;
}
