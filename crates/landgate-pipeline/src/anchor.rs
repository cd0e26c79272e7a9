//! Ledger anchoring for minted claims.
//!
//! Minting stamps a claim with an immutable content hash and records the
//! ledger transaction that anchored it. The ledger itself sits behind the
//! [`LedgerAnchor`] trait; production wires a chain client here, tests use
//! the in-process fakes below.

use std::sync::Mutex;

use async_trait::async_trait;
use landgate_types::Claim;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};

/// Receipt returned by a successful anchor call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnchorReceipt {
    /// Ledger transaction reference recorded on the claim.
    pub tx_reference: String,
}

/// External ledger that anchors claim content hashes.
#[async_trait]
pub trait LedgerAnchor: Send + Sync {
    async fn anchor(&self, content_hash: &str) -> PipelineResult<AnchorReceipt>;
}

/// Content hash covering the fields a title certificate attests to.
///
/// Mutable workflow state (status, confidence, review flags) is deliberately
/// excluded so the hash stays stable from submission through minting.
pub fn claim_content_hash(claim: &Claim) -> PipelineResult<String> {
    let canonical = serde_json::json!({
        "claim_id": claim.claim_id.to_string(),
        "claimant_id": claim.claimant_id.to_string(),
        "grantor_name": claim.grantor_name,
        "document_text": claim.document_text,
        "document_image_ref": claim.document_image_ref,
        "boundary": claim.boundary,
    });
    let bytes = serde_json::to_vec(&canonical)?;
    Ok(blake3::hash(&bytes).to_hex().to_string())
}

/// In-process anchor that records every hash it is asked to anchor.
#[derive(Debug, Default)]
pub struct MockLedgerAnchor {
    anchored: Mutex<Vec<String>>,
}

impl MockLedgerAnchor {
    pub fn anchored(&self) -> Vec<String> {
        self.anchored
            .lock()
            .map(|anchored| anchored.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LedgerAnchor for MockLedgerAnchor {
    async fn anchor(&self, content_hash: &str) -> PipelineResult<AnchorReceipt> {
        let mut anchored = self
            .anchored
            .lock()
            .map_err(|_| PipelineError::Anchor("anchor mock lock poisoned".into()))?;
        anchored.push(content_hash.to_string());
        let prefix: String = content_hash.chars().take(12).collect();
        Ok(AnchorReceipt {
            tx_reference: format!("tx-{prefix}"),
        })
    }
}

/// Anchor whose ledger endpoint is always down.
#[derive(Debug, Default)]
pub struct FailingLedgerAnchor;

#[async_trait]
impl LedgerAnchor for FailingLedgerAnchor {
    async fn anchor(&self, _content_hash: &str) -> PipelineResult<AnchorReceipt> {
        Err(PipelineError::Anchor("ledger endpoint unavailable".into()))
    }
}

/// Anchor that never answers, for exercising the mint timeout.
#[derive(Debug, Default)]
pub struct HangingLedgerAnchor;

#[async_trait]
impl LedgerAnchor for HangingLedgerAnchor {
    async fn anchor(&self, _content_hash: &str) -> PipelineResult<AnchorReceipt> {
        std::future::pending().await
    }
}

#[cfg(test)]
mod tests {
    use landgate_types::{Boundary, ClaimantId};

    use super::*;

    fn claim() -> Claim {
        Claim::new(
            ClaimantId::generate(),
            "Kofi Mensah",
            "INDENTURE made between Kofi Mensah and the claimant",
        )
    }

    #[test]
    fn test_content_hash_is_stable_for_the_same_claim() {
        let claim = claim();
        let first = claim_content_hash(&claim).unwrap();
        let second = claim_content_hash(&claim).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
    }

    #[test]
    fn test_content_hash_changes_with_the_boundary() {
        let claim = claim();
        let bare = claim_content_hash(&claim).unwrap();

        let bounded = claim.with_boundary(Boundary::from_coords(vec![
            (5.600, -0.190),
            (5.610, -0.190),
            (5.610, -0.180),
            (5.600, -0.180),
        ]));
        let hashed = claim_content_hash(&bounded).unwrap();

        assert_ne!(bare, hashed);
    }

    #[tokio::test]
    async fn test_mock_anchor_records_the_hash() {
        let anchor = MockLedgerAnchor::default();
        let receipt = anchor.anchor("deadbeef").await.unwrap();

        assert!(receipt.tx_reference.starts_with("tx-"));
        assert_eq!(anchor.anchored(), vec!["deadbeef".to_string()]);
    }

    #[tokio::test]
    async fn test_failing_anchor_reports_the_outage() {
        let anchor = FailingLedgerAnchor;
        let error = anchor.anchor("deadbeef").await.unwrap_err();

        assert!(error.to_string().contains("ledger endpoint unavailable"));
    }
}
