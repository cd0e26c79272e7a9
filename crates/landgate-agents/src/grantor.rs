//! Grantor history risk.
//!
//! Advisory signal: how often has this grantor's name appeared on
//! claims that ended up disputed or rejected. Carried in the outcome
//! breakdown for reviewers but weighted at zero in the aggregate score.

use crate::agent::{ClaimSnapshot, SignalAgent};
use crate::error::AgentResult;
use async_trait::async_trait;
use landgate_storage::ClaimStore;
use landgate_types::{ClaimStatus, SignalKind, SignalResult, SignalVerdict};
use std::sync::Arc;
use std::time::Instant;

const DISPUTED_PENALTY: f64 = 0.6;
const REJECTED_PENALTY: f64 = 0.8;

pub struct GrantorHistoryAgent {
    claims: Arc<dyn ClaimStore>,
}

impl GrantorHistoryAgent {
    pub fn new(claims: Arc<dyn ClaimStore>) -> Self {
        Self { claims }
    }
}

#[async_trait]
impl SignalAgent for GrantorHistoryAgent {
    fn kind(&self) -> SignalKind {
        SignalKind::GrantorHistory
    }

    async fn evaluate(&self, snapshot: &ClaimSnapshot) -> AgentResult<SignalResult> {
        let started = Instant::now();
        let priors: Vec<_> = self
            .claims
            .list_claims_by_grantor(&snapshot.grantor_name)
            .await?
            .into_iter()
            .filter(|claim| claim.claim_id != snapshot.claim_id)
            .collect();

        let disputed = priors
            .iter()
            .filter(|claim| claim.status == ClaimStatus::Disputed)
            .count();
        let rejected = priors
            .iter()
            .filter(|claim| claim.status == ClaimStatus::Rejected)
            .count();

        let mut confidence: f64 = 1.0;
        let mut reasons = Vec::new();
        if priors.is_empty() {
            reasons.push("no prior claims on file for this grantor".to_string());
        } else {
            reasons.push(format!("{} prior claims on file for this grantor", priors.len()));
        }
        if disputed > 0 {
            confidence *= DISPUTED_PENALTY.powi(disputed as i32);
            reasons.push(format!("{disputed} prior disputed claims name this grantor"));
        }
        if rejected > 0 {
            confidence *= REJECTED_PENALTY.powi(rejected as i32);
            reasons.push(format!("{rejected} prior rejected claims name this grantor"));
        }

        let verdict = if disputed >= 2 {
            SignalVerdict::Flagged
        } else if disputed == 1 || rejected > 0 {
            SignalVerdict::NeedsReview
        } else {
            SignalVerdict::Clear
        };

        Ok(SignalResult::new(SignalKind::GrantorHistory, confidence, verdict)
            .with_reasons(reasons)
            .with_duration(started.elapsed().as_millis() as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use landgate_storage::InMemoryRegistry;
    use landgate_types::{Claim, ClaimantId};

    async fn registry_with_history(disputed: usize, rejected: usize) -> Arc<InMemoryRegistry> {
        let registry = Arc::new(InMemoryRegistry::new());
        for _ in 0..disputed {
            let claim = Claim::new(ClaimantId::generate(), "Kofi Mensah", "INDENTURE ...");
            let id = claim.claim_id.clone();
            registry.create_claim(claim).await.unwrap();
            registry
                .update_status(&id, ClaimStatus::Disputed, Utc::now())
                .await
                .unwrap();
        }
        for _ in 0..rejected {
            let claim = Claim::new(ClaimantId::generate(), "Kofi Mensah", "INDENTURE ...");
            let id = claim.claim_id.clone();
            registry.create_claim(claim).await.unwrap();
            registry
                .update_status(&id, ClaimStatus::Rejected, Utc::now())
                .await
                .unwrap();
        }
        registry
    }

    fn snapshot() -> ClaimSnapshot {
        ClaimSnapshot::of(&Claim::new(
            ClaimantId::new("buyer-1"),
            "Kofi Mensah",
            "INDENTURE ...",
        ))
    }

    #[tokio::test]
    async fn clean_history_is_clear() {
        let agent = GrantorHistoryAgent::new(registry_with_history(0, 0).await);
        let result = agent.evaluate(&snapshot()).await.unwrap();
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.verdict, SignalVerdict::Clear);
    }

    #[tokio::test]
    async fn one_disputed_prior_needs_review() {
        let agent = GrantorHistoryAgent::new(registry_with_history(1, 0).await);
        let result = agent.evaluate(&snapshot()).await.unwrap();
        assert!((result.confidence - 0.6).abs() < 1e-9);
        assert_eq!(result.verdict, SignalVerdict::NeedsReview);
    }

    #[tokio::test]
    async fn repeat_disputes_are_flagged() {
        let agent = GrantorHistoryAgent::new(registry_with_history(2, 0).await);
        let result = agent.evaluate(&snapshot()).await.unwrap();
        assert!((result.confidence - 0.36).abs() < 1e-9);
        assert_eq!(result.verdict, SignalVerdict::Flagged);
    }

    #[tokio::test]
    async fn rejected_priors_lower_confidence() {
        let agent = GrantorHistoryAgent::new(registry_with_history(0, 1).await);
        let result = agent.evaluate(&snapshot()).await.unwrap();
        assert!((result.confidence - 0.8).abs() < 1e-9);
        assert_eq!(result.verdict, SignalVerdict::NeedsReview);
    }

    #[tokio::test]
    async fn own_claim_is_not_history() {
        let registry = Arc::new(InMemoryRegistry::new());
        let claim = Claim::new(ClaimantId::new("buyer-1"), "Kofi Mensah", "INDENTURE ...");
        registry.create_claim(claim.clone()).await.unwrap();

        let agent = GrantorHistoryAgent::new(registry);
        let result = agent.evaluate(&ClaimSnapshot::of(&claim)).await.unwrap();
        assert_eq!(result.confidence, 1.0);
        assert!(result
            .reasoning
            .iter()
            .any(|reason| reason.contains("no prior claims")));
    }
}
