//! Aggregated verification outcomes.

use crate::ids::{ClaimId, OutcomeId};
use crate::signal::SignalKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Band the overall confidence falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

/// Routing decision for a verified claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recommendation {
    AutoApprove,
    HumanReview,
    Reject,
}

/// One signal's contribution to the weighted overall score.
///
/// `score` is the good-space value after normalisation (1.0 = clean);
/// `weighted` is `score * weight`. Advisory signals carry weight 0.0
/// and appear here for auditability only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalBreakdown {
    pub kind: SignalKind,
    pub score: f64,
    pub weight: f64,
    pub weighted: f64,
    pub degraded: bool,
}

/// Immutable record of one aggregator run over a claim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationOutcome {
    pub outcome_id: OutcomeId,
    pub claim_id: ClaimId,
    pub overall_confidence: f64,
    pub confidence_level: ConfidenceLevel,
    pub recommendation: Recommendation,
    pub breakdown: Vec<SignalBreakdown>,
    /// Human-readable trail: per-agent findings plus any override applied.
    pub reasoning: Vec<String>,
    /// True when at least one agent result was a substituted default.
    pub partial: bool,
    pub produced_at: DateTime<Utc>,
}

impl VerificationOutcome {
    pub fn breakdown_for(&self, kind: SignalKind) -> Option<&SignalBreakdown> {
        self.breakdown.iter().find(|b| b.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_level_ordering() {
        assert!(ConfidenceLevel::Low < ConfidenceLevel::Medium);
        assert!(ConfidenceLevel::Medium < ConfidenceLevel::High);
    }

    #[test]
    fn test_breakdown_lookup() {
        let outcome = VerificationOutcome {
            outcome_id: OutcomeId::generate(),
            claim_id: ClaimId::generate(),
            overall_confidence: 0.91,
            confidence_level: ConfidenceLevel::High,
            recommendation: Recommendation::AutoApprove,
            breakdown: vec![SignalBreakdown {
                kind: SignalKind::DocumentAnalysis,
                score: 0.9,
                weight: 0.25,
                weighted: 0.225,
                degraded: false,
            }],
            reasoning: vec![],
            partial: false,
            produced_at: Utc::now(),
        };
        assert!(outcome.breakdown_for(SignalKind::DocumentAnalysis).is_some());
        assert!(outcome.breakdown_for(SignalKind::GpsRegion).is_none());
    }

    #[test]
    fn test_outcome_serde_roundtrip() {
        let outcome = VerificationOutcome {
            outcome_id: OutcomeId::generate(),
            claim_id: ClaimId::generate(),
            overall_confidence: 0.42,
            confidence_level: ConfidenceLevel::Low,
            recommendation: Recommendation::Reject,
            breakdown: vec![],
            reasoning: vec!["fraud detected with confidence 0.92".into()],
            partial: true,
            produced_at: Utc::now(),
        };
        let json = serde_json::to_string(&outcome).unwrap();
        let restored: VerificationOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.recommendation, Recommendation::Reject);
        assert!(restored.partial);
    }
}
