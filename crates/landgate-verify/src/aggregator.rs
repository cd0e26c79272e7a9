//! Concurrent signal execution and weighted confidence aggregation.

use crate::error::{VerifyError, VerifyResult};
use chrono::Utc;
use futures::future::join_all;
use landgate_agents::{
    ClaimSnapshot, DocumentAgent, FraudAgent, GpsRegionAgent, GrantorHistoryAgent, SignalAgent,
    TamperingAgent,
};
use landgate_conflict::{ConflictDetector, ConflictReport};
use landgate_storage::{AuditAppend, AuditStore, RegistryStorage};
use landgate_types::{
    Claim, ConflictStatus, OutcomeId, Recommendation, SignalBreakdown, SignalKind, SignalResult,
    SignalVerdict, SignalWeights, VerificationConfig, VerificationOutcome,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Product of one aggregator run: the outcome that gets persisted,
/// plus the spatial report it was scored from when a boundary was
/// checked.
#[derive(Debug, Clone)]
pub struct VerificationRun {
    pub outcome: VerificationOutcome,
    pub spatial: Option<ConflictReport>,
}

/// Runs every signal agent concurrently and reduces their results to
/// one recommendation.
///
/// Each agent is wrapped in the configured timeout; a failure, panic,
/// or timeout is replaced by a neutral result and marks the outcome
/// partial. Fraud and tampering scores are inverted to good-space
/// before weighting, and the override ladder is consulted before the
/// weighted score decides anything.
pub struct ConfidenceAggregator {
    agents: Vec<Arc<dyn SignalAgent>>,
    detector: Option<Arc<ConflictDetector>>,
    audit: Option<Arc<dyn AuditStore>>,
    config: VerificationConfig,
}

impl ConfidenceAggregator {
    pub fn new(config: VerificationConfig) -> Self {
        Self {
            agents: Vec::new(),
            detector: None,
            audit: None,
            config,
        }
    }

    pub fn with_agent(mut self, agent: Arc<dyn SignalAgent>) -> Self {
        self.agents.push(agent);
        self
    }

    pub fn with_agents(mut self, agents: Vec<Arc<dyn SignalAgent>>) -> Self {
        self.agents.extend(agents);
        self
    }

    /// Attach the conflict detector. It runs concurrently with the
    /// agents whenever the claim carries a boundary.
    pub fn with_detector(mut self, detector: Arc<ConflictDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    /// Attach the audit log. Every signal result and the final outcome
    /// are appended best-effort.
    pub fn with_audit(mut self, audit: Arc<dyn AuditStore>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Run one verification pass over a claim.
    pub async fn verify(&self, claim: &Claim) -> VerifyResult<VerificationRun> {
        let run_spatial = self.detector.is_some() && claim.boundary.is_some();
        if self.agents.is_empty() && !run_spatial {
            return Err(VerifyError::NoSignals);
        }

        let snapshot = ClaimSnapshot::of(claim);
        let budget = Duration::from_millis(self.config.agent_timeout_ms);

        let mut kinds = Vec::new();
        let mut handles = Vec::new();
        for agent in &self.agents {
            let agent = Arc::clone(agent);
            let snapshot = snapshot.clone();
            kinds.push(agent.kind());
            handles.push(tokio::spawn(async move {
                let started = Instant::now();
                let outcome = tokio::time::timeout(budget, agent.evaluate(&snapshot)).await;
                (outcome, started.elapsed())
            }));
        }

        let spatial_handle = match (&self.detector, &claim.boundary) {
            (Some(detector), Some(boundary)) => {
                let detector = Arc::clone(detector);
                let claim_id = claim.claim_id.clone();
                let boundary = boundary.clone();
                Some(tokio::spawn(async move {
                    tokio::time::timeout(budget, detector.check(&claim_id, &boundary)).await
                }))
            }
            _ => None,
        };

        let mut partial = false;
        let mut results: Vec<SignalResult> = Vec::new();
        for (kind, joined) in kinds.into_iter().zip(join_all(handles).await) {
            let result = match joined {
                Ok((Ok(Ok(result)), elapsed)) => {
                    result.with_duration(elapsed.as_millis() as u64)
                }
                Ok((Ok(Err(error)), _)) => {
                    warn!(
                        claim_id = %claim.claim_id,
                        agent = kind.name(),
                        error = %error,
                        "signal agent failed, substituting neutral result"
                    );
                    partial = true;
                    SignalResult::neutral(kind, format!("agent failed: {error}"))
                }
                Ok((Err(_), _)) => {
                    warn!(
                        claim_id = %claim.claim_id,
                        agent = kind.name(),
                        timeout_ms = self.config.agent_timeout_ms,
                        "signal agent timed out, substituting neutral result"
                    );
                    partial = true;
                    SignalResult::neutral(
                        kind,
                        format!("agent timed out after {}ms", self.config.agent_timeout_ms),
                    )
                }
                Err(join_error) => {
                    warn!(
                        claim_id = %claim.claim_id,
                        agent = kind.name(),
                        error = %join_error,
                        "signal agent task aborted, substituting neutral result"
                    );
                    partial = true;
                    SignalResult::neutral(kind, "agent task aborted")
                }
            };
            results.push(result);
        }

        let mut spatial_report = None;
        if let Some(handle) = spatial_handle {
            match handle.await {
                Ok(Ok(Ok(report))) => {
                    partial = partial || report.degraded;
                    spatial_report = Some(report);
                }
                Ok(Ok(Err(error))) => {
                    warn!(claim_id = %claim.claim_id, error = %error, "conflict detection failed");
                    partial = true;
                }
                Ok(Err(_)) => {
                    warn!(
                        claim_id = %claim.claim_id,
                        timeout_ms = self.config.agent_timeout_ms,
                        "conflict detection timed out"
                    );
                    partial = true;
                }
                Err(join_error) => {
                    warn!(
                        claim_id = %claim.claim_id,
                        error = %join_error,
                        "conflict detection task aborted"
                    );
                    partial = true;
                }
            }
            results.push(match &spatial_report {
                Some(report) => spatial_signal(report),
                None => SignalResult::neutral(
                    SignalKind::SpatialConflict,
                    "conflict detection unavailable",
                ),
            });
        }

        for result in &results {
            self.audit_signal(claim, result).await;
        }

        let weights = if run_spatial {
            self.config.weights
        } else {
            self.config.weights.without_spatial()
        };

        let mut reasoning = Vec::new();
        let mut breakdown = Vec::new();
        for result in &results {
            let score = good_space_score(result);
            let weight = weight_for(result.kind, &weights);
            breakdown.push(SignalBreakdown {
                kind: result.kind,
                score,
                weight,
                weighted: score * weight,
                degraded: result.degraded,
            });
            let leading = result
                .reasoning
                .first()
                .map(String::as_str)
                .unwrap_or("no detail");
            reasoning.push(format!(
                "{} {:.2}: {}",
                result.kind.name(),
                result.confidence,
                leading
            ));
        }

        // Normalising by the participating weight keeps the score in
        // [0, 1] even when an engine runs a subset of the agents.
        let total_weight: f64 = breakdown.iter().map(|b| b.weight).sum();
        let overall = if total_weight > 0.0 {
            breakdown.iter().map(|b| b.weighted).sum::<f64>() / total_weight
        } else {
            0.5
        };

        let recommendation =
            self.decide(&results, spatial_report.as_ref(), overall, &mut reasoning);

        let outcome = VerificationOutcome {
            outcome_id: OutcomeId::generate(),
            claim_id: claim.claim_id.clone(),
            overall_confidence: overall,
            confidence_level: self.config.decision.level_for(overall),
            recommendation,
            breakdown,
            reasoning,
            partial,
            produced_at: Utc::now(),
        };
        self.audit_outcome(&outcome).await;

        info!(
            claim_id = %claim.claim_id,
            recommendation = ?outcome.recommendation,
            overall_confidence = outcome.overall_confidence,
            partial = outcome.partial,
            "verification run complete"
        );
        Ok(VerificationRun {
            outcome,
            spatial: spatial_report,
        })
    }

    /// The override ladder, consulted before the weighted score.
    fn decide(
        &self,
        results: &[SignalResult],
        spatial: Option<&ConflictReport>,
        overall: f64,
        reasoning: &mut Vec<String>,
    ) -> Recommendation {
        let cutoff = self.config.decision.override_confidence;
        let flagged_above = |kind: SignalKind| {
            results
                .iter()
                .find(|r| r.kind == kind)
                .filter(|r| r.verdict == SignalVerdict::Flagged && r.confidence > cutoff)
        };

        if let Some(result) = flagged_above(SignalKind::FraudHeuristics) {
            reasoning.push(format!(
                "override: fraud detection confidence {:.2} forces rejection",
                result.confidence
            ));
            return Recommendation::Reject;
        }
        if let Some(result) = flagged_above(SignalKind::TamperingCheck) {
            reasoning.push(format!(
                "override: tampering confidence {:.2} forces rejection",
                result.confidence
            ));
            return Recommendation::Reject;
        }
        if spatial.is_some_and(ConflictReport::requires_escalation) {
            reasoning.push("override: spatial conflict requires human escalation".to_string());
            return Recommendation::HumanReview;
        }

        if overall >= self.config.decision.auto_approve {
            reasoning.push(format!(
                "weighted confidence {overall:.2} qualifies for auto approval"
            ));
            Recommendation::AutoApprove
        } else if overall >= self.config.decision.human_review {
            reasoning.push(format!(
                "weighted confidence {overall:.2} requires human review"
            ));
            Recommendation::HumanReview
        } else {
            reasoning.push(format!(
                "weighted confidence {overall:.2} is below the review threshold"
            ));
            Recommendation::Reject
        }
    }

    async fn audit_signal(&self, claim: &Claim, result: &SignalResult) {
        let audit = match &self.audit {
            Some(audit) => audit,
            None => return,
        };
        let mut append = AuditAppend::for_claim(
            claim.claim_id.clone(),
            result.kind.name(),
            format!("{} confidence {:.2}", result.kind.name(), result.confidence),
        )
        .with_payload(serde_json::to_value(result).unwrap_or(serde_json::Value::Null));
        if result.degraded {
            append = append.failed();
        }
        if let Err(error) = audit.append_audit(append).await {
            warn!(claim_id = %claim.claim_id, error = %error, "signal audit append failed");
        }
    }

    async fn audit_outcome(&self, outcome: &VerificationOutcome) {
        let audit = match &self.audit {
            Some(audit) => audit,
            None => return,
        };
        let append = AuditAppend::for_claim(
            outcome.claim_id.clone(),
            "verification",
            format!(
                "recommendation {:?} at confidence {:.2}",
                outcome.recommendation, outcome.overall_confidence
            ),
        )
        .with_payload(serde_json::to_value(outcome).unwrap_or(serde_json::Value::Null));
        if let Err(error) = audit.append_audit(append).await {
            warn!(claim_id = %outcome.claim_id, error = %error, "outcome audit append failed");
        }
    }
}

/// The standard agent set over one storage backend.
///
/// The document agent starts pattern-only; deployments with a vision
/// collaborator swap in `DocumentAgent::new` themselves.
pub fn standard_agents<S>(
    storage: &Arc<S>,
    config: &VerificationConfig,
) -> Vec<Arc<dyn SignalAgent>>
where
    S: RegistryStorage + 'static,
{
    vec![
        Arc::new(DocumentAgent::pattern_only()),
        Arc::new(FraudAgent::new(storage.clone(), config.fraud.clone())),
        Arc::new(TamperingAgent::new()),
        Arc::new(GpsRegionAgent::new(config.region.clone())),
        Arc::new(GrantorHistoryAgent::new(storage.clone())),
    ]
}

/// Spatial standing reduced to a good-space signal.
///
/// A degraded report keeps its clear score so a storage fault never
/// hard-blocks intake; the degraded flag carries the caveat through to
/// the outcome.
fn spatial_signal(report: &ConflictReport) -> SignalResult {
    let (score, verdict) = match report.status {
        ConflictStatus::Clear => (1.0, SignalVerdict::Clear),
        ConflictStatus::PotentialDispute => (0.5, SignalVerdict::NeedsReview),
        ConflictStatus::HighRisk => (0.0, SignalVerdict::Flagged),
    };
    let mut result = SignalResult::new(SignalKind::SpatialConflict, score, verdict)
        .with_reason(report.summary());
    result.degraded = report.degraded;
    result
}

/// Fraud and tampering report detection confidence (1 = bad); every
/// other signal already reports in good-space.
fn good_space_score(result: &SignalResult) -> f64 {
    match result.kind {
        SignalKind::FraudHeuristics | SignalKind::TamperingCheck => 1.0 - result.confidence,
        _ => result.confidence,
    }
}

/// Grantor history is advisory: it appears in the breakdown with
/// weight zero and never moves the weighted score.
fn weight_for(kind: SignalKind, weights: &SignalWeights) -> f64 {
    match kind {
        SignalKind::DocumentAnalysis => weights.document,
        SignalKind::FraudHeuristics => weights.fraud,
        SignalKind::TamperingCheck => weights.tampering,
        SignalKind::GpsRegion => weights.gps,
        SignalKind::SpatialConflict => weights.spatial,
        SignalKind::GrantorHistory => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use landgate_agents::AgentResult;
    use landgate_conflict::NotificationDispatcher;
    use landgate_conflict::RecordingAlertSink;
    use landgate_storage::{
        AuditRecord, ClaimStore, InMemoryRegistry, QueryWindow, StorageError, StorageResult,
    };
    use landgate_types::{Boundary, ClaimId, ClaimantId, ConfidenceLevel};

    struct FixedAgent {
        kind: SignalKind,
        confidence: f64,
        verdict: SignalVerdict,
    }

    #[async_trait]
    impl SignalAgent for FixedAgent {
        fn kind(&self) -> SignalKind {
            self.kind
        }

        async fn evaluate(&self, _snapshot: &ClaimSnapshot) -> AgentResult<SignalResult> {
            Ok(SignalResult::new(self.kind, self.confidence, self.verdict))
        }
    }

    struct FailingAgent {
        kind: SignalKind,
    }

    #[async_trait]
    impl SignalAgent for FailingAgent {
        fn kind(&self) -> SignalKind {
            self.kind
        }

        async fn evaluate(&self, _snapshot: &ClaimSnapshot) -> AgentResult<SignalResult> {
            Err(landgate_agents::AgentError::Unavailable(
                "model endpoint offline".to_string(),
            ))
        }
    }

    struct PanickingAgent {
        kind: SignalKind,
    }

    #[async_trait]
    impl SignalAgent for PanickingAgent {
        fn kind(&self) -> SignalKind {
            self.kind
        }

        async fn evaluate(&self, _snapshot: &ClaimSnapshot) -> AgentResult<SignalResult> {
            panic!("agent crashed");
        }
    }

    struct HangingAgent {
        kind: SignalKind,
    }

    #[async_trait]
    impl SignalAgent for HangingAgent {
        fn kind(&self) -> SignalKind {
            self.kind
        }

        async fn evaluate(&self, _snapshot: &ClaimSnapshot) -> AgentResult<SignalResult> {
            std::future::pending().await
        }
    }

    fn fixed(kind: SignalKind, confidence: f64, verdict: SignalVerdict) -> Arc<dyn SignalAgent> {
        Arc::new(FixedAgent {
            kind,
            confidence,
            verdict,
        })
    }

    fn clean_agents() -> Vec<Arc<dyn SignalAgent>> {
        vec![
            fixed(SignalKind::DocumentAnalysis, 1.0, SignalVerdict::Clear),
            fixed(SignalKind::FraudHeuristics, 0.0, SignalVerdict::Clear),
            fixed(SignalKind::TamperingCheck, 0.0, SignalVerdict::Clear),
            fixed(SignalKind::GpsRegion, 1.0, SignalVerdict::Clear),
        ]
    }

    fn claim() -> Claim {
        Claim::new(
            ClaimantId::generate(),
            "Kofi Mensah",
            "INDENTURE between Kofi Mensah and the claimant",
        )
    }

    fn accra_parcel() -> Boundary {
        Boundary::from_coords(vec![
            (5.60, -0.19),
            (5.60, -0.18),
            (5.61, -0.18),
            (5.61, -0.19),
        ])
    }

    #[tokio::test]
    async fn test_clean_signals_auto_approve() {
        let aggregator =
            ConfidenceAggregator::new(VerificationConfig::default()).with_agents(clean_agents());

        let run = aggregator.verify(&claim()).await.unwrap();

        assert_eq!(run.outcome.recommendation, Recommendation::AutoApprove);
        assert_eq!(run.outcome.confidence_level, ConfidenceLevel::High);
        assert!((run.outcome.overall_confidence - 1.0).abs() < 1e-9);
        assert!(!run.outcome.partial);
        assert_eq!(run.outcome.breakdown.len(), 4);
        assert!(run.spatial.is_none());
    }

    #[tokio::test]
    async fn test_fraud_override_rejects_despite_clean_signals() {
        let mut agents = vec![
            fixed(SignalKind::DocumentAnalysis, 1.0, SignalVerdict::Clear),
            fixed(SignalKind::TamperingCheck, 0.0, SignalVerdict::Clear),
            fixed(SignalKind::GpsRegion, 1.0, SignalVerdict::Clear),
        ];
        agents.push(fixed(SignalKind::FraudHeuristics, 0.9, SignalVerdict::Flagged));
        let aggregator =
            ConfidenceAggregator::new(VerificationConfig::default()).with_agents(agents);

        let run = aggregator.verify(&claim()).await.unwrap();

        assert_eq!(run.outcome.recommendation, Recommendation::Reject);
        assert!(run.outcome.reasoning.iter().any(|r| r.contains("override: fraud")));
    }

    #[tokio::test]
    async fn test_tampering_override_rejects() {
        let mut agents = clean_agents();
        agents[2] = fixed(SignalKind::TamperingCheck, 0.8, SignalVerdict::Flagged);
        let aggregator =
            ConfidenceAggregator::new(VerificationConfig::default()).with_agents(agents);

        let run = aggregator.verify(&claim()).await.unwrap();

        assert_eq!(run.outcome.recommendation, Recommendation::Reject);
    }

    #[tokio::test]
    async fn test_override_cutoff_is_strictly_greater_than() {
        // Flagged at exactly the cutoff stays on the weighted path.
        let mut agents = clean_agents();
        agents[2] = fixed(SignalKind::TamperingCheck, 0.7, SignalVerdict::Flagged);
        let aggregator =
            ConfidenceAggregator::new(VerificationConfig::default()).with_agents(agents);

        let run = aggregator.verify(&claim()).await.unwrap();

        assert_eq!(run.outcome.recommendation, Recommendation::AutoApprove);
    }

    #[tokio::test]
    async fn test_spatial_escalation_forces_human_review() {
        let registry = Arc::new(InMemoryRegistry::default());
        let existing = Claim::new(ClaimantId::generate(), "Ama Serwaa", "INDENTURE over plot 7")
            .with_boundary(accra_parcel());
        registry.create_claim(existing).await.unwrap();

        let sink = Arc::new(RecordingAlertSink::default());
        let config = VerificationConfig::default();
        let detector = ConflictDetector::new(
            registry.clone(),
            registry.clone(),
            config.conflict.clone(),
        )
        .with_alerts(NotificationDispatcher::new(sink));
        let aggregator = ConfidenceAggregator::new(config)
            .with_agents(clean_agents())
            .with_detector(Arc::new(detector));

        let candidate = claim().with_boundary(accra_parcel());
        let run = aggregator.verify(&candidate).await.unwrap();

        assert_eq!(run.outcome.recommendation, Recommendation::HumanReview);
        assert!(run
            .outcome
            .reasoning
            .iter()
            .any(|r| r.contains("spatial conflict requires human escalation")));
        let report = run.spatial.unwrap();
        assert!(report.is_blocked);
        let spatial = run.outcome.breakdown_for(SignalKind::SpatialConflict).unwrap();
        assert_eq!(spatial.score, 0.0);
    }

    #[tokio::test]
    async fn test_one_failing_agent_still_produces_an_outcome() {
        let mut agents = clean_agents();
        agents[3] = Arc::new(FailingAgent {
            kind: SignalKind::GpsRegion,
        });
        let aggregator =
            ConfidenceAggregator::new(VerificationConfig::default()).with_agents(agents);

        let run = aggregator.verify(&claim()).await.unwrap();

        assert!(run.outcome.partial);
        let gps = run.outcome.breakdown_for(SignalKind::GpsRegion).unwrap();
        assert!(gps.degraded);
        assert_eq!(gps.score, 0.5);
        assert_eq!(run.outcome.recommendation, Recommendation::AutoApprove);
    }

    #[tokio::test]
    async fn test_panicking_agent_is_contained() {
        let mut agents = clean_agents();
        agents[2] = Arc::new(PanickingAgent {
            kind: SignalKind::TamperingCheck,
        });
        let aggregator =
            ConfidenceAggregator::new(VerificationConfig::default()).with_agents(agents);

        let run = aggregator.verify(&claim()).await.unwrap();

        assert!(run.outcome.partial);
        assert!(run.outcome.breakdown_for(SignalKind::TamperingCheck).unwrap().degraded);
    }

    #[tokio::test]
    async fn test_hanging_agent_times_out_to_neutral() {
        let config = VerificationConfig {
            agent_timeout_ms: 30,
            ..VerificationConfig::default()
        };
        let aggregator = ConfidenceAggregator::new(config)
            .with_agent(Arc::new(HangingAgent {
                kind: SignalKind::DocumentAnalysis,
            }))
            .with_agent(fixed(SignalKind::FraudHeuristics, 0.0, SignalVerdict::Clear));

        let run = aggregator.verify(&claim()).await.unwrap();

        assert!(run.outcome.partial);
        let document = run.outcome.breakdown_for(SignalKind::DocumentAnalysis).unwrap();
        assert!(document.degraded);
        assert!(run.outcome.reasoning.iter().any(|r| r.contains("timed out")));
    }

    #[tokio::test]
    async fn test_missing_boundary_redistributes_spatial_weight() {
        let aggregator =
            ConfidenceAggregator::new(VerificationConfig::default()).with_agents(clean_agents());

        let run = aggregator.verify(&claim()).await.unwrap();

        assert!(run.outcome.breakdown_for(SignalKind::SpatialConflict).is_none());
        let total: f64 = run.outcome.breakdown.iter().map(|b| b.weight).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!((run.outcome.overall_confidence - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_grantor_history_is_advisory_only() {
        let mut agents = clean_agents();
        agents.push(fixed(
            SignalKind::GrantorHistory,
            0.2,
            SignalVerdict::NeedsReview,
        ));
        let aggregator =
            ConfidenceAggregator::new(VerificationConfig::default()).with_agents(agents);

        let run = aggregator.verify(&claim()).await.unwrap();

        let history = run.outcome.breakdown_for(SignalKind::GrantorHistory).unwrap();
        assert_eq!(history.weight, 0.0);
        assert!((run.outcome.overall_confidence - 1.0).abs() < 1e-9);
        assert_eq!(run.outcome.recommendation, Recommendation::AutoApprove);
    }

    #[tokio::test]
    async fn test_unconfigured_engine_is_an_error() {
        let aggregator = ConfidenceAggregator::new(VerificationConfig::default());

        let result = aggregator.verify(&claim()).await;

        assert!(matches!(result, Err(VerifyError::NoSignals)));
    }

    #[tokio::test]
    async fn test_signal_results_and_outcome_are_audited() {
        let registry = Arc::new(InMemoryRegistry::default());
        let aggregator = ConfidenceAggregator::new(VerificationConfig::default())
            .with_agents(clean_agents())
            .with_audit(registry.clone());

        let claim = claim();
        aggregator.verify(&claim).await.unwrap();

        let trail = registry.list_audit_for_claim(&claim.claim_id).await.unwrap();
        assert_eq!(trail.len(), 5);
        assert!(trail.iter().any(|r| r.stage == "verification"));
        assert!(trail.iter().any(|r| r.stage == "fraud_heuristics"));
    }

    struct FailingAuditStore;

    #[async_trait]
    impl AuditStore for FailingAuditStore {
        async fn append_audit(&self, _event: AuditAppend) -> StorageResult<AuditRecord> {
            Err(StorageError::Backend("audit log unavailable".to_string()))
        }

        async fn list_audit(&self, _window: QueryWindow) -> StorageResult<Vec<AuditRecord>> {
            Err(StorageError::Backend("audit log unavailable".to_string()))
        }

        async fn list_audit_for_claim(
            &self,
            _claim_id: &ClaimId,
        ) -> StorageResult<Vec<AuditRecord>> {
            Err(StorageError::Backend("audit log unavailable".to_string()))
        }

        async fn latest_audit_hash(&self) -> StorageResult<Option<String>> {
            Err(StorageError::Backend("audit log unavailable".to_string()))
        }
    }

    #[tokio::test]
    async fn test_audit_failure_does_not_fail_the_run() {
        let aggregator = ConfidenceAggregator::new(VerificationConfig::default())
            .with_agents(clean_agents())
            .with_audit(Arc::new(FailingAuditStore));

        let run = aggregator.verify(&claim()).await.unwrap();

        assert_eq!(run.outcome.recommendation, Recommendation::AutoApprove);
    }

    #[tokio::test]
    async fn test_standard_agent_set_covers_every_agent_kind() {
        let registry = Arc::new(InMemoryRegistry::default());
        let agents = standard_agents(&registry, &VerificationConfig::default());

        let kinds: Vec<SignalKind> = agents.iter().map(|a| a.kind()).collect();
        assert_eq!(agents.len(), 5);
        assert!(kinds.contains(&SignalKind::DocumentAnalysis));
        assert!(kinds.contains(&SignalKind::FraudHeuristics));
        assert!(kinds.contains(&SignalKind::TamperingCheck));
        assert!(kinds.contains(&SignalKind::GpsRegion));
        assert!(kinds.contains(&SignalKind::GrantorHistory));
    }
}
