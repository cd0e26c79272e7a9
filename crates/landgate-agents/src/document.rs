//! Document analysis agent.
//!
//! Delegates to the external vision collaborator when one is wired in
//! and degrades to the deterministic pattern extractor on error or
//! timeout. The fallback is a first-class path: deployments without a
//! vision backend run pattern-only and still get the same result shape.

use crate::agent::{ClaimSnapshot, SignalAgent};
use crate::error::{AgentError, AgentResult};
use crate::extract::FieldExtractor;
use async_trait::async_trait;
use landgate_types::{DocumentAnalysis, DocumentInput, SignalKind, SignalResult, SignalVerdict};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

/// Analysis confidence at or above which the document signal is clear.
const CLEAR_CONFIDENCE: f64 = 0.75;

const DEFAULT_VISION_TIMEOUT: Duration = Duration::from_secs(8);

/// External document/vision capability.
#[async_trait]
pub trait VisionAnalyzer: Send + Sync {
    async fn analyze(&self, input: &DocumentInput) -> AgentResult<DocumentAnalysis>;
}

/// Signal agent wrapping vision analysis with a pattern fallback.
pub struct DocumentAgent {
    vision: Option<Arc<dyn VisionAnalyzer>>,
    extractor: FieldExtractor,
    vision_timeout: Duration,
}

impl DocumentAgent {
    pub fn new(vision: Option<Arc<dyn VisionAnalyzer>>) -> Self {
        Self {
            vision,
            extractor: FieldExtractor::new(),
            vision_timeout: DEFAULT_VISION_TIMEOUT,
        }
    }

    /// An agent with no vision backend at all.
    pub fn pattern_only() -> Self {
        Self::new(None)
    }

    pub fn with_vision_timeout(mut self, timeout: Duration) -> Self {
        self.vision_timeout = timeout;
        self
    }

    async fn analyze_document(&self, input: &DocumentInput) -> DocumentAnalysis {
        let Some(vision) = &self.vision else {
            return self.extractor.fallback_analysis(input);
        };

        match tokio::time::timeout(self.vision_timeout, vision.analyze(input)).await {
            Ok(Ok(analysis)) => analysis,
            Ok(Err(error)) => {
                warn!(error = %error, "vision analyzer failed, using pattern extraction");
                self.extractor.fallback_analysis(input)
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.vision_timeout.as_millis() as u64,
                    "vision analyzer timed out, using pattern extraction"
                );
                self.extractor.fallback_analysis(input)
            }
        }
    }
}

#[async_trait]
impl SignalAgent for DocumentAgent {
    fn kind(&self) -> SignalKind {
        SignalKind::DocumentAnalysis
    }

    async fn evaluate(&self, snapshot: &ClaimSnapshot) -> AgentResult<SignalResult> {
        let started = Instant::now();
        let analysis = self.analyze_document(&snapshot.document).await;

        // The signal reports document goodness: for an unauthentic
        // verdict the analyzer's confidence counts against the claim.
        let (score, verdict) = if analysis.is_authentic {
            let verdict = if analysis.confidence >= CLEAR_CONFIDENCE {
                SignalVerdict::Clear
            } else {
                SignalVerdict::NeedsReview
            };
            (analysis.confidence, verdict)
        } else {
            (1.0 - analysis.confidence, SignalVerdict::Flagged)
        };

        let mut reasons = analysis.reasoning.clone();
        reasons.extend(
            analysis
                .fraud_indicators
                .iter()
                .map(|indicator| format!("fraud indicator: {indicator}")),
        );

        Ok(SignalResult::new(SignalKind::DocumentAnalysis, score, verdict)
            .with_reasons(reasons)
            .with_duration(started.elapsed().as_millis() as u64))
    }
}

/// Scripted vision analyzer for tests and local development.
pub struct MockVisionAnalyzer {
    behaviour: MockBehaviour,
}

enum MockBehaviour {
    Returning(DocumentAnalysis),
    Failing(String),
    Hanging,
}

impl MockVisionAnalyzer {
    pub fn returning(analysis: DocumentAnalysis) -> Self {
        Self {
            behaviour: MockBehaviour::Returning(analysis),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            behaviour: MockBehaviour::Failing(message.into()),
        }
    }

    /// Never resolves; exercises timeout handling.
    pub fn hanging() -> Self {
        Self {
            behaviour: MockBehaviour::Hanging,
        }
    }
}

#[async_trait]
impl VisionAnalyzer for MockVisionAnalyzer {
    async fn analyze(&self, _input: &DocumentInput) -> AgentResult<DocumentAnalysis> {
        match &self.behaviour {
            MockBehaviour::Returning(analysis) => Ok(analysis.clone()),
            MockBehaviour::Failing(message) => Err(AgentError::Vision(message.clone())),
            MockBehaviour::Hanging => std::future::pending().await,
        }
    }
}
