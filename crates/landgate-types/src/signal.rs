//! Signal agent results.
//!
//! Every verification agent reduces its analysis to a `SignalResult`:
//! a confidence score, a verdict, and the reasoning that produced it.
//! Results are immutable once produced and are persisted to the audit
//! log by the aggregator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which agent produced a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    DocumentAnalysis,
    FraudHeuristics,
    TamperingCheck,
    GpsRegion,
    GrantorHistory,
    SpatialConflict,
}

impl SignalKind {
    pub fn name(&self) -> &'static str {
        match self {
            SignalKind::DocumentAnalysis => "document_analysis",
            SignalKind::FraudHeuristics => "fraud_heuristics",
            SignalKind::TamperingCheck => "tampering_check",
            SignalKind::GpsRegion => "gps_region",
            SignalKind::GrantorHistory => "grantor_history",
            SignalKind::SpatialConflict => "spatial_conflict",
        }
    }
}

/// Classification verdict attached to a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalVerdict {
    Clear,
    NeedsReview,
    Flagged,
}

/// Immutable result of one signal agent run.
///
/// The meaning of `confidence` is per-kind: document, GPS, and grantor
/// history report suspicion-free confidence (1.0 = good), while fraud
/// and tampering report detection confidence (1.0 = bad). The
/// aggregator normalises before weighting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalResult {
    pub kind: SignalKind,
    /// Score in [0, 1], clamped on construction.
    pub confidence: f64,
    pub verdict: SignalVerdict,
    pub reasoning: Vec<String>,
    pub duration_ms: u64,
    /// True when this result is a substituted neutral default after an
    /// agent failure or timeout.
    pub degraded: bool,
    pub produced_at: DateTime<Utc>,
}

impl SignalResult {
    pub fn new(kind: SignalKind, confidence: f64, verdict: SignalVerdict) -> Self {
        Self {
            kind,
            confidence: confidence.clamp(0.0, 1.0),
            verdict,
            reasoning: Vec::new(),
            duration_ms: 0,
            degraded: false,
            produced_at: Utc::now(),
        }
    }

    /// Neutral substitute used when an agent fails or times out.
    pub fn neutral(kind: SignalKind, note: impl Into<String>) -> Self {
        Self {
            kind,
            confidence: 0.5,
            verdict: SignalVerdict::NeedsReview,
            reasoning: vec![note.into()],
            duration_ms: 0,
            degraded: true,
            produced_at: Utc::now(),
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reasoning.push(reason.into());
        self
    }

    pub fn with_reasons(mut self, reasons: Vec<String>) -> Self {
        self.reasoning.extend(reasons);
        self
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }
}
