//! LandGate core domain types.
//!
//! Shared vocabulary for the claim verification engine:
//! - strongly-typed identifiers for claims, conflicts, and outcomes
//! - geodetic boundary polygons as submitted at intake
//! - the claim record and its lifecycle states
//! - spatial conflict records and severity classification
//! - signal agent results and aggregated verification outcomes
//! - threshold configuration with production defaults
//!
//! Types here are plain data: no storage, no async, no policy. The
//! components that act on them live in the sibling crates.

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

mod boundary;
mod claim;
mod config;
mod conflict;
mod document;
mod ids;
mod outcome;
mod signal;

pub use boundary::{Boundary, GeoPoint};
pub use claim::{Claim, ClaimStatus};
pub use config::{
    ConflictThresholds, DecisionThresholds, FraudConfig, RegionBounds, SignalWeights,
    VerificationConfig,
};
pub use conflict::{
    AlertType, ConflictRecord, ConflictSeverity, ConflictStatus, ResolutionStatus,
};
pub use document::{DocumentAnalysis, DocumentInput, DocumentType, ExtractedFields};
pub use ids::{ClaimId, ClaimantId, ConflictId, OutcomeId};
pub use outcome::{ConfidenceLevel, Recommendation, SignalBreakdown, VerificationOutcome};
pub use signal::{SignalKind, SignalResult, SignalVerdict};
