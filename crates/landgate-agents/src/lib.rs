//! Signal agents for the LandGate verification run.
//!
//! Each agent is an independently executable check over an immutable
//! claim snapshot:
//! - document analysis through the vision collaborator, with a
//!   deterministic pattern-extraction fallback
//! - fraud heuristics over extracted fields and document formatting
//! - tampering indicators in the submitted text
//! - GPS validation of the boundary against the registry's region
//! - grantor history risk from prior claims on file
//!
//! Agents return `SignalResult`s and never write claim state. The
//! aggregator in `landgate-verify` owns scheduling, timeouts, and
//! neutral-default substitution when an agent fails.

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

mod agent;
mod document;
mod error;
mod extract;
mod fraud;
mod gps;
mod grantor;
mod identity;
mod tamper;

pub use agent::{ClaimSnapshot, SignalAgent};
pub use document::{DocumentAgent, MockVisionAnalyzer, VisionAnalyzer};
pub use error::{AgentError, AgentResult};
pub use extract::{detect_document_type, FieldExtractor};
pub use fraud::FraudAgent;
pub use gps::GpsRegionAgent;
pub use grantor::GrantorHistoryAgent;
pub use identity::{IdentityMatch, IdentityMatcher, MatchQuality};
pub use tamper::TamperingAgent;
