//! Confidence aggregation for land claim verification.
//!
//! The [`ConfidenceAggregator`] fans the signal agents (and the
//! conflict detector, when the claim has a boundary) out as concurrent
//! tasks, normalises every score to good-space, and reduces the
//! weighted sum to an auto-approve / human-review / reject
//! recommendation. Override rules for confident fraud, confident
//! tampering, and spatial escalation are consulted before the weighted
//! score decides anything.
//!
//! Agent failures never propagate past this crate: each one is
//! substituted with a neutral result and the outcome is marked
//! partial.

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

mod aggregator;
mod error;

pub use aggregator::{standard_agents, ConfidenceAggregator, VerificationRun};
pub use error::{VerifyError, VerifyResult};
