//! Claim lifecycle orchestration for the land registry.
//!
//! [`ClaimPipeline`] is the write path of the whole engine: it accepts
//! claims at intake, runs the verification engine, locks boundaries
//! against a fresh conflict scan, anchors minted claims on the ledger,
//! and mirrors them into the government title registry. Transition
//! rules live here; storage only records what the pipeline decides.
//!
//! Transitions are idempotent. Repeating one a claim has already
//! passed returns [`TransitionOutcome::NoOp`] without touching storage
//! or the audit trail, so callers can retry at-least-once.

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

mod anchor;
mod error;
mod pipeline;

pub use anchor::{
    claim_content_hash, AnchorReceipt, FailingLedgerAnchor, HangingLedgerAnchor, LedgerAnchor,
    MockLedgerAnchor,
};
pub use error::{PipelineError, PipelineResult};
pub use pipeline::{ClaimPipeline, ReviewDecision, TransitionOutcome, VerifyReport};
