use landgate_conflict::ConflictError;
use landgate_storage::StorageError;
use landgate_types::{ClaimId, ClaimStatus};
use landgate_verify::VerifyError;
use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors raised while driving a claim through its lifecycle.
///
/// A refused transition is not an error. Refusals (a spatial lock
/// blocked by a conflict, a dispute against an already rejected claim)
/// come back as [`crate::TransitionOutcome::Refused`] so the caller can
/// inspect the reason; errors are reserved for calls that could not run
/// at all.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("claim {0} not found")]
    NotFound(ClaimId),

    #[error("claim {claim_id} cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        claim_id: ClaimId,
        from: ClaimStatus,
        to: ClaimStatus,
    },

    #[error("claim {0} has no boundary to lock")]
    MissingBoundary(ClaimId),

    #[error("claim {0} is not awaiting review")]
    NotAwaitingReview(ClaimId),

    #[error("reviewer identity is required")]
    MissingReviewer,

    #[error("claim encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("ledger anchoring failed: {0}")]
    Anchor(String),

    #[error("registry access failed: {0}")]
    Storage(#[from] StorageError),

    #[error("verification failed: {0}")]
    Verify(#[from] VerifyError),

    #[error("conflict detection failed: {0}")]
    Conflict(#[from] ConflictError),
}
