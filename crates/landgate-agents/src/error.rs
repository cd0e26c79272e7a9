use landgate_geometry::GeometryError;
use landgate_storage::StorageError;
use thiserror::Error;

/// Result type for agent operations.
pub type AgentResult<T> = Result<T, AgentError>;

/// Errors surfaced by signal agents.
///
/// An `Err` from an agent means the agent could not produce a usable
/// signal at all; the aggregator substitutes a neutral result and marks
/// the run partial. Findings against the claim are never errors, they
/// are low-confidence `SignalResult`s.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("invalid boundary geometry: {0}")]
    Geometry(#[from] GeometryError),

    #[error("registry lookup failed: {0}")]
    Storage(#[from] StorageError),

    #[error("vision analyzer failed: {0}")]
    Vision(String),

    #[error("agent dependency unavailable: {0}")]
    Unavailable(String),
}
