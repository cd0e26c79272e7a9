use landgate_geometry::GeometryError;
use thiserror::Error;

pub type ConflictResult<T> = Result<T, ConflictError>;

/// Errors surfaced by the conflict detector and alert dispatch.
///
/// Storage faults during the boundary scan are deliberately absent: the
/// detector recovers from them by returning a clear-with-caveat report,
/// so only the candidate's own invalid geometry reaches the caller.
#[derive(Debug, Error)]
pub enum ConflictError {
    #[error("invalid boundary geometry: {0}")]
    Geometry(#[from] GeometryError),

    #[error("conflict alert failed: {0}")]
    Notification(String),
}
