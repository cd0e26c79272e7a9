use thiserror::Error;

/// Result type for geometry operations.
pub type GeometryResult<T> = Result<T, GeometryError>;

/// Geometry kernel errors.
///
/// Malformed input is always a hard error, never a silent default: a
/// boundary that fails here must fail the check that needed it.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("boundary has {found} vertices, need at least 3")]
    TooFewVertices { found: usize },

    #[error("non-finite coordinate at vertex {index}")]
    NonFiniteCoordinate { index: usize },
}
