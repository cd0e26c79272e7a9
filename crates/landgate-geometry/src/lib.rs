//! Geometry kernel for parcel boundaries.
//!
//! Pure functions over geodetic polygons: area, pairwise intersection
//! and union area, and centroid. Everything here is synchronous,
//! deterministic, and side-effect free; the conflict detector builds
//! its overlap metrics on top of these primitives.
//!
//! Coordinates are WGS84 decimal degrees. Internally vertices are
//! projected onto a local tangent plane (equirectangular about the mean
//! latitude of the input), which keeps areas accurate to well under a
//! percent at parcel scale. Results are square metres.

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

mod error;
mod polygon;

pub use error::{GeometryError, GeometryResult};
pub use polygon::{area, centroid, intersection_area, union_area};
