//! Geodetic boundary polygons as submitted at claim intake.

use serde::{Deserialize, Serialize};

/// A single vertex in WGS84 decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

/// An ordered parcel boundary polygon.
///
/// Vertices are stored open: a survey sketch that repeats the first
/// vertex as an explicit closing point is normalised on construction.
/// Geometric validity (at least three distinct vertices, finite
/// coordinates) is checked by the geometry kernel at the point of use,
/// not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    vertices: Vec<GeoPoint>,
}

impl Boundary {
    pub fn new(mut vertices: Vec<GeoPoint>) -> Self {
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }
        Self { vertices }
    }

    /// Convenience constructor from `(lat, lon)` pairs.
    pub fn from_coords<I>(coords: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        Self::new(
            coords
                .into_iter()
                .map(|(lat, lon)| GeoPoint::new(lat, lon))
                .collect(),
        )
    }

    pub fn vertices(&self) -> &[GeoPoint] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closing_vertex_is_normalised_away() {
        let open = Boundary::from_coords([(5.60, -0.19), (5.60, -0.18), (5.61, -0.18)]);
        let closed = Boundary::from_coords([
            (5.60, -0.19),
            (5.60, -0.18),
            (5.61, -0.18),
            (5.60, -0.19),
        ]);
        assert_eq!(open, closed);
        assert_eq!(closed.vertex_count(), 3);
    }

    #[test]
    fn test_degenerate_input_left_intact() {
        // Too few vertices is a geometry-kernel error, not silently fixed.
        let line = Boundary::from_coords([(5.60, -0.19), (5.61, -0.18)]);
        assert_eq!(line.vertex_count(), 2);
    }

    #[test]
    fn test_serde_roundtrip() {
        let boundary = Boundary::from_coords([
            (5.60, -0.19),
            (5.60, -0.18),
            (5.61, -0.18),
            (5.61, -0.19),
        ]);
        let json = serde_json::to_string(&boundary).unwrap();
        let restored: Boundary = serde_json::from_str(&json).unwrap();
        assert_eq!(boundary, restored);
    }
}
