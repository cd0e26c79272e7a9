//! Polygon operations on projected parcel boundaries.

use crate::error::{GeometryError, GeometryResult};
use landgate_types::{Boundary, GeoPoint};

/// Mean Earth radius in metres.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Signed areas smaller than this (m²) are treated as degenerate.
const DEGENERATE_AREA: f64 = 1e-6;

/// Area of a boundary polygon in square metres.
pub fn area(boundary: &Boundary) -> GeometryResult<f64> {
    let vertices = validate(boundary)?;
    let ref_lat = mean_lat_rad(&[vertices]);
    let projected = project(vertices, ref_lat);
    Ok(signed_area(&projected).abs())
}

/// Area of the intersection of two boundaries in square metres.
///
/// Clips `a` against `b` on a shared projection. The clip boundary must
/// be convex for an exact result; a concave clip over-covers, which
/// errs toward reporting overlap.
pub fn intersection_area(a: &Boundary, b: &Boundary) -> GeometryResult<f64> {
    let va = validate(a)?;
    let vb = validate(b)?;
    let ref_lat = mean_lat_rad(&[va, vb]);

    let pa = project(va, ref_lat);
    let pb = project(vb, ref_lat);

    let clipped = clip_polygon(&pa, &pb);
    if clipped.len() < 3 {
        return Ok(0.0);
    }

    let raw = signed_area(&clipped).abs();
    // Float drift on shared edges can push the clip area a hair past
    // the smaller input; the true intersection never can.
    let bound = signed_area(&pa).abs().min(signed_area(&pb).abs());
    Ok(raw.min(bound))
}

/// Area of the union of two boundaries in square metres.
pub fn union_area(a: &Boundary, b: &Boundary) -> GeometryResult<f64> {
    Ok(area(a)? + area(b)? - intersection_area(a, b)?)
}

/// Geometric centroid of a boundary, in degrees.
///
/// Degenerate (zero-area) polygons fall back to the vertex mean.
pub fn centroid(boundary: &Boundary) -> GeometryResult<GeoPoint> {
    let vertices = validate(boundary)?;
    let ref_lat = mean_lat_rad(&[vertices]);
    let projected = project(vertices, ref_lat);

    let a = signed_area(&projected);
    let n = projected.len();

    let (cx, cy) = if a.abs() < DEGENERATE_AREA {
        let inv = 1.0 / n as f64;
        (
            projected.iter().map(|p| p.x).sum::<f64>() * inv,
            projected.iter().map(|p| p.y).sum::<f64>() * inv,
        )
    } else {
        let mut cx = 0.0;
        let mut cy = 0.0;
        for i in 0..n {
            let j = (i + 1) % n;
            let f = projected[i].x * projected[j].y - projected[j].x * projected[i].y;
            cx += (projected[i].x + projected[j].x) * f;
            cy += (projected[i].y + projected[j].y) * f;
        }
        (cx / (6.0 * a), cy / (6.0 * a))
    };

    Ok(unproject(Xy { x: cx, y: cy }, ref_lat))
}

// ── Internal helpers ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
struct Xy {
    x: f64,
    y: f64,
}

fn validate(boundary: &Boundary) -> GeometryResult<&[GeoPoint]> {
    let vertices = boundary.vertices();
    for (index, point) in vertices.iter().enumerate() {
        if !point.is_finite() {
            return Err(GeometryError::NonFiniteCoordinate { index });
        }
    }
    if vertices.len() < 3 {
        return Err(GeometryError::TooFewVertices {
            found: vertices.len(),
        });
    }
    Ok(vertices)
}

/// Reference latitude for a shared projection, in radians.
fn mean_lat_rad(vertex_sets: &[&[GeoPoint]]) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for set in vertex_sets {
        for point in set.iter() {
            sum += point.lat;
            count += 1;
        }
    }
    (sum / count as f64).to_radians()
}

fn project(vertices: &[GeoPoint], ref_lat_rad: f64) -> Vec<Xy> {
    let cos_ref = ref_lat_rad.cos();
    vertices
        .iter()
        .map(|p| Xy {
            x: EARTH_RADIUS_M * p.lon.to_radians() * cos_ref,
            y: EARTH_RADIUS_M * p.lat.to_radians(),
        })
        .collect()
}

fn unproject(p: Xy, ref_lat_rad: f64) -> GeoPoint {
    GeoPoint::new(
        (p.y / EARTH_RADIUS_M).to_degrees(),
        (p.x / (EARTH_RADIUS_M * ref_lat_rad.cos())).to_degrees(),
    )
}

/// Shoelace formula. Positive for counter-clockwise winding.
fn signed_area(polygon: &[Xy]) -> f64 {
    let n = polygon.len();
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += polygon[i].x * polygon[j].y - polygon[j].x * polygon[i].y;
    }
    sum / 2.0
}

/// Sutherland-Hodgman clip of `subject` against `clip`.
///
/// The clip polygon is normalised to counter-clockwise winding so the
/// inside test is consistent regardless of submitted vertex order.
fn clip_polygon(subject: &[Xy], clip: &[Xy]) -> Vec<Xy> {
    let mut clip_ccw = clip.to_vec();
    if signed_area(&clip_ccw) < 0.0 {
        clip_ccw.reverse();
    }

    let mut output = subject.to_vec();
    let n = clip_ccw.len();

    for i in 0..n {
        if output.is_empty() {
            break;
        }
        let edge_start = clip_ccw[i];
        let edge_end = clip_ccw[(i + 1) % n];

        let input = std::mem::take(&mut output);
        let m = input.len();

        for j in 0..m {
            let current = input[j];
            let previous = input[(j + m - 1) % m];
            let current_inside = is_inside(current, edge_start, edge_end);
            let previous_inside = is_inside(previous, edge_start, edge_end);

            if current_inside {
                if !previous_inside {
                    if let Some(p) = edge_intersection(previous, current, edge_start, edge_end) {
                        output.push(p);
                    }
                }
                output.push(current);
            } else if previous_inside {
                if let Some(p) = edge_intersection(previous, current, edge_start, edge_end) {
                    output.push(p);
                }
            }
        }
    }

    output
}

/// Point on or left of the directed edge (counter-clockwise inside).
fn is_inside(p: Xy, edge_start: Xy, edge_end: Xy) -> bool {
    (edge_end.x - edge_start.x) * (p.y - edge_start.y)
        - (edge_end.y - edge_start.y) * (p.x - edge_start.x)
        >= 0.0
}

/// Intersection of line (a, b) with line (c, d).
fn edge_intersection(a: Xy, b: Xy, c: Xy, d: Xy) -> Option<Xy> {
    let denom = (a.x - b.x) * (c.y - d.y) - (a.y - b.y) * (c.x - d.x);
    if denom.abs() < f64::EPSILON {
        // Parallel segments contribute no crossing point.
        return None;
    }
    let t = ((a.x - c.x) * (c.y - d.y) - (a.y - c.y) * (c.x - d.x)) / denom;
    Some(Xy {
        x: a.x + t * (b.x - a.x),
        y: a.y + t * (b.y - a.y),
    })
}
