//! GPS region validation of the parcel boundary.

use crate::agent::{ClaimSnapshot, SignalAgent};
use crate::error::AgentResult;
use async_trait::async_trait;
use landgate_geometry::centroid;
use landgate_types::{RegionBounds, SignalKind, SignalResult, SignalVerdict};
use std::time::Instant;

/// Checks that a claimed parcel actually lies inside the region the
/// registry covers. An invalid boundary is an error, not a score; a
/// claim without a boundary gets a neutral mid-score.
pub struct GpsRegionAgent {
    region: RegionBounds,
}

impl GpsRegionAgent {
    pub fn new(region: RegionBounds) -> Self {
        Self { region }
    }
}

#[async_trait]
impl SignalAgent for GpsRegionAgent {
    fn kind(&self) -> SignalKind {
        SignalKind::GpsRegion
    }

    async fn evaluate(&self, snapshot: &ClaimSnapshot) -> AgentResult<SignalResult> {
        let started = Instant::now();
        let Some(boundary) = &snapshot.boundary else {
            return Ok(
                SignalResult::new(SignalKind::GpsRegion, 0.5, SignalVerdict::NeedsReview)
                    .with_reason("no boundary coordinates supplied to validate")
                    .with_duration(started.elapsed().as_millis() as u64),
            );
        };

        let centre = centroid(boundary)?;
        let vertices = boundary.vertices();
        let inside = vertices
            .iter()
            .filter(|vertex| self.region.contains(vertex))
            .count();
        let fraction = inside as f64 / vertices.len() as f64;
        let centre_inside = self.region.contains(&centre);

        let mut reasons = Vec::new();
        if inside == vertices.len() {
            reasons.push(format!(
                "all {} vertices fall inside {}",
                vertices.len(),
                self.region.name
            ));
        } else {
            reasons.push(format!(
                "{} of {} vertices fall outside {}",
                vertices.len() - inside,
                vertices.len(),
                self.region.name
            ));
        }
        if !centre_inside {
            reasons.push(format!(
                "parcel centroid ({:.4}, {:.4}) lies outside {}",
                centre.lat, centre.lon, self.region.name
            ));
        }

        let verdict = if fraction >= 1.0 && centre_inside {
            SignalVerdict::Clear
        } else if fraction >= 0.5 {
            SignalVerdict::NeedsReview
        } else {
            SignalVerdict::Flagged
        };

        Ok(SignalResult::new(SignalKind::GpsRegion, fraction, verdict)
            .with_reasons(reasons)
            .with_duration(started.elapsed().as_millis() as u64))
    }
}
