//! Decoded route ready for display.

use serde::{Deserialize, Serialize};

use crate::error::RoutingError;
use crate::polyline::Polyline;
use crate::steps::{self, RouteStep};
use crate::traits::RawRoute;

/// Result of one successful routing computation. Replaced wholesale by the
/// next one, never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteView {
    pub path: Polyline,
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub steps: Vec<RouteStep>,
}

impl RouteView {
    /// Decodes the geometry and extracts the steps of a provider route.
    pub fn from_raw(raw: &RawRoute) -> Result<Self, RoutingError> {
        let path = Polyline::decode(&raw.geometry)?;

        Ok(Self {
            path,
            distance_meters: raw.summary.distance.max(0.0),
            duration_seconds: raw.summary.duration.max(0.0),
            steps: steps::extract(&raw.segments),
        })
    }

    /// Steps to show as directions. The final step is the arrival and has
    /// no instruction to follow, so it is left out.
    pub fn directions(&self) -> &[RouteStep] {
        match self.steps.split_last() {
            Some((_, rest)) => rest,
            None => &[],
        }
    }
}

/// "850 m" below a kilometre, "1.25 km" above.
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{} m", meters.round())
    } else {
        format!("{:.2} km", meters / 1000.0)
    }
}

/// "1h 5m" from an hour up, "12m" below.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;

    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}
