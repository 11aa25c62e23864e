//! Turn-by-turn step extraction.

use serde::{Deserialize, Serialize};

use crate::traits::RawSegment;

/// Road-name placeholder the provider uses for unnamed ways.
const UNNAMED_ROAD: &str = "-";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    pub instruction: String,
    /// Empty when the way has no name.
    pub road_name: String,
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

impl RouteStep {
    /// Human-readable line, e.g. "Turn left onto Main Street".
    pub fn describe(&self) -> String {
        if self.road_name.is_empty() {
            self.instruction.clone()
        } else {
            format!("{} onto {}", self.instruction, self.road_name)
        }
    }
}

/// Flattens the steps of every leg, in travel order.
pub fn extract(segments: &[RawSegment]) -> Vec<RouteStep> {
    segments
        .iter()
        .flat_map(|segment| &segment.steps)
        .map(|step| RouteStep {
            instruction: step.instruction.clone(),
            road_name: if step.name == UNNAMED_ROAD {
                String::new()
            } else {
                step.name.clone()
            },
            distance_meters: step.distance,
            duration_seconds: step.duration,
        })
        .collect()
}
