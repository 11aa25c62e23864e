//! Collaborator interfaces for the route planner.
//!
//! The core only talks to the outside world through these traits, so tests
//! and alternative providers can stand in for the HTTP clients.

use serde::Deserialize;

use crate::error::RoutingError;

/// Computes a route through an ordered list of coordinates.
///
/// Coordinates are (longitude, latitude), the order routing providers
/// expect. Implementations may block; the session calls them off its own
/// thread.
pub trait DirectionsGateway: Send + Sync {
    fn directions(&self, coordinates: &[(f64, f64)]) -> Result<DirectionsResponse, RoutingError>;
}

/// Resolves free text to a single best-matching place.
pub trait Geocoder: Send + Sync {
    /// Returns `Ok(None)` when nothing matches.
    fn search(&self, query: &str) -> Result<Option<Place>, RoutingError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub display_name: String,
    pub lat: f64,
    pub lng: f64,
}

impl Place {
    /// First component of the display name, e.g. "Bellagio" out of
    /// "Bellagio, 3600, Las Vegas Boulevard South, ...".
    pub fn short_name(&self) -> Option<&str> {
        self.display_name
            .split(',')
            .next()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// Raw successful directions payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DirectionsResponse {
    #[serde(default)]
    pub routes: Vec<RawRoute>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRoute {
    /// Encoded polyline, precision 1e5.
    pub geometry: String,
    #[serde(default)]
    pub summary: RawSummary,
    /// One segment per leg between consecutive waypoints.
    #[serde(default)]
    pub segments: Vec<RawSegment>,
}

// ORS leaves distance/duration out entirely for zero-length routes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct RawSummary {
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub duration: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawSegment {
    #[serde(default)]
    pub steps: Vec<RawStep>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawStep {
    #[serde(default)]
    pub instruction: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub duration: f64,
}
