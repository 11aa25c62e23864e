//! Ordered waypoint collection with change notifications.

use std::fmt;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Immutable view of the collection after a mutation, in visiting order.
pub type WaypointSnapshot = Arc<[Waypoint]>;

/// Opaque waypoint identity. Unique within the store that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WaypointId(u64);

impl fmt::Display for WaypointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wp-{}", self.0)
    }
}

/// A named point the route must pass through.
///
/// Fields are read-only: changing a waypoint means removing it and
/// appending a replacement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    id: WaypointId,
    label: String,
    latitude: f64,
    longitude: f64,
}

impl Waypoint {
    pub fn id(&self) -> WaypointId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Location coordinates (lat, lng).
    pub fn location(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WaypointError {
    #[error("index {index} out of range for {len} waypoints")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("latitude {0} outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("coordinates must be finite numbers")]
    NotFinite,

    #[error("at least 2 waypoints are needed for a route, got {0}")]
    TooFew(usize),
}

/// Input-layer check for user-entered coordinates. The store itself
/// accepts whatever it is given.
pub fn validate_coordinates(lat: f64, lng: f64) -> Result<(), WaypointError> {
    if !lat.is_finite() || !lng.is_finite() {
        return Err(WaypointError::NotFinite);
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(WaypointError::LatitudeOutOfRange(lat));
    }
    if !(-180.0..=180.0).contains(&lng) {
        return Err(WaypointError::LongitudeOutOfRange(lng));
    }
    Ok(())
}

/// Bounding box `((min_lat, min_lng), (max_lat, max_lng))` of the given
/// waypoints, for fitting a map view. `None` when empty.
pub fn bounds(waypoints: &[Waypoint]) -> Option<((f64, f64), (f64, f64))> {
    let first = waypoints.first()?;
    let init = (first.location(), first.location());

    Some(waypoints.iter().fold(init, |((min_lat, min_lng), (max_lat, max_lng)), wp| {
        (
            (min_lat.min(wp.latitude), min_lng.min(wp.longitude)),
            (max_lat.max(wp.latitude), max_lng.max(wp.longitude)),
        )
    }))
}

/// Owner of the ordered waypoint sequence.
///
/// Every mutation publishes a full snapshot to each subscriber. Subscribers
/// never see partial diffs, and a snapshot stays valid no matter what the
/// store does afterwards.
#[derive(Debug, Default)]
pub struct WaypointStore {
    waypoints: Vec<Waypoint>,
    next_id: u64,
    subscribers: Vec<Sender<WaypointSnapshot>>,
}

impl WaypointStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new observer of change notifications.
    pub fn subscribe(&mut self) -> Receiver<WaypointSnapshot> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn get(&self, id: WaypointId) -> Option<&Waypoint> {
        self.waypoints.iter().find(|wp| wp.id == id)
    }

    pub fn snapshot(&self) -> WaypointSnapshot {
        Arc::from(self.waypoints.as_slice())
    }

    /// Appends a waypoint at the end and returns it with its fresh id.
    pub fn append(&mut self, label: impl Into<String>, latitude: f64, longitude: f64) -> Waypoint {
        let waypoint = Waypoint {
            id: WaypointId(self.next_id),
            label: label.into(),
            latitude,
            longitude,
        };
        self.next_id += 1;

        debug!(id = %waypoint.id, label = %waypoint.label, latitude, longitude, "waypoint appended");
        self.waypoints.push(waypoint.clone());
        self.notify();
        waypoint
    }

    /// Removes the waypoint with `id`. Unknown ids are ignored.
    pub fn remove(&mut self, id: WaypointId) -> Option<Waypoint> {
        let index = self.waypoints.iter().position(|wp| wp.id == id)?;
        let removed = self.waypoints.remove(index);

        debug!(id = %id, index, "waypoint removed");
        self.notify();
        Some(removed)
    }

    /// Moves the waypoint at `from` to `to`, shifting the ones in between.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), WaypointError> {
        let len = self.waypoints.len();
        for index in [from, to] {
            if index >= len {
                return Err(WaypointError::IndexOutOfRange { index, len });
            }
        }
        if from == to {
            return Ok(());
        }

        let moved = self.waypoints.remove(from);
        self.waypoints.insert(to, moved);

        debug!(from, to, "waypoints reordered");
        self.notify();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.waypoints.clear();
        debug!("waypoints cleared");
        self.notify();
    }

    fn notify(&mut self) {
        let snapshot = self.snapshot();
        self.subscribers.retain(|tx| tx.send(snapshot.clone()).is_ok());
    }
}
