//! walk-planner core
//!
//! Route-planning session for walking directions: an ordered waypoint list,
//! a recomputation state machine that never shows a stale route, encoded
//! polyline decoding and turn-by-turn step extraction.

pub mod error;
pub mod geocode;
pub mod orchestrator;
pub mod ors;
pub mod polyline;
pub mod route;
pub mod session;
pub mod steps;
pub mod traits;
pub mod waypoints;

pub use error::{ErrorKind, RoutingError};
pub use orchestrator::{RouteOrchestrator, RouteState};
pub use route::RouteView;
pub use session::RouteSession;
pub use steps::RouteStep;
pub use waypoints::{Waypoint, WaypointId, WaypointStore};
