//! Route recomputation state machine.
//!
//! The orchestrator does no I/O. It turns waypoint snapshots into
//! [`RouteRequest`]s and folds gateway replies back into the visible state.
//! Every request carries a token taken from a monotonically increasing
//! counter; a reply is applied only when its token is the one currently
//! pending, so a slow reply to a superseded request can never overwrite
//! the result for newer edits.

use tracing::{debug, info, warn};

use crate::error::RoutingError;
use crate::route::RouteView;
use crate::traits::DirectionsResponse;
use crate::waypoints::WaypointSnapshot;

/// Minimum number of waypoints for which a route is defined.
pub const MIN_WAYPOINTS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteState {
    /// Fewer than two waypoints.
    Idle,
    /// A request for the latest snapshot is outstanding.
    Computing,
    /// The latest snapshot was routed successfully.
    Ready,
    /// Routing the latest snapshot failed.
    Failed,
}

/// One routing job for the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub token: u64,
    /// (longitude, latitude) pairs in visiting order.
    pub coordinates: Vec<(f64, f64)>,
}

/// What became of a gateway reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyOutcome {
    Applied,
    Discarded,
}

#[derive(Debug)]
pub struct RouteOrchestrator {
    state: RouteState,
    next_token: u64,
    pending_token: Option<u64>,
    pending_waypoints: Option<WaypointSnapshot>,
    routed_waypoints: Option<WaypointSnapshot>,
    current_route: Option<RouteView>,
    last_error: Option<RoutingError>,
}

impl Default for RouteOrchestrator {
    fn default() -> Self {
        Self {
            state: RouteState::Idle,
            next_token: 1,
            pending_token: None,
            pending_waypoints: None,
            routed_waypoints: None,
            current_route: None,
            last_error: None,
        }
    }
}

impl RouteOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RouteState {
        self.state
    }

    pub fn current_route(&self) -> Option<&RouteView> {
        self.current_route.as_ref()
    }

    pub fn last_error(&self) -> Option<&RoutingError> {
        self.last_error.as_ref()
    }

    pub fn pending_token(&self) -> Option<u64> {
        self.pending_token
    }

    /// Waypoints the current route was computed for.
    pub fn routed_waypoints(&self) -> Option<&WaypointSnapshot> {
        self.routed_waypoints.as_ref()
    }

    /// Reacts to a new waypoint snapshot.
    ///
    /// Returns the request to dispatch, or `None` when the collection is too
    /// small to route. Any request still in flight is superseded.
    pub fn on_waypoints_changed(&mut self, snapshot: WaypointSnapshot) -> Option<RouteRequest> {
        if snapshot.len() < MIN_WAYPOINTS {
            if self.state != RouteState::Idle {
                debug!(waypoints = snapshot.len(), "too few waypoints, going idle");
            }
            self.reset();
            return None;
        }

        let token = self.next_token;
        self.next_token += 1;

        if let Some(superseded) = self.pending_token.replace(token) {
            debug!(superseded, token, "superseding in-flight route request");
        }

        let coordinates = snapshot
            .iter()
            .map(|wp| (wp.longitude(), wp.latitude()))
            .collect();

        info!(token, waypoints = snapshot.len(), "requesting route");
        self.pending_waypoints = Some(snapshot);
        self.state = RouteState::Computing;

        Some(RouteRequest { token, coordinates })
    }

    /// Applies a gateway reply if it answers the pending request.
    pub fn on_reply(
        &mut self,
        token: u64,
        reply: Result<DirectionsResponse, RoutingError>,
    ) -> ReplyOutcome {
        if self.pending_token != Some(token) {
            debug!(token, pending = ?self.pending_token, "discarding stale route reply");
            return ReplyOutcome::Discarded;
        }
        self.pending_token = None;
        let waypoints = self.pending_waypoints.take();

        let route = reply.and_then(|response| {
            let raw = response.routes.first().ok_or(RoutingError::NoRouteFound)?;
            RouteView::from_raw(raw)
        });

        match route {
            Ok(route) => {
                info!(
                    token,
                    points = route.path.len(),
                    distance_m = route.distance_meters,
                    duration_s = route.duration_seconds,
                    "route ready"
                );
                self.current_route = Some(route);
                self.routed_waypoints = waypoints;
                self.last_error = None;
                self.state = RouteState::Ready;
            }
            Err(err) => {
                warn!(token, kind = ?err.kind(), error = %err, "route computation failed");
                self.last_error = Some(err);
                self.state = RouteState::Failed;
            }
        }

        ReplyOutcome::Applied
    }

    /// Drops all session state. Replies to requests issued before the reset
    /// will be discarded.
    pub fn reset(&mut self) {
        self.state = RouteState::Idle;
        self.pending_token = None;
        self.pending_waypoints = None;
        self.routed_waypoints = None;
        self.current_route = None;
        self.last_error = None;
    }
}
