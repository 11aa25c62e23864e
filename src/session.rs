//! Route-planning session: the store, the orchestrator and a gateway wired
//! together.
//!
//! All state lives on the thread that owns the session. Each gateway call
//! runs on its own thread and reports back over a channel; replies are
//! applied one at a time when the owner calls [`RouteSession::poll`] or
//! [`RouteSession::wait`]. Nothing cancels a call in flight; its reply is
//! simply discarded if a newer request has been issued since.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::RoutingError;
use crate::orchestrator::{ReplyOutcome, RouteOrchestrator, RouteRequest, RouteState};
use crate::route::RouteView;
use crate::traits::{DirectionsGateway, DirectionsResponse, Geocoder};
use crate::waypoints::{self, Waypoint, WaypointId, WaypointSnapshot, WaypointStore};

struct GatewayReply {
    token: u64,
    result: Result<DirectionsResponse, RoutingError>,
}

pub struct RouteSession {
    store: WaypointStore,
    changes: Receiver<WaypointSnapshot>,
    orchestrator: RouteOrchestrator,
    gateway: Arc<dyn DirectionsGateway>,
    reply_tx: Sender<GatewayReply>,
    replies: Receiver<GatewayReply>,
}

impl RouteSession {
    pub fn new(gateway: Arc<dyn DirectionsGateway>) -> Self {
        let mut store = WaypointStore::new();
        let changes = store.subscribe();
        let (reply_tx, replies) = mpsc::channel();

        Self {
            store,
            changes,
            orchestrator: RouteOrchestrator::new(),
            gateway,
            reply_tx,
            replies,
        }
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        self.store.waypoints()
    }

    pub fn state(&self) -> RouteState {
        self.orchestrator.state()
    }

    pub fn route(&self) -> Option<&RouteView> {
        self.orchestrator.current_route()
    }

    pub fn last_error(&self) -> Option<&RoutingError> {
        self.orchestrator.last_error()
    }

    pub fn is_loading(&self) -> bool {
        self.orchestrator.state() == RouteState::Computing
    }

    /// Map extent covering every waypoint.
    pub fn bounds(&self) -> Option<((f64, f64), (f64, f64))> {
        waypoints::bounds(self.store.waypoints())
    }

    /// Adds a point picked on the map, labelled by its position.
    pub fn add_map_click(&mut self, lat: f64, lng: f64) -> Result<Waypoint, RoutingError> {
        waypoints::validate_coordinates(lat, lng)?;
        let label = format!("Point {}", self.store.len() + 1);
        Ok(self.append(label, lat, lng))
    }

    /// Adds typed-in coordinates. Without a name the coordinates become the
    /// label.
    pub fn add_coordinates(
        &mut self,
        name: Option<&str>,
        lat: f64,
        lng: f64,
    ) -> Result<Waypoint, RoutingError> {
        waypoints::validate_coordinates(lat, lng)?;
        let label = match name.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("{:.6}, {:.6}", lat, lng),
        };
        Ok(self.append(label, lat, lng))
    }

    /// Looks up `query` and appends the best match. `Ok(None)` when nothing
    /// was found; the session is left untouched in that case.
    pub fn add_place(
        &mut self,
        geocoder: &dyn Geocoder,
        query: &str,
    ) -> Result<Option<Waypoint>, RoutingError> {
        let Some(place) = geocoder.search(query)? else {
            return Ok(None);
        };
        waypoints::validate_coordinates(place.lat, place.lng)?;

        let label = place.short_name().unwrap_or(query.trim()).to_string();
        Ok(Some(self.append(label, place.lat, place.lng)))
    }

    pub fn remove(&mut self, id: WaypointId) -> Option<Waypoint> {
        let removed = self.store.remove(id);
        self.sync();
        removed
    }

    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), RoutingError> {
        self.store.reorder(from, to)?;
        self.sync();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.store.clear();
        self.sync();
    }

    /// Applies every reply that has already arrived. Returns how many
    /// replies were taken off the channel, stale ones included.
    pub fn poll(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(reply) = self.replies.try_recv() {
            self.apply(reply);
            handled += 1;
        }
        handled
    }

    /// Blocks for the next reply, up to `timeout`.
    pub fn wait(&mut self, timeout: Duration) -> Option<ReplyOutcome> {
        match self.replies.recv_timeout(timeout) {
            Ok(reply) => Some(self.apply(reply)),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Processes replies until no request is pending or `timeout` passes.
    /// Returns whether the session settled.
    pub fn settle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.orchestrator.pending_token().is_some() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() || self.wait(remaining).is_none() {
                return false;
            }
        }
        true
    }

    fn append(&mut self, label: String, lat: f64, lng: f64) -> Waypoint {
        let waypoint = self.store.append(label, lat, lng);
        self.sync();
        waypoint
    }

    /// Feeds pending store notifications to the orchestrator, dispatching
    /// whatever request it issues.
    fn sync(&mut self) {
        while let Ok(snapshot) = self.changes.try_recv() {
            if let Some(request) = self.orchestrator.on_waypoints_changed(snapshot) {
                self.dispatch(request);
            }
        }
    }

    fn dispatch(&self, request: RouteRequest) {
        let gateway = Arc::clone(&self.gateway);
        let reply_tx = self.reply_tx.clone();

        // One thread per call: a slow stale request must not queue the
        // current one behind it.
        thread::spawn(move || {
            let RouteRequest { token, coordinates } = request;
            let result = gateway.directions(&coordinates);
            if reply_tx.send(GatewayReply { token, result }).is_err() {
                debug!(token, "session gone before route reply arrived");
            }
        });
    }

    fn apply(&mut self, reply: GatewayReply) -> ReplyOutcome {
        self.orchestrator.on_reply(reply.token, reply.result)
    }
}
