//! Scripted directions gateway for session tests.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use walk_planner::RoutingError;
use walk_planner::polyline;
use walk_planner::traits::{
    DirectionsGateway, DirectionsResponse, RawRoute, RawSegment, RawStep, RawSummary,
};

type ReplyFn =
    dyn Fn(&[(f64, f64)]) -> Result<DirectionsResponse, RoutingError> + Send + Sync;

/// Gateway whose replies are computed by a closure. Calls can be held back
/// per waypoint count until the test releases them, to force a completion
/// order.
pub struct ScriptedGateway {
    reply: Box<ReplyFn>,
    gates: Mutex<HashMap<usize, Receiver<()>>>,
    calls: Mutex<Vec<Vec<(f64, f64)>>>,
}

impl ScriptedGateway {
    pub fn new(
        reply: impl Fn(&[(f64, f64)]) -> Result<DirectionsResponse, RoutingError>
        + Send
        + Sync
        + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            reply: Box::new(reply),
            gates: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Routes straight through the requested points; distance is 1 km per
    /// waypoint so tests can tell which request a route came from.
    pub fn echo() -> Arc<Self> {
        Self::new(|coordinates| Ok(echo_response(coordinates)))
    }

    pub fn failing(err: RoutingError) -> Arc<Self> {
        Self::new(move |_| Err(err.clone()))
    }

    /// Holds the next call with `waypoints` coordinates until the returned
    /// sender fires (or is dropped).
    pub fn gate(&self, waypoints: usize) -> Sender<()> {
        let (tx, rx) = mpsc::channel();
        self.gates.lock().unwrap().insert(waypoints, rx);
        tx
    }

    pub fn calls(&self) -> Vec<Vec<(f64, f64)>> {
        self.calls.lock().unwrap().clone()
    }
}

impl DirectionsGateway for ScriptedGateway {
    fn directions(&self, coordinates: &[(f64, f64)]) -> Result<DirectionsResponse, RoutingError> {
        self.calls.lock().unwrap().push(coordinates.to_vec());

        let gate = self.gates.lock().unwrap().remove(&coordinates.len());
        if let Some(gate) = gate {
            let _ = gate.recv_timeout(Duration::from_secs(10));
        }

        (self.reply)(coordinates)
    }
}

/// Single-route response whose geometry visits the given (lng, lat) points.
pub fn echo_response(coordinates: &[(f64, f64)]) -> DirectionsResponse {
    let path: Vec<(f64, f64)> = coordinates.iter().map(|&(lng, lat)| (lat, lng)).collect();
    let legs = coordinates.len().saturating_sub(1);

    let segments = (0..legs)
        .map(|leg| RawSegment {
            steps: vec![
                RawStep {
                    instruction: format!("Head to stop {}", leg + 2),
                    name: "Las Vegas Boulevard".to_string(),
                    distance: 1000.0,
                    duration: 720.0,
                },
                RawStep {
                    instruction: "Arrive".to_string(),
                    name: "-".to_string(),
                    ..RawStep::default()
                },
            ],
        })
        .collect();

    DirectionsResponse {
        routes: vec![RawRoute {
            geometry: polyline::encode(&path),
            summary: RawSummary {
                distance: 1000.0 * coordinates.len() as f64,
                duration: 720.0 * coordinates.len() as f64,
            },
            segments,
        }],
    }
}
