//! Error types for the routing core.

use serde::Deserialize;
use thiserror::Error;

use crate::polyline::PolylineError;
use crate::waypoints::WaypointError;

/// Discriminant of [`RoutingError`], for callers that only branch on the
/// category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingCredential,
    TransportFailure,
    ProviderError,
    NoRouteFound,
    MalformedGeometry,
    InvalidWaypoint,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoutingError {
    #[error("no API key configured for the directions provider")]
    MissingCredential,

    /// Connection, DNS or timeout failure. reqwest errors are not `Clone`,
    /// so only their rendering is kept.
    #[error("request to provider failed: {0}")]
    TransportFailure(String),

    #[error("provider returned HTTP {status}{}: {message}", .code.map(|c| format!(" (code {c})")).unwrap_or_default())]
    ProviderError {
        status: u16,
        code: Option<u32>,
        message: String,
    },

    #[error("no route found between the selected points")]
    NoRouteFound,

    #[error("malformed route geometry: {0}")]
    MalformedGeometry(#[from] PolylineError),

    #[error("invalid waypoint: {0}")]
    InvalidWaypoint(#[from] WaypointError),
}

impl RoutingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RoutingError::MissingCredential => ErrorKind::MissingCredential,
            RoutingError::TransportFailure(_) => ErrorKind::TransportFailure,
            RoutingError::ProviderError { .. } => ErrorKind::ProviderError,
            RoutingError::NoRouteFound => ErrorKind::NoRouteFound,
            RoutingError::MalformedGeometry(_) => ErrorKind::MalformedGeometry,
            RoutingError::InvalidWaypoint(_) => ErrorKind::InvalidWaypoint,
        }
    }

    /// Builds a `ProviderError` from a non-success response body, using the
    /// structured `{"error": {...}}` payload when the provider sent one.
    pub(crate) fn from_provider_body(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ProviderErrorPayload>(body) {
            Ok(ProviderErrorPayload {
                error: ProviderErrorDetail::Structured { code, message },
            }) => RoutingError::ProviderError {
                status,
                code: Some(code),
                message,
            },
            Ok(ProviderErrorPayload {
                error: ProviderErrorDetail::Text(message),
            }) => RoutingError::ProviderError {
                status,
                code: None,
                message,
            },
            Err(_) => RoutingError::ProviderError {
                status,
                code: None,
                message: body.to_string(),
            },
        }
    }
}

impl From<reqwest::Error> for RoutingError {
    fn from(err: reqwest::Error) -> Self {
        RoutingError::TransportFailure(err.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct ProviderErrorPayload {
    error: ProviderErrorDetail,
}

// ORS sends `{"error": {"code": 2010, "message": "..."}}` from the routing
// engine but a bare string from its gateway (bad key, quota).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProviderErrorDetail {
    Structured { code: u32, message: String },
    Text(String),
}
