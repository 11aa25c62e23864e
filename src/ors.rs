//! OpenRouteService HTTP adapter for walking directions.

use std::env;
use std::time::Duration;

use serde_json::json;
use tracing::{debug, warn};

use crate::error::RoutingError;
use crate::orchestrator::MIN_WAYPOINTS;
use crate::traits::{DirectionsGateway, DirectionsResponse};
use crate::waypoints::WaypointError;

/// Primary and fallback environment variables holding the API key.
const API_KEY_VARS: [&str; 2] = ["ORS_API_KEY", "OPENROUTESERVICE_API_KEY"];

#[derive(Debug, Clone)]
pub struct OrsConfig {
    pub base_url: String,
    pub profile: String,
    /// Per-request timeout. A request that hangs past it fails as a
    /// transport failure.
    pub timeout_secs: u64,
    pub api_key: Option<String>,
}

impl Default for OrsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openrouteservice.org".to_string(),
            profile: "foot-walking".to_string(),
            timeout_secs: 15,
            api_key: None,
        }
    }
}

impl OrsConfig {
    /// Defaults, with the API key and base URL taken from the environment.
    pub fn from_env() -> Self {
        let api_key = API_KEY_VARS
            .iter()
            .filter_map(|var| env::var(var).ok())
            .map(|key| key.trim().to_string())
            .find(|key| !key.is_empty());

        let mut config = Self {
            api_key,
            ..Self::default()
        };
        if let Ok(base_url) = env::var("ORS_BASE_URL") {
            config.base_url = base_url;
        }
        config
    }
}

#[derive(Debug, Clone)]
pub struct OrsClient {
    config: OrsConfig,
    client: reqwest::blocking::Client,
}

impl OrsClient {
    pub fn new(config: OrsConfig) -> Result<Self, RoutingError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    /// Whether an API key is configured. Without one every request fails
    /// with `MissingCredential` before reaching the network.
    pub fn has_credential(&self) -> bool {
        self.config.api_key.is_some()
    }

    fn url(&self) -> String {
        format!(
            "{}/v2/directions/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile
        )
    }
}

impl DirectionsGateway for OrsClient {
    fn directions(&self, coordinates: &[(f64, f64)]) -> Result<DirectionsResponse, RoutingError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(RoutingError::MissingCredential)?;

        if coordinates.len() < MIN_WAYPOINTS {
            return Err(WaypointError::TooFew(coordinates.len()).into());
        }

        let url = self.url();
        let coords: Vec<[f64; 2]> = coordinates.iter().map(|&(lng, lat)| [lng, lat]).collect();
        let body = json!({
            "coordinates": coords,
            "format": "json",
        });

        debug!(url = %url, points = coordinates.len(), "calling directions provider");

        let response = self
            .client
            .post(&url)
            .header("Authorization", api_key)
            .json(&body)
            .send()
            .map_err(|err| {
                warn!(url = %url, error = %err, "directions request failed");
                RoutingError::from(err)
            })?;

        let status = response.status();
        let text = response.text()?;

        if !status.is_success() {
            warn!(status = status.as_u16(), body = %text, "directions provider returned an error");
            return Err(RoutingError::from_provider_body(status.as_u16(), &text));
        }

        serde_json::from_str(&text).map_err(|err| {
            warn!(error = %err, body = %text, "failed to parse directions response");
            RoutingError::ProviderError {
                status: status.as_u16(),
                code: None,
                message: format!("unreadable directions response: {err}"),
            }
        })
    }
}
