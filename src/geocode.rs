//! Nominatim (OpenStreetMap) place search.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::RoutingError;
use crate::traits::{Geocoder, Place};

#[derive(Debug, Clone)]
pub struct NominatimConfig {
    pub base_url: String,
    /// Nominatim's usage policy requires an identifying User-Agent.
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: concat!("walk-planner/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NominatimClient {
    config: NominatimConfig,
    client: reqwest::blocking::Client,
}

impl NominatimClient {
    pub fn new(config: NominatimConfig) -> Result<Self, RoutingError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { config, client })
    }
}

impl Geocoder for NominatimClient {
    fn search(&self, query: &str) -> Result<Option<Place>, RoutingError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }

        let url = format!("{}/search", self.config.base_url.trim_end_matches('/'));
        debug!(query, "geocoding");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("format", "json"),
                ("q", query),
                ("limit", "1"),
                ("addressdetails", "1"),
            ])
            .send()?;

        let status = response.status();
        let text = response.text()?;
        if !status.is_success() {
            warn!(status = status.as_u16(), "geocoding failed");
            return Err(RoutingError::from_provider_body(status.as_u16(), &text));
        }

        let results: Vec<SearchResult> = serde_json::from_str(&text).map_err(|err| {
            warn!(error = %err, body = %text, "failed to parse geocoding response");
            RoutingError::ProviderError {
                status: status.as_u16(),
                code: None,
                message: format!("unreadable geocoding response: {err}"),
            }
        })?;

        let Some(best) = results.into_iter().next() else {
            debug!(query, "no geocoding match");
            return Ok(None);
        };

        // Nominatim sends coordinates as strings.
        let (Ok(lat), Ok(lng)) = (best.lat.parse::<f64>(), best.lon.parse::<f64>()) else {
            return Err(RoutingError::ProviderError {
                status: status.as_u16(),
                code: None,
                message: format!("unparseable coordinates {:?}, {:?}", best.lat, best.lon),
            });
        };

        Ok(Some(Place {
            display_name: best.display_name,
            lat,
            lng,
        }))
    }
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    display_name: String,
    lat: String,
    lon: String,
}
