//! Free-text location search against a Nominatim-compatible endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::GeocoderConfig;
use crate::error::{AppError, AppResult};
use crate::models::GeocodeResult;

const HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = concat!("coastal-hazard/", env!("CARGO_PKG_VERSION"));

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Candidate locations for `text`; blank text yields no results.
    async fn search(&self, text: &str) -> AppResult<Vec<GeocodeResult>>;
}

/// Raw Nominatim search hit. Coordinates arrive as strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    display_name: String,
    lat: String,
    lon: String,
}

/// Convert a Nominatim response body, skipping hits with unusable coordinates.
pub fn parse_results(body: &str) -> AppResult<Vec<GeocodeResult>> {
    let places: Vec<NominatimPlace> = serde_json::from_str(body)
        .map_err(|e| AppError::Upstream(format!("unexpected geocoder response: {}", e)))?;

    Ok(places
        .into_iter()
        .filter_map(|place| {
            let lat = place.lat.trim().parse::<f64>().ok()?;
            let lng = place.lon.trim().parse::<f64>().ok()?;
            if !lat.is_finite() || !lng.is_finite() {
                return None;
            }
            Some(GeocodeResult {
                name: place.display_name,
                lat,
                lng,
            })
        })
        .collect())
}

pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
    limit: u8,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(HTTP_CONNECT_TIMEOUT)
            .timeout(HTTP_REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::Upstream(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches(['?', '&']).to_string(),
            limit: config.limit.max(1),
        })
    }

    /// Search URL, appending to any query the configured base URL carries.
    fn search_url(&self, text: &str) -> String {
        let separator = if self.base_url.contains('?') { '&' } else { '?' };
        format!(
            "{}{}format=json&limit={}&q={}",
            self.base_url,
            separator,
            self.limit,
            urlencoding::encode(text)
        )
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn search(&self, text: &str) -> AppResult<Vec<GeocodeResult>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .get(self.search_url(text))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("geocoder request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Geocoder returned an error status");
            return Err(AppError::Upstream(format!("geocoder returned {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::Upstream(format!("failed to read geocoder response: {}", e)))?;
        let results = parse_results(&body)?;
        debug!(query = %text, results = results.len(), "Geocoder search");
        Ok(results)
    }
}
