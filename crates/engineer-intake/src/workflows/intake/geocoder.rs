use async_trait::async_trait;
use serde::Deserialize;

use super::location::{Coordinates, ReverseGeocoder};
use crate::config::GeocodingConfig;

/// Failures talking to the reverse-geocoding service.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("failed to build geocoding client: {0}")]
    Client(String),
    #[error("geocoding request failed: {0}")]
    Transport(String),
    #[error("geocoding service returned status {0}")]
    Status(u16),
    #[error("geocoding response was not valid JSON: {0}")]
    Decode(String),
}

#[derive(Debug, Deserialize)]
struct ReverseLookup {
    #[serde(default)]
    display_name: Option<String>,
}

/// Nominatim-compatible reverse geocoder (`/reverse?lat=..&lon=..&format=json`).
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocodingConfig) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|err| GeocodeError::Client(err.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn display_name(&self, at: Coordinates) -> Result<Option<String>, GeocodeError> {
        let url = format!("{}/reverse", self.base_url);
        tracing::debug!(
            %url,
            latitude = at.latitude,
            longitude = at.longitude,
            "reverse geocoding"
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", at.latitude.to_string()),
                ("lon", at.longitude.to_string()),
                ("format", "json".to_string()),
            ])
            .send()
            .await
            .map_err(|err| GeocodeError::Transport(err.to_string()))?;

        if !response.status().is_success() {
            return Err(GeocodeError::Status(response.status().as_u16()));
        }

        let lookup: ReverseLookup = response
            .json()
            .await
            .map_err(|err| GeocodeError::Decode(err.to_string()))?;

        Ok(lookup
            .display_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty()))
    }
}
