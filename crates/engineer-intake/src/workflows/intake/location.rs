use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::geocoder::GeocodeError;

pub const UNSUPPORTED_MESSAGE: &str = "Geolocation is not supported by your browser/device.";
pub const UNAVAILABLE_MESSAGE: &str = "Unable to retrieve your location. Please type it manually.";

/// Decimal-degree position reported by a device.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Address text used when no named address could be found.
    pub fn fallback_label(&self) -> String {
        format!("{:.5}, {:.5}", self.latitude, self.longitude)
    }
}

/// Failures raised by the device before any coordinates exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceLocationError {
    #[error("device has no location capability")]
    Unsupported,
    #[error("location permission denied")]
    PermissionDenied,
    #[error("location request timed out")]
    Timeout,
    #[error("position unavailable")]
    PositionUnavailable,
}

/// Source of the current device position.
#[async_trait]
pub trait DeviceLocator: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates, DeviceLocationError>;
}

/// Turns coordinates into a human-readable address. `Ok(None)` means the lookup succeeded
/// but returned no name.
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn display_name(&self, at: Coordinates) -> Result<Option<String>, GeocodeError>;
}

/// What a client device reported when asked for its position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeviceReport {
    Position { latitude: f64, longitude: f64 },
    PermissionDenied,
    Timeout,
    PositionUnavailable,
    Unsupported,
}

#[async_trait]
impl DeviceLocator for DeviceReport {
    async fn current_position(&self) -> Result<Coordinates, DeviceLocationError> {
        match *self {
            DeviceReport::Position {
                latitude,
                longitude,
            } => Ok(Coordinates::new(latitude, longitude)),
            DeviceReport::PermissionDenied => Err(DeviceLocationError::PermissionDenied),
            DeviceReport::Timeout => Err(DeviceLocationError::Timeout),
            DeviceReport::PositionUnavailable => Err(DeviceLocationError::PositionUnavailable),
            DeviceReport::Unsupported => Err(DeviceLocationError::Unsupported),
        }
    }
}

/// Result of a single location request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LocationResolution {
    Resolved { address: String },
    Unsupported,
    Unavailable { reason: DeviceLocationError },
}

impl LocationResolution {
    /// Message shown next to the location field, if any.
    pub fn error_message(&self) -> Option<&'static str> {
        match self {
            LocationResolution::Resolved { .. } => None,
            LocationResolution::Unsupported => Some(UNSUPPORTED_MESSAGE),
            LocationResolution::Unavailable { .. } => Some(UNAVAILABLE_MESSAGE),
        }
    }
}

/// Resolves the device position to an address, falling back to raw coordinates.
#[derive(Debug, Clone)]
pub struct LocationResolver<G> {
    geocoder: G,
}

impl<G> LocationResolver<G>
where
    G: ReverseGeocoder,
{
    pub fn new(geocoder: G) -> Self {
        Self { geocoder }
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    pub async fn resolve(&self, locator: &dyn DeviceLocator) -> LocationResolution {
        let coordinates = match locator.current_position().await {
            Ok(coordinates) => coordinates,
            Err(DeviceLocationError::Unsupported) => return LocationResolution::Unsupported,
            Err(reason) => {
                debug!(%reason, "device could not provide a position");
                return LocationResolution::Unavailable { reason };
            }
        };

        LocationResolution::Resolved {
            address: self.address_for(coordinates).await,
        }
    }

    /// Named address for the coordinates, or the formatted coordinates when the lookup
    /// fails or comes back empty.
    pub async fn address_for(&self, coordinates: Coordinates) -> String {
        match self.geocoder.display_name(coordinates).await {
            Ok(Some(name)) if !name.trim().is_empty() => name,
            Ok(_) => {
                debug!("reverse geocoding returned no display name; using coordinates");
                coordinates.fallback_label()
            }
            Err(err) => {
                warn!(error = %err, "reverse geocoding failed; using coordinates");
                coordinates.fallback_label()
            }
        }
    }
}
