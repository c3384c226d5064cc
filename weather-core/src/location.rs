use async_trait::async_trait;
use std::fmt::Debug;
use tracing::{debug, warn};

use crate::{
    error::LocationError,
    model::{Coordinates, Location},
};

/// Host capability for asking where the device is.
#[async_trait]
pub trait GeoLocator: Send + Sync + Debug {
    /// Whether the host offers geolocation at all.
    fn is_available(&self) -> bool {
        true
    }

    async fn current_position(&self) -> Result<Coordinates, LocationError>;
}

/// Host without geolocation support.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeolocation;

#[async_trait]
impl GeoLocator for NoGeolocation {
    fn is_available(&self) -> bool {
        false
    }

    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        Err(LocationError::Unavailable)
    }
}

/// Host that always reports the same position, e.g. from `--lat/--lon`.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Coordinates);

#[async_trait]
impl GeoLocator for FixedPosition {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        Ok(self.0)
    }
}

/// Resolve the location to query, preferring the device position.
///
/// Any geolocation failure falls back to `fallback_city`; it is logged, never returned.
pub async fn resolve_location(fallback_city: &str, locator: &dyn GeoLocator) -> Location {
    if !locator.is_available() {
        debug!(city = fallback_city, "geolocation unavailable, using configured city");
        return Location::City(fallback_city.to_string());
    }

    match locator.current_position().await {
        Ok(coords) => {
            debug!(lat = coords.lat, lon = coords.lon, "resolved device position");
            Location::Coords(coords)
        }
        Err(err) => {
            warn!(error = %err, city = fallback_city, "geolocation failed, using configured city");
            Location::City(fallback_city.to_string())
        }
    }
}
