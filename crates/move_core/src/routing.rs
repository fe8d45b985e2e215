//! Distance resolution: collaborator traits for geocoding/routing backends and
//! the [`GeoResolver`] that combines them with the haversine fallback.
//!
//! Resolution order for a pair of [`Location`]s:
//!
//! - **Both coordinates**: haversine distance, no external call.
//! - **Both addresses + routing provider**: the provider's road distance
//!   ([`DistanceMethod::External`]); on failure, continue below.
//! - **Otherwise**: geocode every address, then haversine
//!   ([`DistanceMethod::Fallback`]). A geocoding failure is terminal.
//!
//! The HTTP-backed implementation lives in [`maps`] behind the `maps` feature.
//! Nothing is cached here; callers that want caching wrap a provider.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::{fallback_duration_minutes, haversine_km, Coordinates};

#[cfg(feature = "maps")]
pub mod maps;

// ---------------------------------------------------------------------------
// Core types
// ---------------------------------------------------------------------------

/// Pickup or drop-off as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Location {
    Coordinates(Coordinates),
    Address(String),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Coordinates(c) => write!(f, "{},{}", c.latitude, c.longitude),
            Location::Address(address) => f.write_str(address),
        }
    }
}

impl From<Coordinates> for Location {
    fn from(coords: Coordinates) -> Self {
        Location::Coordinates(coords)
    }
}

impl FromStr for Location {
    type Err = GeoError;

    /// `"lat,lng"` parses as coordinates; anything else is kept as an address.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some((lat, lng)) = trimmed.split_once(',') {
            if let (Ok(lat), Ok(lng)) = (lat.trim().parse::<f64>(), lng.trim().parse::<f64>()) {
                return Coordinates::new(lat, lng).map(Location::Coordinates);
            }
        }
        Ok(Location::Address(trimmed.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DistanceMethod {
    /// Road distance reported by the routing provider.
    External,
    /// Haversine distance between (possibly geocoded) coordinates.
    Fallback,
}

/// Outcome of a distance resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceResult {
    pub distance_km: f64,
    pub duration_minutes: u32,
    pub method: DistanceMethod,
}

impl DistanceResult {
    /// Straight-line result between two coordinates.
    pub fn fallback_between(a: Coordinates, b: Coordinates) -> Self {
        let distance_km = haversine_km(a, b);
        Self {
            distance_km,
            duration_minutes: fallback_duration_minutes(distance_km),
            method: DistanceMethod::Fallback,
        }
    }
}

/// Why an external collaborator could not answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("provider is not configured")]
    Unconfigured,
    #[error("provider request timed out")]
    Timeout,
    #[error("http request error: {0}")]
    Http(String),
    #[error("provider returned status {0}")]
    Status(String),
    #[error("provider returned no result")]
    NoResult,
    #[error("failed to decode provider response: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    #[error("location {location:?} could not be resolved: {source}")]
    LocationUnresolvable {
        location: String,
        source: ProviderError,
    },
    #[error("coordinates out of range: ({latitude}, {longitude})")]
    InvalidCoordinates { latitude: f64, longitude: f64 },
}

// ---------------------------------------------------------------------------
// Collaborator traits
// ---------------------------------------------------------------------------

/// Address → coordinates. Implementations must bound their own request time.
pub trait Geocoder: Send + Sync {
    fn geocode(&self, address: &str) -> Result<Coordinates, ProviderError>;
}

/// Address pair → road distance. Implementations must bound their own request time.
pub trait RouteDistanceProvider: Send + Sync {
    fn route_distance(&self, origin: &str, destination: &str)
        -> Result<DistanceResult, ProviderError>;
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Combines optional geocoding/routing collaborators with the haversine fallback.
///
/// Holds no mutable state, so a single resolver can be shared across threads.
#[derive(Default)]
pub struct GeoResolver {
    geocoder: Option<Box<dyn Geocoder>>,
    router: Option<Box<dyn RouteDistanceProvider>>,
}

impl GeoResolver {
    /// Resolver with no external collaborators: only coordinate pairs resolve.
    pub fn offline() -> Self {
        Self::default()
    }

    pub fn new(
        geocoder: Option<Box<dyn Geocoder>>,
        router: Option<Box<dyn RouteDistanceProvider>>,
    ) -> Self {
        Self { geocoder, router }
    }

    pub fn with_geocoder(mut self, geocoder: impl Geocoder + 'static) -> Self {
        self.geocoder = Some(Box::new(geocoder));
        self
    }

    pub fn with_router(mut self, router: impl RouteDistanceProvider + 'static) -> Self {
        self.router = Some(Box::new(router));
        self
    }

    pub fn resolve_distance(
        &self,
        origin: &Location,
        destination: &Location,
    ) -> Result<DistanceResult, GeoError> {
        if let (Location::Address(from), Location::Address(to), Some(router)) =
            (origin, destination, self.router.as_deref())
        {
            match router.route_distance(from, to).and_then(checked_route) {
                Ok(result) => {
                    tracing::debug!(
                        distance_km = result.distance_km,
                        duration_minutes = result.duration_minutes,
                        "resolved distance via routing provider"
                    );
                    return Ok(DistanceResult {
                        method: DistanceMethod::External,
                        ..result
                    });
                }
                Err(err) => {
                    tracing::warn!(error = %err, "routing provider failed, falling back to geocode + haversine");
                }
            }
        }

        let a = self.coordinates_for(origin)?;
        let b = self.coordinates_for(destination)?;
        let result = DistanceResult::fallback_between(a, b);
        tracing::debug!(
            distance_km = result.distance_km,
            duration_minutes = result.duration_minutes,
            "resolved distance via haversine fallback"
        );
        Ok(result)
    }

    fn coordinates_for(&self, location: &Location) -> Result<Coordinates, GeoError> {
        match location {
            Location::Coordinates(coords) => {
                coords.validate()?;
                Ok(*coords)
            }
            Location::Address(address) => {
                let unresolvable = |source| GeoError::LocationUnresolvable {
                    location: address.clone(),
                    source,
                };
                let geocoder = self
                    .geocoder
                    .as_deref()
                    .ok_or_else(|| unresolvable(ProviderError::Unconfigured))?;
                let coords = geocoder.geocode(address).map_err(unresolvable)?;
                coords
                    .validate()
                    .map_err(|err| unresolvable(ProviderError::Decode(err.to_string())))?;
                Ok(coords)
            }
        }
    }
}

/// Rejects router answers that no distance can be priced from.
fn checked_route(result: DistanceResult) -> Result<DistanceResult, ProviderError> {
    if result.distance_km.is_finite() && result.distance_km >= 0.0 {
        Ok(result)
    } else {
        Err(ProviderError::Decode(format!(
            "route distance {} km is not a finite value >= 0",
            result.distance_km
        )))
    }
}
