//! Geographic primitives: validated coordinates and great-circle distance.
//!
//! This module provides:
//!
//! - **Coordinates**: latitude/longitude pair with range validation
//! - **Haversine distance**: straight-line distance between two coordinates
//! - **Fallback duration**: travel-time estimate at an assumed average speed
//!
//! Everything here is pure; the external providers live in [`crate::routing`].

use serde::{Deserialize, Serialize};

use crate::routing::GeoError;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Assumed average moving-truck speed for fallback duration estimates (km/h).
pub const FALLBACK_SPEED_KMH: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Build a coordinate pair, rejecting values outside the valid ranges.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        let coords = Self {
            latitude,
            longitude,
        };
        coords.validate()?;
        Ok(coords)
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Re-check a value that may have been built through struct literal or serde.
    pub fn validate(&self) -> Result<(), GeoError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(GeoError::InvalidCoordinates {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }
}

/// Great-circle distance in kilometres between two coordinates.
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let (lat1, lon1) = (a.latitude.to_radians(), a.longitude.to_radians());
    let (lat2, lon2) = (b.latitude.to_radians(), b.longitude.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let sin_dlat = (dlat * 0.5).sin();
    let sin_dlon = (dlon * 0.5).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Whole minutes needed to cover `distance_km` at [`FALLBACK_SPEED_KMH`], rounded up.
pub fn fallback_duration_minutes(distance_km: f64) -> u32 {
    if distance_km <= 0.0 {
        return 0;
    }
    (distance_km * 60.0 / FALLBACK_SPEED_KMH).ceil() as u32
}
