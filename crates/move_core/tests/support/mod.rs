#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use move_core::geo::Coordinates;
use move_core::routing::{DistanceMethod, DistanceResult, Geocoder, ProviderError, RouteDistanceProvider};

pub const HANOI_OPERA_HOUSE: &str = "1 Trang Tien, Hoan Kiem, Ha Noi";
pub const HANOI_TEMPLE_OF_LITERATURE: &str = "58 Quoc Tu Giam, Dong Da, Ha Noi";

pub fn opera_house() -> Coordinates {
    Coordinates::new(21.0245, 105.8575).expect("valid")
}

pub fn temple_of_literature() -> Coordinates {
    Coordinates::new(21.0285, 105.8355).expect("valid")
}

/// Geocoder answering from a fixed table; every other address is `NoResult`.
#[derive(Clone, Default)]
pub struct TableGeocoder {
    entries: HashMap<String, Coordinates>,
    calls: Arc<AtomicUsize>,
}

impl TableGeocoder {
    pub fn seeded() -> Self {
        let mut geocoder = Self::default();
        geocoder
            .entries
            .insert(HANOI_OPERA_HOUSE.to_string(), opera_house());
        geocoder
            .entries
            .insert(HANOI_TEMPLE_OF_LITERATURE.to_string(), temple_of_literature());
        geocoder
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl Geocoder for TableGeocoder {
    fn geocode(&self, address: &str) -> Result<Coordinates, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entries
            .get(address)
            .copied()
            .ok_or(ProviderError::NoResult)
    }
}

/// Geocoder that always fails with the given error.
pub struct FailingGeocoder(pub ProviderError);

impl Geocoder for FailingGeocoder {
    fn geocode(&self, _address: &str) -> Result<Coordinates, ProviderError> {
        Err(self.0.clone())
    }
}

/// Router returning a fixed road distance.
pub struct FixedRouter {
    pub distance_km: f64,
    pub duration_minutes: u32,
}

impl RouteDistanceProvider for FixedRouter {
    fn route_distance(
        &self,
        _origin: &str,
        _destination: &str,
    ) -> Result<DistanceResult, ProviderError> {
        Ok(DistanceResult {
            distance_km: self.distance_km,
            duration_minutes: self.duration_minutes,
            // Deliberately mislabelled: the resolver owns the method tag.
            method: DistanceMethod::Fallback,
        })
    }
}

/// Router that always fails with the given error.
pub struct FailingRouter(pub ProviderError);

impl RouteDistanceProvider for FailingRouter {
    fn route_distance(
        &self,
        _origin: &str,
        _destination: &str,
    ) -> Result<DistanceResult, ProviderError> {
        Err(self.0.clone())
    }
}
