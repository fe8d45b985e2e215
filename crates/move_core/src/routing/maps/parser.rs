use crate::geo::Coordinates;
use crate::routing::{DistanceMethod, DistanceResult, ProviderError};

use super::response::{DistanceMatrixResponse, GeocodeResponse};

const STATUS_OK: &str = "OK";

fn status_error(status: String, message: Option<String>) -> ProviderError {
    match message.filter(|m| !m.trim().is_empty()) {
        Some(message) => ProviderError::Status(format!("{status}: {message}")),
        None => ProviderError::Status(status),
    }
}

pub(super) fn parse_geocode_response(resp: GeocodeResponse) -> Result<Coordinates, ProviderError> {
    if resp.status != STATUS_OK {
        return Err(status_error(resp.status, resp.error_message));
    }

    let first = resp.results.first().ok_or(ProviderError::NoResult)?;
    let location = &first.geometry.location;
    Coordinates::new(location.lat, location.lng)
        .map_err(|err| ProviderError::Decode(err.to_string()))
}

pub(super) fn parse_distance_matrix_response(
    resp: DistanceMatrixResponse,
) -> Result<DistanceResult, ProviderError> {
    if resp.status != STATUS_OK {
        return Err(status_error(resp.status, resp.error_message));
    }

    let element = resp
        .rows
        .first()
        .and_then(|row| row.elements.first())
        .ok_or(ProviderError::NoResult)?;
    if element.status != STATUS_OK {
        return Err(ProviderError::Status(element.status.clone()));
    }

    let distance_m = element.distance.as_ref().ok_or(ProviderError::NoResult)?.value;
    let duration_s = element.duration.as_ref().ok_or(ProviderError::NoResult)?.value;
    if !distance_m.is_finite() || distance_m < 0.0 || !duration_s.is_finite() || duration_s < 0.0 {
        return Err(ProviderError::Decode(format!(
            "negative or non-finite distance/duration: {distance_m} m, {duration_s} s"
        )));
    }

    Ok(DistanceResult {
        distance_km: distance_m / 1000.0,
        duration_minutes: (duration_s / 60.0).ceil() as u32,
        method: DistanceMethod::External,
    })
}
