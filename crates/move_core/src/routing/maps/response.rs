#[derive(serde::Deserialize)]
pub(super) struct GeocodeResponse {
    pub(super) status: String,
    #[serde(default)]
    pub(super) results: Vec<GeocodeResult>,
    pub(super) error_message: Option<String>,
}

#[derive(serde::Deserialize)]
pub(super) struct GeocodeResult {
    pub(super) geometry: GeocodeGeometry,
}

#[derive(serde::Deserialize)]
pub(super) struct GeocodeGeometry {
    pub(super) location: LatLngLiteral,
}

#[derive(serde::Deserialize)]
pub(super) struct LatLngLiteral {
    pub(super) lat: f64,
    pub(super) lng: f64,
}

#[derive(serde::Deserialize)]
pub(super) struct DistanceMatrixResponse {
    pub(super) status: String,
    #[serde(default)]
    pub(super) rows: Vec<DistanceMatrixRow>,
    pub(super) error_message: Option<String>,
}

#[derive(serde::Deserialize)]
pub(super) struct DistanceMatrixRow {
    pub(super) elements: Vec<DistanceMatrixElement>,
}

#[derive(serde::Deserialize)]
pub(super) struct DistanceMatrixElement {
    pub(super) status: String,
    pub(super) distance: Option<ValueField>,
    pub(super) duration: Option<ValueField>,
}

/// `{ "value": <number>, "text": "..." }`; only the numeric value is used.
#[derive(serde::Deserialize)]
pub(super) struct ValueField {
    pub(super) value: f64,
}
