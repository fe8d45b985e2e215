use reqwest::{blocking::Client, Url};
use serde::de::DeserializeOwned;

use crate::config::MapsConfig;
use crate::geo::Coordinates;
use crate::routing::{DistanceResult, Geocoder, ProviderError, RouteDistanceProvider};

use super::error::from_reqwest;
use super::parser::{parse_distance_matrix_response, parse_geocode_response};
use super::response::{DistanceMatrixResponse, GeocodeResponse};

/// Thin HTTP client for geocoding and distance-matrix lookups.
#[derive(Debug, Clone)]
pub struct MapsClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl MapsClient {
    /// Build a client from configuration. A missing API key means the provider
    /// is unconfigured rather than a request that will fail later.
    pub fn new(config: &MapsConfig) -> Result<Self, ProviderError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ProviderError::Unconfigured)?;
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(from_reqwest)?;
        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&format!("{}/{}", self.endpoint, path))
            .map_err(|err| ProviderError::Http(format!("failed to build maps URL: {}", err)))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
            pairs.append_pair("key", &self.api_key);
        }
        Ok(url)
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ProviderError> {
        let response = self.client.get(url).send().map_err(from_reqwest)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.to_string()));
        }
        response.json().map_err(from_reqwest)
    }
}

impl Geocoder for MapsClient {
    fn geocode(&self, address: &str) -> Result<Coordinates, ProviderError> {
        let url = self.url("geocode/json", &[("address", address)])?;
        let parsed: GeocodeResponse = self.get_json(url)?;
        parse_geocode_response(parsed)
    }
}

impl RouteDistanceProvider for MapsClient {
    fn route_distance(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<DistanceResult, ProviderError> {
        let url = self.url(
            "distancematrix/json",
            &[
                ("origins", origin),
                ("destinations", destination),
                ("units", "metric"),
            ],
        )?;
        let parsed: DistanceMatrixResponse = self.get_json(url)?;
        parse_distance_matrix_response(parsed)
    }
}
