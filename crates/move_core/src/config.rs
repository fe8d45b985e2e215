//! Configuration entering the core from outside: rate tables per transport
//! provider and the maps provider connection settings.
//!
//! Rate files arrive as JSON with string-keyed category maps; they are checked
//! and converted into typed [`CategoryRates`] here so nothing downstream has to
//! re-validate ids or multipliers.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pricing::{
    CategoryId, CategoryRate, CategoryRates, FloorAccess, LineItem, Money, RateCard, RateError,
};
use crate::quote::QuoteRequest;

/// Default Google-Maps-compatible web service base URL.
pub const DEFAULT_MAPS_ENDPOINT: &str = "https://maps.googleapis.com/maps/api";
/// Default per-request timeout for the maps provider (seconds).
pub const DEFAULT_MAPS_TIMEOUT_SECS: u64 = 5;

pub const MAPS_ENDPOINT_ENV: &str = "MOVE_MAPS_ENDPOINT";
pub const MAPS_API_KEY_ENV: &str = "MOVE_MAPS_API_KEY";
pub const MAPS_TIMEOUT_ENV: &str = "MOVE_MAPS_TIMEOUT_SECS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid rate configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("category id {0:?} is not a non-negative integer")]
    InvalidCategoryId(String),
    #[error("invalid rate for {owner}: {source}")]
    InvalidRate { owner: String, source: RateError },
    #[error("unknown transport provider {0:?}")]
    UnknownProvider(String),
}

// ---------------------------------------------------------------------------
// Rate configuration
// ---------------------------------------------------------------------------

/// On-disk shape: category ids are JSON object keys, so they arrive as strings.
#[derive(Deserialize)]
struct RawRateConfig {
    providers: BTreeMap<String, RateCard>,
    categories: BTreeMap<String, CategoryRate>,
    #[serde(default)]
    per_floor_rate: Money,
}

/// Validated rate tables for every transport provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateConfig {
    providers: BTreeMap<String, RateCard>,
    categories: CategoryRates,
    per_floor_rate: Money,
}

impl RateConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let raw: RawRateConfig = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        tracing::debug!(
            path = %path.display(),
            providers = config.providers.len(),
            categories = config.categories.len(),
            "loaded rate configuration"
        );
        Ok(config)
    }

    fn from_raw(raw: RawRateConfig) -> Result<Self, ConfigError> {
        for (name, card) in &raw.providers {
            card.validate().map_err(|source| ConfigError::InvalidRate {
                owner: format!("provider {name:?}"),
                source,
            })?;
        }

        let mut categories = CategoryRates::new();
        for (key, rate) in raw.categories {
            let id: CategoryId = key
                .parse()
                .map_err(|_| ConfigError::InvalidCategoryId(key.clone()))?;
            rate.validate().map_err(|source| ConfigError::InvalidRate {
                owner: format!("category {id}"),
                source,
            })?;
            categories.insert(id, rate);
        }

        Ok(Self {
            providers: raw.providers,
            categories,
            per_floor_rate: raw.per_floor_rate,
        })
    }

    pub fn rate_card(&self, provider: &str) -> Result<&RateCard, ConfigError> {
        self.providers
            .get(provider)
            .ok_or_else(|| ConfigError::UnknownProvider(provider.to_string()))
    }

    pub fn provider_names(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    pub fn categories(&self) -> &CategoryRates {
        &self.categories
    }

    pub fn per_floor_rate(&self) -> Money {
        self.per_floor_rate
    }

    /// Bundle this provider's rates with a job description into a quote request.
    pub fn quote_request(
        &self,
        provider: &str,
        job: QuoteJob,
    ) -> Result<QuoteRequest, ConfigError> {
        Ok(QuoteRequest {
            rate_card: *self.rate_card(provider)?,
            category_rates: self.categories.clone(),
            distance_km: job.distance_km,
            items: job.items,
            pickup: job.pickup,
            dropoff: job.dropoff,
            per_floor_rate: self.per_floor_rate,
            scheduled_at: job.scheduled_at,
        })
    }
}

/// Job-specific part of a quote request, without rate data.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteJob {
    pub distance_km: f64,
    pub items: Vec<LineItem>,
    pub pickup: FloorAccess,
    pub dropoff: FloorAccess,
    pub scheduled_at: DateTime<FixedOffset>,
}

// ---------------------------------------------------------------------------
// Maps provider
// ---------------------------------------------------------------------------

/// Connection settings for the external geocoding/distance-matrix provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapsConfig {
    pub endpoint: String,
    /// Unset means the provider is unconfigured and only coordinates resolve.
    pub api_key: Option<String>,
    /// Whole seconds; 0 is treated as 1 by [`MapsConfig::timeout`].
    pub timeout_secs: u64,
}

impl Default for MapsConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_MAPS_ENDPOINT.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_MAPS_TIMEOUT_SECS,
        }
    }
}

impl MapsConfig {
    /// Request timeout, never shorter than one second.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn is_configured(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}
