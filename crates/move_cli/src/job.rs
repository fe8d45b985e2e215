//! Quote job documents: the JSON a caller hands to `movequote quote`.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, FixedOffset};
use move_core::config::{QuoteJob, RateConfig};
use move_core::pricing::{FloorAccess, LineItem};
use move_core::quote::{compute_quote, QuoteBreakdown};
use move_core::routing::{DistanceResult, GeoResolver, Location};
use serde::{Deserialize, Serialize};

/// Either `distance_km` or both `origin` and `destination` must be present.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JobDocument {
    #[serde(default)]
    pub distance_km: Option<f64>,
    #[serde(default)]
    pub origin: Option<Location>,
    #[serde(default)]
    pub destination: Option<Location>,
    pub items: Vec<LineItem>,
    #[serde(default = "FloorAccess::ground")]
    pub pickup: FloorAccess,
    #[serde(default = "FloorAccess::ground")]
    pub dropoff: FloorAccess,
    pub scheduled_at: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_distance: Option<DistanceResult>,
    pub quote: QuoteBreakdown,
}

impl JobDocument {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid quote job document")
    }

    fn distance(&self, resolver: &GeoResolver) -> Result<(f64, Option<DistanceResult>)> {
        if let Some(distance_km) = self.distance_km {
            return Ok((distance_km, None));
        }
        let (Some(origin), Some(destination)) = (&self.origin, &self.destination) else {
            bail!("job needs either distance_km or both origin and destination");
        };
        let resolved = resolver
            .resolve_distance(origin, destination)
            .with_context(|| format!("resolving distance {origin} -> {destination}"))?;
        Ok((resolved.distance_km, Some(resolved)))
    }
}

pub fn quote_job(
    rates: &RateConfig,
    provider: &str,
    job: JobDocument,
    resolver: &GeoResolver,
) -> Result<QuoteOutput> {
    let (distance_km, resolved_distance) = job.distance(resolver)?;
    let request = rates.quote_request(
        provider,
        QuoteJob {
            distance_km,
            items: job.items,
            pickup: job.pickup,
            dropoff: job.dropoff,
            scheduled_at: job.scheduled_at,
        },
    )?;
    let quote = compute_quote(&request)?;
    Ok(QuoteOutput {
        resolved_distance,
        quote,
    })
}
