//! HTTP-backed geocoding and distance-matrix provider.
//!
//! Wraps a blocking HTTP client for a Google-Maps-compatible web service
//! (`/geocode/json`, `/distancematrix/json`) and maps every transport or API
//! failure onto [`ProviderError`] so the resolver can decide whether to fall
//! back. Requests are bounded by [`MapsConfig::timeout`] and never retried.
//!
//! [`ProviderError`]: crate::routing::ProviderError
//! [`MapsConfig::timeout`]: crate::config::MapsConfig::timeout

mod client;
mod error;
mod parser;
mod response;


pub use client::MapsClient;
