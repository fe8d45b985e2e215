//! Pricing and booking-lifecycle core for a moving service.
//!
//! - [`routing`]: resolve a distance between two locations
//! - [`pricing`]: distance tiers, item handling, surge and floor surcharges
//! - [`quote`]: itemized quote assembly
//! - [`lifecycle`]: booking status transitions and cancellation fees
//!
//! Every operation takes its inputs explicitly, including "now".

pub mod config;
pub mod geo;
pub mod lifecycle;
pub mod pricing;
pub mod quote;
pub mod routing;

#[cfg(feature = "test-helpers")]
pub mod test_helpers;

pub use geo::Coordinates;
pub use lifecycle::{can_transition, compute_cancellation_outcome, BookingStatus};
pub use quote::{compute_quote, QuoteBreakdown, QuoteRequest};
pub use routing::{DistanceResult, GeoResolver, Location};
