//! Quote engine: assemble distance, item and floor costs into an itemized
//! breakdown and apply the temporal surge to the whole job.
//!
//! The same entry point serves live previews and the charged price, so the two
//! can never diverge.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pricing::{
    floor_surcharges, price_distance_tiers, to_money, unit_price, CategoryId, CategoryRates,
    DistanceCost, FloorAccess, FloorSurcharge, LineItem, Money, RateCard, TemporalFactors,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuoteError {
    #[error("invalid quote request: {0}")]
    InvalidQuoteRequest(String),
    #[error("unknown item category {0}")]
    UnknownCategory(CategoryId),
}

/// Everything needed to price one move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub rate_card: RateCard,
    pub category_rates: CategoryRates,
    pub distance_km: f64,
    pub items: Vec<LineItem>,
    #[serde(default = "FloorAccess::ground")]
    pub pickup: FloorAccess,
    #[serde(default = "FloorAccess::ground")]
    pub dropoff: FloorAccess,
    /// Carrying charge per floor above the first when no elevator is available.
    pub per_floor_rate: Money,
    /// Local scheduled pickup time; its offset decides peak hours and dates.
    pub scheduled_at: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCost {
    pub category_id: CategoryId,
    pub quantity: u32,
    pub unit_price: Money,
    pub total: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteBreakdown {
    pub distance_km: f64,
    pub distance: DistanceCost,
    pub items: Vec<ItemCost>,
    pub items_total: Money,
    pub floors: FloorSurcharge,
    /// Distance + items + floors, before surge.
    pub subtotal: Money,
    pub temporal: TemporalFactors,
    pub multiplier: f64,
    /// Amount the surge adds on top of `subtotal`.
    pub surge: Money,
    pub total: Money,
}

fn validate(request: &QuoteRequest) -> Result<(), QuoteError> {
    if !request.distance_km.is_finite() || request.distance_km < 0.0 {
        return Err(QuoteError::InvalidQuoteRequest(format!(
            "distance_km must be a finite value >= 0, got {}",
            request.distance_km
        )));
    }
    if request.items.is_empty() {
        return Err(QuoteError::InvalidQuoteRequest(
            "at least one line item is required".to_string(),
        ));
    }
    if let Some(item) = request.items.iter().find(|item| item.quantity == 0) {
        return Err(QuoteError::InvalidQuoteRequest(format!(
            "quantity must be >= 1 for category {}",
            item.category_id
        )));
    }
    request
        .rate_card
        .validate()
        .map_err(|err| QuoteError::InvalidQuoteRequest(err.to_string()))
}

fn price_items(request: &QuoteRequest) -> Result<Vec<ItemCost>, QuoteError> {
    request
        .items
        .iter()
        .map(|item| {
            let rate = request
                .category_rates
                .get(item.category_id)
                .ok_or(QuoteError::UnknownCategory(item.category_id))?;
            rate.validate().map_err(|err| {
                QuoteError::InvalidQuoteRequest(format!("category {}: {}", item.category_id, err))
            })?;
            let unit_price = unit_price(item, rate);
            Ok(ItemCost {
                category_id: item.category_id,
                quantity: item.quantity,
                unit_price,
                total: unit_price.saturating_mul(Money::from(item.quantity)),
            })
        })
        .collect()
}

/// Price a move.
///
/// Order is fixed: distance, items, floors, subtotal, then the temporal
/// multiplier on the whole subtotal, rounded once into `total`.
pub fn compute_quote(request: &QuoteRequest) -> Result<QuoteBreakdown, QuoteError> {
    validate(request)?;

    let distance = price_distance_tiers(request.distance_km, &request.rate_card);
    let items = price_items(request)?;
    let items_total = items
        .iter()
        .fold(0, |acc: Money, item| acc.saturating_add(item.total));
    let floors = floor_surcharges(request.pickup, request.dropoff, request.per_floor_rate);

    let subtotal = distance
        .total
        .saturating_add(items_total)
        .saturating_add(floors.total);

    let temporal = TemporalFactors::at(&request.scheduled_at);
    let multiplier = temporal.multiplier(&request.rate_card);
    let total = to_money(subtotal as f64 * multiplier);

    tracing::debug!(
        distance_km = request.distance_km,
        subtotal,
        multiplier,
        total,
        "computed quote"
    );

    Ok(QuoteBreakdown {
        distance_km: request.distance_km,
        distance,
        items,
        items_total,
        floors,
        subtotal,
        temporal,
        multiplier,
        surge: total.saturating_sub(subtotal),
        total,
    })
}
