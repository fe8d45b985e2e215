//! Rate model: tiered distance pricing, item handling, temporal surge
//! multipliers and the floor carrying surcharge.
//!
//! All money is in minor currency units ([`Money`]). Intermediate math runs in
//! `f64` and is rounded once, at the point a sub-total is produced.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, TimeZone, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Amount in minor currency units.
pub type Money = u64;

/// Upper bound (km) of the first distance tier.
pub const FIRST_TIER_END_KM: f64 = 4.0;
/// Upper bound (km) of the mid distance tier.
pub const MID_TIER_END_KM: f64 = 40.0;

/// Month/day pairs priced with the holiday multiplier, every year.
pub const HOLIDAYS: [(u32, u32); 4] = [(1, 1), (4, 30), (5, 1), (9, 2)];

/// Peak windows as half-open local-hour ranges.
const PEAK_HOURS: [(u32, u32); 2] = [(7, 9), (17, 19)];

/// Round a non-negative amount to the nearest minor unit.
pub(crate) fn to_money(amount: f64) -> Money {
    if amount.is_finite() && amount > 0.0 {
        amount.round() as Money
    } else {
        0
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RateError {
    #[error("{field} must be a finite multiplier >= 1, got {value}")]
    InvalidMultiplier { field: &'static str, value: f64 },
}

fn check_multiplier(field: &'static str, value: f64) -> Result<(), RateError> {
    if value.is_finite() && value >= 1.0 {
        Ok(())
    } else {
        Err(RateError::InvalidMultiplier { field, value })
    }
}

// ---------------------------------------------------------------------------
// Rate inputs
// ---------------------------------------------------------------------------

/// Per-provider distance rates and surge multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateCard {
    pub per_km_first_tier: Money,
    pub per_km_mid_tier: Money,
    pub per_km_last_tier: Money,
    pub peak_multiplier: f64,
    pub weekend_multiplier: f64,
    pub holiday_multiplier: f64,
}

impl RateCard {
    pub fn validate(&self) -> Result<(), RateError> {
        check_multiplier("peak_multiplier", self.peak_multiplier)?;
        check_multiplier("weekend_multiplier", self.weekend_multiplier)?;
        check_multiplier("holiday_multiplier", self.holiday_multiplier)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub u32);

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CategoryId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(CategoryId)
    }
}

/// Handling price for one item category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryRate {
    pub base_price: Money,
    pub fragile_multiplier: f64,
    pub disassembly_multiplier: f64,
    pub heavy_multiplier: f64,
}

impl CategoryRate {
    pub fn validate(&self) -> Result<(), RateError> {
        check_multiplier("fragile_multiplier", self.fragile_multiplier)?;
        check_multiplier("disassembly_multiplier", self.disassembly_multiplier)?;
        check_multiplier("heavy_multiplier", self.heavy_multiplier)
    }
}

/// Category rates keyed by typed id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryRates(BTreeMap<CategoryId, CategoryRate>);

impl CategoryRates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: CategoryId, rate: CategoryRate) -> Option<CategoryRate> {
        self.0.insert(id, rate)
    }

    pub fn get(&self, id: CategoryId) -> Option<&CategoryRate> {
        self.0.get(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CategoryId, &CategoryRate)> {
        self.0.iter().map(|(id, rate)| (*id, rate))
    }
}

impl FromIterator<(CategoryId, CategoryRate)> for CategoryRates {
    fn from_iter<I: IntoIterator<Item = (CategoryId, CategoryRate)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub category_id: CategoryId,
    pub quantity: u32,
    #[serde(default)]
    pub is_fragile: bool,
    #[serde(default)]
    pub requires_disassembly: bool,
    #[serde(default)]
    pub is_heavy: bool,
}

impl LineItem {
    /// Plain item with no handling flags.
    pub fn new(category_id: CategoryId, quantity: u32) -> Self {
        Self {
            category_id,
            quantity,
            is_fragile: false,
            requires_disassembly: false,
            is_heavy: false,
        }
    }

    pub fn fragile(mut self) -> Self {
        self.is_fragile = true;
        self
    }

    pub fn with_disassembly(mut self) -> Self {
        self.requires_disassembly = true;
        self
    }

    pub fn heavy(mut self) -> Self {
        self.is_heavy = true;
        self
    }
}

/// Floor of a pickup or drop-off and whether a lift can be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FloorAccess {
    pub floor: i32,
    #[serde(default)]
    pub has_elevator: bool,
}

impl FloorAccess {
    pub fn ground() -> Self {
        Self {
            floor: 1,
            has_elevator: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Distance
// ---------------------------------------------------------------------------

/// Distance cost split by tier. Tier fields are individually rounded for
/// display; `total` is rounded from the unrounded sum and may differ from the
/// sum of the tier fields by one minor unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DistanceCost {
    pub first_tier: Money,
    pub mid_tier: Money,
    pub last_tier: Money,
    pub total: Money,
}

/// Kilometres falling into each tier, in order.
fn tier_km(distance_km: f64) -> [f64; 3] {
    let d = if distance_km.is_finite() {
        distance_km.max(0.0)
    } else {
        0.0
    };
    [
        d.min(FIRST_TIER_END_KM),
        (d.min(MID_TIER_END_KM) - FIRST_TIER_END_KM).max(0.0),
        (d - MID_TIER_END_KM).max(0.0),
    ]
}

/// Per-tier breakdown of [`price_distance`].
///
/// Negative or non-finite distances clamp to 0 km; [`crate::compute_quote`]
/// rejects them before pricing.
pub fn price_distance_tiers(distance_km: f64, rate_card: &RateCard) -> DistanceCost {
    let [first_km, mid_km, last_km] = tier_km(distance_km);
    let first = first_km * rate_card.per_km_first_tier as f64;
    let mid = mid_km * rate_card.per_km_mid_tier as f64;
    let last = last_km * rate_card.per_km_last_tier as f64;
    DistanceCost {
        first_tier: to_money(first),
        mid_tier: to_money(mid),
        last_tier: to_money(last),
        total: to_money(first + mid + last),
    }
}

/// Three-tier distance price with breakpoints at 4 km and 40 km.
///
/// Equivalent to:
/// - `d <= 4`: `d * first`
/// - `4 < d <= 40`: `4 * first + (d - 4) * mid`
/// - `d > 40`: `4 * first + 36 * mid + (d - 40) * last`
pub fn price_distance(distance_km: f64, rate_card: &RateCard) -> Money {
    price_distance_tiers(distance_km, rate_card).total
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// Unit price after handling multipliers (fragile, disassembly, heavy, in that
/// order), rounded once.
pub fn unit_price(item: &LineItem, rate: &CategoryRate) -> Money {
    let mut price = rate.base_price as f64;
    if item.is_fragile {
        price *= rate.fragile_multiplier;
    }
    if item.requires_disassembly {
        price *= rate.disassembly_multiplier;
    }
    if item.is_heavy {
        price *= rate.heavy_multiplier;
    }
    to_money(price)
}

/// Rounded unit price times quantity.
pub fn price_line_item(item: &LineItem, rate: &CategoryRate) -> Money {
    unit_price(item, rate).saturating_mul(Money::from(item.quantity))
}

// ---------------------------------------------------------------------------
// Temporal multipliers
// ---------------------------------------------------------------------------

/// Surge conditions at a scheduled time. The flags are independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TemporalFactors {
    pub is_peak_hour: bool,
    pub is_weekend: bool,
    pub is_holiday: bool,
}

impl TemporalFactors {
    /// Evaluate in the timestamp's own offset, so callers pass local time.
    pub fn at<Tz: TimeZone>(scheduled_at: &DateTime<Tz>) -> Self {
        let hour = scheduled_at.hour();
        let month_day = (scheduled_at.month(), scheduled_at.day());
        Self {
            is_peak_hour: PEAK_HOURS
                .iter()
                .any(|&(start, end)| (start..end).contains(&hour)),
            is_weekend: matches!(scheduled_at.weekday(), Weekday::Sat | Weekday::Sun),
            is_holiday: HOLIDAYS.contains(&month_day),
        }
    }

    /// Product of the multipliers whose condition holds.
    pub fn multiplier(&self, rate_card: &RateCard) -> f64 {
        let mut factor = 1.0;
        if self.is_peak_hour {
            factor *= rate_card.peak_multiplier;
        }
        if self.is_weekend {
            factor *= rate_card.weekend_multiplier;
        }
        if self.is_holiday {
            factor *= rate_card.holiday_multiplier;
        }
        factor
    }
}

pub fn temporal_multiplier<Tz: TimeZone>(scheduled_at: &DateTime<Tz>, rate_card: &RateCard) -> f64 {
    TemporalFactors::at(scheduled_at).multiplier(rate_card)
}

// ---------------------------------------------------------------------------
// Floors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FloorSurcharge {
    pub pickup: Money,
    pub dropoff: Money,
    pub total: Money,
}

/// Carrying surcharge for one end of the move: every floor above the first is
/// charged at `per_floor_rate` when there is no elevator.
pub fn floor_surcharge(access: FloorAccess, per_floor_rate: Money) -> Money {
    if access.has_elevator || access.floor <= 1 {
        return 0;
    }
    Money::from(access.floor.unsigned_abs() - 1).saturating_mul(per_floor_rate)
}

pub fn floor_surcharges(
    pickup: FloorAccess,
    dropoff: FloorAccess,
    per_floor_rate: Money,
) -> FloorSurcharge {
    let pickup = floor_surcharge(pickup, per_floor_rate);
    let dropoff = floor_surcharge(dropoff, per_floor_rate);
    FloorSurcharge {
        pickup,
        dropoff,
        total: pickup.saturating_add(dropoff),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    use crate::test_helpers::local_time;

    fn card() -> RateCard {
        RateCard {
            per_km_first_tier: 15_000,
            per_km_mid_tier: 10_000,
            per_km_last_tier: 8_000,
            peak_multiplier: 1.2,
            weekend_multiplier: 1.1,
            holiday_multiplier: 1.5,
        }
    }

    #[test]
    fn zero_distance_is_free() {
        assert_eq!(price_distance(0.0, &card()), 0);
    }

    #[test]
    fn negative_and_non_finite_distances_clamp_to_zero() {
        let card = card();
        for distance_km in [-1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(price_distance(distance_km, &card), 0, "{distance_km}");
            assert_eq!(
                price_distance_tiers(distance_km, &card),
                DistanceCost {
                    first_tier: 0,
                    mid_tier: 0,
                    last_tier: 0,
                    total: 0,
                }
            );
        }
    }

    #[test]
    fn distance_tiers_match_closed_form() {
        let card = card();
        assert_eq!(price_distance(2.5, &card), 37_500);
        assert_eq!(price_distance(4.0, &card), 60_000);
        assert_eq!(price_distance(10.0, &card), 60_000 + 60_000);
        assert_eq!(price_distance(40.0, &card), 60_000 + 360_000);
        assert_eq!(price_distance(50.0, &card), 500_000);
    }

    #[test]
    fn distance_is_continuous_at_breakpoints() {
        let card = card();
        let eps = 1e-9;
        for breakpoint in [FIRST_TIER_END_KM, MID_TIER_END_KM] {
            let below = price_distance(breakpoint - eps, &card);
            let at = price_distance(breakpoint, &card);
            let above = price_distance(breakpoint + eps, &card);
            assert_eq!(below, at);
            assert_eq!(at, above);
        }
    }

    #[test]
    fn distance_is_monotonic() {
        let card = card();
        let mut previous = 0;
        for step in 0..=1_000 {
            let price = price_distance(step as f64 * 0.1, &card);
            assert!(price >= previous, "price dropped at {} km", step as f64 * 0.1);
            previous = price;
        }
    }

    #[test]
    fn distance_rounds_once_not_per_tier() {
        let card = RateCard {
            per_km_first_tier: 3,
            per_km_mid_tier: 3,
            per_km_last_tier: 3,
            ..card()
        };
        // 4.5 km: tiers 12 + 1.5 -> rounded total 14 (half away from zero)
        let cost = price_distance_tiers(4.5, &card);
        assert_eq!(cost.first_tier, 12);
        assert_eq!(cost.mid_tier, 2);
        assert_eq!(cost.total, 14);
    }

    #[test]
    fn plain_item_is_base_times_quantity() {
        let rate = CategoryRate {
            base_price: 200_000,
            fragile_multiplier: 1.5,
            disassembly_multiplier: 1.3,
            heavy_multiplier: 1.2,
        };
        let item = LineItem::new(CategoryId(1), 3);
        assert_eq!(price_line_item(&item, &rate), 600_000);
    }

    #[test]
    fn item_multipliers_compose_then_round_per_unit() {
        let rate = CategoryRate {
            base_price: 101,
            fragile_multiplier: 1.5,
            disassembly_multiplier: 1.0,
            heavy_multiplier: 1.0,
        };
        // 101 * 1.5 = 151.5 -> 152 per unit, then * 2
        let item = LineItem::new(CategoryId(1), 2).fragile();
        assert_eq!(price_line_item(&item, &rate), 304);

        let all = CategoryRate {
            base_price: 1_000,
            fragile_multiplier: 1.5,
            disassembly_multiplier: 2.0,
            heavy_multiplier: 1.25,
        };
        let item = LineItem::new(CategoryId(1), 1)
            .fragile()
            .with_disassembly()
            .heavy();
        assert_eq!(price_line_item(&item, &all), 3_750);
    }

    #[test]
    fn weekday_noon_has_no_surge() {
        // 2024-03-13 is a Wednesday
        let factors = TemporalFactors::at(&local_time(2024, 3, 13, 12, 0));
        assert_eq!(factors, TemporalFactors::default());
        assert_eq!(temporal_multiplier(&local_time(2024, 3, 13, 12, 0), &card()), 1.0);
    }

    #[test]
    fn peak_windows_are_half_open() {
        let hours: Vec<u32> = (0..24)
            .filter(|h| TemporalFactors::at(&local_time(2024, 3, 13, *h, 0)).is_peak_hour)
            .collect();
        assert_eq!(hours, vec![7, 8, 17, 18]);
    }

    #[test]
    fn surge_factors_stack_multiplicatively() {
        // 2024-09-01 is a Sunday; 2024-05-01 is a Wednesday holiday
        let sunday_peak = temporal_multiplier(&local_time(2024, 9, 1, 8, 0), &card());
        assert!((sunday_peak - 1.2 * 1.1).abs() < 1e-12);

        let holiday = TemporalFactors::at(&local_time(2024, 5, 1, 17, 0));
        assert!(holiday.is_holiday && holiday.is_peak_hour && !holiday.is_weekend);

        // 2029-09-02 is a Sunday holiday
        let all = TemporalFactors::at(&local_time(2029, 9, 2, 18, 0));
        assert!(all.is_holiday && all.is_peak_hour && all.is_weekend);
        assert!((all.multiplier(&card()) - 1.2 * 1.1 * 1.5).abs() < 1e-12);
    }

    #[test]
    fn factors_use_the_timestamp_offset() {
        // 01:00 UTC is 08:00 in UTC+7
        let utc = chrono::Utc
            .with_ymd_and_hms(2024, 3, 13, 1, 0, 0)
            .single()
            .expect("utc");
        assert!(!TemporalFactors::at(&utc).is_peak_hour);
        let local = utc.with_timezone(&FixedOffset::east_opt(7 * 3600).expect("offset"));
        assert!(TemporalFactors::at(&local).is_peak_hour);
    }

    #[test]
    fn floor_surcharge_only_without_elevator_above_first_floor() {
        let rate = 50_000;
        let walk_up = |floor| FloorAccess {
            floor,
            has_elevator: false,
        };
        assert_eq!(floor_surcharge(walk_up(-1), rate), 0);
        assert_eq!(floor_surcharge(walk_up(0), rate), 0);
        assert_eq!(floor_surcharge(walk_up(1), rate), 0);
        assert_eq!(floor_surcharge(walk_up(4), rate), 150_000);
        assert_eq!(
            floor_surcharge(
                FloorAccess {
                    floor: 10,
                    has_elevator: true
                },
                rate
            ),
            0
        );

        let both = floor_surcharges(walk_up(3), walk_up(2), rate);
        assert_eq!(both.pickup, 100_000);
        assert_eq!(both.dropoff, 50_000);
        assert_eq!(both.total, 150_000);
    }

    #[test]
    fn multipliers_below_one_are_rejected() {
        let card = RateCard {
            weekend_multiplier: 0.9,
            ..card()
        };
        assert_eq!(
            card.validate(),
            Err(RateError::InvalidMultiplier {
                field: "weekend_multiplier",
                value: 0.9
            })
        );
    }
}
