//! Test helpers for common fixtures shared by unit tests, integration tests
//! and benchmarks.

use chrono::{DateTime, FixedOffset, NaiveDate};

use crate::pricing::{CategoryId, CategoryRate, CategoryRates, RateCard};

/// UTC+7, the offset used by every fixture timestamp.
pub const TEST_OFFSET_SECS: i32 = 7 * 3600;

/// Category id of the plain furniture fixture.
pub const FURNITURE: CategoryId = CategoryId(1);
/// Category id of the fragile electronics fixture.
pub const ELECTRONICS: CategoryId = CategoryId(2);

/// Rate card with 15000/10000/8000 per-km tiers and modest surge multipliers.
pub fn sample_rate_card() -> RateCard {
    RateCard {
        per_km_first_tier: 15_000,
        per_km_mid_tier: 10_000,
        per_km_last_tier: 8_000,
        peak_multiplier: 1.2,
        weekend_multiplier: 1.1,
        holiday_multiplier: 1.5,
    }
}

pub fn sample_category_rates() -> CategoryRates {
    let mut rates = CategoryRates::new();
    rates.insert(
        FURNITURE,
        CategoryRate {
            base_price: 200_000,
            fragile_multiplier: 1.5,
            disassembly_multiplier: 1.2,
            heavy_multiplier: 1.3,
        },
    );
    rates.insert(
        ELECTRONICS,
        CategoryRate {
            base_price: 80_000,
            fragile_multiplier: 1.25,
            disassembly_multiplier: 1.0,
            heavy_multiplier: 1.1,
        },
    );
    rates
}

/// Local wall-clock time in the fixture offset.
///
/// # Panics
///
/// Panics if the date or time is invalid.
pub fn local_time(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<FixedOffset> {
    let offset = FixedOffset::east_opt(TEST_OFFSET_SECS).expect("fixture offset should be valid");
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .and_then(|naive| naive.and_local_timezone(offset).single())
        .expect("fixture date should be valid")
}

/// Wednesday 2024-03-13 12:00, outside every surge window.
pub fn weekday_noon() -> DateTime<FixedOffset> {
    local_time(2024, 3, 13, 12, 0)
}
