//! Booking lifecycle: the status state machine and the cancellation-fee policy.
//!
//! Statuses only move forward through [`TRANSITIONS`]. A [`Booking`] keeps its
//! status private so every change goes through the transition check, and an
//! illegal request is rejected before anything is mutated.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, TimeZone};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pricing::Money;

/// Hours before pickup beyond which a confirmed booking is half refunded.
pub const HALF_REFUND_WINDOW_HOURS: f64 = 24.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Quoted,
    Confirmed,
    InProgress,
    Completed,
    Reviewed,
    Cancelled,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 7] = [
        BookingStatus::Pending,
        BookingStatus::Quoted,
        BookingStatus::Confirmed,
        BookingStatus::InProgress,
        BookingStatus::Completed,
        BookingStatus::Reviewed,
        BookingStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Quoted => "QUOTED",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::InProgress => "IN_PROGRESS",
            BookingStatus::Completed => "COMPLETED",
            BookingStatus::Reviewed => "REVIEWED",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }

    /// Legal next statuses.
    pub fn successors(self) -> &'static [BookingStatus] {
        TRANSITIONS
            .iter()
            .find(|(from, _)| *from == self)
            .map(|(_, to)| *to)
            .unwrap_or(&[])
    }

    pub fn is_terminal(self) -> bool {
        self.successors().is_empty()
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown booking status {0:?}")]
pub struct UnknownStatus(pub String);

impl FromStr for BookingStatus {
    type Err = UnknownStatus;

    /// Accepts `IN_PROGRESS`, `in-progress` and `InProgress` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_uppercase();
        BookingStatus::ALL
            .into_iter()
            .find(|status| status.as_str().replace('_', "") == normalized)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// The complete transition table; anything not listed is illegal.
pub const TRANSITIONS: [(BookingStatus, &[BookingStatus]); 7] = [
    (
        BookingStatus::Pending,
        &[BookingStatus::Quoted, BookingStatus::Cancelled],
    ),
    (
        BookingStatus::Quoted,
        &[BookingStatus::Confirmed, BookingStatus::Cancelled],
    ),
    (
        BookingStatus::Confirmed,
        &[BookingStatus::InProgress, BookingStatus::Cancelled],
    ),
    (BookingStatus::InProgress, &[BookingStatus::Completed]),
    (BookingStatus::Completed, &[BookingStatus::Reviewed]),
    (BookingStatus::Reviewed, &[]),
    (BookingStatus::Cancelled, &[]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("illegal booking transition {from} -> {to}")]
    IllegalTransition {
        from: BookingStatus,
        to: BookingStatus,
    },
}

pub fn can_transition(from: BookingStatus, to: BookingStatus) -> bool {
    from.successors().contains(&to)
}

pub fn check_transition(from: BookingStatus, to: BookingStatus) -> Result<(), LifecycleError> {
    if can_transition(from, to) {
        Ok(())
    } else {
        tracing::debug!(%from, %to, "rejected booking transition");
        Err(LifecycleError::IllegalTransition { from, to })
    }
}

// ---------------------------------------------------------------------------
// Cancellation policy
// ---------------------------------------------------------------------------

/// `None` means "not applicable from this status", distinct from `Some(0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CancellationOutcome {
    pub refund_amount: Option<Money>,
    pub cancellation_fee: Option<Money>,
}

impl CancellationOutcome {
    pub fn not_applicable() -> Self {
        Self::default()
    }

    fn charged(refund: Money, fee: Money) -> Self {
        Self {
            refund_amount: Some(refund),
            cancellation_fee: Some(fee),
        }
    }
}

/// Refund and fee for cancelling from `status` at `now`.
///
/// Only a confirmed booking with a known price and schedule is priced: more
/// than 24 h ahead splits the price in half (both halves floored), anything
/// later, including after the scheduled time, forfeits the full price.
pub fn compute_cancellation_outcome<Tz: TimeZone>(
    status: BookingStatus,
    final_price: Option<Money>,
    scheduled_at: Option<&DateTime<FixedOffset>>,
    now: &DateTime<Tz>,
) -> CancellationOutcome {
    let (BookingStatus::Confirmed, Some(price), Some(scheduled_at)) =
        (status, final_price, scheduled_at)
    else {
        return CancellationOutcome::not_applicable();
    };

    let millis_until = scheduled_at.timestamp_millis() - now.timestamp_millis();
    let hours_until = millis_until as f64 / 3_600_000.0;

    if hours_until > HALF_REFUND_WINDOW_HOURS {
        let half = price / 2;
        CancellationOutcome::charged(half, half)
    } else {
        CancellationOutcome::charged(0, price)
    }
}

// ---------------------------------------------------------------------------
// Booking
// ---------------------------------------------------------------------------

/// Booking status holder whose only mutators are checked transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Booking {
    status: BookingStatus,
}

impl Default for Booking {
    fn default() -> Self {
        Self::new()
    }
}

impl Booking {
    /// A freshly accepted booking request.
    pub fn new() -> Self {
        Self {
            status: BookingStatus::Pending,
        }
    }

    pub fn status(&self) -> BookingStatus {
        self.status
    }

    pub fn transition_to(&mut self, to: BookingStatus) -> Result<BookingStatus, LifecycleError> {
        check_transition(self.status, to)?;
        self.status = to;
        Ok(to)
    }

    /// Cancel the booking and report the financial outcome of doing so from
    /// the current status.
    pub fn cancel<Tz: TimeZone>(
        &mut self,
        final_price: Option<Money>,
        scheduled_at: Option<&DateTime<FixedOffset>>,
        now: &DateTime<Tz>,
    ) -> Result<CancellationOutcome, LifecycleError> {
        check_transition(self.status, BookingStatus::Cancelled)?;
        let outcome = compute_cancellation_outcome(self.status, final_price, scheduled_at, now);
        self.status = BookingStatus::Cancelled;
        Ok(outcome)
    }
}
