use chrono::Duration;
use move_core::lifecycle::{
    can_transition, check_transition, compute_cancellation_outcome, Booking, BookingStatus,
    CancellationOutcome, LifecycleError,
};
use move_core::test_helpers::weekday_noon;

use BookingStatus::*;

#[test]
fn transition_table_is_exact() {
    let legal = [
        (Pending, Quoted),
        (Pending, Cancelled),
        (Quoted, Confirmed),
        (Quoted, Cancelled),
        (Confirmed, InProgress),
        (Confirmed, Cancelled),
        (InProgress, Completed),
        (Completed, Reviewed),
    ];
    for from in BookingStatus::ALL {
        for to in BookingStatus::ALL {
            assert_eq!(
                can_transition(from, to),
                legal.contains(&(from, to)),
                "{from} -> {to}"
            );
        }
    }
}

#[test]
fn completed_can_be_reviewed_but_not_cancelled() {
    assert!(can_transition(Completed, Reviewed));
    assert!(!can_transition(Completed, Cancelled));
    assert_eq!(
        check_transition(Completed, Cancelled),
        Err(LifecycleError::IllegalTransition {
            from: Completed,
            to: Cancelled
        })
    );
}

#[test]
fn booking_walks_the_happy_path() {
    let mut booking = Booking::new();
    assert_eq!(booking.status(), Pending);
    for next in [Quoted, Confirmed, InProgress, Completed, Reviewed] {
        assert_eq!(booking.transition_to(next), Ok(next));
    }
    assert!(booking.status().is_terminal());
    assert!(booking.transition_to(Cancelled).is_err());
    assert_eq!(booking.status(), Reviewed);
}

#[test]
fn illegal_skip_is_rejected_without_side_effect() {
    let mut booking = Booking::new();
    let err = booking.transition_to(InProgress).expect_err("illegal");
    assert_eq!(err.to_string(), "illegal booking transition PENDING -> IN_PROGRESS");
    assert_eq!(booking.status(), Pending);
}

#[test]
fn confirmed_more_than_a_day_ahead_refunds_half() {
    let now = weekday_noon();
    let scheduled = now + Duration::hours(25);
    assert_eq!(
        compute_cancellation_outcome(Confirmed, Some(1_000_000), Some(&scheduled), &now),
        CancellationOutcome {
            refund_amount: Some(500_000),
            cancellation_fee: Some(500_000),
        }
    );
}

#[test]
fn confirmed_within_a_day_forfeits_everything() {
    let now = weekday_noon();
    for hours in [10, 1, 0, -3, -72] {
        let scheduled = now + Duration::hours(hours);
        assert_eq!(
            compute_cancellation_outcome(Confirmed, Some(1_000_000), Some(&scheduled), &now),
            CancellationOutcome {
                refund_amount: Some(0),
                cancellation_fee: Some(1_000_000),
            },
            "{hours}h"
        );
    }
}

#[test]
fn unpriced_statuses_yield_nothing() {
    let now = weekday_noon();
    let scheduled = now + Duration::hours(48);
    for status in [Pending, Quoted, InProgress, Completed, Reviewed, Cancelled] {
        assert_eq!(
            compute_cancellation_outcome(status, Some(1_000_000), Some(&scheduled), &now),
            CancellationOutcome::not_applicable(),
            "{status}"
        );
    }
}

#[test]
fn confirmed_without_price_or_schedule_is_not_computable() {
    let now = weekday_noon();
    let scheduled = now + Duration::hours(48);
    assert_eq!(
        compute_cancellation_outcome(Confirmed, None, Some(&scheduled), &now),
        CancellationOutcome::not_applicable()
    );
    assert_eq!(
        compute_cancellation_outcome(Confirmed, Some(1_000), None, &now),
        CancellationOutcome::not_applicable()
    );
}

#[test]
fn zero_fee_is_distinct_from_not_applicable() {
    let now = weekday_noon();
    let scheduled = now + Duration::hours(30);
    let outcome = compute_cancellation_outcome(Confirmed, Some(0), Some(&scheduled), &now);
    assert_eq!(outcome.refund_amount, Some(0));
    assert_eq!(outcome.cancellation_fee, Some(0));
    assert_ne!(outcome, CancellationOutcome::not_applicable());
}

#[test]
fn cancelling_a_confirmed_booking_reports_and_moves() {
    let mut booking = Booking::new();
    booking.transition_to(Quoted).expect("quoted");
    booking.transition_to(Confirmed).expect("confirmed");

    let now = weekday_noon();
    let scheduled = now + Duration::hours(72);
    let outcome = booking
        .cancel(Some(700_000), Some(&scheduled), &now)
        .expect("cancel");

    assert_eq!(outcome.refund_amount, Some(350_000));
    assert_eq!(outcome.cancellation_fee, Some(350_000));
    assert_eq!(booking.status(), Cancelled);
}

#[test]
fn cancelling_a_pending_booking_is_free() {
    let mut booking = Booking::new();
    let now = weekday_noon();
    let outcome = booking.cancel(None, None, &now).expect("cancel");
    assert_eq!(outcome, CancellationOutcome::not_applicable());
    assert_eq!(booking.status(), Cancelled);
}

#[test]
fn status_serializes_screaming_snake_case() {
    assert_eq!(
        serde_json::to_string(&InProgress).expect("serialize"),
        "\"IN_PROGRESS\""
    );
}
