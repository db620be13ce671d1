//! Tests for same-day slot suggestions and the next-day fallback.

use booking_engine::day::{DAY_MS, HOUR_MS, MINUTE_MS};
use booking_engine::suggest::{DEFAULT_FALLBACK_OPENING_MS, FALLBACK_NOTE};
use booking_engine::{suggest_slots, DayBounds, Interval, Placement, SlotSuggester, SuggestConfig};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn iv(low: i64, high: i64) -> Interval {
    Interval::new(low, high)
}

fn minutes_day() -> DayBounds {
    DayBounds::new(0, 1440)
}

fn placements(list: &[booking_engine::Slot]) -> Vec<Placement> {
    list.iter().map(|s| s.placement).collect()
}

// ── Gap finding ─────────────────────────────────────────────────────────────

#[test]
fn gap_between_two_bookings() {
    let existing = vec![iv(0, 100), iv(300, 400)];
    let slots = suggest_slots(&existing, 100, &minutes_day());

    assert_eq!(slots[0].interval, iv(100, 200));
    assert_eq!(slots[0].placement, Placement::Gap);
    assert_eq!(slots[1].interval, iv(400, 500));
    assert_eq!(slots[1].placement, Placement::AfterLast);
    assert_eq!(slots.len(), 2);
}

#[test]
fn unsorted_input_is_sorted_first() {
    let existing = vec![iv(300, 400), iv(0, 100)];
    let slots = suggest_slots(&existing, 100, &minutes_day());
    assert_eq!(slots[0].interval, iv(100, 200));
}

#[test]
fn narrow_gaps_are_skipped() {
    let existing = vec![iv(100, 200), iv(250, 300), iv(500, 600)];
    let slots = suggest_slots(&existing, 100, &minutes_day());
    assert_eq!(
        slots.iter().map(|s| s.interval.clone()).collect::<Vec<_>>(),
        vec![iv(0, 100), iv(300, 400), iv(600, 700)]
    );
    assert_eq!(
        placements(&slots),
        vec![Placement::BeforeFirst, Placement::Gap, Placement::AfterLast]
    );
}

#[test]
fn gap_exactly_the_duration_fits() {
    let existing = vec![iv(0, 100), iv(200, 1440)];
    let slots = suggest_slots(&existing, 100, &minutes_day());
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].interval, iv(100, 200));
}

#[test]
fn nested_booking_does_not_open_a_false_gap() {
    // [0, 500) swallows [100, 150). The space after 150 is still busy.
    let existing = vec![iv(0, 500), iv(100, 150), iv(700, 800)];
    let slots = suggest_slots(&existing, 100, &minutes_day());
    assert_eq!(slots[0].interval, iv(500, 600));
    assert_eq!(slots[0].placement, Placement::Gap);
    for slot in &slots {
        for booking in &existing {
            assert!(
                slot.end() <= booking.low || booking.high <= slot.start(),
                "{} overlaps {}",
                slot.interval,
                booking
            );
        }
    }
}

// ── Before first / after last ───────────────────────────────────────────────

#[test]
fn before_first_ends_where_first_booking_starts() {
    let existing = vec![iv(600, 700)];
    let slots = suggest_slots(&existing, 60, &minutes_day());
    assert_eq!(slots[0].interval, iv(540, 600));
    assert_eq!(slots[0].placement, Placement::BeforeFirst);
}

#[test]
fn no_before_first_when_morning_is_too_short() {
    let existing = vec![iv(30, 100)];
    let slots = suggest_slots(&existing, 60, &minutes_day());
    assert_eq!(placements(&slots), vec![Placement::AfterLast]);
}

#[test]
fn after_last_must_end_by_day_end() {
    let existing = vec![iv(0, 100), iv(1000, 1400)];
    let slots = suggest_slots(&existing, 60, &minutes_day());
    assert_eq!(placements(&slots), vec![Placement::Gap]);

    let slots = suggest_slots(&existing, 40, &minutes_day());
    assert_eq!(slots.last().unwrap().interval, iv(1400, 1440));
}

#[test]
fn empty_day_offers_its_opening() {
    let slots = suggest_slots(&[], 90, &minutes_day());
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].interval, iv(0, 90));
    assert_eq!(slots[0].placement, Placement::BeforeFirst);
}

// ── Cap ─────────────────────────────────────────────────────────────────────

#[test]
fn at_most_three_by_default_in_start_order() {
    let existing: Vec<_> = (1..10).map(|i| iv(i * 120, i * 120 + 60)).collect();
    let slots = suggest_slots(&existing, 30, &minutes_day());
    assert_eq!(slots.len(), 3);
    assert!(slots.windows(2).all(|w| w[0].start() < w[1].start()));
    assert_eq!(slots[0].interval, iv(90, 120));
}

#[test]
fn zero_cap_suggests_nothing() {
    let suggester = SlotSuggester::new(SuggestConfig::default().with_max_suggestions(0));
    let slots = suggester.suggest(&[iv(0, 100)], 30, &minutes_day());
    assert!(slots.is_empty());
}

// ── Fallback ────────────────────────────────────────────────────────────────

#[test]
fn packed_day_falls_back_to_next_morning() {
    let bounds = DayBounds::new(0, DAY_MS);
    let existing = vec![iv(0, DAY_MS)];
    let slots = suggest_slots(&existing, 30 * MINUTE_MS, &bounds);

    assert_eq!(slots.len(), 1);
    assert!(slots.is_fallback());
    let slot = &slots[0];
    assert_eq!(slot.start(), DAY_MS + 9 * HOUR_MS);
    assert_eq!(slot.end(), DAY_MS + 9 * HOUR_MS + 30 * MINUTE_MS);
    assert_eq!(slot.note(), Some(FALLBACK_NOTE));
    assert_eq!(DEFAULT_FALLBACK_OPENING_MS, 9 * HOUR_MS);
}

#[test]
fn request_longer_than_day_falls_back() {
    let slots = suggest_slots(&[], 2000, &minutes_day());
    assert!(slots.is_fallback());
    let opening = 1440 + DEFAULT_FALLBACK_OPENING_MS;
    assert_eq!(slots[0].interval, iv(opening, opening + 2000));
}

#[test]
fn custom_fallback_opening() {
    let suggester = SlotSuggester::new(SuggestConfig::default().with_fallback_opening_ms(60));
    let slots = suggester.suggest(&[iv(0, 1440)], 30, &minutes_day());
    assert_eq!(slots[0].interval, iv(1500, 1530));
}

#[test]
fn same_day_slots_carry_no_note() {
    let slots = suggest_slots(&[iv(0, 100)], 100, &minutes_day());
    assert!(!slots.is_fallback());
    assert!(slots.iter().all(|s| s.note().is_none()));
}

// ── Degenerate input ────────────────────────────────────────────────────────

#[test]
fn non_positive_duration_suggests_nothing() {
    assert!(suggest_slots(&[iv(0, 100)], 0, &minutes_day()).is_empty());
    assert!(suggest_slots(&[iv(0, 100)], -5, &minutes_day()).is_empty());
}

#[test]
fn bookings_outside_the_day_are_tolerated() {
    // Yesterday's late booking runs into the window start.
    let bounds = DayBounds::new(1000, 2440);
    let existing = vec![iv(900, 1100), iv(1300, 1400)];
    let slots = suggest_slots(&existing, 100, &bounds);
    assert_eq!(slots[0].interval, iv(1100, 1200));
    assert!(slots.iter().all(|s| bounds.contains(&s.interval)));
}

// ── Overflow ────────────────────────────────────────────────────────────────

#[test]
fn slots_ending_past_i64_max_are_dropped() {
    let bounds = DayBounds::new(0, i64::MAX);
    let existing = vec![iv(10, 20)];
    let slots = suggest_slots(&existing, i64::MAX - 1, &bounds);
    assert!(slots.is_empty());
}

#[test]
fn fallback_near_i64_max_is_skipped() {
    let bounds = DayBounds::new(i64::MAX - 100, i64::MAX - 10);
    let existing = vec![iv(i64::MAX - 100, i64::MAX - 10)];
    let slots = suggest_slots(&existing, 50, &bounds);
    assert!(slots.is_empty());
}

#[test]
fn after_last_fits_right_up_to_i64_max() {
    let bounds = DayBounds::new(0, i64::MAX);
    let existing = vec![iv(0, i64::MAX - 30)];
    let slots = suggest_slots(&existing, 30, &bounds);
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].interval, iv(i64::MAX - 30, i64::MAX));
    assert_eq!(slots[0].placement, Placement::AfterLast);
}

#[test]
fn window_starting_at_i64_min_does_not_overflow() {
    let bounds = DayBounds::new(i64::MIN, 1_000);
    let slots = suggest_slots(&[iv(100, 200)], 50, &bounds);
    assert_eq!(slots[0].interval, iv(50, 100));
    assert_eq!(slots[0].placement, Placement::BeforeFirst);
}
