//! Alternative slot suggestions for a request that conflicts.
//!
//! Sorts the day's bookings by start and walks them once, proposing a slot of
//! the requested duration right before the first booking, at the start of each
//! gap wide enough to hold it, and right after the last booking. When none of
//! these fit inside the day, a single next-morning slot is proposed instead.
//!
//! Suggested slots abut the bookings around them. They are disjoint from every
//! booking in the half-open sense: they share no stretch of time with one, but
//! may share an endpoint.

use std::ops::Deref;

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::day::{DayBounds, HOUR_MS};
use crate::interval::Interval;

/// Maximum number of same-day suggestions returned by default.
pub const DEFAULT_MAX_SUGGESTIONS: usize = 3;

/// Default offset of the next-day fallback from the end of the requested day.
pub const DEFAULT_FALLBACK_OPENING_MS: i64 = 9 * HOUR_MS;

/// Message attached to the next-day fallback slot.
pub const FALLBACK_NOTE: &str = "No slots available on requested date; try next day";

/// Tunables for [`SlotSuggester`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestConfig {
    /// Cap on the number of same-day slots.
    pub max_suggestions: usize,
    /// Where the fallback slot starts, measured from `DayBounds::day_end`.
    ///
    /// With `day_end` at the next local midnight the default lands on 09:00,
    /// unless a DST change falls in between, in which case the wall-clock hour
    /// moves with it.
    pub fallback_opening_ms: i64,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            fallback_opening_ms: DEFAULT_FALLBACK_OPENING_MS,
        }
    }
}

impl SuggestConfig {
    pub fn with_max_suggestions(mut self, max_suggestions: usize) -> Self {
        self.max_suggestions = max_suggestions;
        self
    }

    pub fn with_fallback_opening_ms(mut self, fallback_opening_ms: i64) -> Self {
        self.fallback_opening_ms = fallback_opening_ms;
        self
    }
}

/// Where a suggested slot sits relative to the day's bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Ends where the first booking of the day starts (or opens the day when
    /// nothing is booked).
    BeforeFirst,
    /// Starts where a booking ends, with room before the next one.
    Gap,
    /// Starts where the last booking ends.
    AfterLast,
    /// Degraded next-morning suggestion. Never checked against that day's
    /// bookings.
    NextDay,
}

/// A suggested interval of the requested duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    #[serde(flatten)]
    pub interval: Interval,
    pub placement: Placement,
}

impl Slot {
    /// `None` when `low + duration` does not fit in an `i64`.
    fn new(low: i64, duration: i64, placement: Placement) -> Option<Self> {
        let high = low.checked_add(duration)?;
        Some(Self {
            interval: Interval::new(low, high),
            placement,
        })
    }

    pub fn start(&self) -> i64 {
        self.interval.low
    }

    pub fn end(&self) -> i64 {
        self.interval.high
    }

    pub fn is_fallback(&self) -> bool {
        self.placement == Placement::NextDay
    }

    /// Human-readable caveat, present only on the fallback slot.
    pub fn note(&self) -> Option<&'static str> {
        self.is_fallback().then_some(FALLBACK_NOTE)
    }
}

/// Suggested slots, earliest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SuggestionList(Vec<Slot>);

impl SuggestionList {
    pub fn as_slice(&self) -> &[Slot] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Slot> {
        self.0
    }

    /// True when the list holds only the next-day fallback.
    pub fn is_fallback(&self) -> bool {
        matches!(self.0.as_slice(), [only] if only.is_fallback())
    }
}

impl Deref for SuggestionList {
    type Target = [Slot];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl IntoIterator for SuggestionList {
    type Item = Slot;
    type IntoIter = std::vec::IntoIter<Slot>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a SuggestionList {
    type Item = &'a Slot;
    type IntoIter = std::slice::Iter<'a, Slot>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Proposes free slots of a fixed duration within one day.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlotSuggester {
    config: SuggestConfig,
}

impl SlotSuggester {
    pub fn new(config: SuggestConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SuggestConfig {
        &self.config
    }

    /// Suggest up to `max_suggestions` slots of length `duration` inside
    /// `bounds` that avoid every interval in `existing`.
    ///
    /// `existing` may be in any order and may contain overlapping bookings.
    /// When no same-day slot fits, the result is the single next-day fallback.
    /// A non-positive `duration` yields an empty list.
    /// Candidates whose end would overflow an `i64` are dropped, the fallback
    /// included.
    pub fn suggest(
        &self,
        existing: &[Interval],
        duration: i64,
        bounds: &DayBounds,
    ) -> SuggestionList {
        if duration <= 0 {
            warn!(duration, "refusing to suggest slots for a non-positive duration");
            return SuggestionList::default();
        }
        let cap = self.config.max_suggestions;
        if cap == 0 {
            return SuggestionList::default();
        }

        let mut sorted: Vec<&Interval> = existing.iter().collect();
        sorted.sort_by_key(|i| (i.low, i.high));

        let mut slots = Vec::with_capacity(cap.min(DEFAULT_MAX_SUGGESTIONS));
        let offer = |slots: &mut Vec<Slot>, low: i64, placement: Placement| {
            if slots.len() >= cap {
                return;
            }
            let Some(slot) = Slot::new(low, duration, placement) else {
                trace!(low, duration, ?placement, "candidate end overflows");
                return;
            };
            if bounds.contains(&slot.interval) {
                trace!(low, high = slot.end(), ?placement, "suggesting slot");
                slots.push(slot);
            } else {
                trace!(low, high = slot.end(), ?placement, "candidate falls outside the day");
            }
        };

        match sorted.split_first() {
            None => offer(&mut slots, bounds.day_start, Placement::BeforeFirst),
            Some((first, rest)) => {
                if first.low.saturating_sub(bounds.day_start) >= duration {
                    let low = bounds.day_start.max(first.low.saturating_sub(duration));
                    offer(&mut slots, low, Placement::BeforeFirst);
                }

                // A booking can end after the ones sorted behind it, so gaps
                // open from the latest end seen so far.
                let mut busy_until = first.high;
                for next in rest {
                    if slots.len() >= cap {
                        break;
                    }
                    let low = busy_until.max(bounds.day_start);
                    if next.low.saturating_sub(low) >= duration {
                        offer(&mut slots, low, Placement::Gap);
                    }
                    busy_until = busy_until.max(next.high);
                }

                offer(&mut slots, busy_until.max(bounds.day_start), Placement::AfterLast);
            }
        }

        if slots.is_empty() {
            let low = bounds.day_end.saturating_add(self.config.fallback_opening_ms);
            match Slot::new(low, duration, Placement::NextDay) {
                Some(slot) => {
                    trace!(low, "no same-day room, falling back to the next day");
                    slots.push(slot);
                }
                None => warn!(low, duration, "next-day fallback overflows, suggesting nothing"),
            }
        }

        SuggestionList(slots)
    }
}

/// Suggest slots with the default [`SuggestConfig`].
pub fn suggest_slots(existing: &[Interval], duration: i64, bounds: &DayBounds) -> SuggestionList {
    SlotSuggester::default().suggest(existing, duration, bounds)
}
