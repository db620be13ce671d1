//! Wall-clock front end for the resolver.
//!
//! Event forms submit a calendar date plus `HH:MM` start and end times, and the
//! day's existing bookings come back from storage in the same shape. This
//! module validates that input, converts it to absolute intervals on the
//! venue's timezone, runs the check, and renders the answer back as clock
//! times.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::day::{self, DayBounds};
use crate::error::{BookingError, Result};
use crate::interval::Interval;
use crate::resolver::{ConflictResolver, Decision};
use crate::suggest::{Placement, Slot};

/// A booking already stored for the requested (day, location).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalBooking {
    /// Storage identity of the event; any JSON scalar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<Value>,
    pub start_time: String,
    pub end_time: String,
}

/// A create-event request in local wall-clock terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalRequest {
    /// `YYYY-MM-DD`.
    pub date: String,
    /// `HH:MM`, 24-hour.
    pub start_time: String,
    /// `HH:MM`, 24-hour, after `start_time`.
    pub end_time: String,
    /// IANA timezone of the venue.
    pub timezone: String,
    /// Carried through for diagnostics only; bookings are already filtered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub bookings: Vec<LocalBooking>,
}

/// A [`LocalRequest`] converted to absolute time.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRequest {
    pub requested: Interval,
    pub existing: Vec<Interval>,
    pub bounds: DayBounds,
    pub timezone: Tz,
}

impl LocalRequest {
    /// Validate and convert to absolute intervals.
    ///
    /// Every booking is placed on the requested date, whatever date storage
    /// recorded for it. Both the request and each booking must end after they
    /// start.
    pub fn resolve(&self) -> Result<ResolvedRequest> {
        let timezone = day::parse_timezone(&self.timezone)?;
        let date = day::parse_date(&self.date)?;
        let bounds = DayBounds::for_date(date, timezone)?;

        let requested = clock_interval(date, &self.start_time, &self.end_time, timezone)?;
        let existing = self
            .bookings
            .iter()
            .map(|b| {
                let interval = clock_interval(date, &b.start_time, &b.end_time, timezone)?;
                Ok(match &b.event_id {
                    Some(id) => interval.with_owner(owner_string(id)),
                    None => interval,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ResolvedRequest {
            requested,
            existing,
            bounds,
            timezone,
        })
    }

    /// Resolve and check in one go, rendering the result as clock times.
    pub fn check(&self, resolver: &ConflictResolver) -> Result<LocalDecision> {
        let resolved = self.resolve()?;
        let decision =
            resolver.check_and_suggest(&resolved.requested, &resolved.existing, &resolved.bounds);
        Ok(LocalDecision::from_decision(&decision, resolved.timezone))
    }
}

fn clock_interval(date: chrono::NaiveDate, start: &str, end: &str, tz: Tz) -> Result<Interval> {
    let low = day::local_instant(date, day::parse_clock(start)?, tz)?;
    let high = day::local_instant(date, day::parse_clock(end)?, tz)?;
    if low >= high {
        return Err(BookingError::EmptyInterval { low, high });
    }
    Ok(Interval::new(low, high))
}

fn owner_string(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl Slot {
    /// `(start, end)` as `HH:MM` in `tz`.
    pub fn local_times(&self, tz: Tz) -> (String, String) {
        (day::format_clock(self.start(), tz), day::format_clock(self.end(), tz))
    }
}

/// A suggested slot rendered as clock times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalSlot {
    pub start_time: String,
    pub end_time: String,
    pub placement: Placement,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// A conflicting booking rendered as clock times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalConflict {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    pub start_time: String,
    pub end_time: String,
}

/// [`Decision`] rendered for clients that think in clock times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LocalDecision {
    Free,
    Conflict {
        conflicts: Vec<LocalConflict>,
        suggestions: Vec<LocalSlot>,
    },
}

impl LocalDecision {
    pub fn from_decision(decision: &Decision, tz: Tz) -> Self {
        match decision {
            Decision::Free => LocalDecision::Free,
            Decision::Conflict {
                conflicts,
                suggestions,
            } => LocalDecision::Conflict {
                conflicts: conflicts
                    .iter()
                    .map(|c| LocalConflict {
                        event_id: c.owner.clone(),
                        start_time: day::format_clock(c.low, tz),
                        end_time: day::format_clock(c.high, tz),
                    })
                    .collect(),
                suggestions: suggestions
                    .iter()
                    .map(|slot| {
                        let (start_time, end_time) = slot.local_times(tz);
                        LocalSlot {
                            start_time,
                            end_time,
                            placement: slot.placement,
                            note: slot.note().map(str::to_string),
                        }
                    })
                    .collect(),
            },
        }
    }

    pub fn is_free(&self) -> bool {
        matches!(self, LocalDecision::Free)
    }
}
