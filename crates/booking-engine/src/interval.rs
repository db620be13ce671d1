//! Booked time ranges and the overlap rule they are compared under.
//!
//! Times are absolute integers (epoch milliseconds in practice). An interval is
//! written `[low, high)`, but whether two intervals that merely touch at an
//! endpoint conflict is decided by [`OverlapRule`], not by the interval itself.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{BookingError, Result};

/// One booking's busy period.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub low: i64,
    pub high: i64,
    /// Opaque identity of whatever owns the booking (an event id, usually).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

impl Interval {
    /// Build an interval without validation.
    ///
    /// Callers are expected to have rejected `low >= high` already; the tree
    /// and resolver never re-check it. Use [`Interval::try_new`] at the edge.
    pub fn new(low: i64, high: i64) -> Self {
        debug_assert!(low < high, "interval [{low}, {high}) is empty");
        Self {
            low,
            high,
            owner: None,
        }
    }

    /// Build an interval, rejecting empty/inverted ranges and negative timestamps.
    pub fn try_new(low: i64, high: i64) -> Result<Self> {
        if low < 0 {
            return Err(BookingError::NegativeTimestamp(low));
        }
        if high < 0 {
            return Err(BookingError::NegativeTimestamp(high));
        }
        if low >= high {
            return Err(BookingError::EmptyInterval { low, high });
        }
        Ok(Self::new(low, high))
    }

    /// Attach an owner identifier.
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn duration(&self) -> i64 {
        self.high - self.low
    }

    /// Whether the two intervals share time under `rule`.
    pub fn overlaps(&self, other: &Interval, rule: OverlapRule) -> bool {
        rule.overlaps(self.low, self.high, other.low, other.high)
    }

    /// Whether `self` lies entirely inside `[start, end]`.
    pub fn within(&self, start: i64, end: i64) -> bool {
        start <= self.low && self.high <= end
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.low, self.high)?;
        if let Some(owner) = &self.owner {
            write!(f, " ({owner})")?;
        }
        Ok(())
    }
}

/// How intervals that touch at an endpoint are treated.
///
/// There is deliberately no `Default`: a resolver must be told which one it
/// runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverlapRule {
    /// `a.low <= b.high && b.low <= a.high`. A booking ending at 10:00 blocks
    /// one starting at 10:00.
    Closed,
    /// `a.low < b.high && b.low < a.high`. Back-to-back bookings are allowed.
    HalfOpen,
}

impl OverlapRule {
    pub fn overlaps(self, a_low: i64, a_high: i64, b_low: i64, b_high: i64) -> bool {
        match self {
            OverlapRule::Closed => a_low <= b_high && b_low <= a_high,
            OverlapRule::HalfOpen => a_low < b_high && b_low < a_high,
        }
    }

    /// Whether a subtree whose largest `high` is `max_high` can still hold an
    /// interval overlapping a query starting at `query_low`.
    pub(crate) fn reaches(self, max_high: i64, query_low: i64) -> bool {
        match self {
            OverlapRule::Closed => max_high >= query_low,
            OverlapRule::HalfOpen => max_high > query_low,
        }
    }

    /// Whether an interval starting at `low` can still overlap a query ending at
    /// `query_high`. Everything right of a node starts at or after the node.
    pub(crate) fn starts_before(self, low: i64, query_high: i64) -> bool {
        match self {
            OverlapRule::Closed => low <= query_high,
            OverlapRule::HalfOpen => low < query_high,
        }
    }
}

impl fmt::Display for OverlapRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OverlapRule::Closed => "closed",
            OverlapRule::HalfOpen => "half-open",
        })
    }
}

impl std::str::FromStr for OverlapRule {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "closed" => Ok(OverlapRule::Closed),
            "half-open" | "half_open" | "halfopen" => Ok(OverlapRule::HalfOpen),
            other => Err(format!(
                "unknown overlap rule '{other}' (expected 'closed' or 'half-open')"
            )),
        }
    }
}
