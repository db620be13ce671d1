//! Calendar-day windows and local wall-clock parsing.
//!
//! Bookings arrive as a date plus `HH:MM` clock times in the venue's timezone.
//! These helpers turn them into the absolute millisecond instants the tree and
//! suggester work on, and back again for display.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{BookingError, Result};
use crate::interval::Interval;

pub const MINUTE_MS: i64 = 60_000;
pub const HOUR_MS: i64 = 60 * MINUTE_MS;
pub const DAY_MS: i64 = 24 * HOUR_MS;

/// The window suggestions must fall inside: `[day_start, day_end]`.
///
/// `day_end` is the instant the following day begins, so a slot ending at
/// midnight still counts as same-day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DayBounds {
    pub day_start: i64,
    pub day_end: i64,
}

impl DayBounds {
    pub fn new(day_start: i64, day_end: i64) -> Self {
        Self { day_start, day_end }
    }

    pub fn try_new(day_start: i64, day_end: i64) -> Result<Self> {
        if day_start >= day_end {
            return Err(BookingError::InvalidBounds {
                start: day_start,
                end: day_end,
            });
        }
        Ok(Self::new(day_start, day_end))
    }

    /// Local midnight of `date` to local midnight of the next day in `tz`.
    ///
    /// Days shortened or stretched by a DST change keep their true length. An
    /// ambiguous midnight resolves to its earlier instant.
    pub fn for_date(date: NaiveDate, tz: Tz) -> Result<Self> {
        let next = date
            .succ_opt()
            .ok_or_else(|| BookingError::InvalidDate(date.to_string()))?;
        let day_start = local_instant(date, NaiveTime::MIN, tz)?;
        let day_end = local_instant(next, NaiveTime::MIN, tz)?;
        Self::try_new(day_start, day_end)
    }

    pub fn contains(&self, interval: &Interval) -> bool {
        interval.within(self.day_start, self.day_end)
    }

    pub fn len_ms(&self) -> i64 {
        self.day_end.saturating_sub(self.day_start)
    }
}

/// Parse a strict `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let bytes = s.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shaped {
        return Err(BookingError::InvalidDate(s.to_string()));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| BookingError::InvalidDate(s.to_string()))
}

/// Parse a strict 24-hour `HH:MM` clock time (00:00 through 23:59).
pub fn parse_clock(s: &str) -> Result<NaiveTime> {
    let invalid = || BookingError::InvalidTime(s.to_string());
    let (hh, mm) = s.split_once(':').ok_or_else(invalid)?;
    if hh.len() != 2
        || mm.len() != 2
        || !hh.bytes().chain(mm.bytes()).all(|b| b.is_ascii_digit())
    {
        return Err(invalid());
    }
    let hour: u32 = hh.parse().map_err(|_| invalid())?;
    let minute: u32 = mm.parse().map_err(|_| invalid())?;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}

/// Parse an IANA timezone name such as `Asia/Kolkata`.
pub fn parse_timezone(s: &str) -> Result<Tz> {
    s.parse().map_err(|_| BookingError::InvalidTimezone(s.to_string()))
}

/// Epoch milliseconds of a local wall-clock time.
///
/// Times repeated by a DST fall-back resolve to the earlier instant; times
/// skipped by a spring-forward are an error.
pub fn local_instant(date: NaiveDate, time: NaiveTime, tz: Tz) -> Result<i64> {
    let local = date.and_time(time);
    tz.from_local_datetime(&local)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .ok_or_else(|| BookingError::NonexistentLocalTime(format!("{local} {tz}")))
}

/// Render an instant as `HH:MM` in `tz`.
pub fn format_clock(ms: i64, tz: Tz) -> String {
    match DateTime::from_timestamp_millis(ms) {
        Some(utc) => utc.with_timezone(&tz).format("%H:%M").to_string(),
        None => String::from("--:--"),
    }
}
