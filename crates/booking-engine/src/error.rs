//! Error types for booking-engine boundary operations.
//!
//! The tree, resolver and suggester never fail. Only the constructors that turn
//! caller input into intervals and day bounds return these.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    #[error("Empty interval: low {low} must be before high {high}")]
    EmptyInterval { low: i64, high: i64 },

    #[error("Negative timestamp: {0}")]
    NegativeTimestamp(i64),

    #[error("Invalid day bounds: start {start} must be before end {end}")]
    InvalidBounds { start: i64, end: i64 },

    #[error("Invalid date (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),

    #[error("Invalid time (expected HH:MM): {0}")]
    InvalidTime(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Local time does not exist: {0}")]
    NonexistentLocalTime(String),
}

pub type Result<T> = std::result::Result<T, BookingError>;
