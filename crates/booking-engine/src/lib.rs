//! # booking-engine
//!
//! Booking conflict detection for event venues, with same-day alternatives.
//!
//! Given a requested interval and the bookings already held for one
//! (day, location), the engine answers whether the request overlaps anything in
//! O(log n) using an AVL-balanced interval tree, and when it does, proposes up
//! to three free slots of the same length on the same day.
//!
//! ```rust
//! use booking_engine::{ConflictResolver, DayBounds, Interval, OverlapRule};
//!
//! let resolver = ConflictResolver::with_rule(OverlapRule::Closed);
//! let existing = vec![Interval::new(0, 100), Interval::new(300, 400)];
//! let bounds = DayBounds::new(0, 1440);
//!
//! let decision = resolver.check_and_suggest(&Interval::new(50, 150), &existing, &bounds);
//! let suggestions = decision.suggestions().unwrap();
//! assert_eq!(suggestions[0].interval, Interval::new(100, 200));
//! ```
//!
//! ## Modules
//!
//! - [`interval`] — `Interval` and the `OverlapRule` touching endpoints are judged by
//! - [`tree`] — Augmented AVL interval tree
//! - [`resolver`] — Conflict check producing a `Decision`
//! - [`suggest`] — Same-day slot suggestions with a next-day fallback
//! - [`day`] — Day bounds and wall-clock parsing on IANA timezones
//! - [`local`] — `HH:MM` request/response front end
//! - [`error`] — Error types for input validation

pub mod day;
pub mod error;
pub mod interval;
pub mod local;
pub mod resolver;
pub mod suggest;
pub mod tree;

pub use day::DayBounds;
pub use error::BookingError;
pub use interval::{Interval, OverlapRule};
pub use local::{LocalDecision, LocalRequest};
pub use resolver::{check_and_suggest, ConflictResolver, Decision, ResolverConfig};
pub use suggest::{suggest_slots, Placement, Slot, SlotSuggester, SuggestConfig, SuggestionList};
pub use tree::IntervalTree;
