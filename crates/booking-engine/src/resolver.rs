//! Booking conflict check with alternative suggestions.
//!
//! Every check builds its own [`IntervalTree`] from the caller's booking
//! snapshot and drops it afterwards. The bookings belong to the persistence
//! layer and can change between calls, so nothing is cached here.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::day::DayBounds;
use crate::interval::{Interval, OverlapRule};
use crate::suggest::{SlotSuggester, SuggestConfig, SuggestionList};
use crate::tree::IntervalTree;

/// Resolver settings. The overlap rule has to be chosen explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    pub overlap: OverlapRule,
    #[serde(default)]
    pub suggest: SuggestConfig,
}

impl ResolverConfig {
    pub fn new(overlap: OverlapRule) -> Self {
        Self {
            overlap,
            suggest: SuggestConfig::default(),
        }
    }

    pub fn with_suggest(mut self, suggest: SuggestConfig) -> Self {
        self.suggest = suggest;
        self
    }
}

/// Outcome of a conflict check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Decision {
    /// Nothing booked overlaps the request.
    Free,
    /// The request overlaps at least one booking.
    Conflict {
        /// Every booking the request overlaps, in start order.
        conflicts: Vec<Interval>,
        suggestions: SuggestionList,
    },
}

impl Decision {
    pub fn is_free(&self) -> bool {
        matches!(self, Decision::Free)
    }

    pub fn is_conflict(&self) -> bool {
        !self.is_free()
    }

    pub fn conflicts(&self) -> &[Interval] {
        match self {
            Decision::Free => &[],
            Decision::Conflict { conflicts, .. } => conflicts,
        }
    }

    pub fn suggestions(&self) -> Option<&SuggestionList> {
        match self {
            Decision::Free => None,
            Decision::Conflict { suggestions, .. } => Some(suggestions),
        }
    }
}

/// Decides whether a requested interval fits a day's bookings.
#[derive(Debug, Clone, Copy)]
pub struct ConflictResolver {
    config: ResolverConfig,
}

impl ConflictResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// Resolver with the given overlap rule and default suggestion settings.
    pub fn with_rule(overlap: OverlapRule) -> Self {
        Self::new(ResolverConfig::new(overlap))
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Check `requested` against `existing` and, on conflict, suggest
    /// alternatives of the same duration inside `bounds`.
    ///
    /// `existing` is expected to hold one (day, location) partition's bookings.
    /// Calling this twice with the same arguments gives the same decision.
    pub fn check_and_suggest(
        &self,
        requested: &Interval,
        existing: &[Interval],
        bounds: &DayBounds,
    ) -> Decision {
        let tree = IntervalTree::from_intervals(self.config.overlap, existing.iter().cloned());
        trace!(nodes = tree.len(), height = tree.height(), "built interval tree");

        let Some(hit) = tree.search_any(requested) else {
            debug!(
                %requested,
                bookings = existing.len(),
                rule = %self.config.overlap,
                "requested interval is free"
            );
            return Decision::Free;
        };

        let conflicts: Vec<Interval> = tree.search_all(requested).cloned().collect();
        let suggestions =
            SlotSuggester::new(self.config.suggest).suggest(existing, requested.duration(), bounds);

        debug!(
            %requested,
            %hit,
            bookings = existing.len(),
            conflicts = conflicts.len(),
            suggestions = suggestions.len(),
            fallback = suggestions.is_fallback(),
            rule = %self.config.overlap,
            "requested interval conflicts"
        );

        Decision::Conflict {
            conflicts,
            suggestions,
        }
    }
}

/// One-shot check with default suggestion settings.
pub fn check_and_suggest(
    overlap: OverlapRule,
    requested: &Interval,
    existing: &[Interval],
    bounds: &DayBounds,
) -> Decision {
    ConflictResolver::with_rule(overlap).check_and_suggest(requested, existing, bounds)
}
