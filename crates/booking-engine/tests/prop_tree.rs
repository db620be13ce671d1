//! Property-based tests for interval tree queries using proptest.
//!
//! Every query is checked against a brute-force scan of the same intervals,
//! under both overlap rules.

use booking_engine::{ConflictResolver, DayBounds, Interval, IntervalTree, OverlapRule};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Intervals on a small axis so that overlaps and shared endpoints are common.
fn arb_interval() -> impl Strategy<Value = Interval> {
    (0i64..1_000, 1i64..120).prop_map(|(low, len)| Interval::new(low, low + len))
}

fn arb_intervals() -> impl Strategy<Value = Vec<Interval>> {
    prop::collection::vec(arb_interval(), 0..120)
}

fn arb_rule() -> impl Strategy<Value = OverlapRule> {
    prop_oneof![Just(OverlapRule::Closed), Just(OverlapRule::HalfOpen)]
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

fn brute_force<'a>(set: &'a [Interval], query: &Interval, rule: OverlapRule) -> Vec<&'a Interval> {
    set.iter().filter(|i| i.overlaps(query, rule)).collect()
}

// ---------------------------------------------------------------------------
// Property 1: search_any has neither false negatives nor false positives
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn search_any_agrees_with_scan(
        set in arb_intervals(),
        query in arb_interval(),
        rule in arb_rule(),
    ) {
        let tree = IntervalTree::from_intervals(rule, set.iter().cloned());
        let expected = brute_force(&set, &query, rule);

        match tree.search_any(&query) {
            Some(hit) => {
                prop_assert!(hit.overlaps(&query, rule), "{} does not overlap {}", hit, query);
                prop_assert!(!expected.is_empty());
            }
            None => prop_assert!(expected.is_empty(), "missed {:?}", expected),
        }
    }
}

// ---------------------------------------------------------------------------
// Property 2: search_all returns exactly the overlapping set, in low order
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn search_all_matches_scan(
        set in arb_intervals(),
        query in arb_interval(),
        rule in arb_rule(),
    ) {
        let tree = IntervalTree::from_intervals(rule, set.iter().cloned());

        let found: Vec<&Interval> = tree.search_all(&query).collect();
        prop_assert!(found.windows(2).all(|w| w[0].low <= w[1].low));

        let mut found: Vec<(i64, i64)> = found.iter().map(|i| (i.low, i.high)).collect();
        let mut expected: Vec<(i64, i64)> = brute_force(&set, &query, rule)
            .iter()
            .map(|i| (i.low, i.high))
            .collect();
        found.sort_unstable();
        expected.sort_unstable();
        prop_assert_eq!(found, expected);
    }
}

// ---------------------------------------------------------------------------
// Property 3: in-order traversal is sorted and complete
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn iter_is_sorted_and_complete(set in arb_intervals()) {
        let tree = IntervalTree::from_intervals(OverlapRule::Closed, set.iter().cloned());
        let lows: Vec<i64> = tree.iter().map(|i| i.low).collect();
        prop_assert_eq!(lows.len(), set.len());
        prop_assert!(lows.windows(2).all(|w| w[0] <= w[1]));
        prop_assert_eq!(tree.max_high(), set.iter().map(|i| i.high).max());
    }
}

// ---------------------------------------------------------------------------
// Property 4: the decision does not depend on booking order
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn decision_is_order_independent(
        set in arb_intervals(),
        query in arb_interval(),
        rule in arb_rule(),
        seed in any::<u64>(),
    ) {
        let mut shuffled = set.clone();
        // Deterministic Fisher-Yates driven by the seed.
        let mut state = seed | 1;
        for i in (1..shuffled.len()).rev() {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let j = (state % (i as u64 + 1)) as usize;
            shuffled.swap(i, j);
        }

        let bounds = DayBounds::new(0, 1_200);
        let resolver = ConflictResolver::with_rule(rule);
        let a = resolver.check_and_suggest(&query, &set, &bounds);
        let b = resolver.check_and_suggest(&query, &shuffled, &bounds);
        prop_assert_eq!(a.is_free(), b.is_free());
        prop_assert_eq!(a.suggestions(), b.suggestions());
        prop_assert_eq!(a.conflicts().len(), b.conflicts().len());
    }
}
