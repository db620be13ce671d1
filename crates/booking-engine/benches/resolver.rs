//! Benchmarks for tree construction, overlap queries and full conflict checks.

use booking_engine::day::{DAY_MS, MINUTE_MS};
use booking_engine::{ConflictResolver, DayBounds, Interval, IntervalTree, OverlapRule};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

/// `n` back-to-back bookings spread evenly over one day, each leaving a small gap.
fn packed_day(n: i64) -> Vec<Interval> {
    let step = DAY_MS / n;
    (0..n)
        .map(|i| Interval::new(i * step, i * step + step - MINUTE_MS).with_owner(i.to_string()))
        .collect()
}

fn bench_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("interval_tree");
    for n in [16i64, 256, 1024] {
        let bookings = packed_day(n);
        group.bench_with_input(BenchmarkId::new("build", n), &bookings, |b, bookings| {
            b.iter(|| IntervalTree::from_intervals(OverlapRule::Closed, bookings.iter().cloned()))
        });

        let tree = IntervalTree::from_intervals(OverlapRule::Closed, bookings.iter().cloned());
        let query = Interval::new(DAY_MS / 2, DAY_MS / 2 + 30 * MINUTE_MS);
        group.bench_with_input(BenchmarkId::new("search_any", n), &tree, |b, tree| {
            b.iter(|| tree.search_any(black_box(&query)).is_some())
        });
    }
    group.finish();
}

fn bench_check(c: &mut Criterion) {
    let resolver = ConflictResolver::with_rule(OverlapRule::Closed);
    let bounds = DayBounds::new(0, DAY_MS);
    let bookings = packed_day(48);
    let requested = Interval::new(10 * 60 * MINUTE_MS, 11 * 60 * MINUTE_MS);

    c.bench_function("check_and_suggest/48", |b| {
        b.iter(|| resolver.check_and_suggest(black_box(&requested), &bookings, &bounds))
    });
}

criterion_group!(benches, bench_tree, bench_check);
criterion_main!(benches);
