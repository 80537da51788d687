//! Performance benchmarks for the decision and ordering hot paths.
//!
//! Run with: `cargo bench --bench resolve`
//!
//! Both paths run once per rendered item on every input change, so they
//! need to stay allocation-light and branch-predictable.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use catalog_gate::{
    order_items, resolve_access, AccessPolicyV1, DateNormalizer, Item, Tier, UserContext,
};
use chrono::{Duration, NaiveDate};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A mixed population: a few overrides, some future items, a long tail.
fn make_items(count: usize) -> Vec<Item> {
    let base = day(2025, 6, 14);
    (0..count)
        .map(|i| {
            let date = base - Duration::days((i % 400) as i64 - 10);
            Item::new(format!("item_{i:05}"), Some(date))
                .breaking(i % 97 == 0)
                .featured(i % 13 == 0)
        })
        .collect()
}

fn bench_resolve(c: &mut Criterion) {
    let now = day(2025, 6, 14);
    let policy = AccessPolicyV1::default();
    let items = make_items(1_000);

    let mut group = c.benchmark_group("resolve_access");
    for tier in [Tier::Guest, Tier::Free, Tier::Premium] {
        let user = UserContext::new(tier).with_completed(["item_00042", "item_00777"]);
        group.throughput(Throughput::Elements(items.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(tier), &user, |b, user| {
            b.iter(|| {
                for item in &items {
                    black_box(resolve_access(item, now, user, &policy));
                }
            });
        });
    }
    group.finish();
}

fn bench_ordering(c: &mut Criterion) {
    let mut group = c.benchmark_group("order_items");
    for size in [100usize, 1_000, 10_000] {
        let items = make_items(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &items, |b, items| {
            b.iter(|| black_box(order_items(items)));
        });
    }
    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let raw: Vec<String> = (0..365)
        .map(|i| format!("2025-{:02}-{:02}", (i % 12) + 1, (i % 28) + 1))
        .collect();

    c.bench_function("normalize_cold", |b| {
        b.iter(|| {
            let normalizer = DateNormalizer::default();
            for s in &raw {
                black_box(normalizer.normalize(s));
            }
        });
    });

    c.bench_function("normalize_warm", |b| {
        let normalizer = DateNormalizer::default();
        for s in &raw {
            normalizer.normalize(s);
        }
        b.iter(|| {
            for s in &raw {
                black_box(normalizer.normalize(s));
            }
        });
    });
}

criterion_group!(benches, bench_resolve, bench_ordering, bench_normalize);
criterion_main!(benches);
