//! Resolution and evaluation hot-path benchmarks.
//!
//! - Table lookup across table sizes
//! - Full evaluate cycle on a headless element, with and without a swap
//!
//! Run with: cargo bench -p rclass-core --bench resolve_bench

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rclass_core::headless::HeadlessElement;
use rclass_core::{BreakpointConfig, BreakpointTable, Watcher, WatcherOptions};
use std::hint::black_box;

fn table_of(size: u32) -> BreakpointTable {
    let config: BreakpointConfig = (0..size)
        .map(|i| (format!("tier-{i}"), f64::from(i * 120)))
        .collect();
    BreakpointTable::build(&config).expect("bench config is valid")
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    for size in [1u32, 4, 16, 64] {
        let table = table_of(size);
        let top = f64::from(size * 120);
        group.bench_with_input(BenchmarkId::from_parameter(size), &table, |b, table| {
            let mut width = 0.0;
            b.iter(|| {
                width = (width + 37.0) % (top + 100.0);
                black_box(table.resolve_index(black_box(width)))
            });
        });
    }
    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");

    let element = HeadlessElement::with_width(700.0);
    let mut steady = Watcher::new(element, &WatcherOptions::default()).expect("defaults");
    steady.activate();
    group.bench_function("no_swap", |b| {
        b.iter(|| black_box(steady.evaluate().is_some()));
    });

    let element = HeadlessElement::with_width(100.0);
    let mut flipping = Watcher::new(element.clone(), &WatcherOptions::default()).expect("defaults");
    flipping.activate();
    let mut wide = false;
    group.bench_function("swap", |b| {
        b.iter(|| {
            wide = !wide;
            element.set_width(if wide { 1500.0 } else { 100.0 });
            element.clear_mutations();
            black_box(flipping.evaluate().is_some())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_resolve, bench_evaluate);
criterion_main!(benches);
