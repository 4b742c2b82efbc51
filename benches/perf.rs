use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use boog_terminal::chart::{build_chart, extent, nice, ticks};
use boog_terminal::dataset::{Dataset, Metric};

fn synthetic_raw(players: usize, seasons: usize) -> String {
    let mut entries = Vec::with_capacity(players);
    for p in 0..players {
        let rows: Vec<String> = (0..seasons)
            .map(|s| {
                let age = 18 + s;
                let by_age = (p + 1) as f64 * 0.1 + s as f64 * 0.05;
                let cumulative = by_age * (s + 1) as f64;
                let chance = (s as f64 / seasons as f64) * 0.4;
                format!("[{age},{by_age},{cumulative},{chance:.4},{chance:.4}]")
            })
            .collect();
        entries.push(format!("\"Player {p:03}\":[{}]", rows.join(",")));
    }
    format!("{{{}}}", entries.join(","))
}

fn bench_parse(c: &mut Criterion) {
    let raw = synthetic_raw(200, 20);
    c.bench_function("dataset_parse_200x20", |b| {
        b.iter(|| Dataset::parse(black_box(&raw)).expect("parse"));
    });
}

fn bench_build_chart(c: &mut Criterion) {
    let dataset = Dataset::parse(&synthetic_raw(50, 22)).expect("parse");
    let players: Vec<String> = dataset.names().to_vec();
    c.bench_function("build_chart_50_players", |b| {
        b.iter(|| {
            build_chart(
                black_box(Metric::Cumulative),
                black_box(&dataset),
                black_box(&players),
            )
        });
    });
}

fn bench_tick_math(c: &mut Criterion) {
    let values: Vec<f64> = (0..10_000).map(|i| (i as f64 * 0.731).sin() * 42.0).collect();
    c.bench_function("extent_10k", |b| {
        b.iter(|| extent(black_box(&values).iter().copied()));
    });
    c.bench_function("nice_and_ticks", |b| {
        b.iter(|| {
            let (lo, hi) = nice(black_box(0.137), black_box(41.9), 10);
            ticks(lo, hi, 10)
        });
    });
}

criterion_group!(benches, bench_parse, bench_build_chart, bench_tick_math);
criterion_main!(benches);
