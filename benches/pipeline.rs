use criterion::{black_box, criterion_group, criterion_main, Criterion};
use polars::prelude::*;
use yycrain::quadrant_totals;

const GAUGE_COUNT: usize = 40;

fn synthetic_readings(rows: usize) -> DataFrame {
    let channels: Vec<String> = (0..rows).map(|i| ((i % GAUGE_COUNT) + 1).to_string()).collect();
    let names: Vec<String> = (0..rows)
        .map(|i| format!("Gauge {}", (i % GAUGE_COUNT) + 1))
        .collect();
    let years: Vec<String> = (0..rows).map(|i| (1990 + (i % 32)).to_string()).collect();
    let rainfall: Vec<String> = (0..rows).map(|i| format!("{}.5", i % 300)).collect();
    df!(
        "channel" => channels,
        "name" => names,
        "year" => years,
        "rainfall" => rainfall,
    )
    .unwrap()
}

fn synthetic_gauges() -> DataFrame {
    let channels: Vec<String> = (1..=GAUGE_COUNT).map(|i| i.to_string()).collect();
    let names: Vec<String> = (1..=GAUGE_COUNT).map(|i| format!("Gauge {}", i)).collect();
    let quadrants: Vec<&str> = (0..GAUGE_COUNT).map(|i| ["NW", "NE", "SW", "SE"][i % 4]).collect();
    df!(
        "channel" => channels,
        "name" => names,
        "quadrant" => quadrants,
    )
    .unwrap()
}

fn boundary_keys() -> DataFrame {
    df!(
        "quadrant" => ["NW", "NE", "SW", "SE"],
        "quadrant_status" => ["active", "active", "active", "active"],
    )
    .unwrap()
}

fn bench_pipeline(c: &mut Criterion) {
    let readings = synthetic_readings(10_000);
    let gauges = synthetic_gauges();
    let keys = boundary_keys();

    c.bench_function("quadrant_totals_10k", |b| {
        b.iter(|| {
            quadrant_totals(
                black_box(readings.clone().lazy()),
                gauges.clone().lazy(),
                keys.clone().lazy(),
            )
            .collect()
            .unwrap()
        })
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
