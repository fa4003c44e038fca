use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use classroom_analytics::algorithms::{aggregate_utilization, build_utilization_table};
use classroom_analytics::config::{ClassificationPolicy, ForecastSettings, PeakHourPolicy};
use classroom_analytics::forecasting::{build_room_series, ForecastEngine};
use classroom_analytics::{OccupancyRecord, Weekday};

/// Deterministic week of records: `rooms` rooms × 5 days × 10 hourly slots.
fn synthetic_records(rooms: usize) -> Vec<OccupancyRecord> {
    let mut records = Vec::with_capacity(rooms * 50);
    for room in 0..rooms {
        let room_id = format!("R{:03}", room);
        for day in Weekday::ALL {
            for hour in 8u8..18 {
                let occupied = (room + day.order() as usize + hour as usize) % 3 != 0;
                records.push(OccupancyRecord::new(
                    room_id.clone(),
                    day,
                    hour,
                    occupied,
                    occupied.then(|| format!("C{}", hour)),
                    None,
                ));
            }
        }
    }
    records
}

fn bench_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregation");

    for rooms in [10usize, 100, 500] {
        let records = synthetic_records(rooms);
        group.bench_with_input(BenchmarkId::new("aggregate_utilization", rooms), &records, |b, records| {
            b.iter(|| black_box(aggregate_utilization(black_box(records))));
        });

        let metrics = aggregate_utilization(&records);
        group.bench_with_input(BenchmarkId::new("utilization_table", rooms), &records, |b, records| {
            b.iter(|| {
                black_box(build_utilization_table(
                    black_box(records),
                    &metrics,
                    &ClassificationPolicy::default(),
                    &PeakHourPolicy::default(),
                ))
            });
        });
    }

    group.finish();
}

fn bench_forecasting(c: &mut Criterion) {
    let mut group = c.benchmark_group("forecasting");
    let settings = ForecastSettings::default();
    let engine = ForecastEngine::new(settings.clone()).expect("default settings are valid");

    let metrics = aggregate_utilization(&synthetic_records(1));
    let series = build_room_series(&metrics, settings.anchor_date);
    let points = series.values().next().cloned().unwrap_or_default();
    group.bench_function("forecast_room", |b| {
        b.iter(|| black_box(engine.forecast_room("R000", black_box(&points))));
    });

    for rooms in [10usize, 100] {
        let metrics = aggregate_utilization(&synthetic_records(rooms));
        group.bench_with_input(BenchmarkId::new("forecast_all", rooms), &metrics, |b, metrics| {
            b.iter(|| black_box(engine.forecast_all_blocking(black_box(metrics))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_aggregation, bench_forecasting);
criterion_main!(benches);
