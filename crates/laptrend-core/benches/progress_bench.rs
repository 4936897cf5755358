//! # Progress Benchmarks
//!
//! Performance benchmarks for laptrend-core aggregation.
//!
//! Run with: `cargo bench -p laptrend-core`

use chrono::{Days, NaiveDate, NaiveTime};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use laptrend_core::{
    DriverId, InMemorySource, Lap, ProgressMode, Session, SessionId, TrackId, compute_progress,
    consistency,
};
use std::hint::black_box;

/// Build `size` sessions spread over four tracks, three per day.
fn create_history(size: usize) -> InMemorySource {
    let base = NaiveDate::from_ymd_opt(2023, 1, 1).expect("date");
    let sessions = (0..size)
        .map(|i| {
            let laps: Vec<Lap> = (0..20)
                .map(|n| Lap::new(n + 1, 90_000 + ((i as u64 * 37 + u64::from(n) * 113) % 2_500)))
                .collect();
            Session {
                id: SessionId::new(format!("s{i:06}")),
                driver_id: DriverId::new("bench-driver"),
                track_id: TrackId::new(format!("track-{}", i % 4)),
                date: base + Days::new((i / 3) as u64),
                start_time: NaiveTime::from_hms_opt(9 + (i % 3) as u32 * 3, 0, 0).expect("time"),
                total_time_ms: laps.iter().map(|l| l.lap_time_ms).sum(),
                best_lap_ms: None,
                laps,
            }
        })
        .collect();
    InMemorySource::with_sessions(sessions)
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_consistency(c: &mut Criterion) {
    let mut group = c.benchmark_group("consistency");

    for size in [10, 100, 1000].iter() {
        let laps: Vec<u64> = (0..*size).map(|i| 90_000 + (i as u64 * 17) % 900).collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), &laps, |b, laps| {
            b.iter(|| black_box(consistency(laps)));
        });
    }

    group.finish();
}

fn bench_overall(c: &mut Criterion) {
    let mut group = c.benchmark_group("progress_overall");
    let driver = DriverId::new("bench-driver");
    let mode = ProgressMode::Overall { range: None };

    for size in [100, 1000, 10000].iter() {
        let source = create_history(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(compute_progress(&source, &driver, &mode)));
        });
    }

    group.finish();
}

fn bench_track(c: &mut Criterion) {
    let mut group = c.benchmark_group("progress_track");
    let driver = DriverId::new("bench-driver");
    let mode = ProgressMode::Track {
        track_id: TrackId::new("track-1"),
    };

    for size in [100, 1000, 10000].iter() {
        let source = create_history(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(compute_progress(&source, &driver, &mode)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_consistency, bench_overall, bench_track);
criterion_main!(benches);
