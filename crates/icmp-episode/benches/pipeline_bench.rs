//! Benchmarks for the segment -> attach -> deviation pipeline
//!
//! Run with: cargo bench -p icmp-episode --bench pipeline_bench

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use icmp_core::TimeSeries;
use icmp_episode::{
    DeviationDetector, DeviationParameters, EpisodeSegmenter, SegmenterParameters,
    ThresholdDetector,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn t0() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2021, 3, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Minute-resolution ICP trend with slow excursions above 20 mmHg
fn generate_icp(size: usize, seed: u64) -> TimeSeries<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut level: f64 = 15.0;
    let timestamps = (0..size as i64).map(|m| t0() + TimeDelta::minutes(m)).collect();
    let values = (0..size)
        .map(|_| {
            level = (level + rng.gen_range(-1.0..1.0)).clamp(5.0, 35.0);
            level
        })
        .collect();
    TimeSeries::new("ICP", timestamps, values).unwrap()
}

/// Sparse intervention log, roughly one entry per 40 minutes
fn generate_events(size: usize, seed: u64) -> Vec<(NaiveDateTime, u32)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..size as i64)
        .filter(|_| rng.gen_bool(0.025))
        .map(|m| (t0() + TimeDelta::minutes(m) + TimeDelta::seconds(17), 1))
        .collect()
}

fn bench_segment(c: &mut Criterion) {
    let mut group = c.benchmark_group("Segment");
    let segmenter = EpisodeSegmenter::new(SegmenterParameters::default()).unwrap();

    for size in [1_440, 10_080, 43_200] {
        let icp = generate_icp(size, 42);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("detect_above", size), &icp, |b, icp| {
            b.iter(|| segmenter.detect_above(black_box(icp), 20.0))
        });
    }

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("Pipeline");
    let segmenter = EpisodeSegmenter::new(SegmenterParameters::default()).unwrap();
    let detector = DeviationDetector::new(DeviationParameters::default()).unwrap();

    for size in [1_440, 10_080, 43_200] {
        let icp = generate_icp(size, 7);
        let events = generate_events(size, 11);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(
            BenchmarkId::new("segment_attach_deviate", size),
            &(icp, events),
            |b, (icp, events)| {
                b.iter(|| {
                    let episodes = segmenter.detect_above(black_box(icp), 20.0).unwrap();
                    let attached = episodes.attach(events.iter(), "Interventions").unwrap();
                    detector.detect(&attached)
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_segment, bench_pipeline);
criterion_main!(benches);
