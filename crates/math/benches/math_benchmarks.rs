//! Benchmarks for gridlag-math kernels.
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use gridlag_math::{ewma, fourier_terms, rolling, seasonal_rolling};
use gridlag_primitives::AggKind;
use rand::Rng;

/// One year of half-hourly readings.
const YEAR_HALF_HOURS: usize = 48 * 365;

fn random_series(n: usize) -> Vec<Option<f64>> {
    let mut rng = rand::thread_rng();
    (0..n).map(|_| Some(rng.r#gen::<f64>() * 2.0)).collect()
}

fn bench_rolling(c: &mut Criterion) {
    let mut group = c.benchmark_group("rolling");
    let data = random_series(YEAR_HALF_HOURS);
    group.throughput(Throughput::Elements(YEAR_HALF_HOURS as u64));

    for kind in AggKind::ALL {
        for window in [3, 48, 336] {
            group.bench_with_input(
                BenchmarkId::new(kind.as_str(), window),
                &window,
                |b, &window| {
                    b.iter(|| rolling(black_box(&data), black_box(window), 1, kind).unwrap());
                },
            );
        }
    }

    group.finish();
}

fn bench_seasonal_rolling(c: &mut Criterion) {
    let mut group = c.benchmark_group("seasonal_rolling");
    let data = random_series(YEAR_HALF_HOURS);
    group.throughput(Throughput::Elements(YEAR_HALF_HOURS as u64));

    for (period, window) in [(48, 3), (48, 7), (336, 4)] {
        group.bench_with_input(
            BenchmarkId::new("period_window", format!("{period}_{window}")),
            &(period, window),
            |b, &(period, window)| {
                b.iter(|| {
                    seasonal_rolling(black_box(&data), period, window, 1, AggKind::Std).unwrap()
                });
            },
        );
    }

    group.finish();
}

fn bench_ewma(c: &mut Criterion) {
    let mut group = c.benchmark_group("ewma");

    for size in [1_000, 10_000, YEAR_HALF_HOURS] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let data = random_series(size);
            b.iter(|| ewma(black_box(&data), black_box(0.1), 1).unwrap());
        });
    }

    group.finish();
}

fn bench_fourier(c: &mut Criterion) {
    let hours: Vec<Option<f64>> = (0..YEAR_HALF_HOURS).map(|i| Some(((i / 2) % 24) as f64)).collect();

    c.bench_function("fourier_hour_3_terms", |b| {
        b.iter(|| fourier_terms(black_box(&hours), 24.0, 3).unwrap());
    });
}

criterion_group!(benches, bench_rolling, bench_seasonal_rolling, bench_ewma, bench_fourier);

criterion_main!(benches);
