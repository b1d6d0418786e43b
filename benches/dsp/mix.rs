//! Benchmarks for summing and peak normalization.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use biosonic::dsp::mix::{normalize_to, sum_in_place};

use crate::BUFFER_SIZES;

pub fn bench_mix(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/mix");

    for &size in BUFFER_SIZES {
        let a: Vec<f32> = (0..size).map(|i| (i as f32 * 0.01).sin()).collect();
        let b: Vec<f32> = (0..size).map(|i| (i as f32 * 0.02).cos()).collect();

        let mut sum = a.clone();
        group.bench_with_input(BenchmarkId::new("sum", size), &size, |bench, _| {
            bench.iter(|| {
                sum.copy_from_slice(&a);
                sum_in_place(black_box(&mut sum), black_box(&b));
            })
        });

        let mut level = a.clone();
        group.bench_with_input(BenchmarkId::new("normalize", size), &size, |bench, _| {
            bench.iter(|| {
                level.copy_from_slice(&a);
                normalize_to(black_box(&mut level), 0.9);
            })
        });
    }

    group.finish();
}
