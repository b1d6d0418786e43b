//! Benchmarks for state-variable filter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use biosonic::dsp::filter::SVFilter;
use biosonic::graph::RenderCtx;

use crate::BUFFER_SIZES;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BUFFER_SIZES {
        let ctx = RenderCtx::new(44_100.0, size);
        // Sawtooth-like ramp
        let input: Vec<f32> = (0..size)
            .map(|i| ((i % 200) as f32 / 200.0) * 2.0 - 1.0)
            .collect();

        for (name, mut filter) in [
            ("lowpass", SVFilter::lowpass(1000.0)),
            ("highpass", SVFilter::highpass(1000.0)),
            ("bandpass", SVFilter::bandpass(1000.0)),
        ] {
            filter.resonance = 0.5;
            let mut buffer = input.clone();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    filter.render(black_box(&mut buffer), black_box(&ctx));
                })
            });
        }
    }

    group.finish();
}
