//! Benchmarks for oscillator waveforms.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use biosonic::dsp::oscillator::OscillatorBlock;
use biosonic::graph::RenderCtx;

use crate::BUFFER_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BUFFER_SIZES {
        let ctx = RenderCtx::new(44_100.0, size).with_frequency(220.0);
        let mut buffer = vec![0.0f32; size];

        for (name, mut osc) in [
            ("sine", OscillatorBlock::sine()),
            ("sawtooth", OscillatorBlock::sawtooth()),
            ("square", OscillatorBlock::square()),
            ("noise", OscillatorBlock::noise()),
        ] {
            osc.reset(1);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| osc.render(black_box(&mut buffer), black_box(&ctx)))
            });
        }
    }

    group.finish();
}
