//! Benchmarks for the fade envelope.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use biosonic::dsp::Fade;
use biosonic::graph::RenderCtx;

use crate::BUFFER_SIZES;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BUFFER_SIZES {
        let ctx = RenderCtx::new(44_100.0, size);
        let mut buffer = vec![0.0f32; size];

        let mut fade = Fade::new(0.1, 0.5);
        group.bench_with_input(BenchmarkId::new("fade", size), &size, |b, _| {
            b.iter(|| {
                fade.note_on(&ctx);
                fade.render(black_box(&mut buffer), black_box(&ctx));
            })
        });
    }

    group.finish();
}
