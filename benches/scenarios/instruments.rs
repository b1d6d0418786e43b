//! Benchmarks for single instrument notes.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use biosonic::instruments::{InstrumentBank, InstrumentId, InstrumentParams, SynthBank};

pub fn bench_instruments(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/instruments");
    let bank = SynthBank::new(44_100, 0);
    let c_major = [261.63, 329.63, 392.00];

    let notes = [
        (InstrumentId::Kick, InstrumentParams::default()),
        (InstrumentId::Snare, InstrumentParams::default()),
        (InstrumentId::HiHat, InstrumentParams::default()),
        (InstrumentId::Piano, InstrumentParams::note(440.0)),
        (InstrumentId::PowerChord, InstrumentParams::chord("C", &c_major).with_intensity(0.5)),
        (InstrumentId::ChordPad, InstrumentParams::chord("C", &c_major)),
        (InstrumentId::BreathPad, InstrumentParams::chord("C", &c_major).with_intensity(0.5)),
        (InstrumentId::WarmthDrone, InstrumentParams::default().with_intensity(0.5)),
    ];

    for (id, params) in notes {
        let duration = id.natural_duration_ms();
        group.bench_with_input(BenchmarkId::new(id.to_string(), duration as u64), &params, |b, params| {
            b.iter(|| bank.render(black_box(id), black_box(params), duration))
        });
    }

    group.finish();
}
