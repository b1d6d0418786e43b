//! Benchmarks for feature extraction, scheduling and segment rendering.

use std::f32::consts::TAU;
use std::hint::black_box;

use criterion::Criterion;
use biosonic::features::{Feature, FeatureExtractor, FeatureSet, FeatureTracks, ReferenceExtractor, SignalTrack};
use biosonic::sequencing::BeatScheduler;
use biosonic::{Sonifier, SonifyConfig};

const RAW_RATE: f64 = 700.0;

fn pulse(seconds: f64, bpm: f64) -> Vec<f32> {
    let period = 60.0 / bpm;
    (0..(seconds * RAW_RATE) as usize)
        .map(|i| {
            let phase = (i as f64 / RAW_RATE % period) - period / 2.0;
            (-(phase * phase) / 2e-4).exp() as f32
        })
        .collect()
}

fn steady(seconds: f64) -> FeatureSet {
    let rate = 100.0;
    let len = (seconds * rate) as usize;
    FeatureSet::new(FeatureTracks {
        heart_rate: SignalTrack::constant(90.0, len, rate),
        eda: SignalTrack::constant(0.5, len, rate),
        emg: SignalTrack::constant(0.3, len, rate),
        resp_swell: SignalTrack::new((0..len).map(|i| (TAU * i as f32 / 400.0).sin() * 0.5 + 0.5).collect(), rate),
        resp_rate: SignalTrack::constant(12.0, len, rate),
        temperature: SignalTrack::constant(0.5, len, rate),
        motion: None,
    })
    .unwrap()
}

pub fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/pipeline");
    group.sample_size(10);

    let extractor = ReferenceExtractor::default();
    let ecg = pulse(60.0, 75.0);
    group.bench_function("heart_rate_60s", |b| {
        b.iter(|| extractor.extract(Feature::HeartRate, black_box(&ecg), RAW_RATE))
    });

    let breath: Vec<f32> = (0..ecg.len()).map(|i| (TAU * 0.25 * i as f32 / RAW_RATE as f32).sin()).collect();
    group.bench_function("resp_rate_60s", |b| {
        b.iter(|| extractor.extract(Feature::RespRate, black_box(&breath), RAW_RATE))
    });

    let config = SonifyConfig::default();
    let features = steady(60.0);
    let scheduler = BeatScheduler::new(&config).unwrap();
    group.bench_function("schedule_60s", |b| b.iter(|| scheduler.run(black_box(&features))));

    let sonifier = Sonifier::new(config.clone()).unwrap();
    group.bench_function("render_60s", |b| {
        b.iter(|| sonifier.render_features("bench", black_box(&features)))
    });

    group.finish();
}
