#![allow(dead_code)]

use std::collections::BTreeMap;
use std::f64::consts::TAU;

use biosonic::features::{Channel, FeatureSet, FeatureTracks, SignalTrack};
use biosonic::io::Recording;

pub const FEATURE_RATE: f64 = 100.0;

/// Constant feature tracks. `resp_rate` is in breaths per minute.
pub fn steady_features(seconds: f64, hr: f32, eda: f32, emg: f32, resp_rate: f32) -> FeatureSet {
    let len = (seconds * FEATURE_RATE) as usize;
    FeatureSet::new(FeatureTracks {
        heart_rate: SignalTrack::constant(hr, len, FEATURE_RATE),
        eda: SignalTrack::constant(eda, len, FEATURE_RATE),
        emg: SignalTrack::constant(emg, len, FEATURE_RATE),
        resp_swell: SignalTrack::constant(0.0, len, FEATURE_RATE),
        resp_rate: SignalTrack::constant(resp_rate, len, FEATURE_RATE),
        temperature: SignalTrack::constant(0.0, len, FEATURE_RATE),
        motion: None,
    })
    .unwrap()
}

/// A 700 Hz recording with a pulse, breathing and slowly varying skin
/// signals. Each `(label, seconds)` block follows the previous one.
pub fn synthetic_recording(bpm: f64, blocks: &[(i64, f64)]) -> Recording {
    const RATE: f64 = 700.0;

    let labels: Vec<i64> = blocks
        .iter()
        .flat_map(|&(label, seconds)| std::iter::repeat(label).take((seconds * RATE) as usize))
        .collect();
    let n = labels.len();
    let t = |i: usize| i as f64 / RATE;
    let period = 60.0 / bpm;

    let ecg = (0..n)
        .map(|i| {
            let phase = (t(i) % period) - period / 2.0;
            (1.2 * (-(phase * phase) / (2.0 * 0.01f64.powi(2))).exp()) as f32
        })
        .collect();
    let eda = (0..n).map(|i| (2.0 + 0.5 * (TAU * t(i) / 40.0).sin()) as f32).collect();
    let emg = (0..n)
        .map(|i| (0.05 * (TAU * 60.0 * t(i)).sin() * (1.0 + (TAU * t(i) / 7.0).sin())) as f32)
        .collect();
    let resp = (0..n).map(|i| (TAU * 0.25 * t(i)).sin() as f32).collect();
    let temp = (0..n).map(|i| (34.0 + 0.1 * (TAU * t(i) / 60.0).sin()) as f32).collect();

    let channels = BTreeMap::from([
        (Channel::Ecg, ecg),
        (Channel::Eda, eda),
        (Channel::Emg, emg),
        (Channel::Resp, resp),
        (Channel::Temp, temp),
    ]);
    Recording::new(RATE, channels, labels).unwrap()
}
