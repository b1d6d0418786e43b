//! Reference feature extractors.
//!
//! Every extractor keeps the output aligned with its input: sample `i` of a
//! derived track describes the same instant as sample `i` of the raw channel.

use serde::{Deserialize, Serialize};
use rustfft::{num_complex::Complex, FftPlanner};

use super::{track::normalize, Channel, Feature, SignalTrack};
use crate::dsp::filter::SVFilter;
use crate::error::FeatureUnavailable;

/// Raw channel → derived track.
pub trait FeatureExtractor {
    fn extract(
        &self,
        feature: Feature,
        raw: &[f32],
        sample_rate: f64,
    ) -> Result<SignalTrack, FeatureUnavailable>;
}

/// Tuning for extraction and for the snapshot windows read by the scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Floor for min–max denominators.
    pub epsilon: f32,
    /// Temperature mapped to 0.0 (°C).
    pub temp_min_c: f32,
    /// Temperature mapped to 1.0 (°C).
    pub temp_max_c: f32,
    /// Seconds of history before the trailing respiration mean is trusted.
    pub resp_warmup_s: f64,
    /// Breaths/min reported during warm-up.
    pub resp_default_bpm: f32,
    /// Forward window averaged for the temperature value.
    pub temp_window_s: f64,
    /// Analysis window for the respiration-rate FFT.
    pub resp_rate_window_s: f64,
    /// Breathing band searched by the FFT, in Hz.
    pub resp_band_hz: (f32, f32),
    pub emg_smoothing_ms: f64,
    pub motion_smoothing_ms: f64,
    pub ecg_refractory_ms: f64,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            epsilon: 1e-6,
            temp_min_c: 30.0,
            temp_max_c: 37.0,
            resp_warmup_s: 5.0,
            resp_default_bpm: 15.0,
            temp_window_s: 1.0,
            resp_rate_window_s: 10.0,
            resp_band_hz: (0.1, 0.7),
            emg_smoothing_ms: 100.0,
            motion_smoothing_ms: 250.0,
            ecg_refractory_ms: 250.0,
        }
    }
}

/// Filter-and-normalize extractors for every [`Feature`].
#[derive(Debug, Clone, Default)]
pub struct ReferenceExtractor {
    config: FeatureConfig,
}

impl ReferenceExtractor {
    pub fn new(config: FeatureConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    fn heart_rate(&self, raw: &[f32], rate: f64) -> Result<Vec<f32>, FeatureUnavailable> {
        let peaks = detect_r_peaks(raw, rate, self.config.ecg_refractory_ms);
        if peaks.len() < 2 {
            return Err(FeatureUnavailable::new(
                Channel::Ecg,
                format!("found {} R-peaks, need at least 2", peaks.len()),
            ));
        }
        Ok(hold_rate_between_peaks(&peaks, raw.len(), rate))
    }

    fn emg_amplitude(&self, raw: &[f32], rate: f64) -> Vec<f32> {
        let mean = mean(raw);
        let rectified: Vec<f32> = raw.iter().map(|&s| (s - mean).abs()).collect();
        let smoothed = moving_average(&rectified, window_len(self.config.emg_smoothing_ms, rate));
        normalize(&smoothed, self.config.epsilon)
    }

    fn eda_level(&self, raw: &[f32], rate: f64) -> Vec<f32> {
        let cleaned = lowpass(raw, 3.0, rate);
        normalize(&cleaned, self.config.epsilon)
    }

    fn resp_swell(&self, raw: &[f32], rate: f64) -> Vec<f32> {
        let cleaned = lowpass(raw, 1.0, rate);
        normalize(&cleaned, self.config.epsilon)
    }

    fn resp_rate(&self, raw: &[f32], rate: f64) -> Result<Vec<f32>, FeatureUnavailable> {
        let (lo, hi) = self.config.resp_band_hz;
        if !(lo > 0.0 && hi > lo) {
            return Err(FeatureUnavailable::new(
                Channel::Resp,
                format!("breathing band {lo}..{hi} Hz is empty"),
            ));
        }
        Ok(sliding_dominant_rate(
            raw,
            rate,
            self.config.resp_rate_window_s,
            (lo, hi),
            self.config.resp_default_bpm,
        ))
    }

    fn temperature(&self, raw: &[f32]) -> Vec<f32> {
        let span = (self.config.temp_max_c - self.config.temp_min_c).max(self.config.epsilon);
        raw.iter()
            .map(|&t| ((t - self.config.temp_min_c) / span).clamp(0.0, 1.0))
            .collect()
    }

    fn motion(&self, raw: &[f32], rate: f64) -> Vec<f32> {
        let mean = mean(raw);
        let deviation: Vec<f32> = raw.iter().map(|&s| (s - mean).abs()).collect();
        let smoothed = moving_average(&deviation, window_len(self.config.motion_smoothing_ms, rate));
        normalize(&smoothed, self.config.epsilon)
    }
}

impl FeatureExtractor for ReferenceExtractor {
    fn extract(
        &self,
        feature: Feature,
        raw: &[f32],
        sample_rate: f64,
    ) -> Result<SignalTrack, FeatureUnavailable> {
        let channel = feature.channel();
        if raw.is_empty() {
            return Err(FeatureUnavailable::new(channel, "no samples"));
        }
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(FeatureUnavailable::new(
                channel,
                format!("invalid sampling rate {sample_rate}"),
            ));
        }
        if let Some(index) = raw.iter().position(|s| !s.is_finite()) {
            return Err(FeatureUnavailable::new(
                channel,
                format!("non-finite sample at index {index}"),
            ));
        }

        let samples = match feature {
            Feature::HeartRate => self.heart_rate(raw, sample_rate)?,
            Feature::EdaLevel => self.eda_level(raw, sample_rate),
            Feature::EmgAmplitude => self.emg_amplitude(raw, sample_rate),
            Feature::RespSwell => self.resp_swell(raw, sample_rate),
            Feature::RespRate => self.resp_rate(raw, sample_rate)?,
            Feature::Temperature => self.temperature(raw),
            Feature::Motion => self.motion(raw, sample_rate),
        };

        debug_assert_eq!(samples.len(), raw.len());
        Ok(SignalTrack::new(samples, sample_rate))
    }
}

fn mean(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    (samples.iter().map(|&s| s as f64).sum::<f64>() / samples.len() as f64) as f32
}

fn window_len(ms: f64, rate: f64) -> usize {
    ((ms * rate / 1000.0).round() as usize).max(1)
}

fn lowpass(raw: &[f32], cutoff_hz: f32, rate: f64) -> Vec<f32> {
    let mut buffer = raw.to_vec();
    // Start the filter settled on the first sample so the output has no
    // onset ramp from zero.
    let offset = buffer.first().copied().unwrap_or(0.0);
    buffer.iter_mut().for_each(|s| *s -= offset);
    SVFilter::lowpass(cutoff_hz).process(&mut buffer, rate as f32);
    buffer.iter_mut().for_each(|s| *s += offset);
    buffer
}

/// Centered moving average, same length as the input.
fn moving_average(samples: &[f32], window: usize) -> Vec<f32> {
    let n = samples.len();
    let mut prefix = Vec::with_capacity(n + 1);
    prefix.push(0.0f64);
    for &s in samples {
        let last = prefix.last().copied().unwrap_or(0.0);
        prefix.push(last + s as f64);
    }

    let half = window / 2;
    (0..n)
        .map(|i| {
            let start = i.saturating_sub(half);
            let end = (i + window - half).min(n);
            ((prefix[end] - prefix[start]) / (end - start) as f64) as f32
        })
        .collect()
}

/*
R-peak detection
================

  raw ECG ──→ HP 5 Hz ──→ LP 15 Hz ──→ slope² ──→ 150 ms integration ──→ peaks

The QRS complex carries most of its energy between 5 and 15 Hz; the band
limit drops baseline wander and mains hum. Squaring the slope turns every
QRS into one positive bump, and the integration window merges its lobes.

Peak picking follows the classic adaptive scheme: a running "signal" level
and "noise" level are updated from every local maximum, and the threshold
sits a quarter of the way from noise to signal. A candidate inside the
refractory period of the previous R-peak replaces it only if it is taller.
*/

fn detect_r_peaks(raw: &[f32], rate: f64, refractory_ms: f64) -> Vec<usize> {
    let mut band = raw.to_vec();
    let offset = mean(&band);
    band.iter_mut().for_each(|s| *s -= offset);
    SVFilter::highpass(5.0).process(&mut band, rate as f32);
    SVFilter::lowpass(15.0).process(&mut band, rate as f32);

    let mut energy = vec![0.0f32; band.len()];
    for i in 1..band.len() {
        let slope = band[i] - band[i - 1];
        energy[i] = slope * slope;
    }
    let energy = moving_average(&energy, window_len(150.0, rate));

    let training = window_len(2_000.0, rate).min(energy.len());
    let max_training = energy[..training].iter().fold(0.0f32, |acc, &e| acc.max(e));
    let mut signal_level = max_training / 3.0;
    let mut noise_level = mean(&energy[..training]) / 2.0;
    let refractory = window_len(refractory_ms, rate);

    let mut peaks: Vec<usize> = Vec::new();
    for i in 1..energy.len().saturating_sub(1) {
        let value = energy[i];
        if !(value > energy[i - 1] && value >= energy[i + 1]) {
            continue;
        }

        let threshold = noise_level + 0.25 * (signal_level - noise_level);
        if value <= threshold {
            noise_level = 0.125 * value + 0.875 * noise_level;
            continue;
        }

        match peaks.last_mut() {
            Some(last) if i - *last < refractory => {
                if value > energy[*last] {
                    *last = i;
                }
            }
            _ => peaks.push(i),
        }
        signal_level = 0.125 * value + 0.875 * signal_level;
    }

    peaks
}

/// 60 / RR for each interval, held from one peak to the next; the edges take
/// the nearest interval's rate.
fn hold_rate_between_peaks(peaks: &[usize], len: usize, rate: f64) -> Vec<f32> {
    let mut out = vec![0.0f32; len];
    let bpm_of = |a: usize, b: usize| (60.0 * rate / (b - a) as f64) as f32;

    let first = bpm_of(peaks[0], peaks[1]);
    out[..peaks[0]].fill(first);

    for pair in peaks.windows(2) {
        let bpm = bpm_of(pair[0], pair[1]);
        out[pair[0]..pair[1]].fill(bpm);
    }

    let last_peak = peaks[peaks.len() - 1];
    let last = bpm_of(peaks[peaks.len() - 2], last_peak);
    out[last_peak..].fill(last);
    out
}

/// Breaths per minute from the dominant spectral peak of a sliding window.
///
/// The estimate is refreshed once per second of signal and held in between.
/// A window with no energy in the band keeps the previous estimate.
fn sliding_dominant_rate(
    raw: &[f32],
    rate: f64,
    window_s: f64,
    band_hz: (f32, f32),
    fallback_bpm: f32,
) -> Vec<f32> {
    let n = raw.len();
    if n < 2 {
        return vec![fallback_bpm; n];
    }
    let window = window_len(window_s * 1000.0, rate).clamp(2, n);
    let hop = window_len(1000.0, rate);
    // Zero-pad to at least 4× the window for a finer frequency grid.
    let fft_len = (window * 4).next_power_of_two();

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(fft_len);
    let mut scratch = vec![Complex::new(0.0f32, 0.0); fft_len];

    let hann: Vec<f32> = (0..window)
        .map(|i| {
            let phase = std::f32::consts::TAU * i as f32 / (window - 1) as f32;
            0.5 - 0.5 * phase.cos()
        })
        .collect();

    let bin_hz = rate as f32 / fft_len as f32;
    let lo_bin = ((band_hz.0 / bin_hz).ceil() as usize).max(1);
    let hi_bin = ((band_hz.1 / bin_hz).floor() as usize).min(fft_len / 2);

    let mut out = vec![fallback_bpm; n];
    let mut current = fallback_bpm;
    let mut centre = 0usize;
    while centre < n {
        let start = centre.saturating_sub(window / 2).min(n - window);
        let segment = &raw[start..start + window];
        let seg_mean = mean(segment);

        scratch.fill(Complex::new(0.0, 0.0));
        for ((slot, &s), &w) in scratch.iter_mut().zip(segment.iter()).zip(hann.iter()) {
            slot.re = (s - seg_mean) * w;
        }
        fft.process(&mut scratch);

        let mut best: Option<(usize, f32)> = None;
        for bin in lo_bin..=hi_bin {
            let power = scratch[bin].norm_sqr();
            if power > best.map_or(1e-12, |(_, p)| p) {
                best = Some((bin, power));
            }
        }
        if let Some((bin, _)) = best {
            current = bin as f32 * bin_hz * 60.0;
        }

        let end = (centre + hop).min(n);
        out[centre..end].fill(current);
        centre = end;
    }

    out
}
