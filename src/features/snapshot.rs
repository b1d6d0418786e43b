use std::collections::BTreeMap;

use tracing::debug;

use super::{Channel, Feature, FeatureConfig, FeatureExtractor, SignalTrack};
use crate::config::TempoRange;
use crate::error::{InputError, PreconditionError, SegmentError};

/// Derived tracks for one segment, before alignment is checked.
#[derive(Debug, Clone)]
pub struct FeatureTracks {
    pub heart_rate: SignalTrack,
    pub eda: SignalTrack,
    pub emg: SignalTrack,
    pub resp_swell: SignalTrack,
    pub resp_rate: SignalTrack,
    pub temperature: SignalTrack,
    pub motion: Option<SignalTrack>,
}

/// Aligned feature tracks: equal length, equal sampling rate, none empty.
#[derive(Debug, Clone)]
pub struct FeatureSet {
    tracks: FeatureTracks,
    len: usize,
    sample_rate: f64,
}

/// Features read at one sample index, clamped for the scheduler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureSnapshot {
    pub index: usize,
    /// Heart rate as measured, before clamping. Logged only; tempo and mode
    /// both follow `tempo_bpm`.
    pub heart_rate_bpm: f64,
    /// Heart rate clamped into the tempo range.
    pub tempo_bpm: f64,
    pub eda: f32,
    pub emg: f32,
    pub resp_swell: f32,
    /// Trailing mean in breaths/min.
    pub resp_rate: f32,
    /// Forward-window mean of normalized temperature.
    pub temperature: f32,
    pub motion: Option<f32>,
}

impl FeatureSet {
    pub fn new(tracks: FeatureTracks) -> Result<Self, SegmentError> {
        let expected_len = tracks.heart_rate.len();
        let expected_rate = tracks.heart_rate.sample_rate();

        let mut all: Vec<(Feature, &SignalTrack)> = vec![
            (Feature::HeartRate, &tracks.heart_rate),
            (Feature::EdaLevel, &tracks.eda),
            (Feature::EmgAmplitude, &tracks.emg),
            (Feature::RespSwell, &tracks.resp_swell),
            (Feature::RespRate, &tracks.resp_rate),
            (Feature::Temperature, &tracks.temperature),
        ];
        if let Some(motion) = &tracks.motion {
            all.push((Feature::Motion, motion));
        }

        for (feature, track) in &all {
            if track.is_empty() {
                return Err(InputError::EmptyTrack(*feature).into());
            }
        }
        if !(expected_rate.is_finite() && expected_rate > 0.0) {
            return Err(InputError::InvalidSamplingRate(expected_rate).into());
        }

        for (feature, track) in &all {
            if track.len() != expected_len {
                return Err(PreconditionError::MisalignedTracks {
                    feature: *feature,
                    expected: expected_len,
                    found: track.len(),
                }
                .into());
            }
            if track.sample_rate() != expected_rate {
                return Err(PreconditionError::RateMismatch {
                    feature: *feature,
                    expected: expected_rate,
                    found: track.sample_rate(),
                }
                .into());
            }
        }

        Ok(Self {
            tracks,
            len: expected_len,
            sample_rate: expected_rate,
        })
    }

    /// Run `extractor` over the raw channels of one segment window.
    ///
    /// Every channel but `acc` is required; motion is simply absent without it.
    pub fn extract<E: FeatureExtractor + ?Sized>(
        extractor: &E,
        channels: &BTreeMap<Channel, Vec<f32>>,
        sample_rate: f64,
    ) -> Result<Self, SegmentError> {
        let run = |feature: Feature| -> Result<SignalTrack, SegmentError> {
            let channel = feature.channel();
            let raw = channels
                .get(&channel)
                .ok_or(InputError::MissingChannel(channel))?;
            Ok(extractor.extract(feature, raw, sample_rate)?)
        };

        let motion = match channels.get(&Channel::Acc) {
            Some(raw) => Some(extractor.extract(Feature::Motion, raw, sample_rate)?),
            None => {
                debug!("no acc channel; motion omitted");
                None
            }
        };

        Self::new(FeatureTracks {
            heart_rate: run(Feature::HeartRate)?,
            eda: run(Feature::EdaLevel)?,
            emg: run(Feature::EmgAmplitude)?,
            resp_swell: run(Feature::RespSwell)?,
            resp_rate: run(Feature::RespRate)?,
            temperature: run(Feature::Temperature)?,
            motion,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn duration_ms(&self) -> f64 {
        self.tracks.heart_rate.duration_ms()
    }

    pub fn tracks(&self) -> &FeatureTracks {
        &self.tracks
    }

    /// Sample index for a timeline position, clamped to the last sample.
    pub fn index_at(&self, position_ms: f64) -> usize {
        let raw = (position_ms.max(0.0) / 1000.0 * self.sample_rate).floor();
        (raw as usize).min(self.len.saturating_sub(1))
    }

    pub fn snapshot(
        &self,
        index: usize,
        tempo: &TempoRange,
        config: &FeatureConfig,
    ) -> Result<FeatureSnapshot, PreconditionError> {
        if index >= self.len {
            return Err(PreconditionError::IndexOutOfRange {
                index,
                len: self.len,
            });
        }

        let at = |feature: Feature, track: &SignalTrack| -> Result<f32, PreconditionError> {
            track
                .get(index)
                .filter(|v| v.is_finite())
                .ok_or(PreconditionError::NonFinite { feature, index })
        };
        let finite = |feature: Feature, value: Option<f32>| -> Result<f32, PreconditionError> {
            value
                .filter(|v| v.is_finite())
                .ok_or(PreconditionError::NonFinite { feature, index })
        };

        let heart_rate_bpm = at(Feature::HeartRate, &self.tracks.heart_rate)? as f64;

        let warmup = (config.resp_warmup_s * self.sample_rate) as usize;
        let resp_rate = if index > warmup {
            finite(
                Feature::RespRate,
                self.tracks.resp_rate.mean_over(index - warmup..index + 1),
            )?
        } else {
            config.resp_default_bpm
        };

        let temp_window = ((config.temp_window_s * self.sample_rate) as usize).max(1);
        let temperature = finite(
            Feature::Temperature,
            self.tracks.temperature.mean_over(index..index + temp_window),
        )?;

        let motion = match &self.tracks.motion {
            Some(track) => Some(at(Feature::Motion, track)?.clamp(0.0, 1.0)),
            None => None,
        };

        Ok(FeatureSnapshot {
            index,
            heart_rate_bpm,
            tempo_bpm: tempo.clamp(heart_rate_bpm),
            eda: at(Feature::EdaLevel, &self.tracks.eda)?.clamp(0.0, 1.0),
            emg: at(Feature::EmgAmplitude, &self.tracks.emg)?.clamp(0.0, 1.0),
            resp_swell: at(Feature::RespSwell, &self.tracks.resp_swell)?.clamp(0.0, 1.0),
            resp_rate,
            temperature: temperature.clamp(0.0, 1.0),
            motion,
        })
    }
}
