//! Immutable render configuration.
//!
//! Every field has a default, so an empty TOML file (or none at all) gives the
//! stock arrangement at 44.1 kHz. A config is validated once and then shared
//! by reference between segment renders.
//!
//! ```toml
//! [audio]
//! sample_rate = 48000
//!
//! [tempo]
//! min_bpm = 55.0
//!
//! [segments]
//! start = "first_occurrence"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::features::FeatureConfig;
use crate::io::segment::{SegmentSpec, StartStrategy};
use crate::sequencing::{Arrangements, BeatScheduler, ClassifierThresholds, HarmonyConfig};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub sample_rate: u32,
    /// Peak level of the finished track.
    pub ceiling: f32,
    /// Seed for every noise source.
    pub seed: u64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            ceiling: 0.9,
            seed: 0,
        }
    }
}

/// Allowed tempo; heart rates outside it are clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TempoRange {
    pub min_bpm: f64,
    pub max_bpm: f64,
}

impl Default for TempoRange {
    fn default() -> Self {
        Self {
            min_bpm: 60.0,
            max_bpm: 140.0,
        }
    }
}

impl TempoRange {
    /// Clamp into range; a non-finite rate falls back to `min_bpm`.
    pub fn clamp(&self, bpm: f64) -> f64 {
        if bpm.is_finite() {
            bpm.clamp(self.min_bpm, self.max_bpm)
        } else {
            self.min_bpm
        }
    }

    pub fn beat_ms(&self, bpm: f64) -> f64 {
        60_000.0 / self.clamp(bpm)
    }

    /// The longest beat the scheduler can take.
    pub fn longest_beat_ms(&self) -> f64 {
        60_000.0 / self.min_bpm
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Length of each rendered segment.
    pub segment_duration_s: f64,
    /// The scheduler stops this long before the segment end.
    pub lookahead_margin_ms: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            segment_duration_s: 60.0,
            lookahead_margin_ms: 2_000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentsConfig {
    pub start: StartStrategy,
    /// File name prefix: `<prefix>_<segment>.wav`.
    pub output_prefix: String,
    pub segments: Vec<SegmentSpec>,
}

impl Default for SegmentsConfig {
    fn default() -> Self {
        Self {
            start: StartStrategy::default(),
            output_prefix: "song".into(),
            segments: vec![
                SegmentSpec::new("baseline", 1),
                SegmentSpec::new("stress", 2),
                SegmentSpec::new("amusement", 3),
                SegmentSpec::new("meditation", 4),
            ],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SonifyConfig {
    pub audio: AudioConfig,
    pub tempo: TempoRange,
    pub timeline: TimelineConfig,
    pub features: FeatureConfig,
    pub classifier: ClassifierThresholds,
    pub harmony: HarmonyConfig,
    pub arrangements: Arrangements,
    pub segments: SegmentsConfig,
}

impl SonifyConfig {
    /// Read, parse and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: SonifyConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.audio.sample_rate == 0 {
            return invalid("audio.sample_rate must be positive".into());
        }
        if !(self.audio.ceiling > 0.0 && self.audio.ceiling <= 1.0) {
            return invalid(format!("audio.ceiling must be in (0, 1], got {}", self.audio.ceiling));
        }

        let tempo = &self.tempo;
        if !(tempo.min_bpm.is_finite() && tempo.min_bpm > 0.0) {
            return invalid(format!("tempo.min_bpm must be positive, got {}", tempo.min_bpm));
        }
        if !(tempo.max_bpm.is_finite() && tempo.max_bpm >= tempo.min_bpm) {
            return invalid(format!(
                "tempo.max_bpm ({}) must be at least tempo.min_bpm ({})",
                tempo.max_bpm, tempo.min_bpm
            ));
        }

        if !(self.timeline.segment_duration_s.is_finite() && self.timeline.segment_duration_s > 0.0) {
            return invalid("timeline.segment_duration_s must be positive".into());
        }
        // The last beat starts before the margin and may last one full beat.
        if !(self.timeline.lookahead_margin_ms >= tempo.longest_beat_ms()) {
            return invalid(format!(
                "timeline.lookahead_margin_ms ({}) must cover one beat at {} bpm ({} ms)",
                self.timeline.lookahead_margin_ms,
                tempo.min_bpm,
                tempo.longest_beat_ms()
            ));
        }

        let features = &self.features;
        if !(features.epsilon > 0.0) {
            return invalid("features.epsilon must be positive".into());
        }
        if !(features.temp_max_c > features.temp_min_c) {
            return invalid("features.temp_max_c must exceed features.temp_min_c".into());
        }
        if !(features.resp_warmup_s >= 0.0 && features.temp_window_s > 0.0 && features.resp_rate_window_s > 0.0) {
            return invalid("feature windows must be positive".into());
        }

        for mode in crate::sequencing::Mode::ALL {
            let policy = self.arrangements.for_mode(mode);
            if let Some(melody) = &policy.melody {
                if melody.every_beats == 0 {
                    return invalid(format!("{mode} melody.every_beats must be at least 1"));
                }
            }
            if let Some(hit) = policy.rhythm.iter().find(|hit| !(0.0..1.0).contains(&hit.sub_beat)) {
                return invalid(format!("{mode} {} sub_beat must be in [0, 1)", hit.instrument));
            }
        }

        if self.segments.output_prefix.is_empty() {
            return invalid("segments.output_prefix must not be empty".into());
        }

        // Resolves every scale and chord name.
        BeatScheduler::new(self)?;
        Ok(())
    }

    /// Length of one segment in feature samples at `sampling_rate`.
    pub fn segment_samples(&self, sampling_rate: f64) -> usize {
        (self.timeline.segment_duration_s * sampling_rate).round() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencing::Mode;

    #[test]
    fn defaults_are_valid() {
        SonifyConfig::default().validate().unwrap();
    }

    #[test]
    fn empty_toml_gives_defaults() {
        assert_eq!(SonifyConfig::from_toml_str("").unwrap(), SonifyConfig::default());
    }

    #[test]
    fn partial_toml_overrides_only_what_it_names() {
        let config = SonifyConfig::from_toml_str(
            r#"
            [audio]
            sample_rate = 48000

            [segments]
            start = "first_occurrence"
            output_prefix = "S2"
            "#,
        )
        .unwrap();

        assert_eq!(config.audio.sample_rate, 48_000);
        assert_eq!(config.audio.ceiling, 0.9);
        assert_eq!(config.segments.start, StartStrategy::FirstOccurrence);
        assert_eq!(config.segments.segments.len(), 4);
        assert_eq!(config.arrangements.for_mode(Mode::Stress).scale, "harmonic_minor");
    }

    #[test]
    fn margin_must_cover_the_slowest_beat() {
        let mut config = SonifyConfig::default();
        config.timeline.lookahead_margin_ms = 500.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(msg)) if msg.contains("lookahead")));

        config.tempo.min_bpm = 120.0;
        config.tempo.max_bpm = 180.0;
        config.validate().unwrap();
    }

    #[test]
    fn inverted_tempo_range_is_rejected() {
        let mut config = SonifyConfig::default();
        config.tempo.max_bpm = 50.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn tempo_clamp_handles_nan() {
        let tempo = TempoRange::default();
        assert_eq!(tempo.clamp(f64::NAN), 60.0);
        assert_eq!(tempo.beat_ms(200.0), 60_000.0 / 140.0);
        assert_eq!(tempo.beat_ms(30.0), 1_000.0);
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        assert!(matches!(
            SonifyConfig::from_toml_str("[audio]\nsample_rate = \"fast\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = SonifyConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
