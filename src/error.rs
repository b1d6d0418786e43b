//! Error types for loading, extracting, scheduling and exporting.
//!
//! Per-segment failures (`InputError`, `FeatureUnavailable`,
//! `PreconditionError`) are gathered under [`SegmentError`] so a batch render
//! can skip one segment and carry on with the rest.

use std::path::PathBuf;

use crate::features::{Channel, Feature};

/// Problems with the recording itself.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// Recording file could not be read
    #[error("failed to read recording {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Recording file is not valid JSON for the expected layout
    #[error("malformed recording: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("recording has no `{0}` channel")]
    MissingChannel(Channel),

    #[error("label {0} does not occur in the recording")]
    UnknownLabel(i64),

    #[error("segment needs {needed} samples but only {available} remain after the start")]
    InsufficientSamples { needed: usize, available: usize },

    #[error("{0} track is empty")]
    EmptyTrack(Feature),

    #[error("sampling rate must be positive and finite, got {0}")]
    InvalidSamplingRate(f64),

    #[error("{channel} channel has {found} samples but there are {expected} labels")]
    ChannelLength {
        channel: Channel,
        expected: usize,
        found: usize,
    },
}

/// A channel that is present but cannot yield its derived signal.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{channel} feature unavailable: {reason}")]
pub struct FeatureUnavailable {
    pub channel: Channel,
    pub reason: String,
}

impl FeatureUnavailable {
    pub fn new(channel: Channel, reason: impl Into<String>) -> Self {
        Self {
            channel,
            reason: reason.into(),
        }
    }
}

/// Broken assumptions between the feature tracks and the scheduler.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PreconditionError {
    #[error("{feature} track has {found} samples, expected {expected}")]
    MisalignedTracks {
        feature: Feature,
        expected: usize,
        found: usize,
    },

    #[error("{feature} track runs at {found} Hz, expected {expected} Hz")]
    RateMismatch {
        feature: Feature,
        expected: f64,
        found: f64,
    },

    #[error("snapshot index {index} is outside the {len}-sample feature window")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("{feature} is not finite at sample {index}")]
    NonFinite { feature: Feature, index: usize },
}

/// Why one segment produced no audio.
#[derive(Debug, thiserror::Error)]
pub enum SegmentError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Feature(#[from] FeatureUnavailable),

    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unknown scale `{0}`")]
    UnknownScale(String),

    #[error("unknown chord `{0}` in progression")]
    UnknownChord(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("WAV encoding failed: {0}")]
    Wav(#[from] hound::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
