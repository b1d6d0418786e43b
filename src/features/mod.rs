//! Physiological channels, derived feature tracks and per-beat snapshots.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub mod extract;
pub mod snapshot;
pub mod track;

pub use extract::{FeatureConfig, FeatureExtractor, ReferenceExtractor};
pub use snapshot::{FeatureSet, FeatureSnapshot, FeatureTracks};
pub use track::SignalTrack;

/// A raw sensor channel of a recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Ecg,
    Eda,
    Emg,
    Resp,
    Temp,
    Acc,
}

impl Channel {
    pub const ALL: [Channel; 6] = [
        Channel::Ecg,
        Channel::Eda,
        Channel::Emg,
        Channel::Resp,
        Channel::Temp,
        Channel::Acc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Ecg => "ecg",
            Channel::Eda => "eda",
            Channel::Emg => "emg",
            Channel::Resp => "resp",
            Channel::Temp => "temp",
            Channel::Acc => "acc",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Channel::ALL
            .into_iter()
            .find(|channel| channel.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown channel `{s}`"))
    }
}

/// A signal derived from one channel, aligned sample-for-sample with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Beats per minute from ECG R-peaks.
    HeartRate,
    EdaLevel,
    EmgAmplitude,
    RespSwell,
    /// Breaths per minute.
    RespRate,
    Temperature,
    Motion,
}

impl Feature {
    pub fn channel(self) -> Channel {
        match self {
            Feature::HeartRate => Channel::Ecg,
            Feature::EdaLevel => Channel::Eda,
            Feature::EmgAmplitude => Channel::Emg,
            Feature::RespSwell | Feature::RespRate => Channel::Resp,
            Feature::Temperature => Channel::Temp,
            Feature::Motion => Channel::Acc,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Feature::HeartRate => "heart rate",
            Feature::EdaLevel => "eda level",
            Feature::EmgAmplitude => "emg amplitude",
            Feature::RespSwell => "resp swell",
            Feature::RespRate => "resp rate",
            Feature::Temperature => "temperature",
            Feature::Motion => "motion",
        };
        f.write_str(name)
    }
}
