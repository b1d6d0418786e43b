use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::InputError;
use crate::features::Channel;

#[derive(Debug, Deserialize)]
struct RawRecording {
    sampling_rate: f64,
    channels: BTreeMap<String, Vec<f32>>,
    labels: Vec<i64>,
}

/// A multi-channel physiological recording with one label per sample.
///
/// Serialized as JSON:
///
/// ```json
/// {"sampling_rate": 700, "channels": {"ecg": [...], "eda": [...]}, "labels": [...]}
/// ```
///
/// Channel names are matched case-insensitively; channels this crate does not
/// use are ignored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recording {
    sampling_rate: f64,
    channels: BTreeMap<Channel, Vec<f32>>,
    labels: Vec<i64>,
}

impl Recording {
    pub fn new(
        sampling_rate: f64,
        channels: BTreeMap<Channel, Vec<f32>>,
        labels: Vec<i64>,
    ) -> Result<Self, InputError> {
        if !(sampling_rate.is_finite() && sampling_rate > 0.0) {
            return Err(InputError::InvalidSamplingRate(sampling_rate));
        }
        for (&channel, samples) in &channels {
            if samples.len() != labels.len() {
                return Err(InputError::ChannelLength {
                    channel,
                    expected: labels.len(),
                    found: samples.len(),
                });
            }
        }

        Ok(Self {
            sampling_rate,
            channels,
            labels,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| InputError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, InputError> {
        Self::from_raw(serde_json::from_reader(reader)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self, InputError> {
        Self::from_raw(serde_json::from_str(text)?)
    }

    fn from_raw(raw: RawRecording) -> Result<Self, InputError> {
        let mut channels = BTreeMap::new();
        for (name, samples) in raw.channels {
            match name.parse::<Channel>() {
                Ok(channel) => {
                    channels.insert(channel, samples);
                }
                Err(_) => debug!(channel = %name, "ignoring unused channel"),
            }
        }
        Self::new(raw.sampling_rate, channels, raw.labels)
    }

    pub fn sampling_rate(&self) -> f64 {
        self.sampling_rate
    }

    pub fn labels(&self) -> &[i64] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn channel(&self, channel: Channel) -> Option<&[f32]> {
        self.channels.get(&channel).map(Vec::as_slice)
    }

    pub fn channels(&self) -> impl Iterator<Item = (Channel, &[f32])> {
        self.channels.iter().map(|(&c, s)| (c, s.as_slice()))
    }

    /// Number of samples carrying each label.
    pub fn label_counts(&self) -> BTreeMap<i64, usize> {
        let mut counts = BTreeMap::new();
        for &label in &self.labels {
            *counts.entry(label).or_insert(0) += 1;
        }
        counts
    }

    /// Copy `len` samples of every channel starting at `start`.
    pub fn window(&self, start: usize, len: usize) -> Result<BTreeMap<Channel, Vec<f32>>, InputError> {
        let available = self.len().saturating_sub(start);
        if len > available {
            return Err(InputError::InsufficientSamples { needed: len, available });
        }
        Ok(self
            .channels
            .iter()
            .map(|(&channel, samples)| (channel, samples[start..start + len].to_vec()))
            .collect())
    }
}
