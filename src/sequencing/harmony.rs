use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const SCALE_MAJOR: [f32; 8] = [261.63, 293.66, 329.63, 349.23, 392.00, 440.00, 493.88, 523.25];
pub const SCALE_HARMONIC_MINOR: [f32; 8] = [261.63, 293.66, 311.13, 349.23, 392.00, 415.30, 493.88, 523.25];
pub const SCALE_LYDIAN: [f32; 8] = [261.63, 293.66, 329.63, 369.99, 392.00, 440.00, 493.88, 523.25];

/// Named scales and chords, and the chord progression cycled once per bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarmonyConfig {
    /// Scale name → ascending pitches (Hz).
    pub scales: BTreeMap<String, Vec<f32>>,
    /// Chord name → chord tones (Hz).
    pub chords: BTreeMap<String, Vec<f32>>,
    pub progression: Vec<String>,
}

impl Default for HarmonyConfig {
    fn default() -> Self {
        let scales = BTreeMap::from([
            ("major".to_string(), SCALE_MAJOR.to_vec()),
            ("harmonic_minor".to_string(), SCALE_HARMONIC_MINOR.to_vec()),
            ("lydian".to_string(), SCALE_LYDIAN.to_vec()),
        ]);
        let chords = BTreeMap::from([
            ("C".to_string(), vec![261.63, 329.63, 392.00]),
            ("Am".to_string(), vec![220.00, 261.63, 329.63]),
            ("F".to_string(), vec![174.61, 220.00, 261.63]),
            ("G".to_string(), vec![196.00, 246.94, 293.66]),
        ]);
        let progression = ["C", "Am", "F", "G"].map(String::from).to_vec();

        Self {
            scales,
            chords,
            progression,
        }
    }
}

impl HarmonyConfig {
    pub fn scale(&self, name: &str) -> Result<&[f32], ConfigError> {
        match self.scales.get(name) {
            Some(pitches) if !pitches.is_empty() => Ok(pitches),
            Some(_) => Err(ConfigError::Invalid(format!("scale `{name}` has no pitches"))),
            None => Err(ConfigError::UnknownScale(name.to_string())),
        }
    }

    /// Resolve the progression's chord names against the chord table.
    pub fn progression(&self) -> Result<ChordProgression, ConfigError> {
        if self.progression.is_empty() {
            return Err(ConfigError::Invalid("chord progression is empty".into()));
        }

        let chords = self
            .progression
            .iter()
            .map(|name| match self.chords.get(name) {
                Some(tones) if !tones.is_empty() => Ok((name.clone(), tones.clone())),
                Some(_) => Err(ConfigError::Invalid(format!("chord `{name}` has no tones"))),
                None => Err(ConfigError::UnknownChord(name.clone())),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ChordProgression { chords, index: 0 })
    }
}

/// Cyclic chord sequence. The index only ever moves forward and wraps.
#[derive(Debug, Clone, PartialEq)]
pub struct ChordProgression {
    chords: Vec<(String, Vec<f32>)>,
    index: usize,
}

impl ChordProgression {
    pub fn current_name(&self) -> &str {
        self.chords
            .get(self.index)
            .map(|(name, _)| name.as_str())
            .unwrap_or_default()
    }

    pub fn current_tones(&self) -> &[f32] {
        self.chords
            .get(self.index)
            .map(|(_, tones)| tones.as_slice())
            .unwrap_or_default()
    }

    pub fn advance(&mut self) {
        if !self.chords.is_empty() {
            self.index = (self.index + 1) % self.chords.len();
        }
    }
}

/// Position in the active scale. Moves one step at a time and clamps at both
/// ends instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MelodyCursor {
    index: usize,
    len: usize,
}

impl MelodyCursor {
    pub fn new(scale_len: usize) -> Self {
        Self {
            index: 0,
            len: scale_len.max(1),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Move one step up or down; returns the new index.
    pub fn step(&mut self, up: bool) -> usize {
        self.index = if up {
            (self.index + 1).min(self.len - 1)
        } else {
            self.index.saturating_sub(1)
        };
        self.index
    }

    /// Switch to a scale of a different length, keeping the index if it fits.
    pub fn retarget(&mut self, scale_len: usize) {
        self.len = scale_len.max(1);
        self.index = self.index.min(self.len - 1);
    }
}
