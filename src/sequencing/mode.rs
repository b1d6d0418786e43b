use std::fmt;

use serde::{Deserialize, Serialize};

use crate::features::FeatureSnapshot;

/// Affective mode inferred from the features, re-evaluated once per bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mode {
    #[default]
    Baseline,
    Stress,
    Amusement,
    Meditation,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Baseline, Mode::Stress, Mode::Amusement, Mode::Meditation];
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Baseline => "BASELINE",
            Mode::Stress => "STRESS",
            Mode::Amusement => "AMUSEMENT",
            Mode::Meditation => "MEDITATION",
        };
        f.write_str(name)
    }
}

/// One value per mode. Lookup is an exhaustive match, so a new mode fails to
/// compile until every table gains an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerMode<T> {
    pub baseline: T,
    pub stress: T,
    pub amusement: T,
    pub meditation: T,
}

impl<T> PerMode<T> {
    pub fn for_mode(&self, mode: Mode) -> &T {
        match mode {
            Mode::Baseline => &self.baseline,
            Mode::Stress => &self.stress,
            Mode::Amusement => &self.amusement,
            Mode::Meditation => &self.meditation,
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(Mode, &T) -> U) -> PerMode<U> {
        PerMode {
            baseline: f(Mode::Baseline, &self.baseline),
            stress: f(Mode::Stress, &self.stress),
            amusement: f(Mode::Amusement, &self.amusement),
            meditation: f(Mode::Meditation, &self.meditation),
        }
    }

    /// Like [`PerMode::map`] but stops at the first error.
    pub fn try_map<U, E>(&self, mut f: impl FnMut(Mode, &T) -> Result<U, E>) -> Result<PerMode<U>, E> {
        Ok(PerMode {
            baseline: f(Mode::Baseline, &self.baseline)?,
            stress: f(Mode::Stress, &self.stress)?,
            amusement: f(Mode::Amusement, &self.amusement)?,
            meditation: f(Mode::Meditation, &self.meditation)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierThresholds {
    pub meditation_max_bpm: f64,
    pub meditation_max_resp_rate: f32,
    pub stress_min_bpm: f64,
    pub stress_min_eda: f32,
    pub amusement_min_bpm: f64,
    pub amusement_min_emg: f32,
}

impl Default for ClassifierThresholds {
    fn default() -> Self {
        Self {
            meditation_max_bpm: 75.0,
            meditation_max_resp_rate: 15.0,
            stress_min_bpm: 85.0,
            stress_min_eda: 0.4,
            amusement_min_bpm: 75.0,
            amusement_min_emg: 0.2,
        }
    }
}

/// Fixed-priority decision tree; earlier checks win ties.
#[derive(Debug, Clone, Default)]
pub struct ModeClassifier {
    thresholds: ClassifierThresholds,
}

impl ModeClassifier {
    pub fn new(thresholds: ClassifierThresholds) -> Self {
        Self { thresholds }
    }

    pub fn classify(&self, bpm: f64, eda: f32, emg: f32, resp_rate: f32) -> Mode {
        let t = &self.thresholds;
        if bpm < t.meditation_max_bpm && resp_rate < t.meditation_max_resp_rate {
            Mode::Meditation
        } else if bpm > t.stress_min_bpm && eda > t.stress_min_eda {
            Mode::Stress
        } else if bpm > t.amusement_min_bpm && emg > t.amusement_min_emg {
            Mode::Amusement
        } else {
            Mode::Baseline
        }
    }

    /// Classify from a snapshot at its clamped tempo, the same bpm the beat
    /// length is derived from.
    pub fn classify_snapshot(&self, snapshot: &FeatureSnapshot) -> Mode {
        self.classify(snapshot.tempo_bpm, snapshot.eda, snapshot.emg, snapshot.resp_rate)
    }
}
