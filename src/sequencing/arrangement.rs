//! What each mode plays.
//!
//! An [`ArrangementPolicy`] is pure data: the scheduler reads it every beat
//! and never branches on the mode itself. The defaults reproduce four moods:
//!
//! | mode       | scale          | drums                                 | harmony          | melody                 |
//! | ---------- | -------------- | ------------------------------------- | ---------------- | ---------------------- |
//! | BASELINE   | major          | kick 1, snare 3, quiet hat every beat | -                | -                      |
//! | STRESS     | harmonic minor | kick every beat, snare 2+4, 8th hats  | power chord      | -                      |
//! | AMUSEMENT  | major          | kick 1+3, snare 2+4, off-beat hats    | square chord pad | plucky, every beat     |
//! | MEDITATION | lydian         | -                                     | -                | long notes, every 2nd  |

use serde::{Deserialize, Serialize};

use super::mode::PerMode;
use crate::features::FeatureSnapshot;
use crate::instruments::InstrumentId;

/// A snapshot value an arrangement can be driven by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureSource {
    Eda,
    Emg,
    RespSwell,
    Temperature,
    Motion,
}

impl FeatureSource {
    /// Read the value in [0, 1]; missing motion reads as 0.
    pub fn read(self, snapshot: &FeatureSnapshot) -> f32 {
        let value = match self {
            FeatureSource::Eda => snapshot.eda,
            FeatureSource::Emg => snapshot.emg,
            FeatureSource::RespSwell => snapshot.resp_swell,
            FeatureSource::Temperature => snapshot.temperature,
            FeatureSource::Motion => snapshot.motion.unwrap_or(0.0),
        };
        value.clamp(0.0, 1.0)
    }
}

/// A drum (or any one-shot) hit on selected beats of the bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RhythmHit {
    pub instrument: InstrumentId,
    /// Beats of the bar (beat mod 4) that play; empty means every beat.
    #[serde(default)]
    pub residues: Vec<u32>,
    /// Offset inside the beat as a fraction of it (0.5 = off-beat eighth).
    #[serde(default)]
    pub sub_beat: f64,
    #[serde(default)]
    pub gain_db: f32,
}

impl RhythmHit {
    pub fn every_beat(instrument: InstrumentId) -> Self {
        Self {
            instrument,
            residues: Vec::new(),
            sub_beat: 0.0,
            gain_db: 0.0,
        }
    }

    pub fn on(instrument: InstrumentId, residues: &[u32]) -> Self {
        Self {
            residues: residues.to_vec(),
            ..Self::every_beat(instrument)
        }
    }

    pub fn off_beat(mut self) -> Self {
        self.sub_beat = 0.5;
        self
    }

    pub fn gain_db(mut self, gain_db: f32) -> Self {
        self.gain_db = gain_db;
        self
    }

    pub fn plays_on(&self, beat: u64) -> bool {
        self.residues.is_empty() || self.residues.iter().any(|&r| u64::from(r) == beat % 4)
    }
}

/// A chord struck at the start of every bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarmonyRule {
    pub instrument: InstrumentId,
    pub intensity: FeatureSource,
    #[serde(default)]
    pub gain_db: f32,
    /// Chord length in bars.
    #[serde(default = "one_bar")]
    pub bars: u32,
}

fn one_bar() -> u32 {
    1
}

/// Feature-gated melody walking the scale one step per note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MelodyRule {
    #[serde(default = "default_melody_instrument")]
    pub instrument: InstrumentId,
    /// Play on beats divisible by this.
    pub every_beats: u32,
    pub gate: FeatureSource,
    /// Note plays when the gate feature exceeds this.
    pub threshold: f32,
    /// Melody steps up when the gate feature exceeds this, down otherwise.
    pub upward_threshold: f32,
    /// Note length; one beat when absent.
    #[serde(default)]
    pub note_ms: Option<f64>,
    #[serde(default)]
    pub gain_db: f32,
}

fn default_melody_instrument() -> InstrumentId {
    InstrumentId::Piano
}

impl MelodyRule {
    pub fn plays_on(&self, beat: u64) -> bool {
        beat % u64::from(self.every_beats.max(1)) == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrangementPolicy {
    /// Name of a scale in the harmony table.
    pub scale: String,
    #[serde(default)]
    pub rhythm: Vec<RhythmHit>,
    #[serde(default)]
    pub harmony: Option<HarmonyRule>,
    #[serde(default)]
    pub melody: Option<MelodyRule>,
}

pub type Arrangements = PerMode<ArrangementPolicy>;

impl Default for PerMode<ArrangementPolicy> {
    fn default() -> Self {
        use InstrumentId::{ChordPad, HiHat, Kick, Piano, PowerChord, Snare};

        let baseline = ArrangementPolicy {
            scale: "major".into(),
            rhythm: vec![
                RhythmHit::on(Kick, &[0]),
                RhythmHit::on(Snare, &[2]),
                RhythmHit::every_beat(HiHat).gain_db(-10.0),
            ],
            harmony: None,
            melody: None,
        };

        let stress = ArrangementPolicy {
            scale: "harmonic_minor".into(),
            rhythm: vec![
                RhythmHit::every_beat(Kick).gain_db(2.0),
                RhythmHit::on(Snare, &[1, 3]),
                RhythmHit::every_beat(HiHat),
                RhythmHit::every_beat(HiHat).off_beat().gain_db(-5.0),
            ],
            harmony: Some(HarmonyRule {
                instrument: PowerChord,
                intensity: FeatureSource::Eda,
                gain_db: 0.0,
                bars: 1,
            }),
            melody: None,
        };

        let amusement = ArrangementPolicy {
            scale: "major".into(),
            rhythm: vec![
                RhythmHit::on(Kick, &[0, 2]),
                RhythmHit::on(Snare, &[1, 3]),
                RhythmHit::every_beat(HiHat).off_beat(),
            ],
            harmony: Some(HarmonyRule {
                instrument: ChordPad,
                intensity: FeatureSource::Eda,
                gain_db: 3.0,
                bars: 1,
            }),
            melody: Some(MelodyRule {
                instrument: Piano,
                every_beats: 1,
                gate: FeatureSource::Emg,
                threshold: 0.15,
                upward_threshold: 0.4,
                note_ms: Some(300.0),
                gain_db: 0.0,
            }),
        };

        let meditation = ArrangementPolicy {
            scale: "lydian".into(),
            rhythm: Vec::new(),
            harmony: None,
            melody: Some(MelodyRule {
                instrument: Piano,
                every_beats: 2,
                gate: FeatureSource::Emg,
                threshold: 0.1,
                upward_threshold: 0.25,
                note_ms: Some(2_500.0),
                gain_db: -15.0,
            }),
        };

        PerMode {
            baseline,
            stress,
            amusement,
            meditation,
        }
    }
}
