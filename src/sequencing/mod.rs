//! Mode inference, arrangement policies and the beat scheduler.

pub mod arrangement;
pub mod harmony;
pub mod mode;
pub mod scheduler;
pub mod trigger;

pub use arrangement::{ArrangementPolicy, Arrangements, FeatureSource, HarmonyRule, MelodyRule, RhythmHit};
pub use harmony::{ChordProgression, HarmonyConfig, MelodyCursor};
pub use mode::{ClassifierThresholds, Mode, ModeClassifier, PerMode};
pub use scheduler::{BeatScheduler, ModeTransition, Schedule, Step, BEATS_PER_BAR};
pub use trigger::Trigger;
