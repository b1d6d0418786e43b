/*
Beat Scheduler
==============

Walks one segment of feature tracks at the subject's own pulse and writes
down every sound the arrangement asks for. Nothing is rendered here; the
output is a list of triggers on a millisecond timeline.

The Walk
--------

  position 0 ──beat──→ ──beat──→ ──beat──→ ──beat──→ ... until duration - margin
           ↑ bar                             ↑ bar

Every step:

  1. snapshot = features at floor(position_s × feature_rate)
  2. beat_ms  = 60000 / clamp(heart rate, min_bpm, max_bpm)
  3. on a bar line (beat % 4 == 0): classify the mode; after the first bar
     also advance the chord progression
  4. always: warmth drone (temperature) + breathing pad (current chord,
     respiration swell), one beat each
  5. mode layer: rhythm hits, bar-start chord, gated melody note
  6. position += beat_ms

The step size is re-read every beat, so a racing heart literally speeds the
song up and a calm one slows it down.

Timeline Bounds
---------------
The walk stops `lookahead_margin_ms` before the end of the segment, and the
configuration guarantees that margin covers at least one beat at the slowest
tempo. Notes longer than what remains (a bar-long chord near the end, a
2.5 s meditation note) are shortened so `offset + duration` never passes the
end of the segment. The mixer therefore never has to drop samples.
*/

use serde::Serialize;
use tracing::{debug, info};

use super::{
    harmony::{ChordProgression, MelodyCursor},
    mode::{Mode, ModeClassifier, PerMode},
    trigger::Trigger,
};
use crate::config::SonifyConfig;
use crate::error::{ConfigError, PreconditionError};
use crate::features::{FeatureSet, FeatureSnapshot};
use crate::instruments::{InstrumentId, InstrumentParams};

pub const BEATS_PER_BAR: u64 = 4;

/// A mode change, recorded at the bar where it happened.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModeTransition {
    pub beat: u64,
    pub position_ms: f64,
    pub from: Mode,
    pub to: Mode,
}

/// State of the walk at one beat.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step {
    pub beat: u64,
    pub position_ms: f64,
    pub beat_ms: f64,
    pub mode: Mode,
    pub chord: String,
    pub melody_index: usize,
}

/// Everything one scheduler run produced.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Schedule {
    pub duration_ms: f64,
    pub triggers: Vec<Trigger>,
    pub steps: Vec<Step>,
    pub transitions: Vec<ModeTransition>,
}

impl Schedule {
    pub fn triggers_of(&self, instrument: InstrumentId) -> impl Iterator<Item = &Trigger> {
        self.triggers.iter().filter(move |t| t.instrument == instrument)
    }

    /// The step whose beat covers `offset_ms`.
    pub fn step_at(&self, offset_ms: f64) -> Option<&Step> {
        self.steps
            .iter()
            .rev()
            .find(|step| step.position_ms <= offset_ms)
    }
}

/// Per-run mutable state; created fresh for each segment.
struct Walk {
    position_ms: f64,
    beat: u64,
    mode: Mode,
    progression: ChordProgression,
    cursor: MelodyCursor,
}

pub struct BeatScheduler<'a> {
    config: &'a SonifyConfig,
    classifier: ModeClassifier,
    scales: PerMode<Vec<f32>>,
    progression: ChordProgression,
}

impl<'a> BeatScheduler<'a> {
    /// Resolve scale and chord names once; a bad name fails here, not mid-song.
    pub fn new(config: &'a SonifyConfig) -> Result<Self, ConfigError> {
        let scales = config
            .arrangements
            .try_map(|_, policy| config.harmony.scale(&policy.scale).map(<[f32]>::to_vec))?;
        let progression = config.harmony.progression()?;

        Ok(Self {
            config,
            classifier: ModeClassifier::new(config.classifier.clone()),
            scales,
            progression,
        })
    }

    pub fn run(&self, features: &FeatureSet) -> Result<Schedule, PreconditionError> {
        let duration_ms = features.duration_ms();
        let end_ms = duration_ms - self.config.timeline.lookahead_margin_ms;
        let tempo = &self.config.tempo;

        let mut schedule = Schedule {
            duration_ms,
            ..Schedule::default()
        };
        let mut walk = Walk {
            position_ms: 0.0,
            beat: 0,
            mode: Mode::Baseline,
            progression: self.progression.clone(),
            cursor: MelodyCursor::new(self.scales.for_mode(Mode::Baseline).len()),
        };

        while walk.position_ms < end_ms {
            let index = features.index_at(walk.position_ms);
            let snapshot = features.snapshot(index, tempo, &self.config.features)?;
            let beat_ms = tempo.beat_ms(snapshot.tempo_bpm);

            if walk.beat % BEATS_PER_BAR == 0 {
                self.start_bar(&mut walk, &snapshot, &mut schedule);
            }

            schedule.steps.push(Step {
                beat: walk.beat,
                position_ms: walk.position_ms,
                beat_ms,
                mode: walk.mode,
                chord: walk.progression.current_name().to_string(),
                melody_index: walk.cursor.index(),
            });

            let mut emitter = Emitter {
                triggers: &mut schedule.triggers,
                duration_ms,
            };
            self.ambient_layer(&walk, &snapshot, beat_ms, &mut emitter);
            self.mode_layer(&mut walk, &snapshot, beat_ms, &mut emitter);

            walk.position_ms += beat_ms;
            walk.beat += 1;
        }

        info!(
            beats = walk.beat,
            triggers = schedule.triggers.len(),
            transitions = schedule.transitions.len(),
            "schedule complete"
        );
        Ok(schedule)
    }

    fn start_bar(&self, walk: &mut Walk, snapshot: &FeatureSnapshot, schedule: &mut Schedule) {
        let next = self.classifier.classify_snapshot(snapshot);
        if next != walk.mode {
            info!(
                at_s = (walk.position_ms / 1000.0).floor(),
                from = %walk.mode,
                to = %next,
                hr = snapshot.heart_rate_bpm,
                resp_rate = snapshot.resp_rate,
                "mode switch"
            );
            schedule.transitions.push(ModeTransition {
                beat: walk.beat,
                position_ms: walk.position_ms,
                from: walk.mode,
                to: next,
            });
            walk.mode = next;
            walk.cursor.retarget(self.scales.for_mode(next).len());
        }

        if walk.beat > 0 {
            walk.progression.advance();
        }

        debug!(
            bar = walk.beat / BEATS_PER_BAR,
            mode = %walk.mode,
            chord = walk.progression.current_name(),
            tempo = snapshot.tempo_bpm,
            "bar"
        );
    }

    fn ambient_layer(&self, walk: &Walk, snapshot: &FeatureSnapshot, beat_ms: f64, out: &mut Emitter<'_>) {
        out.emit(
            InstrumentId::WarmthDrone,
            InstrumentParams::default().with_intensity(snapshot.temperature.clamp(0.0, 1.0)),
            walk.position_ms,
            beat_ms,
        );
        out.emit(
            InstrumentId::BreathPad,
            InstrumentParams::chord(walk.progression.current_name(), walk.progression.current_tones())
                .with_intensity(snapshot.resp_swell.clamp(0.0, 1.0)),
            walk.position_ms,
            beat_ms,
        );
    }

    fn mode_layer(&self, walk: &mut Walk, snapshot: &FeatureSnapshot, beat_ms: f64, out: &mut Emitter<'_>) {
        let policy = self.config.arrangements.for_mode(walk.mode);

        for hit in policy.rhythm.iter().filter(|hit| hit.plays_on(walk.beat)) {
            let offset = walk.position_ms + hit.sub_beat.clamp(0.0, 1.0) * beat_ms;
            out.emit(
                hit.instrument,
                InstrumentParams::default().with_gain_db(hit.gain_db),
                offset,
                hit.instrument.natural_duration_ms(),
            );
        }

        if let Some(rule) = &policy.harmony {
            if walk.beat % BEATS_PER_BAR == 0 {
                let params = InstrumentParams::chord(
                    walk.progression.current_name(),
                    walk.progression.current_tones(),
                )
                .with_intensity(rule.intensity.read(snapshot))
                .with_gain_db(rule.gain_db);
                let bar_ms = beat_ms * (BEATS_PER_BAR * u64::from(rule.bars.max(1))) as f64;
                out.emit(rule.instrument, params, walk.position_ms, bar_ms);
            }
        }

        if let Some(rule) = &policy.melody {
            let level = rule.gate.read(snapshot);
            if rule.plays_on(walk.beat) && level > rule.threshold {
                let scale = self.scales.for_mode(walk.mode);
                if let Some(&pitch) = scale.get(walk.cursor.index()) {
                    out.emit(
                        rule.instrument,
                        InstrumentParams::note(pitch).with_gain_db(rule.gain_db),
                        walk.position_ms,
                        rule.note_ms.unwrap_or(beat_ms),
                    );
                }
                walk.cursor.step(level > rule.upward_threshold);
            }
        }
    }
}

/// Appends triggers, shortening any that would run past the segment end.
struct Emitter<'s> {
    triggers: &'s mut Vec<Trigger>,
    duration_ms: f64,
}

impl Emitter<'_> {
    fn emit(&mut self, instrument: InstrumentId, params: InstrumentParams, offset_ms: f64, duration_ms: f64) {
        let duration_ms = duration_ms.min(self.duration_ms - offset_ms);
        if !(duration_ms > 0.0) {
            return;
        }
        self.triggers.push(Trigger {
            instrument,
            params,
            offset_ms,
            duration_ms,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{FeatureTracks, SignalTrack};

    const RATE: f64 = 100.0;

    fn features(seconds: f64, hr: f32, eda: f32, emg: f32, resp_rate: f32) -> FeatureSet {
        let len = (seconds * RATE) as usize;
        FeatureSet::new(FeatureTracks {
            heart_rate: SignalTrack::constant(hr, len, RATE),
            eda: SignalTrack::constant(eda, len, RATE),
            emg: SignalTrack::constant(emg, len, RATE),
            resp_swell: SignalTrack::constant(0.5, len, RATE),
            resp_rate: SignalTrack::constant(resp_rate, len, RATE),
            temperature: SignalTrack::constant(0.5, len, RATE),
            motion: None,
        })
        .unwrap()
    }

    fn run(config: &SonifyConfig, set: &FeatureSet) -> Schedule {
        BeatScheduler::new(config).unwrap().run(set).unwrap()
    }

    #[test]
    fn beat_length_follows_the_clamped_tempo() {
        let config = SonifyConfig::default();
        let slow = run(&config, &features(10.0, 30.0, 0.0, 0.0, 18.0));
        let fast = run(&config, &features(10.0, 250.0, 0.0, 0.0, 18.0));

        assert!(slow.steps.iter().all(|s| (s.beat_ms - 1_000.0).abs() < 1e-9));
        assert!(fast.steps.iter().all(|s| (s.beat_ms - 60_000.0 / 140.0).abs() < 1e-9));
    }

    #[test]
    fn walk_stops_before_the_margin() {
        let config = SonifyConfig::default();
        let schedule = run(&config, &features(10.0, 60.0, 0.0, 0.0, 18.0));
        // 60 bpm: beats at 0..=7 s, stop at 8 s
        assert_eq!(schedule.steps.len(), 8);
        assert!(schedule.steps.iter().all(|s| s.position_ms < 8_000.0));
    }

    #[test]
    fn no_trigger_passes_the_segment_end() {
        let config = SonifyConfig::default();
        // meditation melody notes (2.5 s) near the end get shortened
        let schedule = run(&config, &features(12.0, 65.0, 0.0, 0.3, 10.0));
        assert!(!schedule.triggers.is_empty());
        for trigger in &schedule.triggers {
            assert!(trigger.end_ms() <= schedule.duration_ms + 1e-9, "{trigger:?}");
        }
    }

    #[test]
    fn chord_advances_once_per_bar_after_the_first() {
        let config = SonifyConfig::default();
        let schedule = run(&config, &features(20.0, 60.0, 0.0, 0.0, 18.0));
        let chords: Vec<&str> = schedule.steps.iter().map(|s| s.chord.as_str()).collect();
        assert_eq!(&chords[..4], ["C"; 4]);
        assert_eq!(&chords[4..8], ["Am"; 4]);
        assert_eq!(&chords[8..12], ["F"; 4]);
        assert_eq!(&chords[12..16], ["G"; 4]);
        assert_eq!(chords[16], "C");
    }

    #[test]
    fn amusement_melody_walks_up_and_clamps() {
        let config = SonifyConfig::default();
        // emg 0.5 > 0.4: every note steps up
        let schedule = run(&config, &features(20.0, 90.0, 0.0, 0.5, 18.0));
        assert!(schedule.steps.iter().all(|s| s.mode == Mode::Amusement));

        let pitches: Vec<f32> = schedule
            .triggers_of(InstrumentId::Piano)
            .map(|t| t.params.frequencies[0])
            .collect();
        assert_eq!(pitches.len(), schedule.steps.len());
        assert_eq!(pitches[0], 261.63);
        assert_eq!(pitches[7], 523.25);
        assert!(pitches[8..].iter().all(|&p| p == 523.25));
    }

    #[test]
    fn meditation_melody_plays_every_other_beat() {
        let config = SonifyConfig::default();
        // emg 0.2: gate passes (> 0.1) but steps down (< 0.25)
        let schedule = run(&config, &features(20.0, 65.0, 0.0, 0.2, 10.0));
        let notes: Vec<&Trigger> = schedule.triggers_of(InstrumentId::Piano).collect();
        let beats: Vec<u64> = notes
            .iter()
            .filter_map(|t| schedule.step_at(t.offset_ms).map(|s| s.beat))
            .collect();
        assert!(beats.iter().all(|b| b % 2 == 0));
        assert!(!notes.is_empty());
        assert!(notes.iter().all(|t| t.params.frequencies[0] == 261.63));

        // respiration only counts after the 5 s warm-up, so the first bars are BASELINE
        let switch = schedule.transitions.last().unwrap();
        assert_eq!(switch.to, Mode::Meditation);
        assert!(schedule
            .triggers_of(InstrumentId::Kick)
            .all(|t| t.offset_ms < switch.position_ms));
    }

    #[test]
    fn mode_is_only_reevaluated_on_bar_lines() {
        let config = SonifyConfig::default();
        let len = (30.0 * RATE) as usize;
        // stress signature appears at 2.5 s, mid-bar at 90 bpm
        let eda: Vec<f32> = (0..len).map(|i| if i >= 250 { 0.8 } else { 0.0 }).collect();
        let set = FeatureSet::new(FeatureTracks {
            heart_rate: SignalTrack::constant(90.0, len, RATE),
            eda: SignalTrack::new(eda, RATE),
            emg: SignalTrack::constant(0.0, len, RATE),
            resp_swell: SignalTrack::constant(0.5, len, RATE),
            resp_rate: SignalTrack::constant(18.0, len, RATE),
            temperature: SignalTrack::constant(0.5, len, RATE),
            motion: None,
        })
        .unwrap();

        let schedule = run(&config, &set);
        assert_eq!(schedule.transitions.len(), 1);
        let switch = schedule.transitions[0];
        assert_eq!(switch.to, Mode::Stress);
        assert_eq!(switch.beat % BEATS_PER_BAR, 0);
        assert_eq!(switch.beat, 4);
    }

    #[test]
    fn mode_follows_the_clamped_tempo() {
        let mut config = SonifyConfig::default();
        config.tempo.min_bpm = 80.0;
        // measured 70 bpm plays at 80 bpm, and 80 bpm with active EMG is AMUSEMENT
        let schedule = run(&config, &features(8.0, 70.0, 0.0, 0.5, 10.0));

        assert!(schedule.steps.iter().all(|s| (s.beat_ms - 750.0).abs() < 1e-9));
        assert!(schedule.steps.iter().all(|s| s.mode == Mode::Amusement));
        assert_eq!(schedule.transitions[0].beat, 0);
    }

    #[test]
    fn unknown_scale_fails_at_construction() {
        let mut config = SonifyConfig::default();
        config.arrangements.stress.scale = "phrygian".into();
        assert!(matches!(
            BeatScheduler::new(&config),
            Err(ConfigError::UnknownScale(name)) if name == "phrygian"
        ));
    }
}
