//! The instrument bank: pure renders of fixed-length sounds.
//!
//! Each instrument is a node graph built fresh for every render from the
//! trigger parameters, in the same way a voice is built in a synth patch. The
//! bank knows nothing about the timeline; the scheduler has already decided
//! pitch, intensity, level and length.
//!
//! ```ignore
//! use biosonic::instruments::{InstrumentBank, InstrumentId, InstrumentParams, SynthBank};
//!
//! let bank = SynthBank::new(44_100, 7);
//! let hit = bank.render(InstrumentId::Kick, &InstrumentParams::default(), 100.0);
//! assert_eq!(hit.len(), 4_410);
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::dsp::amplify::{apply_gain, db_to_gain};
use crate::graph::{render_buffer, GraphNode, RenderCtx};
use crate::ms_to_samples;

mod breath_pad;
mod cache;
mod chord_pad;
mod hihat;
mod kick;
mod piano;
mod power_chord;
mod snare;
mod warmth_drone;

pub use breath_pad::breath_pad;
pub use cache::{CacheStats, CachedBank, DEFAULT_CACHE_ENTRIES};
pub use chord_pad::chord_pad;
pub use hihat::hihat;
pub use kick::kick;
pub use piano::piano;
pub use power_chord::power_chord;
pub use snare::snare;
pub use warmth_drone::warmth_drone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentId {
    Kick,
    Snare,
    HiHat,
    Piano,
    PowerChord,
    ChordPad,
    BreathPad,
    WarmthDrone,
}

impl InstrumentId {
    /// Length of a one-shot hit, used when an arrangement does not say.
    pub fn natural_duration_ms(self) -> f64 {
        match self {
            InstrumentId::Kick => 100.0,
            InstrumentId::Snare => 150.0,
            InstrumentId::HiHat => 50.0,
            InstrumentId::Piano => 400.0,
            InstrumentId::PowerChord => 2_000.0,
            InstrumentId::ChordPad => 2_000.0,
            InstrumentId::BreathPad => 500.0,
            InstrumentId::WarmthDrone => 1_000.0,
        }
    }

    /// Always-on layers re-rendered every beat with feature-driven intensity
    /// and a one-beat length; their parameters almost never repeat.
    pub fn is_ambient(self) -> bool {
        matches!(self, InstrumentId::BreathPad | InstrumentId::WarmthDrone)
    }
}

impl fmt::Display for InstrumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InstrumentId::Kick => "kick",
            InstrumentId::Snare => "snare",
            InstrumentId::HiHat => "hihat",
            InstrumentId::Piano => "piano",
            InstrumentId::PowerChord => "power_chord",
            InstrumentId::ChordPad => "chord_pad",
            InstrumentId::BreathPad => "breath_pad",
            InstrumentId::WarmthDrone => "warmth_drone",
        };
        f.write_str(name)
    }
}

/// Everything an instrument needs besides its length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstrumentParams {
    /// Note pitch (melody) or chord tones (pads, power chord), in Hz.
    pub frequencies: Vec<f32>,
    /// Feature-driven intensity in [0, 1].
    pub intensity: f32,
    /// Level offset applied after the instrument's own gain staging.
    pub gain_db: f32,
    /// Chord name, for logs and inspection only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chord: Option<String>,
}

impl InstrumentParams {
    pub fn note(frequency: f32) -> Self {
        Self {
            frequencies: vec![frequency],
            ..Self::default()
        }
    }

    pub fn chord(name: impl Into<String>, tones: &[f32]) -> Self {
        Self {
            frequencies: tones.to_vec(),
            chord: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn with_gain_db(mut self, gain_db: f32) -> Self {
        self.gain_db = gain_db;
        self
    }

    /// Bit patterns of every field that changes the rendered audio.
    pub(crate) fn fingerprint(&self) -> (Vec<u32>, u32, u32) {
        (
            self.frequencies.iter().map(|f| f.to_bits()).collect(),
            self.intensity.to_bits(),
            self.gain_db.to_bits(),
        )
    }
}

/// A rendered mono sound. Cheap to clone.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundBuffer {
    samples: Arc<[f32]>,
    sample_rate: u32,
}

impl SoundBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples: samples.into(),
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Maps (instrument, parameters, duration) to a sound.
///
/// Implementations must be deterministic: equal arguments give equal buffers.
pub trait InstrumentBank: Send + Sync {
    fn sample_rate(&self) -> u32;

    fn render(&self, instrument: InstrumentId, params: &InstrumentParams, duration_ms: f64) -> SoundBuffer;
}

impl<B: InstrumentBank + ?Sized> InstrumentBank for &B {
    fn sample_rate(&self) -> u32 {
        (**self).sample_rate()
    }

    fn render(&self, instrument: InstrumentId, params: &InstrumentParams, duration_ms: f64) -> SoundBuffer {
        (**self).render(instrument, params, duration_ms)
    }
}

/// The built-in synthesized instruments.
#[derive(Debug, Clone)]
pub struct SynthBank {
    sample_rate: u32,
    seed: u64,
}

impl SynthBank {
    pub fn new(sample_rate: u32, seed: u64) -> Self {
        Self { sample_rate, seed }
    }

    /// Build the node graph for one note.
    pub fn voice(instrument: InstrumentId, params: &InstrumentParams) -> Box<dyn GraphNode> {
        let intensity = params.intensity;
        let tones = params.frequencies.as_slice();
        match instrument {
            InstrumentId::Kick => Box::new(kick()),
            InstrumentId::Snare => Box::new(snare()),
            InstrumentId::HiHat => Box::new(hihat()),
            InstrumentId::Piano => Box::new(piano()),
            InstrumentId::PowerChord => Box::new(power_chord(tones, intensity)),
            InstrumentId::ChordPad => Box::new(chord_pad(tones)),
            InstrumentId::BreathPad => Box::new(breath_pad(tones, intensity)),
            InstrumentId::WarmthDrone => Box::new(warmth_drone(intensity)),
        }
    }

    fn note_seed(&self, instrument: InstrumentId, params: &InstrumentParams, len: usize) -> u64 {
        let (freqs, intensity, gain) = params.fingerprint();
        let mut state = splitmix64(self.seed ^ (instrument as u64 + 1));
        for bits in freqs {
            state = splitmix64(state ^ bits as u64);
        }
        state = splitmix64(state ^ intensity as u64);
        state = splitmix64(state ^ gain as u64);
        splitmix64(state ^ len as u64)
    }
}

impl InstrumentBank for SynthBank {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn render(&self, instrument: InstrumentId, params: &InstrumentParams, duration_ms: f64) -> SoundBuffer {
        let len = ms_to_samples(duration_ms, self.sample_rate);
        let pitch = params.frequencies.first().copied().unwrap_or(440.0);
        let ctx = RenderCtx::new(self.sample_rate as f32, len)
            .with_frequency(pitch)
            .with_seed(self.note_seed(instrument, params, len));

        let mut voice = Self::voice(instrument, params);
        let mut samples = render_buffer(&mut voice, &ctx);
        if params.gain_db != 0.0 {
            apply_gain(&mut samples, db_to_gain(params.gain_db));
        }
        SoundBuffer::new(samples, self.sample_rate)
    }
}

#[inline]
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::mix::peak;

    const ALL: [InstrumentId; 8] = [
        InstrumentId::Kick,
        InstrumentId::Snare,
        InstrumentId::HiHat,
        InstrumentId::Piano,
        InstrumentId::PowerChord,
        InstrumentId::ChordPad,
        InstrumentId::BreathPad,
        InstrumentId::WarmthDrone,
    ];

    fn params() -> InstrumentParams {
        InstrumentParams::chord("C", &[261.63, 329.63, 392.0]).with_intensity(0.6)
    }

    #[test]
    fn every_instrument_renders_the_requested_length() {
        let bank = SynthBank::new(44_100, 1);
        for id in ALL {
            let buffer = bank.render(id, &params(), 250.0);
            assert_eq!(buffer.len(), 11_025, "{id}");
            assert!(buffer.samples().iter().all(|s| s.is_finite()), "{id}");
            assert!(peak(buffer.samples()) > 0.0, "{id} is silent");
        }
    }

    #[test]
    fn renders_are_deterministic() {
        let a = SynthBank::new(44_100, 9);
        let b = SynthBank::new(44_100, 9);
        for id in ALL {
            assert_eq!(a.render(id, &params(), 120.0), b.render(id, &params(), 120.0), "{id}");
        }
    }

    #[test]
    fn bank_seed_changes_noise_but_not_tones() {
        let a = SynthBank::new(44_100, 1);
        let b = SynthBank::new(44_100, 2);
        let p = InstrumentParams::default();
        assert_ne!(a.render(InstrumentId::HiHat, &p, 50.0), b.render(InstrumentId::HiHat, &p, 50.0));
        assert_eq!(a.render(InstrumentId::Kick, &p, 100.0), b.render(InstrumentId::Kick, &p, 100.0));
    }

    #[test]
    fn gain_offset_is_applied() {
        let bank = SynthBank::new(44_100, 0);
        let plain = bank.render(InstrumentId::Kick, &InstrumentParams::default(), 100.0);
        let loud = bank.render(
            InstrumentId::Kick,
            &InstrumentParams::default().with_gain_db(20.0),
            100.0,
        );
        assert!((peak(loud.samples()) - 10.0 * peak(plain.samples())).abs() < 1e-3);
    }

    #[test]
    fn intensity_brightens_the_power_chord() {
        let bank = SynthBank::new(44_100, 0);
        let calm = bank.render(InstrumentId::PowerChord, &params().with_intensity(0.0), 500.0);
        let tense = bank.render(InstrumentId::PowerChord, &params().with_intensity(1.0), 500.0);
        assert!(peak(tense.samples()) > peak(calm.samples()));
    }

    #[test]
    fn zero_duration_is_empty() {
        let bank = SynthBank::new(44_100, 0);
        assert!(bank.render(InstrumentId::Snare, &params(), 0.0).is_empty());
    }
}
