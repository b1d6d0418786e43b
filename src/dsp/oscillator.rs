use std::f64::consts::TAU;

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::graph::node::RenderCtx;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OscillatorWaveform {
    Sine,
    Saw,
    Square,
    Triangle,
    Noise,
}

/// Phase-accumulating oscillator.
///
/// Phase is kept in `[0, 1)` as an `f64` so long renders (a full minute at
/// 44.1 kHz) do not drift. The noise source draws from a seeded generator and
/// is therefore reproducible: the same seed always yields the same hiss.
pub struct OscillatorBlock {
    waveform: OscillatorWaveform,
    phase: f64,
    rng: StdRng,
}

impl OscillatorBlock {
    pub fn new(waveform: OscillatorWaveform) -> Self {
        Self {
            waveform,
            phase: 0.0,
            rng: StdRng::seed_from_u64(0),
        }
    }

    pub fn sine() -> Self {
        Self::new(OscillatorWaveform::Sine)
    }

    pub fn sawtooth() -> Self {
        Self::new(OscillatorWaveform::Saw)
    }

    pub fn square() -> Self {
        Self::new(OscillatorWaveform::Square)
    }

    pub fn triangle() -> Self {
        Self::new(OscillatorWaveform::Triangle)
    }

    pub fn noise() -> Self {
        Self::new(OscillatorWaveform::Noise)
    }

    pub fn waveform(&self) -> OscillatorWaveform {
        self.waveform
    }

    /// Restart from phase zero and reseed the noise generator.
    pub fn reset(&mut self, seed: u64) {
        self.phase = 0.0;
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn render(&mut self, destination: &mut [f32], ctx: &RenderCtx) {
        let increment = ctx.frequency as f64 / ctx.sample_rate as f64;

        for sample in destination.iter_mut() {
            *sample = match self.waveform {
                OscillatorWaveform::Sine => (TAU * self.phase).sin() as f32,
                OscillatorWaveform::Saw => (2.0 * self.phase - 1.0) as f32,
                OscillatorWaveform::Square => {
                    if self.phase < 0.5 {
                        1.0
                    } else {
                        -1.0
                    }
                }
                OscillatorWaveform::Triangle => (1.0 - 4.0 * (self.phase - 0.5).abs()) as f32,
                OscillatorWaveform::Noise => self.rng.gen_range(-1.0f32..=1.0),
            };
            self.phase = (self.phase + increment).fract();
        }
    }
}
