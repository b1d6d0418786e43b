use crate::dsp::oscillator::OscillatorBlock;
use crate::graph::node::{GraphNode, RenderCtx};

/*
Audio Oscillator
================

An oscillator is the raw sound source of every instrument in the bank. It
generates a repeating waveform at a frequency, producing the material that
filters and fades then shape.

Waveform Types and Their Character:
-----------------------------------

Sine: The purest tone - a single frequency with no harmonics.
  - Use here: kick body, snare tone, piano fundamental, breathing pad

Sawtooth: All harmonics, falling off as 1/n. Bright and buzzy.
  - Use here: piano overtone layer, power chord

Square: Odd harmonics only. Hollow and reedy.
  - Use here: chord pad

Noise: Random samples with no pitch.
  - Use here: snare rattle, hi-hat, warmth drone

Pitch Source:
-------------
By default an oscillator plays `ctx.frequency`, the pitch of the note being
rendered. `with_frequency` pins it to a fixed pitch instead (drums), and
`octave` shifts whatever pitch it ends up with by whole octaves (the guitar
and pad voices sit an octave under the melody they are given).

Noise and Reproducibility:
--------------------------
Noise oscillators reseed from `ctx.seed` at every `note_on`, so rendering the
same note twice gives the same hiss. `with_seed_offset` decorrelates two noise
layers inside one instrument.

Example usage:
  let snare = OscNode::sine()
      .with_frequency(180.0)
      .gain_db(-8.0)
      .layer(OscNode::noise().through(FilterNode::highpass(2_000.0)).gain_db(-12.0))
      .amplify(FadeNode::fade_out(0.1));
*/

pub struct OscNode {
    osc: OscillatorBlock,
    /// Fixed frequency (Hz). If Some, ignores ctx.frequency and uses this instead.
    fixed_frequency: Option<f32>,
    /// Octave shift applied to the resolved frequency.
    octave: i32,
    seed_offset: u64,
}

impl OscNode {
    fn new(osc: OscillatorBlock) -> Self {
        Self {
            osc,
            fixed_frequency: None,
            octave: 0,
            seed_offset: 0,
        }
    }

    pub fn sine() -> Self {
        Self::new(OscillatorBlock::sine())
    }

    pub fn sawtooth() -> Self {
        Self::new(OscillatorBlock::sawtooth())
    }

    pub fn square() -> Self {
        Self::new(OscillatorBlock::square())
    }

    pub fn noise() -> Self {
        Self::new(OscillatorBlock::noise())
    }

    /// Set a fixed frequency, ignoring the note pitch from RenderCtx.
    pub fn with_frequency(mut self, freq: f32) -> Self {
        self.fixed_frequency = Some(freq);
        self
    }

    /// Shift the pitch by whole octaves (negative = down).
    pub fn octave(mut self, octaves: i32) -> Self {
        self.octave = octaves;
        self
    }

    pub fn with_seed_offset(mut self, offset: u64) -> Self {
        self.seed_offset = offset;
        self
    }

    fn resolved_frequency(&self, ctx: &RenderCtx) -> f32 {
        let base = self.fixed_frequency.unwrap_or(ctx.frequency);
        base * 2.0_f32.powi(self.octave)
    }
}

impl GraphNode for OscNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let modified_ctx = RenderCtx {
            frequency: self.resolved_frequency(ctx),
            ..*ctx
        };
        self.osc.render(out, &modified_ctx);
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.osc.reset(ctx.seed.wrapping_add(self.seed_offset));
    }
}
