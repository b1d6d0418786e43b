use crate::graph::node::RenderCtx;

/*
Linear Fade Envelope
====================

Every sound in the instrument bank has a known length before it is rendered:
the scheduler decides the duration, the bank renders exactly that many
samples. That makes a gated ADSR unnecessary. A fade envelope only needs two
numbers, a fade-in time and a fade-out time, anchored to the start and the end
of the note.

Vocabulary
----------

  fade-in     Seconds over which gain ramps 0 → 1 from the first sample.

  fade-out    Seconds over which gain ramps 1 → 0 ending on the last sample.

  total       Length of the note in samples. Set by `note_on` from the render
              context, so the fade-out lands on the real end of the buffer.

  position    Samples rendered since `note_on`.


The Shape
---------

  gain
   1.0 ┐      ___________________
       │     ╱                   ╲
       │    ╱                     ╲
   0.0 └───╱───────────────────────╲──→ samples
         fade-in                fade-out
        |<-------------- total -------------->|

Both ramps are computed independently and multiplied:

    gain_in  = min(1, position / fade_in_samples)
    gain_out = min(1, (total - position) / fade_out_samples)
    gain     = gain_in × gain_out

When the two ramps overlap (a 50 ms hi-hat with a 40 ms fade-out and a
20 ms fade-in, say) the product still falls smoothly to zero at both ends.
A ramp longer than the note is clipped to the note length.

A zero-length ramp is simply absent: a kick with no fade-in starts at full
level on sample 0.
*/

pub struct Fade {
    fade_in: f32,
    fade_out: f32,

    total_samples: usize,
    position: usize,
}

impl Fade {
    pub fn new(fade_in: f32, fade_out: f32) -> Self {
        Self {
            fade_in: fade_in.max(0.0),
            fade_out: fade_out.max(0.0),
            total_samples: 0,
            position: 0,
        }
    }

    /// Fade in only; the note holds full level until its last sample.
    pub fn fade_in(seconds: f32) -> Self {
        Self::new(seconds, 0.0)
    }

    /// Fade out only; the note starts at full level.
    pub fn fade_out(seconds: f32) -> Self {
        Self::new(0.0, seconds)
    }

    /// Start a new note of `ctx.duration_samples` samples.
    pub fn note_on(&mut self, ctx: &RenderCtx) {
        self.total_samples = ctx.duration_samples;
        self.position = 0;
    }

    #[inline]
    fn ramp_samples(seconds: f32, ctx: &RenderCtx, total: usize) -> usize {
        ((seconds * ctx.sample_rate).round() as usize).min(total)
    }

    pub fn next_sample(&mut self, ctx: &RenderCtx) -> f32 {
        let total = self.total_samples;
        if self.position >= total {
            return 0.0;
        }

        let fade_in = Self::ramp_samples(self.fade_in, ctx, total);
        let fade_out = Self::ramp_samples(self.fade_out, ctx, total);

        let gain_in = if fade_in == 0 {
            1.0
        } else {
            (self.position as f32 / fade_in as f32).min(1.0)
        };

        // remaining counts the current sample, so the last sample is 1/fade_out
        // and the sample after it would be zero
        let remaining = total - self.position - 1;
        let gain_out = if fade_out == 0 {
            1.0
        } else {
            (remaining as f32 / fade_out as f32).min(1.0)
        };

        self.position += 1;
        gain_in * gain_out
    }

    pub fn render(&mut self, buffer: &mut [f32], ctx: &RenderCtx) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(ctx);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.position >= self.total_samples
    }
}
