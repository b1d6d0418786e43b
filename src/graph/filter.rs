use crate::{
    dsp::filter::SVFilter,
    graph::node::{GraphNode, RenderCtx},
};

/*
State-Variable Filter (SVF)
===========================

A filter removes or attenuates frequencies. The instruments start from
harmonically rich material (sawtooth, square, noise) and carve it down.

Filter Types:
-------------

Lowpass (LP): Passes frequencies BELOW the cutoff.
  - Lower cutoff = darker. The power chord and warmth drone open their
    cutoff with intensity, so a calm signal sounds muffled and an agitated
    one sounds bright.

Highpass (HP): Passes frequencies ABOVE the cutoff.
  - Turns white noise into hiss for the hi-hat and snare.

Bandpass (BP): Passes frequencies AROUND the cutoff.

Cutoff (Hz) guide:
  - 100 Hz:    Rumble
  - 500 Hz:    Warm, muffled
  - 2000 Hz:   Present
  - 8000 Hz:   Air, sizzle

The filter state is cleared at every note_on so a cached render never
depends on the note before it.

Example usage:
  let grit = OscNode::sawtooth().through(FilterNode::lowpass(500.0 + 3000.0 * intensity));
*/

pub struct FilterNode {
    filter: SVFilter,
}

impl FilterNode {
    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self {
            filter: SVFilter::lowpass(cutoff_hz),
        }
    }

    pub fn highpass(cutoff_hz: f32) -> Self {
        Self {
            filter: SVFilter::highpass(cutoff_hz),
        }
    }
}

impl GraphNode for FilterNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.filter.render(out, ctx);
    }

    fn note_on(&mut self, _ctx: &RenderCtx) {
        self.filter.reset();
    }
}
