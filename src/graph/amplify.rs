use crate::{
    dsp::amplify::{apply_gain, db_to_gain, multiply_in_place},
    graph::node::{GraphNode, RenderCtx},
    MAX_BLOCK_SIZE,
};

/// Signal × modulator, sample by sample (envelope control).
pub struct Amplify<N, M> {
    pub signal: N,
    pub modulator: M,
    temp_buffer: Vec<f32>,
}

impl<N, M> Amplify<N, M> {
    pub fn new(signal: N, modulator: M) -> Self {
        Self {
            signal,
            modulator,
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }
}

impl<N: GraphNode, M: GraphNode> GraphNode for Amplify<N, M> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.signal.render_block(out, ctx);

        // Slice temp buffer to match output size (no allocation)
        let frames = &mut self.temp_buffer[..out.len()];
        frames.fill(0.0);
        self.modulator.render_block(frames, ctx);

        multiply_in_place(out, frames);
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.signal.note_on(ctx);
        self.modulator.note_on(ctx);
    }
}

/// Constant gain in decibels.
pub struct Gain<N> {
    source: N,
    gain: f32,
}

impl<N> Gain<N> {
    pub fn db(source: N, db: f32) -> Self {
        Self {
            source,
            gain: db_to_gain(db),
        }
    }

    pub fn linear(&self) -> f32 {
        self.gain
    }
}

impl<N: GraphNode> GraphNode for Gain<N> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.source.render_block(out, ctx);
        apply_gain(out, self.gain);
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.source.note_on(ctx);
    }
}
