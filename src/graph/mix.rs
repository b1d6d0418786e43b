use crate::{
    dsp::mix::sum_in_place,
    graph::node::{GraphNode, RenderCtx},
    MAX_BLOCK_SIZE,
};

/*
Parallel Layering
=================

Layer sums two graphs at equal weight. It is the additive counterpart to
Amplify (which multiplies). Levels are set on each branch with `.gain_db()`
before layering, so there is no balance parameter.

  Layer: output = A + B

Chords need a layer count chosen at runtime (a power chord has two tones, a
pad three or four), so `Stack` holds any number of boxed voices and sums
them the same way.

Both sources receive note_on, so every layer starts together.
*/

pub struct Layer<A, B> {
    source_a: A,
    source_b: B,
    temp_buffer: Vec<f32>,
}

impl<A, B> Layer<A, B> {
    pub fn new(source_a: A, source_b: B) -> Self {
        Self {
            source_a,
            source_b,
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }
}

impl<A: GraphNode, B: GraphNode> GraphNode for Layer<A, B> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.source_a.render_block(out, ctx);

        let frames = &mut self.temp_buffer[..out.len()];
        frames.fill(0.0);
        self.source_b.render_block(frames, ctx);

        sum_in_place(out, frames);
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.source_a.note_on(ctx);
        self.source_b.note_on(ctx);
    }
}

/// Any number of voices summed together. An empty stack renders silence.
pub struct Stack {
    voices: Vec<Box<dyn GraphNode>>,
    temp_buffer: Vec<f32>,
}

impl Stack {
    pub fn new(voices: Vec<Box<dyn GraphNode>>) -> Self {
        Self {
            voices,
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }
}

impl GraphNode for Stack {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        out.fill(0.0);
        for voice in self.voices.iter_mut() {
            let frames = &mut self.temp_buffer[..out.len()];
            frames.fill(0.0);
            voice.render_block(frames, ctx);
            sum_in_place(out, frames);
        }
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        for voice in self.voices.iter_mut() {
            voice.note_on(ctx);
        }
    }
}
