use crate::MAX_BLOCK_SIZE;

/// Context passed to graph nodes during rendering
///
/// Contains information about what to render:
/// - sample_rate: Audio sample rate (e.g., 44100.0)
/// - frequency: Pitch to render (Hz), for nodes that follow the note
/// - duration_samples: Length of the note being rendered
/// - seed: Seed for noise sources, so a render is reproducible
#[derive(Debug, Clone, Copy)]
pub struct RenderCtx {
    pub sample_rate: f32,
    pub frequency: f32,
    pub duration_samples: usize,
    pub seed: u64,
}

impl RenderCtx {
    pub fn new(sample_rate: f32, duration_samples: usize) -> Self {
        Self {
            sample_rate,
            frequency: 440.0,
            duration_samples,
            seed: 0,
        }
    }

    pub fn with_frequency(mut self, frequency: f32) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Core trait for audio processing graph nodes
///
/// A node renders fixed-length notes: `note_on` announces the note (length,
/// pitch, seed) and `render_block` is then called until the note is filled.
pub trait GraphNode: Send {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx);

    /// Triggered when a note starts
    ///
    /// Default implementation does nothing (stateless nodes).
    fn note_on(&mut self, _ctx: &RenderCtx) {}
}

/// Allow boxed graph nodes to be used as graph nodes (for dynamic dispatch)
impl GraphNode for Box<dyn GraphNode> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        (**self).render_block(out, ctx)
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        (**self).note_on(ctx)
    }
}

/// Render one whole note of `ctx.duration_samples` samples.
///
/// Blocks are at most [`MAX_BLOCK_SIZE`] long, so nodes with scratch buffers
/// never need to grow them.
pub fn render_buffer<N: GraphNode + ?Sized>(node: &mut N, ctx: &RenderCtx) -> Vec<f32> {
    let mut buffer = vec![0.0f32; ctx.duration_samples];
    node.note_on(ctx);
    for block in buffer.chunks_mut(MAX_BLOCK_SIZE) {
        node.render_block(block, ctx);
    }
    buffer
}
