use crate::{
    dsp::envelope::Fade,
    graph::node::{GraphNode, RenderCtx},
};

/// Fade envelope as a control-signal node; combine with `.amplify()`.
pub struct FadeNode {
    fade: Fade,
}

impl FadeNode {
    pub fn new(fade_in: f32, fade_out: f32) -> Self {
        Self {
            fade: Fade::new(fade_in, fade_out),
        }
    }

    pub fn fade_in(seconds: f32) -> Self {
        Self::new(seconds, 0.0)
    }

    pub fn fade_out(seconds: f32) -> Self {
        Self::new(0.0, seconds)
    }
}

impl GraphNode for FadeNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.fade.render(out, ctx);
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.fade.note_on(ctx);
    }
}
