//! Breathing pad.
//!
//! Sine chord whose level follows the respiration swell, so the pad rises and
//! falls with each breath. Re-triggered every beat with the current swell:
//!
//! ```text
//! level = -40 dB + 25 dB × swell
//! ```
//!
//! 100 ms fades keep the per-beat slices from clicking.

use crate::graph::{
    envelope::FadeNode,
    extensions::NodeExt,
    mix::Stack,
    oscillator::OscNode,
    GraphNode,
};

pub fn breath_pad(tones: &[f32], swell: f32) -> impl GraphNode {
    let voices = tones
        .iter()
        .map(|&freq| OscNode::sine().with_frequency(freq).boxed())
        .collect();

    Stack::new(voices)
        .gain_db(-40.0 + swell * 25.0)
        .amplify(FadeNode::new(0.100, 0.100))
}
