//! Square-wave chord pad.
//!
//! Every chord tone as a square wave an octave down, softened by a 500 Hz
//! low-pass so only the hollow low harmonics remain. 500 ms fades on both
//! ends let consecutive bars blend. -22 dB.

use crate::graph::{
    envelope::FadeNode,
    extensions::NodeExt,
    filter::FilterNode,
    mix::Stack,
    oscillator::OscNode,
    GraphNode,
};

pub fn chord_pad(tones: &[f32]) -> impl GraphNode {
    let voices = tones
        .iter()
        .map(|&freq| OscNode::square().with_frequency(freq).octave(-1).boxed())
        .collect();

    Stack::new(voices)
        .through(FilterNode::lowpass(500.0))
        .amplify(FadeNode::new(0.500, 0.500))
        .gain_db(-22.0)
}
