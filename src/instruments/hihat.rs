//! Hi-hat (closed).
//!
//! # How It Works
//!
//! 1. White noise provides the metallic character
//! 2. High-pass at 8 kHz keeps only the sizzle
//! 3. 40 ms fade-out for a tight "tss"
//! 4. -18 dB so a hat on every beat never crowds the kick

use crate::graph::{
    envelope::FadeNode, extensions::NodeExt, filter::FilterNode, oscillator::OscNode, GraphNode,
};

pub fn hihat() -> impl GraphNode {
    OscNode::noise()
        .through(FilterNode::highpass(8_000.0))
        .amplify(FadeNode::fade_out(0.040))
        .gain_db(-18.0)
}
