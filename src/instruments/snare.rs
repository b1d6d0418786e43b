//! Snare drum.
//!
//! # How It Works
//!
//! 1. 180 Hz sine at -8 dB for the drum shell tone
//! 2. White noise high-passed at 2 kHz, -12 dB, for the wires
//! 3. Both layers share one 100 ms fade-out
//!
//! # Variations
//!
//! - Raise the noise layer for a brushier snare
//! - Lower the sine to ~150 Hz for a fatter backbeat

use crate::graph::{
    envelope::FadeNode, extensions::NodeExt, filter::FilterNode, oscillator::OscNode, GraphNode,
};

pub fn snare() -> impl GraphNode {
    let shell = OscNode::sine().with_frequency(180.0).gain_db(-8.0);
    let wires = OscNode::noise()
        .through(FilterNode::highpass(2_000.0))
        .gain_db(-12.0);

    shell.layer(wires).amplify(FadeNode::fade_out(0.100))
}
