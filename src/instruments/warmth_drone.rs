//! Temperature drone.
//!
//! Filtered noise that brightens and swells as skin temperature rises:
//!
//! ```text
//! cutoff = 100 Hz + 800 Hz × warmth
//! level  = -35 dB + 8 dB × warmth
//! ```
//!
//! Long 500 ms fades; with beat-length notes the drone is a continuous bed
//! rather than a pulse.

use crate::graph::{
    envelope::FadeNode, extensions::NodeExt, filter::FilterNode, oscillator::OscNode, GraphNode,
};

pub fn warmth_drone(warmth: f32) -> impl GraphNode {
    OscNode::noise()
        .through(FilterNode::lowpass(100.0 + warmth * 800.0))
        .gain_db(-35.0 + warmth * 8.0)
        .amplify(FadeNode::new(0.500, 0.500))
}
