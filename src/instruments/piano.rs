//! Piano-like melody note.
//!
//! Follows the note pitch from the render context.
//!
//! # How It Works
//!
//! 1. Sine at the note pitch for the fundamental
//! 2. Sawtooth at the same pitch, low-passed at 1 kHz and 15 dB down, adds
//!    a little hammer brightness without turning into a synth lead
//! 3. 5 ms fade-in (no click), 300 ms fade-out (decay)
//! 4. -8 dB overall
//!
//! Short notes (the 300 ms amusement plucks) are all fade; long ones (the
//! 2.5 s meditation notes) hold and then die away.

use crate::graph::{
    envelope::FadeNode, extensions::NodeExt, filter::FilterNode, oscillator::OscNode, GraphNode,
};

pub fn piano() -> impl GraphNode {
    let body = OscNode::sine();
    let hammer = OscNode::sawtooth()
        .through(FilterNode::lowpass(1_000.0))
        .gain_db(-15.0);

    body.layer(hammer)
        .amplify(FadeNode::new(0.005, 0.300))
        .gain_db(-8.0)
}
