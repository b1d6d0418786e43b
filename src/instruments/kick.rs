//! Kick drum.
//!
//! # How It Works
//!
//! 1. 60 Hz sine provides the body
//! 2. 60 ms linear fade-out ends the note cleanly
//!
//! No pitch sweep: the kick sits underneath pads and chords that already
//! carry the mid range, so a pure low thump reads better than a punchy click.

use crate::graph::{envelope::FadeNode, extensions::NodeExt, oscillator::OscNode, GraphNode};

pub fn kick() -> impl GraphNode {
    OscNode::sine()
        .with_frequency(60.0)
        .amplify(FadeNode::fade_out(0.060))
}
