//! Distorted-guitar style power chord.
//!
//! Root and fifth of the current chord, each an octave down, as raw sawtooth
//! "strings". Intensity (0..1) opens the tone and the level together:
//!
//! | intensity | cutoff  | level  |
//! | --------- | ------- | ------ |
//! | 0.0       | 500 Hz  | -25 dB |
//! | 0.5       | 2000 Hz | -19 dB |
//! | 1.0       | 3500 Hz | -13 dB |
//!
//! 100 ms fade-in, 500 ms fade-out; the chord lasts a whole bar.

use crate::graph::{
    envelope::FadeNode,
    extensions::NodeExt,
    filter::FilterNode,
    mix::Stack,
    oscillator::OscNode,
    GraphNode,
};

/// `tones` is the full triad; the root (first) and fifth (third, or the last
/// tone of a shorter chord) are played.
pub fn power_chord(tones: &[f32], intensity: f32) -> impl GraphNode {
    let cutoff = 500.0 + intensity * 3_000.0;

    let strings = power_chord_tones(tones)
        .into_iter()
        .map(|freq| {
            OscNode::sawtooth()
                .with_frequency(freq)
                .octave(-1)
                .through(FilterNode::lowpass(cutoff))
                .boxed()
        })
        .collect();

    Stack::new(strings)
        .amplify(FadeNode::new(0.100, 0.500))
        .gain_db(-25.0 + intensity * 12.0)
}

fn power_chord_tones(tones: &[f32]) -> Vec<f32> {
    match tones {
        [] => Vec::new(),
        [root] => vec![*root],
        [root, _, fifth, ..] => vec![*root, *fifth],
        [root, other] => vec![*root, *other],
    }
}
