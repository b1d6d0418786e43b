//! Low-level DSP primitives used by the higher level graph nodes.
//!
//! These stay focused on the signal-processing math; the graph combinators in
//! [`crate::graph`] layer instrument design on top of them, and the mixer uses
//! the buffer helpers in [`mix`] and [`amplify`] directly.

/// Gain staging: decibel conversion and buffer scaling.
pub mod amplify;
/// Linear fade-in/fade-out envelope.
pub mod envelope;
/// State-variable filter implementation with multiple responses.
pub mod filter;
/// Buffer summing and peak measurement.
pub mod mix;
/// Oscillator waveforms and noise sources.
pub mod oscillator;

pub use envelope::Fade;
