//! Composable building blocks for constructing instrument graphs.
//!
//! Graph nodes wrap the low-level DSP primitives with what instrument design
//! needs: a note-on event carrying the note length and noise seed, and
//! block-based rendering. The `extensions` module adds fluent helpers so
//! instruments read as a chain (`.through()`, `.layer()`, `.amplify()`).

/// Multiply a signal by a control signal; constant decibel gain.
pub mod amplify;
/// Fade envelope node.
pub mod envelope;
/// Fluent combinators (`.amplify()`, `.layer()`, etc.).
pub mod extensions;
/// Topology-preserving filter node.
pub mod filter;
/// Parallel summing of graphs.
pub mod mix;
/// Core traits shared by all graph nodes.
pub mod node;
/// Audio-band oscillators and noise sources.
pub mod oscillator;
/// Serial chaining of two nodes (source → effect).
pub mod through;

pub use node::{render_buffer, GraphNode, RenderCtx};
