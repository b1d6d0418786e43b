//! Beat-synchronous sonification of physiological recordings.
//!
//! A recording is cut into labelled segments, each segment is reduced to
//! aligned feature tracks, and a beat scheduler walks those tracks at the
//! subject's own heart rate, arranging drums, chords and melody according to
//! the affective mode it infers every bar. The resulting triggers are rendered
//! by an instrument bank and summed into one master track per segment.

pub mod config;
pub mod dsp;
pub mod error;
pub mod features;
pub mod graph; // Composable audio graph nodes
pub mod instruments;
pub mod io;
pub mod mixer;
pub mod render;
pub mod sequencing; // Modes, arrangement and the beat scheduler

pub use config::SonifyConfig;
pub use error::{ConfigError, ExportError, FeatureUnavailable, InputError, PreconditionError, SegmentError};
pub use render::{RenderedSegment, SegmentOutcome, Sonifier};

pub const MAX_BLOCK_SIZE: usize = 2048;

/// Convert a timeline length in milliseconds to a whole number of samples.
///
/// Always rounds down, so `ms_to_samples(a) + ms_to_samples(b)` never exceeds
/// `ms_to_samples(a + b)`. The mixer relies on this to keep clamped triggers
/// inside the master track.
#[inline]
pub fn ms_to_samples(ms: f64, sample_rate: u32) -> usize {
    if !ms.is_finite() || ms <= 0.0 {
        return 0;
    }
    (ms * sample_rate as f64 / 1000.0).floor() as usize
}
