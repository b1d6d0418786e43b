//! External interfaces: recordings in, segment windows, WAV out.

pub mod recording;
pub mod segment;
pub mod wav;

pub use recording::Recording;
pub use segment::{select_window, SegmentSpec, SegmentWindow, StartStrategy};
pub use wav::{output_path, write_wav};
