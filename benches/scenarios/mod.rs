//! Real-world scenario benchmarks.
//!
//! Single instrument notes as the scheduler requests them, and whole
//! segments from raw channels to a finished master track.

mod instruments;
mod pipeline;

pub use instruments::bench_instruments;
pub use pipeline::bench_pipeline;
