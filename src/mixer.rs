//! Sums rendered triggers into one master track.
//!
//! ```text
//!  master  |--------------------------------------------|  duration_ms
//!  kick    |##      ##      ##      ##                  |
//!  pad     |#########################                   |
//!  sum     |==================================----------|
//! ```
//!
//! Overlay is a plain add at `ms_to_samples(offset)`, so the order triggers
//! are applied in only changes the result by float rounding. Anything that
//! would land past the end is dropped and counted.

use tracing::warn;

use crate::dsp::mix::{normalize_to, peak, sum_in_place};
use crate::instruments::{InstrumentBank, SoundBuffer};
use crate::ms_to_samples;
use crate::sequencing::Trigger;

#[derive(Debug, Clone, PartialEq)]
pub struct MasterTrack {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl MasterTrack {
    /// Silence of exactly `duration_ms`.
    pub fn silent(duration_ms: f64, sample_rate: u32) -> Self {
        Self {
            samples: vec![0.0; ms_to_samples(duration_ms, sample_rate)],
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_ms(&self) -> f64 {
        self.samples.len() as f64 * 1000.0 / self.sample_rate as f64
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    /// Add `buffer` starting at `offset_ms`. Returns how many samples fell
    /// past the end of the track.
    ///
    /// The buffer must be rendered at the track's sample rate.
    pub fn overlay(&mut self, buffer: &SoundBuffer, offset_ms: f64) -> usize {
        debug_assert_eq!(
            buffer.sample_rate(),
            self.sample_rate,
            "sound rendered at a different rate than the master track"
        );
        let start = ms_to_samples(offset_ms, self.sample_rate).min(self.samples.len());
        let room = self.samples.len() - start;
        let source = buffer.samples();
        let fits = source.len().min(room);

        sum_in_place(&mut self.samples[start..start + fits], &source[..fits]);

        let dropped = source.len() - fits;
        if dropped > 0 {
            warn!(offset_ms, dropped, "overlay truncated at end of track");
        }
        dropped
    }

    /// Scale down so the peak sits at `ceiling`. Quieter tracks are left as is.
    pub fn finalize(&mut self, ceiling: f32) {
        if peak(&self.samples) > ceiling {
            normalize_to(&mut self.samples, ceiling);
        }
    }
}

/// Render every trigger through `bank` and overlay it. Returns the total
/// number of dropped samples.
pub fn render_triggers<B: InstrumentBank + ?Sized>(
    master: &mut MasterTrack,
    bank: &B,
    triggers: &[Trigger],
) -> usize {
    triggers
        .iter()
        .map(|trigger| {
            let buffer = bank.render(trigger.instrument, &trigger.params, trigger.duration_ms);
            master.overlay(&buffer, trigger.offset_ms)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(samples: &[f32]) -> SoundBuffer {
        SoundBuffer::new(samples.to_vec(), 1000)
    }

    #[test]
    fn silent_track_has_exact_length() {
        assert_eq!(MasterTrack::silent(8000.0, 44_100).len(), 352_800);
        assert_eq!(MasterTrack::silent(0.0, 44_100).len(), 0);
    }

    #[test]
    fn overlaps_sum() {
        let mut master = MasterTrack::silent(10.0, 1000);
        master.overlay(&buffer(&[0.25; 4]), 2.0);
        master.overlay(&buffer(&[0.5; 4]), 4.0);
        assert_eq!(
            master.samples(),
            &[0.0, 0.0, 0.25, 0.25, 0.75, 0.75, 0.5, 0.5, 0.0, 0.0]
        );
    }

    #[test]
    fn order_does_not_matter() {
        let a = buffer(&[0.1, 0.2, 0.3]);
        let b = buffer(&[-0.4, 0.5]);

        let mut forward = MasterTrack::silent(10.0, 1000);
        forward.overlay(&a, 1.0);
        forward.overlay(&b, 6.0);

        let mut backward = MasterTrack::silent(10.0, 1000);
        backward.overlay(&b, 6.0);
        backward.overlay(&a, 1.0);

        assert_eq!(forward, backward);
    }

    #[test]
    fn overflow_is_counted_not_written() {
        let mut master = MasterTrack::silent(5.0, 1000);
        assert_eq!(master.overlay(&buffer(&[1.0; 4]), 3.0), 2);
        assert_eq!(master.samples(), &[0.0, 0.0, 0.0, 1.0, 1.0]);

        assert_eq!(master.overlay(&buffer(&[1.0; 2]), 50.0), 2);
        assert_eq!(master.len(), 5);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "different rate")]
    fn overlay_rejects_a_foreign_sample_rate() {
        let mut master = MasterTrack::silent(10.0, 1000);
        master.overlay(&SoundBuffer::new(vec![0.5; 4], 2000), 0.0);
    }

    #[test]
    fn finalize_only_attenuates() {
        let mut loud = MasterTrack::silent(3.0, 1000);
        loud.overlay(&buffer(&[2.0, -1.0, 0.5]), 0.0);
        loud.finalize(0.9);
        assert!((peak(loud.samples()) - 0.9).abs() < 1e-6);
        assert!((loud.samples()[1] + 0.45).abs() < 1e-6);

        let mut quiet = MasterTrack::silent(3.0, 1000);
        quiet.overlay(&buffer(&[0.2, -0.1, 0.0]), 0.0);
        quiet.finalize(0.9);
        assert_eq!(quiet.samples(), &[0.2, -0.1, 0.0]);
    }
}
