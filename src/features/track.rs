use std::ops::Range;

/// Samples of one signal at a fixed rate. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalTrack {
    samples: Vec<f32>,
    sample_rate: f64,
}

impl SignalTrack {
    pub fn new(samples: Vec<f32>, sample_rate: f64) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// A track holding `value` for `len` samples.
    pub fn constant(value: f32, len: usize, sample_rate: f64) -> Self {
        Self::new(vec![value; len], sample_rate)
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f32> {
        self.samples.get(index).copied()
    }

    pub fn duration_ms(&self) -> f64 {
        if self.sample_rate > 0.0 {
            self.samples.len() as f64 * 1000.0 / self.sample_rate
        } else {
            0.0
        }
    }

    /// Mean over `range`, clipped to the track. `None` when nothing is left.
    pub fn mean_over(&self, range: Range<usize>) -> Option<f32> {
        let end = range.end.min(self.samples.len());
        let window = self.samples.get(range.start..end)?;
        if window.is_empty() {
            return None;
        }
        Some((window.iter().map(|&s| s as f64).sum::<f64>() / window.len() as f64) as f32)
    }

    /// Min–max normalization into [0, 1].
    ///
    /// The denominator is `max(max - min, epsilon)`, so a flat track maps to
    /// all zeros instead of dividing by zero.
    pub fn normalized(&self, epsilon: f32) -> SignalTrack {
        SignalTrack::new(normalize(&self.samples, epsilon), self.sample_rate)
    }
}

pub(crate) fn normalize(samples: &[f32], epsilon: f32) -> Vec<f32> {
    let (min, max) = samples
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &s| (lo.min(s), hi.max(s)));
    let span = (max - min).max(epsilon);

    samples
        .iter()
        .map(|&s| ((s - min) / span).clamp(0.0, 1.0))
        .collect()
}
