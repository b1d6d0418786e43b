use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::graph::node::RenderCtx;

/*
| type      | passes          | rejects      | used for                        |
| --------- | --------------- | ------------ | ------------------------------- |
| low-pass  | below cutoff    | above cutoff | guitar grit, drone warmth, pads |
| high-pass | above cutoff    | below cutoff | hi-hat and snare hiss           |
| band-pass | around cutoff   | both sides   | ECG QRS isolation               |
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    LowPass,
    HighPass,
    BandPass,
}

pub struct FilterOutputs {
    pub lowpass: f32,
    pub bandpass: f32,
    pub highpass: f32,
}

/// Topology-preserving-transform state-variable filter (2-pole, 12 dB/oct).
pub struct SVFilter {
    ic1eq: f32,
    ic2eq: f32,

    pub cutoff_hz: f32,
    pub resonance: f32,
    filter_type: FilterType,
}

impl SVFilter {
    pub fn new(filter_type: FilterType, cutoff_hz: f32) -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            cutoff_hz,
            resonance: 0.0,
            filter_type,
        }
    }

    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::LowPass, cutoff_hz)
    }

    pub fn highpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::HighPass, cutoff_hz)
    }

    pub fn bandpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::BandPass, cutoff_hz)
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    // Cutoff is pinned below Nyquist; tan() blows up at exactly sample_rate / 2.
    #[inline]
    fn compute_g(&self, sample_rate: f32) -> f32 {
        let cutoff = self.cutoff_hz.clamp(1.0, sample_rate * 0.49);
        let wd = TAU * cutoff;
        let wa = (2.0 * sample_rate) * (wd / (2.0 * sample_rate)).tan();
        wa / (2.0 * sample_rate)
    }

    pub fn next_sample(&mut self, sample: f32, k: f32, g: f32) -> FilterOutputs {
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        FilterOutputs {
            lowpass: v2,
            bandpass: v1,
            highpass: sample - k * v1 - v2,
        }
    }

    /// Filter `buffer` in place at an explicit sample rate.
    ///
    /// Feature extraction runs at the recording rate (hundreds of Hz), not the
    /// audio rate, so this entry point skips the render context.
    pub fn process(&mut self, buffer: &mut [f32], sample_rate: f32) {
        let g = self.compute_g(sample_rate);
        let k = 2.0 - (2.0 * self.resonance);

        for sample in buffer.iter_mut() {
            let outputs = self.next_sample(*sample, k, g);

            *sample = match self.filter_type {
                FilterType::LowPass => outputs.lowpass,
                FilterType::HighPass => outputs.highpass,
                FilterType::BandPass => outputs.bandpass,
            }
        }
    }

    pub fn render(&mut self, buffer: &mut [f32], ctx: &RenderCtx) {
        self.process(buffer, ctx.sample_rate);
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::GraphNode;
    use crate::graph::oscillator::OscNode;

    fn peak_after_transient(buffer: &[f32]) -> f32 {
        let skip = buffer.len().min(64);
        buffer
            .get(skip..)
            .unwrap_or(buffer)
            .iter()
            .fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    fn filtered_sine(filter: &mut SVFilter, freq: f32) -> f32 {
        let ctx = RenderCtx::new(48_000.0, 1024).with_frequency(freq);
        let mut osc = OscNode::sine();
        let mut buffer = vec![0.0f32; 1024];
        osc.render_block(&mut buffer, &ctx);
        filter.render(&mut buffer, &ctx);
        peak_after_transient(&buffer)
    }

    #[test]
    fn test_lowpass_passes_dc() {
        let mut filter = SVFilter::lowpass(500.0);
        let mut buffer = vec![1.0; 128];
        filter.process(&mut buffer, 48_000.0);
        assert!(buffer[127] > 0.99);
    }

    #[test]
    fn test_highpass_blocks_dc() {
        let mut filter = SVFilter::highpass(500.0);
        let mut buffer = vec![1.0; 128];
        filter.process(&mut buffer, 48_000.0);
        assert!(buffer[127] < 0.001);
    }

    #[test]
    fn test_lowpass_filters_high_freq() {
        let mut filter = SVFilter::lowpass(500.0);
        let peak = filtered_sine(&mut filter, 5_000.0);
        assert!(peak < 0.3, "Expected high freq attenuation, got peak: {}", peak);
    }

    #[test]
    fn test_highpass_filters_low_freq() {
        let mut filter = SVFilter::highpass(8_000.0);
        let peak = filtered_sine(&mut filter, 200.0);
        assert!(peak < 0.05, "Expected low freq attenuation, got peak: {}", peak);
    }

    #[test]
    fn test_bandpass_emphasizes_cutoff_frequency() {
        let mut filter = SVFilter::bandpass(1_000.0);
        filter.resonance = 0.5;
        let pass_peak = filtered_sine(&mut filter, 1_000.0);

        filter.reset();
        let off_peak = filtered_sine(&mut filter, 100.0);

        assert!(
            pass_peak > off_peak * 2.0,
            "expected bandpass to emphasize cutoff freq, got pass_peak={}, off_peak={}",
            pass_peak,
            off_peak
        );
    }

    #[test]
    fn test_cutoff_above_nyquist_stays_finite() {
        let mut filter = SVFilter::lowpass(30_000.0);
        let mut buffer = vec![0.5; 256];
        filter.process(&mut buffer, 16_000.0);
        assert!(buffer.iter().all(|s| s.is_finite()));
    }
}
