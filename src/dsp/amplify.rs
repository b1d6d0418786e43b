//! Gain primitives.

/*
Gain and Decibels
=================

Every level in the arrangement is written in decibels, because that is how
the mix is reasoned about ("hi-hat 10 dB under the kick"). Samples are
multiplied by a linear factor, so the conversion sits here:

    gain = 10 ^ (dB / 20)

    ×1.0   =   0 dB
    ×0.5   ≈  -6 dB
    ×0.1   = -20 dB
    ×0.01  = -40 dB

Multiplying a signal by a modulator (an envelope, say) is the same operation
with a per-sample factor instead of a constant.
*/

/// Convert decibels to a linear amplitude factor.
#[inline]
pub fn db_to_gain(db: f32) -> f32 {
    10f32.powf(db / 20.0)
}

/// Multiply a signal by a constant gain factor (in-place).
#[inline]
pub fn apply_gain(signal: &mut [f32], gain: f32) {
    for sample in signal.iter_mut() {
        *sample *= gain;
    }
}

/// Multiply a signal by a modulator, writing result into signal buffer (in-place).
#[inline]
pub fn multiply_in_place(signal: &mut [f32], modulator: &[f32]) {
    debug_assert_eq!(signal.len(), modulator.len());

    for (s, &m) in signal.iter_mut().zip(modulator.iter()) {
        *s *= m;
    }
}
