//! Summing and level primitives.

/*
Summing
=======

Layers of an instrument and triggers on the master track combine by plain
addition. Nothing is weighted, so the sum may leave [-1, +1]:

    Signal A:  [ 1.0,  0.5, -0.5, -1.0]
    Signal B:  [ 1.0,  0.8,  0.2, -0.5]
    Sum:       [ 2.0,  1.3, -0.3, -1.5]  ← exceeds ±1.0!

Levels are brought back once, at the very end, by measuring the peak and
scaling the whole buffer. Scaling is linear, so relative levels between
layers survive untouched.
*/

/// Add signal B into signal A in-place (summing).
#[inline]
pub fn sum_in_place(a: &mut [f32], b: &[f32]) {
    debug_assert_eq!(a.len(), b.len());

    for (sa, &sb) in a.iter_mut().zip(b.iter()) {
        *sa += sb;
    }
}

/// Largest absolute sample value; 0.0 for an empty buffer.
#[inline]
pub fn peak(signal: &[f32]) -> f32 {
    signal.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()))
}

/// Scale `signal` so its peak equals `target`. Silent buffers are left alone.
pub fn normalize_to(signal: &mut [f32], target: f32) {
    let current = peak(signal);
    if current > 0.0 && current.is_finite() {
        super::amplify::apply_gain(signal, target / current);
    }
}
