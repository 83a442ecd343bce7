/// Keyframe interpolation

use nalgebra::SVector;

/// Interpolation parameters for `num` samples spread evenly over `[0, 1]`.
///
/// A single sample sits at `t = 0`.
fn sample_parameters(num: usize) -> impl Iterator<Item = f64> {
    let last = num.saturating_sub(1).max(1) as f64;
    (0..num).map(move |i| i as f64 / last)
}

/// Generate `num` values between `keyframes[0]` and `keyframes[1]`, both
/// endpoints included when `num >= 2`.
///
/// Each of the `K` components is interpolated independently. Quaternion
/// components are not renormalized, so samples between two unit quaternions
/// are generally shorter than unit length.
pub fn linear_interpolation<const K: usize>(
    keyframes: &[SVector<f64, K>; 2],
    num: usize,
) -> Vec<SVector<f64, K>> {
    let [start, end] = keyframes;
    sample_parameters(num)
        .map(|t| start * (1.0 - t) + end * t)
        .collect()
}
