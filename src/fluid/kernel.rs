//! Smoothing kernels, parameterised by support radius `h` and distance `d`.
//!
//! Every kernel is zero for `d >= h`. Scale factors are computed from the
//! radius passed in, so changing the smoothing radius needs no other update.

use crate::math::consts::PI;

/// Distances below this are treated as coincident by the gradient kernels
const MIN_DISTANCE: f32 = 1e-4;

/// Density kernel `(h - d)^2 / (PI * h^4 / 6)`.
///
/// This is the two-dimensional spiky normalisation applied in 3D. It is kept
/// as is so densities match the tuned target density.
#[inline]
pub fn smoothing(h: f32, d: f32) -> f32 {
    if d >= h {
        return 0.0;
    }
    let volume = PI * h.powi(4) / 6.0;
    (h - d) * (h - d) / volume
}

/// Slope of [`smoothing`] with respect to distance (never positive)
#[inline]
pub fn smoothing_derivative(h: f32, d: f32) -> f32 {
    if d >= h {
        return 0.0;
    }
    let scale = 12.0 / (PI * h.powi(4));
    (d - h) * scale
}

/// Sharper kernel used for near density
#[inline]
pub fn spiky_pow3(h: f32, d: f32) -> f32 {
    if d >= h {
        return 0.0;
    }
    let v = h - d;
    v * v * v * 315.0 / (64.0 * PI * h.powi(9))
}

/// Derivative of [`spiky_pow3`] divided by `d`; zero at coincident points
#[inline]
pub fn spiky_pow3_derivative(h: f32, d: f32) -> f32 {
    if d >= h || d <= MIN_DISTANCE {
        return 0.0;
    }
    let v = h - d;
    v * v * (-945.0 / (32.0 * PI * h.powi(9))) / d
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_smoothing_self_term() {
        // h^2 / (PI h^4 / 6) = 6 / (PI h^2)
        assert!(approx_eq(smoothing(15.0, 0.0), 6.0 / (PI * 225.0)));
        assert!(approx_eq(smoothing(1.0, 0.5), 0.25 * 6.0 / PI));
    }

    #[test]
    fn test_kernels_vanish_outside_radius() {
        let h = 2.0;
        for kernel in [
            smoothing,
            smoothing_derivative,
            spiky_pow3,
            spiky_pow3_derivative,
        ] {
            assert_eq!(kernel(h, h), 0.0);
            assert_eq!(kernel(h, 3.0), 0.0);
        }
    }

    #[test]
    fn test_smoothing_decreases_with_distance() {
        let h = 15.0;
        let mut previous = smoothing(h, 0.0);
        for step in 1..15 {
            let value = smoothing(h, step as f32);
            assert!(value < previous);
            assert!(smoothing_derivative(h, step as f32) < 0.0);
            previous = value;
        }
    }

    #[test]
    fn test_gradients_zero_at_origin() {
        assert_eq!(spiky_pow3_derivative(1.0, 0.0), 0.0);
        assert!(spiky_pow3_derivative(1.0, 0.5) < 0.0);
    }
}
