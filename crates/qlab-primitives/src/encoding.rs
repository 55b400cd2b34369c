//! Angle encoding of scalar features onto single-qubit rotations.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Stabilizer added to the range so a constant feature does not divide by zero.
pub const ANGLE_EPS: f64 = 1e-9;

/// Target range of the encoded angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncodingScale {
    /// `[0, π]`, used for the linear correlation datasets.
    Standard,
    /// `[0, 2π]`, used for the categorical health dataset.
    Health,
}

impl EncodingScale {
    /// Pick the scale for a dataset.
    pub fn for_health_mode(health_mode: bool) -> Self {
        if health_mode {
            EncodingScale::Health
        } else {
            EncodingScale::Standard
        }
    }

    /// Upper bound of the encoded angle.
    pub fn factor(self) -> f64 {
        match self {
            EncodingScale::Standard => PI,
            EncodingScale::Health => 2.0 * PI,
        }
    }
}

/// Clip `value` into `[min, max]` and rescale it linearly into `[0, scale]`.
pub fn angle_encode(value: f64, min: f64, max: f64, scale: f64) -> f64 {
    angle_encode_with_eps(value, min, max, scale, ANGLE_EPS)
}

/// [`angle_encode`] with an explicit stabilizer.
///
/// Reversed bounds are swapped before clipping.
pub fn angle_encode_with_eps(value: f64, min: f64, max: f64, scale: f64, eps: f64) -> f64 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    let clipped = value.clamp(lo, hi);
    scale * (clipped - lo) / (hi - lo + eps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_bounds_map_to_ends() {
        assert_eq!(angle_encode(150.0, 150.0, 199.0, PI), 0.0);
        let top = angle_encode(199.0, 150.0, 199.0, PI);
        assert!((top - PI).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_range_is_clipped() {
        assert_eq!(angle_encode(100.0, 150.0, 199.0, PI), 0.0);
        assert_eq!(
            angle_encode(500.0, 150.0, 199.0, PI),
            angle_encode(199.0, 150.0, 199.0, PI)
        );
    }

    #[test]
    fn test_constant_feature_does_not_divide_by_zero() {
        let angle = angle_encode(3.0, 3.0, 3.0, PI);
        assert_eq!(angle, 0.0);
        assert!(angle.is_finite());
    }

    #[test]
    fn test_reversed_bounds() {
        let a = angle_encode(175.0, 199.0, 150.0, PI);
        let b = angle_encode(175.0, 150.0, 199.0, PI);
        assert_eq!(a, b);
    }

    #[test]
    fn test_scale_factors() {
        assert_eq!(EncodingScale::Standard.factor(), PI);
        assert_eq!(EncodingScale::Health.factor(), 2.0 * PI);
        assert_eq!(EncodingScale::for_health_mode(true), EncodingScale::Health);
    }

    proptest! {
        #[test]
        fn prop_output_within_scale(
            value in -1.0e4f64..1.0e4,
            a in -1.0e3f64..1.0e3,
            b in -1.0e3f64..1.0e3,
            health in any::<bool>(),
        ) {
            let scale = EncodingScale::for_health_mode(health).factor();
            let angle = angle_encode(value, a, b, scale);
            prop_assert!(angle >= 0.0);
            prop_assert!(angle <= scale);
        }

        #[test]
        fn prop_endpoints(min in -1.0e3f64..1.0e3, width in 1.0e-3f64..1.0e3) {
            let max = min + width;
            prop_assert_eq!(angle_encode(min, min, max, PI), 0.0);
            let top = angle_encode(max, min, max, PI);
            prop_assert!((top - PI).abs() < 1e-5);
        }
    }
}
