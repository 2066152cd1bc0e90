//! Angle arithmetic shared by the motion model and the pose estimator.

use std::f32::consts::PI;

/// Normalize angle to [-π, π].
///
/// # Example
/// ```
/// use sthiti::core::math::normalize_angle;
/// use std::f32::consts::PI;
///
/// assert!((normalize_angle(3.0 * PI) - PI).abs() < 1e-6);
/// assert!((normalize_angle(-0.5 * PI) + 0.5 * PI).abs() < 1e-6);
/// ```
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let mut a = angle % (2.0 * PI);
    if a > PI {
        a -= 2.0 * PI;
    } else if a < -PI {
        a += 2.0 * PI;
    }
    a
}

/// Signed shortest rotation that takes heading `a` onto heading `b`.
#[inline]
pub fn angle_diff(a: f32, b: f32) -> f32 {
    normalize_angle(b - a)
}

/// Convert degrees to radians.
#[inline]
pub fn deg_to_rad(deg: f32) -> f32 {
    deg * PI / 180.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalize_keeps_principal_range() {
        assert_relative_eq!(normalize_angle(0.0), 0.0);
        assert_relative_eq!(normalize_angle(PI), PI);
        assert_relative_eq!(normalize_angle(-PI), -PI);
        assert_relative_eq!(normalize_angle(1.25), 1.25);
    }

    #[test]
    fn test_normalize_wraps_multiples() {
        assert_relative_eq!(normalize_angle(2.0 * PI), 0.0, epsilon = 1e-6);
        assert_relative_eq!(normalize_angle(-2.0 * PI), 0.0, epsilon = 1e-6);
        assert_relative_eq!(normalize_angle(5.0 * PI / 2.0), PI / 2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_normalize_just_past_pi_flips_sign() {
        let wrapped = normalize_angle(PI + 0.01);
        assert!(wrapped < 0.0, "expected negative, got {}", wrapped);
        assert_relative_eq!(wrapped, -PI + 0.01, epsilon = 1e-5);
    }

    #[test]
    fn test_angle_diff_takes_short_way_round() {
        assert_relative_eq!(angle_diff(0.0, PI / 2.0), PI / 2.0);
        assert_relative_eq!(angle_diff(PI - 0.1, -PI + 0.1), 0.2, epsilon = 1e-5);
        assert_relative_eq!(angle_diff(-PI + 0.1, PI - 0.1), -0.2, epsilon = 1e-5);
    }

    #[test]
    fn test_degree_conversion() {
        assert_relative_eq!(deg_to_rad(180.0), PI);
    }
}
