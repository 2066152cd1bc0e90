//! Pose estimation from a weighted particle set.
//!
//! Location is a weighted arithmetic mean. Heading is averaged on the unit
//! circle (`atan2(Σw·sinθ, Σw·cosθ)`) so that +179° and -179° average to
//! 180° rather than 0°.

use crate::core::math::angle_diff;
use crate::core::types::Pose2D;

use super::particle_filter::Particle;

/// Total weights at or below this are treated as an unscored set.
const MIN_TOTAL_WEIGHT: f64 = 1e-10;

/// Weighted variances of a particle set around its estimate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PoseSpread {
    /// Variance in x (m²).
    pub var_x: f32,
    /// Variance in y (m²).
    pub var_y: f32,
    /// Variance of the wrapped heading error (rad²).
    pub var_theta: f32,
}

impl PoseSpread {
    /// Standard deviation of the location (root of the summed variances).
    pub fn position_std(&self) -> f32 {
        (self.var_x + self.var_y).sqrt()
    }

    /// Standard deviation of the heading.
    pub fn heading_std(&self) -> f32 {
        self.var_theta.sqrt()
    }
}

/// Weights to use for averaging: the particle weights, or uniform weights
/// when the set has not been scored yet.
fn averaging_weights(particles: &[Particle]) -> impl Iterator<Item = f64> + '_ {
    let total: f64 = particles.iter().map(|p| p.weight).sum();
    let uniform = !(total > MIN_TOTAL_WEIGHT && total.is_finite());
    particles
        .iter()
        .map(move |p| if uniform { 1.0 } else { p.weight })
}

/// Weighted mean pose of the particle set.
///
/// An empty set yields the identity pose.
pub fn estimate_pose(particles: &[Particle]) -> Pose2D {
    if particles.is_empty() {
        return Pose2D::identity();
    }

    let mut sum_x = 0.0f64;
    let mut sum_y = 0.0f64;
    let mut sum_sin = 0.0f64;
    let mut sum_cos = 0.0f64;
    let mut total = 0.0f64;

    for (p, w) in particles.iter().zip(averaging_weights(particles)) {
        let theta = p.pose.theta as f64;
        sum_x += w * p.pose.x as f64;
        sum_y += w * p.pose.y as f64;
        sum_sin += w * theta.sin();
        sum_cos += w * theta.cos();
        total += w;
    }

    Pose2D::new(
        (sum_x / total) as f32,
        (sum_y / total) as f32,
        sum_sin.atan2(sum_cos) as f32,
    )
}

/// Weighted variances around [`estimate_pose`].
pub fn pose_spread(particles: &[Particle]) -> PoseSpread {
    if particles.is_empty() {
        return PoseSpread::default();
    }

    let mean = estimate_pose(particles);
    let mut var_x = 0.0f64;
    let mut var_y = 0.0f64;
    let mut var_theta = 0.0f64;
    let mut total = 0.0f64;

    for (p, w) in particles.iter().zip(averaging_weights(particles)) {
        let dx = (p.pose.x - mean.x) as f64;
        let dy = (p.pose.y - mean.y) as f64;
        let dtheta = angle_diff(mean.theta, p.pose.theta) as f64;

        var_x += w * dx * dx;
        var_y += w * dy * dy;
        var_theta += w * dtheta * dtheta;
        total += w;
    }

    PoseSpread {
        var_x: (var_x / total) as f32,
        var_y: (var_y / total) as f32,
        var_theta: (var_theta / total) as f32,
    }
}
