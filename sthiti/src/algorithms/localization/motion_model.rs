//! Odometry motion model for the prediction step.
//!
//! Odometry is consumed as absolute poses in the odometry frame. The motion
//! between two readings is expressed in the previous base frame
//! (`prev⁻¹ ⊕ cur`), perturbed with zero-mean Gaussian noise, rotated into
//! each particle's heading frame and added to the particle.
//!
//! Noise standard deviations scale linearly with the motion:
//!
//! ```text
//! σ_trans = α3·|Δtrans| + α4·|Δrot|     (applied to x and y independently)
//! σ_rot   = α1·|Δrot|   + α2·|Δtrans|
//! ```

use serde::{Deserialize, Serialize};

use crate::core::{Point2D, Pose2D, RandomSource};

use super::particle_filter::Particle;

/// Motions smaller than this in both translation and rotation are ignored.
const STATIONARY_EPS: f32 = 1e-6;

/// Configuration for the odometry motion model.
///
/// The alpha parameters control noise proportional to motion:
/// - `alpha1`: Rotation noise from rotation (rad/rad)
/// - `alpha2`: Rotation noise from translation (rad/m)
/// - `alpha3`: Translation noise from translation (m/m)
/// - `alpha4`: Translation noise from rotation (m/rad)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionModelConfig {
    /// Rotation noise from rotation (rad/rad).
    pub alpha1: f32,

    /// Rotation noise from translation (rad/m).
    pub alpha2: f32,

    /// Translation noise from translation (m/m).
    pub alpha3: f32,

    /// Translation noise from rotation (m/rad).
    pub alpha4: f32,

    /// Odometry steps longer than this (meters) are treated as jumps and
    /// not applied to the particles.
    pub max_translation: f32,

    /// Odometry steps turning more than this (radians) are treated as jumps.
    pub max_rotation: f32,
}

impl Default for MotionModelConfig {
    fn default() -> Self {
        // Conservative defaults for indoor differential drive robot
        Self {
            alpha1: 0.15,
            alpha2: 0.08,
            alpha3: 0.15,
            alpha4: 0.08,
            max_translation: 1.0,
            max_rotation: std::f32::consts::FRAC_PI_2,
        }
    }
}

impl MotionModelConfig {
    /// Create a low-noise configuration (high quality encoders).
    pub fn low_noise() -> Self {
        Self {
            alpha1: 0.05,
            alpha2: 0.02,
            alpha3: 0.05,
            alpha4: 0.02,
            ..Default::default()
        }
    }

    /// Create a high-noise configuration (slippery floors, poor encoders).
    pub fn high_noise() -> Self {
        Self {
            alpha1: 0.3,
            alpha2: 0.15,
            alpha3: 0.3,
            alpha4: 0.15,
            ..Default::default()
        }
    }

    /// Noise-free configuration, useful for replaying ground truth.
    pub fn noiseless() -> Self {
        Self {
            alpha1: 0.0,
            alpha2: 0.0,
            alpha3: 0.0,
            alpha4: 0.0,
            ..Default::default()
        }
    }
}

/// Why an odometry reading did not move the particles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// First reading; there is nothing to difference against.
    NoPriorOdometry,
    /// Translation and rotation are both (numerically) zero.
    Stationary,
    /// The step exceeds the configured sanity bounds.
    Jump,
}

/// Outcome of feeding one odometry reading to the model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionStep {
    /// Particles were propagated by this motion (previous base frame).
    Applied {
        /// Length of the odometry translation in meters.
        translation: f32,
        /// Odometry rotation in radians.
        rotation: f32,
    },
    /// Particles were left untouched.
    Skipped(SkipReason),
}

/// Odometry motion model for sampling particle poses.
#[derive(Debug, Clone)]
pub struct MotionModel {
    config: MotionModelConfig,
}

impl MotionModel {
    /// Create a new motion model with the given configuration.
    pub fn new(config: MotionModelConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &MotionModelConfig {
        &self.config
    }

    /// Relative motion between two odometry readings, or why it is unusable.
    pub fn odometry_delta(
        &self,
        previous: Option<Pose2D>,
        current: Pose2D,
    ) -> Result<Pose2D, SkipReason> {
        let previous = previous.ok_or(SkipReason::NoPriorOdometry)?;
        let delta = previous.relative_to(&current);
        let translation = delta.location().length();

        if !translation.is_finite()
            || !delta.theta.is_finite()
            || translation > self.config.max_translation
            || delta.theta.abs() > self.config.max_rotation
        {
            return Err(SkipReason::Jump);
        }
        if translation < STATIONARY_EPS && delta.theta.abs() < STATIONARY_EPS {
            return Err(SkipReason::Stationary);
        }
        Ok(delta)
    }

    /// Sample a new pose given a particle pose and an odometry delta.
    ///
    /// `delta` is the motion in the previous base frame.
    pub fn sample<R: RandomSource>(&self, pose: &Pose2D, delta: &Pose2D, rng: &mut R) -> Pose2D {
        let trans = delta.location().length();
        let rot = delta.theta.abs();
        let c = &self.config;

        let sigma_trans = c.alpha3 * trans + c.alpha4 * rot;
        let sigma_rot = c.alpha1 * rot + c.alpha2 * trans;

        let noisy_step = Point2D::new(
            rng.gaussian(delta.x, sigma_trans),
            rng.gaussian(delta.y, sigma_trans),
        );
        let noisy_rot = rng.gaussian(delta.theta, sigma_rot);

        Pose2D::from_parts(
            pose.location() + noisy_step.rotated(pose.theta),
            pose.theta + noisy_rot,
        )
    }

    /// Propagate every particle by the motion between two odometry readings.
    pub fn apply<R: RandomSource>(
        &self,
        particles: &mut [Particle],
        previous: Option<Pose2D>,
        current: Pose2D,
        rng: &mut R,
    ) -> MotionStep {
        let delta = match self.odometry_delta(previous, current) {
            Ok(delta) => delta,
            Err(reason) => {
                if reason == SkipReason::Jump {
                    log::warn!(
                        "Odometry jump ignored: ({:.2}, {:.2}, {:.2}) -> ({:.2}, {:.2}, {:.2})",
                        previous.map_or(0.0, |p| p.x),
                        previous.map_or(0.0, |p| p.y),
                        previous.map_or(0.0, |p| p.theta),
                        current.x,
                        current.y,
                        current.theta
                    );
                }
                return MotionStep::Skipped(reason);
            }
        };

        for particle in particles.iter_mut() {
            particle.pose = self.sample(&particle.pose, &delta, rng);
        }

        MotionStep::Applied {
            translation: delta.location().length(),
            rotation: delta.theta,
        }
    }
}
