//! Beam sensor model for the particle filter update step.
//!
//! Each particle predicts what the laser should read by casting rays into the
//! segment map from its sensor origin. Measured and predicted ranges are
//! compared beam by beam with a truncated quadratic penalty: errors beyond
//! `d_short` (measured too short, e.g. an unmapped obstacle) or `d_long`
//! (measured too long, e.g. glass) cost the same as an error exactly at the
//! bound. The sum is damped by `gamma` because neighboring beams are not
//! independent.

use serde::{Deserialize, Serialize};

use crate::core::types::{LaserScan, Point2D, Pose2D};
use crate::map::{GeometryIndex, Ray, RaycastResult};

/// Configuration for the beam sensor model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct BeamModelConfig {
    /// Distance of the laser from the robot center along the heading (meters).
    pub sensor_offset: f32,

    /// Use one predicted beam per `beam_skip` raw rays.
    /// 1 = use all beams.
    pub beam_skip: usize,

    /// Range noise standard deviation (meters).
    /// Typical: 0.05-0.2
    pub sigma: f32,

    /// Largest penalized error for readings shorter than predicted (meters).
    pub d_short: f32,

    /// Largest penalized error for readings longer than predicted (meters).
    pub d_long: f32,

    /// Scale applied to the summed log-likelihood, in (0, 1].
    pub gamma: f32,
}

impl Default for BeamModelConfig {
    fn default() -> Self {
        Self {
            sensor_offset: 0.2,
            beam_skip: 10,
            sigma: 0.1,
            d_short: 0.5,
            d_long: 0.5,
            gamma: 0.8,
        }
    }
}

impl BeamModelConfig {
    /// Create a high-quality configuration (slower but more accurate).
    pub fn high_quality() -> Self {
        Self {
            beam_skip: 2,
            sigma: 0.05,
            ..Default::default()
        }
    }

    /// Create a fast configuration (less accurate but faster).
    pub fn fast() -> Self {
        Self {
            beam_skip: 20,
            sigma: 0.2,
            ..Default::default()
        }
    }
}

/// Expected scan from one pose.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictedScan {
    /// Raw rays per predicted beam. Beam `i` corresponds to raw ray
    /// `i * stride`.
    pub stride: usize,
    /// Nearest map intersection per predicted beam.
    pub beams: Vec<RaycastResult>,
}

impl PredictedScan {
    /// Predicted ranges in beam order.
    pub fn ranges(&self) -> impl Iterator<Item = f32> + '_ {
        self.beams.iter().map(|b| b.range)
    }

    /// Raw ray index matching predicted beam `i`.
    #[inline]
    pub fn raw_index(&self, i: usize) -> usize {
        i * self.stride
    }
}

/// Beam-based sensor model over a [`GeometryIndex`].
#[derive(Debug, Clone)]
pub struct BeamModel {
    config: BeamModelConfig,
    inv_sigma_sq: f64,
}

impl BeamModel {
    /// Create a new beam model.
    pub fn new(config: BeamModelConfig) -> Self {
        let sigma = config.sigma as f64;
        Self {
            config,
            inv_sigma_sq: 1.0 / (sigma * sigma),
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &BeamModelConfig {
        &self.config
    }

    /// Number of predicted beams and raw stride for a scan of `raw_count` rays.
    pub fn beam_layout(&self, raw_count: usize) -> (usize, usize) {
        if raw_count == 0 {
            return (0, 0);
        }
        let count = (raw_count / self.config.beam_skip.max(1)).max(1);
        (count, raw_count / count)
    }

    /// Cast the subsampled beams of `scan` from `pose`.
    ///
    /// Only the scan geometry (ray count, bearings, range limits) is used;
    /// the measured ranges are ignored.
    pub fn predicted_scan(
        &self,
        index: &GeometryIndex,
        pose: &Pose2D,
        scan: &LaserScan,
    ) -> PredictedScan {
        let (count, stride) = self.beam_layout(scan.len());
        let origin = pose.transform_point(&Point2D::new(self.config.sensor_offset, 0.0));

        let beams = (0..count)
            .map(|i| {
                let bearing = pose.theta + scan.bearing(i * stride);
                let ray = Ray::new(origin, bearing, scan.range_min, scan.range_max);
                index.nearest_intersection(&ray)
            })
            .collect();

        PredictedScan { stride, beams }
    }

    /// Log-likelihood of `scan` observed from `pose`.
    ///
    /// Always `<= 0`. Readings outside the sensor's valid interval carry no
    /// information and contribute nothing.
    pub fn log_likelihood(&self, index: &GeometryIndex, scan: &LaserScan, pose: &Pose2D) -> f64 {
        let predicted = self.predicted_scan(index, pose, scan);
        let d_short = self.config.d_short as f64;
        let d_long = self.config.d_long as f64;

        let sum: f64 = predicted
            .ranges()
            .enumerate()
            .filter_map(|(i, expected)| {
                let measured = scan.ranges[predicted.raw_index(i)];
                scan.is_valid_range(measured)
                    .then(|| (measured as f64, expected as f64))
            })
            .map(|(measured, expected)| {
                let error = if measured < expected - d_short {
                    d_short
                } else if measured > expected + d_long {
                    d_long
                } else {
                    measured - expected
                };
                -error * error * self.inv_sigma_sq
            })
            .sum();

        sum * self.config.gamma as f64
    }
}
