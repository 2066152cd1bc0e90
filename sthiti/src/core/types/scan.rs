//! Laser scan type.

use serde::{Deserialize, Serialize};

/// A single planar range scan in the sensor frame.
///
/// Rays are evenly spaced: ray `j` of `n` points along
/// `angle_min + j * (angle_max - angle_min) / (n - 1)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaserScan {
    /// Range measurements in meters.
    pub ranges: Vec<f32>,
    /// Minimum valid range in meters.
    pub range_min: f32,
    /// Maximum valid range in meters.
    pub range_max: f32,
    /// Bearing of the first ray in radians.
    pub angle_min: f32,
    /// Bearing of the last ray in radians.
    pub angle_max: f32,
}

impl LaserScan {
    /// Create a new laser scan.
    pub fn new(
        ranges: Vec<f32>,
        range_min: f32,
        range_max: f32,
        angle_min: f32,
        angle_max: f32,
    ) -> Self {
        Self {
            ranges,
            range_min,
            range_max,
            angle_min,
            angle_max,
        }
    }

    /// Number of rays.
    #[inline]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// True if the scan has no rays.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Angular spacing between consecutive rays.
    #[inline]
    pub fn angle_increment(&self) -> f32 {
        angle_increment(self.ranges.len(), self.angle_min, self.angle_max)
    }

    /// Bearing of ray `index` relative to the sensor heading.
    #[inline]
    pub fn bearing(&self, index: usize) -> f32 {
        self.angle_min + index as f32 * self.angle_increment()
    }

    /// True if `range` lies within the sensor's valid interval.
    #[inline]
    pub fn is_valid_range(&self, range: f32) -> bool {
        range.is_finite() && range >= self.range_min && range <= self.range_max
    }
}

/// Angular spacing for `count` rays evenly covering `[angle_min, angle_max]`.
#[inline]
pub fn angle_increment(count: usize, angle_min: f32, angle_max: f32) -> f32 {
    if count > 1 {
        (angle_max - angle_min) / (count - 1) as f32
    } else {
        0.0
    }
}
