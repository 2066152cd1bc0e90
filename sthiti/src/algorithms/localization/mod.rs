//! Localization module.
//!
//! Provides Monte Carlo Localization (MCL) for robot pose estimation
//! within a known segment map.
//!
//! # Components
//!
//! - [`MotionModel`]: Odometry-based motion model with configurable noise
//! - [`BeamModel`]: Ray-cast beam model for laser scans
//! - [`resampling`]: Weight normalization and low-variance resampling
//! - [`estimate`]: Weighted pose estimate and spread
//! - [`ParticleFilter`]: Orchestrates the above over odometry and scan events
//!
//! # Example
//!
//! ```
//! use sthiti::{LaserOutcome, LaserScan, LocalizationConfig, MotionStep, ParticleFilter, Pose2D, Segment};
//!
//! let segments = vec![
//!     Segment::from_coords(-5.0, -5.0, 5.0, -5.0),
//!     Segment::from_coords(5.0, -5.0, 5.0, 5.0),
//!     Segment::from_coords(5.0, 5.0, -5.0, 5.0),
//!     Segment::from_coords(-5.0, 5.0, -5.0, -5.0),
//! ];
//!
//! let mut config = LocalizationConfig::default();
//! config.filter.num_particles = 100;
//! config.filter.seed = 1;
//!
//! let mut filter = ParticleFilter::new(config);
//! filter.observe_odometry(Pose2D::identity());
//! filter.initialize(segments, Pose2D::identity());
//!
//! // Predict step with odometry
//! let step = filter.observe_odometry(Pose2D::new(0.3, 0.0, 0.0));
//! assert!(matches!(step, Some(MotionStep::Applied { .. })));
//!
//! // Update step with laser scan
//! let scan = LaserScan::new(vec![4.7; 181], 0.05, 10.0, -1.57, 1.57);
//! assert_ne!(filter.observe_laser(&scan), LaserOutcome::Skipped);
//!
//! // Get best estimate
//! let pose = filter.estimate();
//! assert!(pose.x.abs() < 1.0);
//! ```

pub mod estimate;
mod motion_model;
mod particle_filter;
pub mod resampling;
mod sensor_model;

pub use estimate::{PoseSpread, estimate_pose, pose_spread};
pub use motion_model::{MotionModel, MotionModelConfig, MotionStep, SkipReason};
pub use particle_filter::{
    FilterPhase, LaserOutcome, Particle, ParticleFilter, ParticleFilterConfig, ParticleFilterState,
};
pub use resampling::{effective_sample_size, low_variance_resample, normalize_log_weights};
pub use sensor_model::{BeamModel, BeamModelConfig, PredictedScan};
