//! Particle filter (Monte Carlo Localization) against a segment map.
//!
//! The filter is driven by two event streams:
//!
//! - [`ParticleFilter::observe_odometry`] propagates every particle by the
//!   motion since the previous odometry reading.
//! - [`ParticleFilter::observe_laser`] scores the particles against a scan,
//!   but only once the robot has travelled more than `min_update_distance`
//!   over at least `min_predict_steps` motion steps since the last update.
//!   Every `resample_interval`-th update also resamples.
//!
//! Stored particle weights are linear and scaled so the best particle of the
//! last update has weight 1. Freshly seeded particles carry weight 0 until
//! the first update.

use serde::{Deserialize, Serialize};

use crate::config::LocalizationConfig;
use crate::core::types::{LaserScan, Pose2D};
use crate::core::{NoiseGenerator, RandomSource};
use crate::map::{GeometryIndex, Segment};

use super::estimate::{PoseSpread, estimate_pose, pose_spread};
use super::motion_model::{MotionModel, MotionStep};
use super::resampling::{effective_sample_size, low_variance_resample, normalize_log_weights};
use super::sensor_model::BeamModel;

/// A single particle representing a possible robot pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Hypothesized robot pose.
    pub pose: Pose2D,
    /// Importance weight. 0 until the particle has been scored.
    pub weight: f64,
}

impl Particle {
    /// Create a new, unscored particle.
    pub fn new(pose: Pose2D) -> Self {
        Self { pose, weight: 0.0 }
    }

    /// Create a new particle with specified weight.
    pub fn with_weight(pose: Pose2D, weight: f64) -> Self {
        Self { pose, weight }
    }
}

/// Configuration for the particle filter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleFilterConfig {
    /// Number of particles.
    pub num_particles: usize,

    /// Initial pose spread (standard deviation) for initialization.
    pub initial_spread_x: f32,
    pub initial_spread_y: f32,
    pub initial_spread_theta: f32,

    /// Distance the robot must exceed (meters) before a scan is used.
    pub min_update_distance: f32,

    /// Applied motion steps required before a scan is used.
    pub min_predict_steps: u32,

    /// Resample on every N-th update.
    pub resample_interval: u32,

    /// Random seed for deterministic behavior (0 for random).
    pub seed: u64,
}

impl Default for ParticleFilterConfig {
    fn default() -> Self {
        Self {
            num_particles: 500,
            initial_spread_x: 0.1,
            initial_spread_y: 0.1,
            initial_spread_theta: 0.1,
            min_update_distance: 0.1,
            min_predict_steps: 1,
            resample_interval: 1,
            seed: 0,
        }
    }
}

impl ParticleFilterConfig {
    /// Create a configuration for tracking (small spread).
    pub fn tracking() -> Self {
        Self {
            num_particles: 200,
            initial_spread_x: 0.05,
            initial_spread_y: 0.05,
            initial_spread_theta: 0.05,
            ..Default::default()
        }
    }

    /// Fewer particles and less frequent resampling.
    pub fn fast() -> Self {
        Self {
            num_particles: 150,
            min_update_distance: 0.2,
            resample_interval: 2,
            ..Default::default()
        }
    }

    /// More particles, frequent updates.
    pub fn high_quality() -> Self {
        Self {
            num_particles: 2000,
            min_update_distance: 0.05,
            ..Default::default()
        }
    }
}

/// Lifecycle of the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterPhase {
    /// No map or particles yet; every query returns a default.
    #[default]
    Uninitialized,
    /// Map indexed and particles seeded.
    Tracking,
}

/// What a laser scan did to the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaserOutcome {
    /// Not initialized, not enough motion since the last update, or nothing
    /// to score. Particles are untouched.
    Skipped,
    /// Particles were re-weighted.
    Updated,
    /// Particles were re-weighted and then resampled.
    Resampled,
}

/// State of the particle filter for diagnostics.
#[derive(Debug, Clone, Default)]
pub struct ParticleFilterState {
    /// Odometry distance since the last update (meters).
    pub distance_since_update: f32,
    /// Motion steps applied since the last update.
    pub predict_steps: u32,
    /// Updates since initialization.
    pub updates: u64,
    /// Best log-weight of the last update.
    pub max_log_weight: f64,
    /// Effective number of particles after the last update.
    pub neff: f64,
    /// Whether the last update resampled.
    pub resampled: bool,
}

/// Monte Carlo Localization particle filter.
#[derive(Debug)]
pub struct ParticleFilter<R: RandomSource = NoiseGenerator> {
    config: LocalizationConfig,
    phase: FilterPhase,
    index: Option<GeometryIndex>,
    particles: Vec<Particle>,
    motion_model: MotionModel,
    sensor_model: BeamModel,
    last_odometry: Option<Pose2D>,
    rng: R,
    state: ParticleFilterState,
}

impl ParticleFilter {
    /// Create an uninitialized filter seeded from `config.filter.seed`.
    pub fn new(config: LocalizationConfig) -> Self {
        let rng = NoiseGenerator::new(config.filter.seed);
        Self::with_random_source(config, rng)
    }
}

impl<R: RandomSource> ParticleFilter<R> {
    /// Create an uninitialized filter drawing noise from `rng`.
    pub fn with_random_source(config: LocalizationConfig, rng: R) -> Self {
        Self {
            motion_model: MotionModel::new(config.motion),
            sensor_model: BeamModel::new(config.sensor),
            config,
            phase: FilterPhase::Uninitialized,
            index: None,
            particles: Vec::new(),
            last_odometry: None,
            rng,
            state: ParticleFilterState::default(),
        }
    }

    /// Index `segments` and seed particles around `pose`.
    ///
    /// May be called again to relocalize or swap maps. The last odometry
    /// reading is kept, so motion across a re-initialization is not lost.
    pub fn initialize(&mut self, segments: Vec<Segment>, pose: Pose2D) {
        let index = GeometryIndex::build(segments, self.config.map.axis_tolerance);
        let (horizontal, vertical, angled) = index.bucket_sizes();
        self.index = Some(index);

        let f = &self.config.filter;
        let (sx, sy, st) = (f.initial_spread_x, f.initial_spread_y, f.initial_spread_theta);
        let rng = &mut self.rng;
        self.particles = (0..f.num_particles)
            .map(|_| {
                Particle::new(Pose2D::new(
                    rng.gaussian(pose.x, sx),
                    rng.gaussian(pose.y, sy),
                    rng.gaussian(pose.theta, st),
                ))
            })
            .collect();

        self.state = ParticleFilterState::default();
        self.phase = FilterPhase::Tracking;

        log::info!(
            "Particle filter initialized at ({:.2}, {:.2}, {:.2}) with {} particles; map: {} horizontal, {} vertical, {} angled segments",
            pose.x,
            pose.y,
            pose.theta,
            self.particles.len(),
            horizontal,
            vertical,
            angled
        );
    }

    /// Feed an odometry reading.
    ///
    /// The reading is always cached. Returns `None` while uninitialized,
    /// otherwise what the motion model did with it.
    pub fn observe_odometry(&mut self, odometry: Pose2D) -> Option<MotionStep> {
        let previous = self.last_odometry.replace(odometry);
        if self.phase != FilterPhase::Tracking {
            return None;
        }

        let step = self
            .motion_model
            .apply(&mut self.particles, previous, odometry, &mut self.rng);

        if let MotionStep::Applied { translation, .. } = step {
            self.state.distance_since_update += translation;
            self.state.predict_steps += 1;
        }
        Some(step)
    }

    /// Feed a laser scan.
    pub fn observe_laser(&mut self, scan: &LaserScan) -> LaserOutcome {
        let gate = &self.config.filter;
        if self.phase != FilterPhase::Tracking
            || self.state.distance_since_update <= gate.min_update_distance
            || self.state.predict_steps < gate.min_predict_steps
        {
            return LaserOutcome::Skipped;
        }
        let Some(index) = self.index.as_ref() else {
            return LaserOutcome::Skipped;
        };

        let log_weights: Vec<f64> = self
            .particles
            .iter()
            .map(|p| self.sensor_model.log_likelihood(index, scan, &p.pose))
            .collect();

        let Some((weights, max_log_weight)) = normalize_log_weights(&log_weights) else {
            log::warn!("No finite particle likelihood, keeping current weights");
            return LaserOutcome::Skipped;
        };

        for (particle, weight) in self.particles.iter_mut().zip(weights) {
            particle.weight = weight;
        }

        self.state.updates += 1;
        self.state.max_log_weight = max_log_weight;
        self.state.neff = effective_sample_size(&self.particles);
        self.state.resampled = false;

        log::debug!(
            "Update {} after {:.3} m / {} steps: max log-weight {:.2}, neff {:.1}",
            self.state.updates,
            self.state.distance_since_update,
            self.state.predict_steps,
            max_log_weight,
            self.state.neff
        );

        self.state.distance_since_update = 0.0;
        self.state.predict_steps = 0;

        let interval = u64::from(self.config.filter.resample_interval.max(1));
        if self.state.updates % interval != 0 {
            return LaserOutcome::Updated;
        }

        match low_variance_resample(&self.particles, &mut self.rng) {
            Some(resampled) => {
                self.particles = resampled;
                self.state.resampled = true;
                log::debug!("Resampled {} particles", self.particles.len());
                LaserOutcome::Resampled
            }
            None => {
                log::warn!("Degenerate particle weights, skipping resample");
                LaserOutcome::Updated
            }
        }
    }

    /// Get the estimated pose (weighted mean of particles).
    ///
    /// Identity while uninitialized.
    pub fn estimate(&self) -> Pose2D {
        estimate_pose(&self.particles)
    }

    /// Weighted spread of the particles around the estimate.
    pub fn spread(&self) -> PoseSpread {
        pose_spread(&self.particles)
    }

    /// Get all particles.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Get the current filter state.
    pub fn state(&self) -> &ParticleFilterState {
        &self.state
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> FilterPhase {
        self.phase
    }

    /// Map index, once initialized.
    pub fn index(&self) -> Option<&GeometryIndex> {
        self.index.as_ref()
    }

    /// Most recent odometry reading.
    pub fn last_odometry(&self) -> Option<Pose2D> {
        self.last_odometry
    }

    /// Get the configuration.
    pub fn config(&self) -> &LocalizationConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::localization::SkipReason;
    use approx::assert_relative_eq;

    fn room() -> Vec<Segment> {
        vec![
            Segment::from_coords(-5.0, -5.0, 5.0, -5.0),
            Segment::from_coords(5.0, -5.0, 5.0, 5.0),
            Segment::from_coords(5.0, 5.0, -5.0, 5.0),
            Segment::from_coords(-5.0, 5.0, -5.0, -5.0),
        ]
    }

    fn test_config(resample_interval: u32) -> LocalizationConfig {
        let mut config = LocalizationConfig::default();
        config.filter.num_particles = 50;
        config.filter.seed = 42;
        config.filter.resample_interval = resample_interval;
        config
    }

    fn scan() -> LaserScan {
        LaserScan::new(vec![4.0; 90], 0.05, 10.0, -1.5, 1.5)
    }

    #[test]
    fn test_uninitialized_defaults() {
        let mut filter = ParticleFilter::new(test_config(1));

        assert_eq!(filter.phase(), FilterPhase::Uninitialized);
        assert_eq!(filter.estimate(), Pose2D::identity());
        assert!(filter.particles().is_empty());
        assert!(filter.index().is_none());
        assert_eq!(filter.observe_odometry(Pose2D::new(1.0, 0.0, 0.0)), None);
        assert_eq!(filter.observe_laser(&scan()), LaserOutcome::Skipped);
        assert_eq!(filter.last_odometry(), Some(Pose2D::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_initialize_seeds_unscored_particles() {
        let mut filter = ParticleFilter::new(test_config(1));
        filter.initialize(room(), Pose2D::new(1.0, 2.0, 0.5));

        assert_eq!(filter.phase(), FilterPhase::Tracking);
        assert_eq!(filter.particles().len(), 50);
        assert!(filter.particles().iter().all(|p| p.weight == 0.0));
        assert_eq!(filter.index().map(|i| i.len()), Some(4));

        let estimate = filter.estimate();
        assert!((estimate.x - 1.0).abs() < 0.1);
        assert!((estimate.y - 2.0).abs() < 0.1);
        assert!((estimate.theta - 0.5).abs() < 0.1);
    }

    #[test]
    fn test_odometry_cache_survives_initialize() {
        let mut filter = ParticleFilter::new(test_config(1));
        filter.observe_odometry(Pose2D::identity());
        filter.initialize(room(), Pose2D::identity());

        let step = filter.observe_odometry(Pose2D::new(0.3, 0.0, 0.0));
        assert!(matches!(step, Some(MotionStep::Applied { .. })));
        assert_relative_eq!(filter.state().distance_since_update, 0.3, epsilon = 1e-5);
        assert_eq!(filter.state().predict_steps, 1);
    }

    #[test]
    fn test_first_odometry_after_initialize_only_caches() {
        let mut filter = ParticleFilter::new(test_config(1));
        filter.initialize(room(), Pose2D::identity());

        assert_eq!(
            filter.observe_odometry(Pose2D::new(0.3, 0.0, 0.0)),
            Some(MotionStep::Skipped(SkipReason::NoPriorOdometry))
        );
        assert_eq!(filter.state().distance_since_update, 0.0);
    }

    #[test]
    fn test_small_motion_skips_update() {
        let mut filter = ParticleFilter::new(test_config(1));
        filter.observe_odometry(Pose2D::identity());
        filter.initialize(room(), Pose2D::identity());
        filter.observe_odometry(Pose2D::new(0.2, 0.0, 0.0));
        assert_eq!(filter.observe_laser(&scan()), LaserOutcome::Resampled);

        filter.observe_odometry(Pose2D::new(0.21, 0.0, 0.0));
        let before = filter.particles().to_vec();
        assert!(before.iter().all(|p| p.weight > 0.0));

        assert_eq!(filter.observe_laser(&scan()), LaserOutcome::Skipped);
        assert_eq!(filter.particles(), before.as_slice());
        assert_eq!(filter.state().updates, 1);
        assert!(filter.state().resampled);
        assert_relative_eq!(filter.state().distance_since_update, 0.01, epsilon = 1e-5);
    }

    #[test]
    fn test_update_normalizes_weights_and_resets_accumulators() {
        let mut filter = ParticleFilter::new(test_config(2));
        filter.observe_odometry(Pose2D::identity());
        filter.initialize(room(), Pose2D::identity());
        filter.observe_odometry(Pose2D::new(0.2, 0.0, 0.0));

        assert_eq!(filter.observe_laser(&scan()), LaserOutcome::Updated);

        let max = filter.particles().iter().map(|p| p.weight).fold(0.0, f64::max);
        assert_eq!(max, 1.0);
        assert!(filter.particles().iter().all(|p| (0.0..=1.0).contains(&p.weight)));
        assert_eq!(filter.state().updates, 1);
        assert_eq!(filter.state().distance_since_update, 0.0);
        assert_eq!(filter.state().predict_steps, 0);
        assert!(filter.state().max_log_weight <= 0.0);
        assert!(filter.state().neff >= 1.0);

        // Gate closed again until the robot moves.
        assert_eq!(filter.observe_laser(&scan()), LaserOutcome::Skipped);
    }

    #[test]
    fn test_resample_interval() {
        let mut filter = ParticleFilter::new(test_config(2));
        filter.observe_odometry(Pose2D::identity());
        filter.initialize(room(), Pose2D::identity());

        filter.observe_odometry(Pose2D::new(0.2, 0.0, 0.0));
        assert_eq!(filter.observe_laser(&scan()), LaserOutcome::Updated);
        filter.observe_odometry(Pose2D::new(0.4, 0.0, 0.0));
        assert_eq!(filter.observe_laser(&scan()), LaserOutcome::Resampled);

        assert!(filter.state().resampled);
        assert_eq!(filter.particles().len(), 50);
        assert!(
            filter
                .particles()
                .iter()
                .all(|p| (p.weight - 1.0 / 50.0).abs() < 1e-12)
        );
    }

    #[test]
    fn test_min_predict_steps_gate() {
        let mut config = test_config(1);
        config.filter.min_predict_steps = 2;
        let mut filter = ParticleFilter::new(config);
        filter.observe_odometry(Pose2D::identity());
        filter.initialize(room(), Pose2D::identity());

        filter.observe_odometry(Pose2D::new(0.3, 0.0, 0.0));
        assert_eq!(filter.observe_laser(&scan()), LaserOutcome::Skipped);

        filter.observe_odometry(Pose2D::new(0.35, 0.0, 0.0));
        assert_eq!(filter.observe_laser(&scan()), LaserOutcome::Resampled);
    }

    #[test]
    fn test_reinitialize_resets_state() {
        let mut filter = ParticleFilter::new(test_config(1));
        filter.observe_odometry(Pose2D::identity());
        filter.initialize(room(), Pose2D::identity());
        filter.observe_odometry(Pose2D::new(0.2, 0.0, 0.0));
        filter.observe_laser(&scan());

        filter.initialize(room(), Pose2D::new(-2.0, 1.0, 0.0));
        assert_eq!(filter.state().updates, 0);
        assert!(filter.particles().iter().all(|p| p.weight == 0.0));
        assert!((filter.estimate().x + 2.0).abs() < 0.1);
    }

    #[test]
    fn test_config_presets() {
        let default = ParticleFilterConfig::default();
        assert!(ParticleFilterConfig::tracking().num_particles < default.num_particles);
        assert!(ParticleFilterConfig::high_quality().num_particles > default.num_particles);
        assert_eq!(ParticleFilterConfig::fast().resample_interval, 2);
    }
}
