//! Unified configuration for the localizer.
//!
//! All sections are optional in YAML; missing sections and fields take their
//! defaults.
//!
//! ```yaml
//! filter:
//!   num_particles: 500
//!   min_update_distance: 0.1
//! motion:
//!   alpha3: 0.1
//! sensor:
//!   beam_skip: 10
//! map:
//!   axis_tolerance: 0.0001
//! ```

mod error;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::algorithms::localization::{BeamModelConfig, MotionModelConfig, ParticleFilterConfig};
use crate::map::MapConfig;

pub use error::ConfigError;

/// Full localizer configuration loaded from YAML.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct LocalizationConfig {
    /// Particle set and update cadence
    #[serde(default)]
    pub filter: ParticleFilterConfig,

    /// Odometry noise
    #[serde(default)]
    pub motion: MotionModelConfig,

    /// Laser beam model
    #[serde(default)]
    pub sensor: BeamModelConfig,

    /// Segment classification
    #[serde(default)]
    pub map: MapConfig,
}

impl LocalizationConfig {
    /// Parse from a YAML string and validate.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file and validate.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&contents)?;
        log::info!("Loaded localization config from {}", path.display());
        Ok(config)
    }

    /// Serialize to a YAML string.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Preset for tracking a well-known start pose.
    pub fn tracking() -> Self {
        Self {
            filter: ParticleFilterConfig::tracking(),
            motion: MotionModelConfig::low_noise(),
            ..Default::default()
        }
    }

    /// Preset favoring speed over accuracy.
    pub fn fast() -> Self {
        Self {
            filter: ParticleFilterConfig::fast(),
            sensor: BeamModelConfig::fast(),
            ..Default::default()
        }
    }

    /// Preset favoring accuracy over speed.
    pub fn high_quality() -> Self {
        Self {
            filter: ParticleFilterConfig::high_quality(),
            sensor: BeamModelConfig::high_quality(),
            ..Default::default()
        }
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let f = &self.filter;
        check(f.num_particles > 0, "filter.num_particles must be positive")?;
        check(f.resample_interval > 0, "filter.resample_interval must be positive")?;
        check(
            non_negative(f.min_update_distance),
            "filter.min_update_distance must be >= 0",
        )?;
        check(
            non_negative(f.initial_spread_x)
                && non_negative(f.initial_spread_y)
                && non_negative(f.initial_spread_theta),
            "filter.initial_spread_* must be >= 0",
        )?;

        let m = &self.motion;
        check(
            [m.alpha1, m.alpha2, m.alpha3, m.alpha4].into_iter().all(non_negative),
            "motion.alpha1..alpha4 must be >= 0",
        )?;
        check(
            positive(m.max_translation) && positive(m.max_rotation),
            "motion.max_translation and motion.max_rotation must be positive",
        )?;

        let s = &self.sensor;
        check(s.beam_skip > 0, "sensor.beam_skip must be positive")?;
        check(positive(s.sigma), "sensor.sigma must be positive")?;
        check(
            non_negative(s.d_short) && non_negative(s.d_long),
            "sensor.d_short and sensor.d_long must be >= 0",
        )?;
        check(
            positive(s.gamma) && s.gamma <= 1.0,
            "sensor.gamma must be in (0, 1]",
        )?;
        check(s.sensor_offset.is_finite(), "sensor.sensor_offset must be finite")?;

        check(
            non_negative(self.map.axis_tolerance),
            "map.axis_tolerance must be >= 0",
        )?;

        Ok(())
    }
}

fn check(ok: bool, message: &str) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::Validation(message.to_string()))
    }
}

fn non_negative(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}

fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
