//! Sthiti - Monte Carlo localization against 2D line-segment maps
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    config/                          │  ← YAML configuration
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                  algorithms/                        │  ← Particle filter
//! │    (motion model, beam model, resampling, estimate) │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     map/                            │  ← Geometry
//! │          (segments, ray-cast index, loader)         │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     core/                           │  ← Foundation
//! │             (types, math, random source)            │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use sthiti::{LaserOutcome, LocalizationConfig, ParticleFilter, Pose2D, Segment};
//!
//! let walls = vec![
//!     Segment::from_coords(-5.0, -5.0, 5.0, -5.0),
//!     Segment::from_coords(5.0, -5.0, 5.0, 5.0),
//!     Segment::from_coords(5.0, 5.0, -5.0, 5.0),
//!     Segment::from_coords(-5.0, 5.0, -5.0, -5.0),
//! ];
//!
//! let mut filter = ParticleFilter::new(LocalizationConfig::default());
//! filter.initialize(walls, Pose2D::identity());
//!
//! let scan = sthiti::LaserScan::new(vec![5.0; 360], 0.05, 10.0, -3.0, 3.0);
//! // No motion yet, so the scan is not used.
//! assert_eq!(filter.observe_laser(&scan), LaserOutcome::Skipped);
//! ```

// ============================================================================
// Layer 1: Core foundation (no internal deps)
// ============================================================================
pub mod core;

// ============================================================================
// Layer 2: Map geometry (depends on core)
// ============================================================================
pub mod map;

// ============================================================================
// Layer 3: Algorithms (depends on core, map)
// ============================================================================
pub mod algorithms;

// ============================================================================
// Layer 4: Configuration (depends on all layers)
// ============================================================================
pub mod config;

// ============================================================================
// Convenience re-exports (flat namespace for common use)
// ============================================================================

// Core types
pub use crate::core::math;
pub use crate::core::types::{LaserScan, Point2D, Pose2D};
pub use crate::core::{NoiseGenerator, RandomSource};

// Map
pub use map::{
    GeometryIndex, MapConfig, MapLoadError, Ray, RaycastResult, Segment, SegmentKind,
    load_segments, parse_segments,
};

// Algorithms - Localization
pub use algorithms::localization::{
    BeamModel, BeamModelConfig, FilterPhase, LaserOutcome, MotionModel, MotionModelConfig,
    MotionStep, Particle, ParticleFilter, ParticleFilterConfig, ParticleFilterState, PoseSpread,
    PredictedScan, SkipReason,
};

// Configuration
pub use config::{ConfigError, LocalizationConfig};
