//! Localization algorithms layer.
//!
//! # Contents
//!
//! - [`localization`]: Particle filter localization (Monte Carlo Localization)

pub mod localization;
