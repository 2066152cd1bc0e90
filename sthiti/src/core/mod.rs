//! Foundation layer: geometry types, angle math and the random source.

pub mod math;
pub mod random;
pub mod types;

pub use random::{NoiseGenerator, RandomSource};
pub use types::{LaserScan, Point2D, Pose2D};
