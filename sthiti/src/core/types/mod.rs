//! Core data types: points, poses and laser scans.

mod pose;
mod scan;

pub use pose::{Point2D, Pose2D};
pub use scan::{LaserScan, angle_increment};
