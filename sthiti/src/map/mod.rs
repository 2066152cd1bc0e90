//! Map geometry: wall segments, the ray-casting index and the map loader.

mod index;
pub mod loader;
mod segment;

pub use index::{GeometryIndex, Ray, RaycastResult};
pub use loader::{MapLoadError, load_segments, parse_segments};
pub use segment::{Segment, SegmentKind};

use serde::{Deserialize, Serialize};

/// Map section of the configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Largest endpoint coordinate difference for a wall to be treated as
    /// axis-aligned (meters). 0 requires exact equality.
    pub axis_tolerance: f32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            axis_tolerance: 1e-4,
        }
    }
}
