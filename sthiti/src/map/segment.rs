//! Map wall segments.
//!
//! Segments are stored by their endpoints only. Classification into
//! horizontal / vertical / angled drives the bucket layout of
//! [`GeometryIndex`](super::GeometryIndex).

use serde::{Deserialize, Serialize};

use crate::core::Point2D;

/// Orientation class of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Both endpoints share (within tolerance) the same y.
    Horizontal,
    /// Both endpoints share (within tolerance) the same x.
    Vertical,
    /// Anything else, including zero-length segments.
    Angled,
}

/// An immutable 2D line segment of the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// First endpoint.
    pub start: Point2D,
    /// Second endpoint.
    pub end: Point2D,
}

impl Segment {
    /// Create a segment from two endpoints.
    #[inline]
    pub fn new(start: Point2D, end: Point2D) -> Self {
        Self { start, end }
    }

    /// Create a segment from raw coordinates.
    #[inline]
    pub fn from_coords(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self::new(Point2D::new(x0, y0), Point2D::new(x1, y1))
    }

    /// Direction vector from start to end (not normalized).
    #[inline]
    pub fn direction(&self) -> Point2D {
        self.end - self.start
    }

    /// Classify the segment.
    ///
    /// A zero-length segment is neither horizontal nor vertical.
    pub fn kind(&self, tolerance: f32) -> SegmentKind {
        let dx = (self.end.x - self.start.x).abs();
        let dy = (self.end.y - self.start.y).abs();
        let flat_y = dy <= tolerance;
        let flat_x = dx <= tolerance;
        match (flat_y, flat_x) {
            (true, false) => SegmentKind::Horizontal,
            (false, true) => SegmentKind::Vertical,
            _ => SegmentKind::Angled,
        }
    }

    /// Distance along a ray to its crossing with this segment.
    ///
    /// `direction` must be a unit vector. Returns the ray parameter `t >= 0`
    /// such that `origin + direction * t` lies on the segment, or `None` for
    /// parallel or missing rays.
    pub fn ray_intersection(&self, origin: Point2D, direction: Point2D) -> Option<f32> {
        let seg = self.direction();

        // origin + t*dir = start + s*seg
        let denom = direction.cross(seg);
        if denom.abs() < f32::EPSILON {
            return None;
        }

        let to_start = self.start - origin;
        let t = to_start.cross(seg) / denom;
        let s = to_start.cross(direction) / denom;

        if t >= 0.0 && (0.0..=1.0).contains(&s) {
            Some(t)
        } else {
            None
        }
    }
}
