//! Sorted-bucket index over map segments for ray casting.
//!
//! # Layout
//!
//! - Horizontal segments, sorted ascending by their constant y
//! - Vertical segments, sorted ascending by their constant x
//! - Angled segments, unsorted
//!
//! # Query
//!
//! For an axis bucket the ray reaches the coordinate `c` after travelling
//! `(c - origin) / dir` along that axis. Entries are visited outward from the
//! origin (binary search for the starting point), so the reach distance only
//! grows and the walk stops as soon as it exceeds the best hit found so far.
//! Angled segments are tested one by one. The closest of the three bucket
//! candidates wins; a ray that hits nothing ends at its max-range endpoint.

use crate::core::Point2D;

use super::segment::{Segment, SegmentKind};

/// Axis components at or below this are treated as parallel to the axis.
const AXIS_PARALLEL_EPS: f32 = f32::EPSILON;

/// Slack on the pruning bound so rounding never drops a hit.
const PRUNE_SLACK: f32 = 1e-3;

/// A ray between `min_range` and `max_range` along a unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Sensor origin in the map frame.
    pub origin: Point2D,
    /// Unit direction of travel.
    pub direction: Point2D,
    /// Hits closer than this are ignored.
    pub min_range: f32,
    /// Hits farther than this are ignored.
    pub max_range: f32,
}

impl Ray {
    /// Create a ray from an origin and absolute bearing (radians).
    #[inline]
    pub fn new(origin: Point2D, bearing: f32, min_range: f32, max_range: f32) -> Self {
        Self {
            origin,
            direction: Point2D::from_angle(bearing),
            min_range,
            max_range,
        }
    }

    /// Point at distance `t` along the ray.
    #[inline]
    pub fn point_at(&self, t: f32) -> Point2D {
        self.origin + self.direction * t
    }
}

/// Nearest intersection of a ray with the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastResult {
    /// Distance from the ray origin to `point`.
    pub range: f32,
    /// Hit point, or the max-range endpoint on a miss.
    pub point: Point2D,
    /// Index (in map order) of the segment that was hit.
    pub segment: Option<usize>,
}

impl RaycastResult {
    /// Result for a ray that hit nothing within range.
    #[inline]
    pub fn miss(ray: &Ray) -> Self {
        Self {
            range: ray.max_range,
            point: ray.point_at(ray.max_range),
            segment: None,
        }
    }

    /// Result for a hit at distance `t` on `segment`.
    #[inline]
    pub fn hit(ray: &Ray, t: f32, segment: usize) -> Self {
        Self {
            range: t,
            point: ray.point_at(t),
            segment: Some(segment),
        }
    }

    /// Whether a segment was hit.
    #[inline]
    pub fn is_hit(&self) -> bool {
        self.segment.is_some()
    }
}

#[derive(Debug, Clone, Copy)]
struct AxisEntry {
    /// Constant coordinate (mean of both endpoints).
    key: f32,
    segment: usize,
}

/// Read-only acceleration structure over the map segments.
#[derive(Debug, Clone)]
pub struct GeometryIndex {
    segments: Vec<Segment>,
    horizontal: Vec<AxisEntry>,
    vertical: Vec<AxisEntry>,
    angled: Vec<usize>,
    tolerance: f32,
}

impl GeometryIndex {
    /// Classify and sort `segments`.
    ///
    /// `tolerance` is the largest coordinate difference between endpoints for
    /// a segment to count as axis-aligned (0 means exact equality).
    pub fn build(segments: Vec<Segment>, tolerance: f32) -> Self {
        let tolerance = if tolerance.is_finite() {
            tolerance.max(0.0)
        } else {
            0.0
        };

        let mut horizontal = Vec::new();
        let mut vertical = Vec::new();
        let mut angled = Vec::new();

        for (idx, segment) in segments.iter().enumerate() {
            match segment.kind(tolerance) {
                SegmentKind::Horizontal => horizontal.push(AxisEntry {
                    key: 0.5 * (segment.start.y + segment.end.y),
                    segment: idx,
                }),
                SegmentKind::Vertical => vertical.push(AxisEntry {
                    key: 0.5 * (segment.start.x + segment.end.x),
                    segment: idx,
                }),
                SegmentKind::Angled => angled.push(idx),
            }
        }

        horizontal.sort_by(|a, b| a.key.total_cmp(&b.key));
        vertical.sort_by(|a, b| a.key.total_cmp(&b.key));

        log::debug!(
            "Geometry index built: {} horizontal, {} vertical, {} angled",
            horizontal.len(),
            vertical.len(),
            angled.len()
        );

        Self {
            segments,
            horizontal,
            vertical,
            angled,
            tolerance,
        }
    }

    /// All segments in map order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True if the map has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Axis-alignment tolerance used at build time.
    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    /// Bucket sizes as (horizontal, vertical, angled).
    pub fn bucket_sizes(&self) -> (usize, usize, usize) {
        (self.horizontal.len(), self.vertical.len(), self.angled.len())
    }

    /// Closest intersection of `ray` with the map.
    pub fn nearest_intersection(&self, ray: &Ray) -> RaycastResult {
        let horizontal = self.walk_bucket(&self.horizontal, ray.origin.y, ray.direction.y, ray);
        let vertical = self.walk_bucket(&self.vertical, ray.origin.x, ray.direction.x, ray);
        let angled = self
            .angled
            .iter()
            .fold(None, |best, &idx| closer(best, self.hit(idx, ray)));

        [horizontal, vertical, angled]
            .into_iter()
            .fold(None, closer)
            .map_or_else(|| RaycastResult::miss(ray), |(t, idx)| {
                RaycastResult::hit(ray, t, idx)
            })
    }

    /// Walk one sorted axis bucket outward from the ray origin.
    ///
    /// `origin` and `dir` are the ray's components along the bucket's sort
    /// axis (y for horizontal segments, x for vertical ones).
    fn walk_bucket(
        &self,
        entries: &[AxisEntry],
        origin: f32,
        dir: f32,
        ray: &Ray,
    ) -> Option<(f32, usize)> {
        if entries.is_empty() {
            return None;
        }

        if dir.abs() <= AXIS_PARALLEL_EPS {
            return entries
                .iter()
                .fold(None, |best, e| closer(best, self.hit(e.segment, ray)));
        }

        // Endpoints of a bucketed segment lie within half the tolerance of its key.
        let half = 0.5 * self.tolerance;
        let limit = |best: Option<(f32, usize)>| {
            best.map_or(ray.max_range, |(t, _)| t) + PRUNE_SLACK
        };
        let mut best = None;

        if dir > 0.0 {
            let start = entries.partition_point(|e| e.key + half < origin);
            for e in &entries[start..] {
                let reach = (e.key - half - origin) / dir;
                if reach > limit(best) {
                    break;
                }
                best = closer(best, self.hit(e.segment, ray));
            }
        } else {
            let end = entries.partition_point(|e| e.key - half <= origin);
            for e in entries[..end].iter().rev() {
                let reach = (e.key + half - origin) / dir;
                if reach > limit(best) {
                    break;
                }
                best = closer(best, self.hit(e.segment, ray));
            }
        }

        best
    }

    /// Distance to `segment` along `ray` if it lies inside the ray's range.
    #[inline]
    fn hit(&self, segment: usize, ray: &Ray) -> Option<(f32, usize)> {
        hit_within_range(&self.segments[segment], ray).map(|t| (t, segment))
    }
}

#[inline]
fn hit_within_range(segment: &Segment, ray: &Ray) -> Option<f32> {
    segment
        .ray_intersection(ray.origin, ray.direction)
        .filter(|&t| t >= ray.min_range && t <= ray.max_range)
}

/// Keep the strictly closer of two candidates; ties keep `best`.
#[inline]
fn closer(best: Option<(f32, usize)>, candidate: Option<(f32, usize)>) -> Option<(f32, usize)> {
    match (best, candidate) {
        (Some(b), Some(c)) if c.0 < b.0 => Some(c),
        (None, c) => c,
        (b, _) => b,
    }
}
