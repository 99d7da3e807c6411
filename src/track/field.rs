//! Occupancy field for placement rejection
//!
//! Each committed block leaves a handful of sampled points along its
//! centerline. A candidate is rejected when any of its samples lands within
//! the combined radius of an existing point in the same height band. Points
//! of the block the cursor currently sits on are skipped: a new block always
//! touches its predecessor.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::{HEIGHT_TOLERANCE, OCCUPIED_RADIUS};

/// One occupancy sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OccupiedPoint {
    pub position: Vec3,
    pub radius: f32,
    /// Index of the segment that left this point
    pub segment: usize,
}

/// Collision predicate between two samples
///
/// Distance is measured in the (x, z) plane; samples whose heights differ by
/// more than `HEIGHT_TOLERANCE` never collide, so the track may pass over or
/// under itself.
#[inline]
pub fn samples_collide(a: Vec3, a_radius: f32, b: Vec3, b_radius: f32) -> bool {
    if (a.y - b.y).abs() > HEIGHT_TOLERANCE {
        return false;
    }
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    let reach = a_radius + b_radius;
    dx * dx + dz * dz < reach * reach
}

/// Append-only (truncatable) occupancy set
#[derive(Debug, Clone, Default)]
pub struct CollisionField {
    pub(crate) points: Vec<OccupiedPoint>,
    /// Segment whose points are exempt from `test`
    latest: Option<usize>,
}

impl CollisionField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[OccupiedPoint] {
        &self.points
    }

    /// True if a sample at `position` would collide with placed track
    pub fn test(&self, position: Vec3, radius: f32) -> bool {
        self.points
            .iter()
            .filter(|p| Some(p.segment) != self.latest)
            .any(|p| samples_collide(position, radius, p.position, p.radius))
    }

    /// True if any sample of a candidate path collides
    pub fn test_path(&self, samples: &[Vec3]) -> bool {
        samples.iter().any(|&s| self.test(s, OCCUPIED_RADIUS))
    }

    /// Record the samples of a freshly committed segment
    pub fn commit(&mut self, segment: usize, samples: &[Vec3]) {
        self.points.extend(samples.iter().map(|&position| OccupiedPoint {
            position,
            radius: OCCUPIED_RADIUS,
            segment,
        }));
        self.latest = Some(segment);
    }

    /// Drop every point past `len` (backtracking)
    pub fn truncate(&mut self, len: usize) {
        self.points.truncate(len);
        self.latest = self.points.last().map(|p| p.segment);
    }

    /// First pair of points from non-adjacent segments that collide
    pub fn find_overlap(&self) -> Option<(OccupiedPoint, OccupiedPoint)> {
        find_overlap(&self.points)
    }
}

/// First pair of points from non-adjacent segments that collide
pub fn find_overlap(points: &[OccupiedPoint]) -> Option<(OccupiedPoint, OccupiedPoint)> {
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            if a.segment.abs_diff(b.segment) > 1
                && samples_collide(a.position, a.radius, b.position, b.radius)
            {
                return Some((*a, *b));
            }
        }
    }
    None
}
