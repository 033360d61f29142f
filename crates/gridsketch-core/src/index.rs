//! Grid-aligned storage for points and segments.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// An integer position in the unbounded world grid.
///
/// Ordering compares `x` first, then `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: i64,
    pub y: i64,
}

impl GridPoint {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// The world-space position of this grid point.
    pub fn to_world(self) -> Point {
        Point::new(self.x as f64, self.y as f64)
    }
}

impl From<(i64, i64)> for GridPoint {
    fn from((x, y): (i64, i64)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for GridPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A segment between two grid points, stored with `start <= end`.
///
/// The only constructor canonicalizes the endpoints, so `(a, b)` and
/// `(b, a)` always produce the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Segment {
    start: GridPoint,
    end: GridPoint,
}

impl Segment {
    /// Create a segment in canonical endpoint order.
    pub fn new(a: GridPoint, b: GridPoint) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn start(&self) -> GridPoint {
        self.start
    }

    pub fn end(&self) -> GridPoint {
        self.end
    }

    /// Both endpoints in canonical order.
    pub fn endpoints(&self) -> (GridPoint, GridPoint) {
        (self.start, self.end)
    }

    /// The segment as a world-space kurbo line.
    pub fn to_line(&self) -> kurbo::Line {
        kurbo::Line::new(self.start.to_world(), self.end.to_world())
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.start, self.end)
    }
}

/// Sparse storage of points and segments keyed by grid coordinates.
///
/// Both sets are flat, so removing the last entry at a coordinate leaves
/// nothing behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpatialIndex {
    points: HashSet<GridPoint>,
    segments: HashSet<Segment>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a point. Returns `true` if it was not already present.
    pub fn add_point(&mut self, point: GridPoint) -> bool {
        self.points.insert(point)
    }

    /// Remove a point. Returns `true` if it was present.
    pub fn remove_point(&mut self, point: GridPoint) -> bool {
        self.points.remove(&point)
    }

    /// Flip the presence of a point. Returns whether it is present afterwards.
    pub fn toggle_point(&mut self, point: GridPoint) -> bool {
        if self.points.remove(&point) {
            false
        } else {
            self.points.insert(point);
            true
        }
    }

    pub fn has_point(&self, point: GridPoint) -> bool {
        self.points.contains(&point)
    }

    /// Insert the segment between `a` and `b`. Returns `true` if it was new.
    pub fn add_segment(&mut self, a: GridPoint, b: GridPoint) -> bool {
        self.segments.insert(Segment::new(a, b))
    }

    /// Remove the segment between `a` and `b`. Returns `true` if it existed.
    pub fn remove_segment(&mut self, a: GridPoint, b: GridPoint) -> bool {
        self.segments.remove(&Segment::new(a, b))
    }

    /// Insert the segment if absent, remove it if present.
    /// Returns whether the segment is present afterwards.
    pub fn toggle_segment(&mut self, a: GridPoint, b: GridPoint) -> bool {
        let segment = Segment::new(a, b);
        if self.segments.remove(&segment) {
            false
        } else {
            self.segments.insert(segment);
            true
        }
    }

    pub fn has_segment(&self, a: GridPoint, b: GridPoint) -> bool {
        self.segments.contains(&Segment::new(a, b))
    }

    /// All points, in no particular order.
    pub fn points(&self) -> impl Iterator<Item = GridPoint> + '_ {
        self.points.iter().copied()
    }

    /// All segments, in no particular order.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.segments.iter().copied()
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.segments.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.segments.clear();
    }
}
