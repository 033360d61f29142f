//! Read-only scene view and the hit-test seam used by the eraser.

use crate::index::{GridPoint, Segment, SpatialIndex};
use crate::view::ViewTransform;
use kurbo::Point;

/// What occupies a screen pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitTarget {
    Point(GridPoint),
    Segment(Segment),
    Nothing,
}

/// Everything a renderer or hit-tester needs to draw one frame.
#[derive(Debug, Clone, Copy)]
pub struct SceneView<'a> {
    pub view: &'a ViewTransform,
    pub index: &'a SpatialIndex,
    /// In-progress line: fixed start and live world-space cursor.
    pub preview: Option<(GridPoint, Point)>,
}

/// Maps a screen pixel to the object drawn there.
///
/// Implemented by rendering backends; the core never inspects how the
/// scene is drawn.
pub trait HitTest {
    fn hit_test(&self, scene: &SceneView<'_>, screen: Point) -> HitTarget;
}

impl<F> HitTest for F
where
    F: Fn(&SceneView<'_>, Point) -> HitTarget,
{
    fn hit_test(&self, scene: &SceneView<'_>, screen: Point) -> HitTarget {
        self(scene, screen)
    }
}
