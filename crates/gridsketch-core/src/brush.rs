//! Brush selection and gesture state machine.

use crate::history::{Action, ActionLog};
use crate::index::{GridPoint, Segment, SpatialIndex};
use crate::scene::HitTarget;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Available brushes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BrushKind {
    #[default]
    Point,
    Line,
    Eraser,
}

impl BrushKind {
    /// Display name for UI chrome.
    pub fn name(self) -> &'static str {
        match self {
            BrushKind::Point => "Point",
            BrushKind::Line => "Line",
            BrushKind::Eraser => "Eraser",
        }
    }
}

/// Transient state of a multi-click gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    /// The first endpoint of a line has been placed.
    LineArmed {
        /// Grid point of the first click.
        start: GridPoint,
        /// Live pointer position in world coordinates, for preview.
        cursor: Point,
    },
}

/// Result of feeding a click to the brush controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrushOutcome {
    Unchanged,
    PointAdded(GridPoint),
    PointRemoved(GridPoint),
    SegmentAdded(Segment),
    SegmentRemoved(Segment),
    Erased(HitTarget),
    GestureStarted(GridPoint),
    GestureCanceled,
}

impl BrushOutcome {
    /// Whether the index was modified.
    pub fn mutated(&self) -> bool {
        matches!(
            self,
            BrushOutcome::PointAdded(_)
                | BrushOutcome::PointRemoved(_)
                | BrushOutcome::SegmentAdded(_)
                | BrushOutcome::SegmentRemoved(_)
                | BrushOutcome::Erased(_)
        )
    }

    /// Whether the visible scene changed, including preview-only changes.
    pub fn needs_redraw(&self) -> bool {
        !matches!(self, BrushOutcome::Unchanged)
    }
}

/// Owns the selected brush and any in-progress gesture.
#[derive(Debug, Clone, Default)]
pub struct BrushController {
    current: BrushKind,
    gesture: GestureState,
}

impl BrushController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected brush.
    pub fn current(&self) -> BrushKind {
        self.current
    }

    pub fn gesture(&self) -> GestureState {
        self.gesture
    }

    /// Select a brush. Always discards an unfinished gesture.
    pub fn set_brush(&mut self, brush: BrushKind) {
        if self.is_active() {
            log::debug!("brush change discards pending gesture");
        }
        self.current = brush;
        self.gesture = GestureState::Idle;
        log::debug!("brush set to {}", brush.name());
    }

    /// Drop the in-progress gesture without touching the index.
    /// Returns `true` if there was one.
    pub fn cancel(&mut self) -> bool {
        let was_active = self.is_active();
        self.gesture = GestureState::Idle;
        was_active
    }

    /// Whether a gesture is in progress.
    pub fn is_active(&self) -> bool {
        matches!(self.gesture, GestureState::LineArmed { .. })
    }

    /// Move the live preview endpoint. Returns `true` if a preview is shown.
    pub fn update_cursor(&mut self, world: Point) -> bool {
        if let GestureState::LineArmed { cursor, .. } = &mut self.gesture {
            *cursor = world;
            true
        } else {
            false
        }
    }

    /// The in-progress line, if any: fixed start and live cursor.
    pub fn preview(&self) -> Option<(GridPoint, Point)> {
        match self.gesture {
            GestureState::LineArmed { start, cursor } => Some((start, cursor)),
            GestureState::Idle => None,
        }
    }

    /// Handle a click at a snapped grid point with the point or line brush.
    ///
    /// `cursor` is the unsnapped world position, used to seed the line
    /// preview. The eraser ignores grid clicks; see [`Self::erase`].
    pub fn click(
        &mut self,
        at: GridPoint,
        cursor: Point,
        index: &mut SpatialIndex,
        history: &mut ActionLog,
    ) -> BrushOutcome {
        match self.current {
            BrushKind::Point => Self::toggle_point(at, index, history),
            BrushKind::Line => self.line_click(at, cursor, index),
            BrushKind::Eraser => BrushOutcome::Unchanged,
        }
    }

    fn toggle_point(at: GridPoint, index: &mut SpatialIndex, history: &mut ActionLog) -> BrushOutcome {
        if index.toggle_point(at) {
            history.push(Action::add(at));
            log::debug!("point added at {at}");
            BrushOutcome::PointAdded(at)
        } else {
            history.push(Action::remove(at));
            log::debug!("point removed at {at}");
            BrushOutcome::PointRemoved(at)
        }
    }

    fn line_click(&mut self, at: GridPoint, cursor: Point, index: &mut SpatialIndex) -> BrushOutcome {
        match self.gesture {
            GestureState::Idle => {
                self.gesture = GestureState::LineArmed { start: at, cursor };
                log::debug!("line gesture started at {at}");
                BrushOutcome::GestureStarted(at)
            }
            GestureState::LineArmed { start, .. } => {
                self.gesture = GestureState::Idle;
                if start == at {
                    log::debug!("line gesture canceled at {at}");
                    return BrushOutcome::GestureCanceled;
                }
                let segment = Segment::new(start, at);
                if index.toggle_segment(start, at) {
                    log::debug!("segment added {segment}");
                    BrushOutcome::SegmentAdded(segment)
                } else {
                    log::debug!("segment removed {segment}");
                    BrushOutcome::SegmentRemoved(segment)
                }
            }
        }
    }

    /// Handle an eraser click on whatever the renderer reported under the
    /// pointer. Erasures are not recorded for undo.
    pub fn erase(&mut self, hit: HitTarget, index: &mut SpatialIndex) -> BrushOutcome {
        if self.current != BrushKind::Eraser {
            return BrushOutcome::Unchanged;
        }
        let removed = match hit {
            HitTarget::Point(point) => index.remove_point(point),
            HitTarget::Segment(segment) => {
                let (start, end) = segment.endpoints();
                index.remove_segment(start, end)
            }
            HitTarget::Nothing => false,
        };
        if removed {
            log::debug!("erased {hit:?}");
            BrushOutcome::Erased(hit)
        } else {
            BrushOutcome::Unchanged
        }
    }
}
