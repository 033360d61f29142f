//! Editing session state.

use crate::brush::{BrushController, BrushKind, BrushOutcome};
use crate::config::SketchConfig;
use crate::history::{Action, ActionLog};
use crate::index::{GridPoint, SpatialIndex};
use crate::scene::{HitTest, SceneView};
use crate::view::ViewTransform;
use kurbo::{Point, Size, Vec2};

/// One editing session: view, content, brush and undo history.
///
/// Sessions share nothing; every window or user gets its own.
#[derive(Debug, Clone)]
pub struct Canvas {
    /// Grid content.
    pub index: SpatialIndex,
    /// Pan/zoom state.
    pub view: ViewTransform,
    /// Brush selection and pending gesture.
    pub brush: BrushController,
    /// Undo history for point edits.
    pub history: ActionLog,
    /// Configuration the session was built from.
    pub config: SketchConfig,
    /// Set when the visible scene changed since the last frame.
    redraw_requested: bool,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(SketchConfig::default())
    }
}

impl Canvas {
    /// Create an empty canvas from a configuration.
    pub fn new(config: SketchConfig) -> Self {
        let mut view = ViewTransform::new(
            Size::new(config.viewport_width, config.viewport_height),
            config.initial_scale,
        );
        view.min_scale = config.min_scale;
        view.max_scale = config.max_scale;
        view.zoom_sensitivity = config.zoom_sensitivity;

        Self {
            index: SpatialIndex::new(),
            view,
            brush: BrushController::new(),
            history: ActionLog::with_capacity_limit(config.max_history),
            config,
            redraw_requested: true,
        }
    }

    /// Borrowed snapshot for renderers and hit-testers.
    pub fn scene(&self) -> SceneView<'_> {
        SceneView {
            view: &self.view,
            index: &self.index,
            preview: self.brush.preview(),
        }
    }

    /// Ask the host to draw a new frame.
    pub fn request_redraw(&mut self) {
        self.redraw_requested = true;
    }

    /// Consume the pending redraw request. Hosts call this once per
    /// display frame, so any number of requests collapse into one draw.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    pub fn needs_redraw(&self) -> bool {
        self.redraw_requested
    }

    /// Select a brush, discarding any pending gesture.
    pub fn set_brush(&mut self, brush: BrushKind) {
        let had_preview = self.brush.is_active();
        self.brush.set_brush(brush);
        if had_preview {
            self.request_redraw();
        }
    }

    /// Cancel the pending gesture. Returns `true` if there was one.
    pub fn cancel_gesture(&mut self) -> bool {
        let canceled = self.brush.cancel();
        if canceled {
            self.request_redraw();
        }
        canceled
    }

    /// Apply a click at a screen position with the current brush.
    ///
    /// Point and line brushes act on the snapped grid point; the eraser
    /// asks `hit_test` what is drawn at the pixel.
    pub fn click(&mut self, screen: Point, hit_test: &dyn HitTest) -> BrushOutcome {
        let outcome = match self.brush.current() {
            BrushKind::Eraser => {
                let hit = hit_test.hit_test(&self.scene(), screen);
                self.brush.erase(hit, &mut self.index)
            }
            BrushKind::Point | BrushKind::Line => {
                let at = self.view.grid_from_screen(screen);
                let cursor = self.view.world_from_screen(screen);
                self.brush.click(at, cursor, &mut self.index, &mut self.history)
            }
        };
        if outcome.needs_redraw() {
            self.request_redraw();
        }
        outcome
    }

    /// Undo the most recent point edit. No-op on an empty history.
    pub fn undo(&mut self) -> Option<Action> {
        let action = self.history.pop_and_undo(&mut self.index)?;
        self.request_redraw();
        Some(action)
    }

    pub fn pan(&mut self, delta: Vec2) {
        if delta == Vec2::ZERO {
            return;
        }
        self.view.pan(delta);
        self.request_redraw();
    }

    /// Zoom around a screen position. Returns `true` if the scale changed.
    pub fn zoom(&mut self, screen: Point, wheel_delta: f64) -> bool {
        let changed = self.view.zoom(screen, wheel_delta);
        if changed {
            self.request_redraw();
        }
        changed
    }

    pub fn resize(&mut self, size: Size) {
        if size == self.view.viewport() {
            return;
        }
        self.view.resize(size);
        self.request_redraw();
    }

    /// Move the live line preview to the world point under `screen`.
    pub fn update_preview(&mut self, screen: Point) -> bool {
        let world = self.view.world_from_screen(screen);
        let shown = self.brush.update_cursor(world);
        if shown {
            self.request_redraw();
        }
        shown
    }

    /// Snapped grid point under a screen position.
    pub fn grid_at(&self, screen: Point) -> GridPoint {
        self.view.grid_from_screen(screen)
    }

    /// Position readout for UI chrome, with the y axis pointing up.
    pub fn position_readout(&self, screen: Point) -> String {
        let at = self.grid_at(screen);
        format!("{}; {}", at.x, at.y.saturating_neg())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::Segment;
    use crate::scene::HitTarget;

    fn nothing(_: &SceneView<'_>, _: Point) -> HitTarget {
        HitTarget::Nothing
    }

    /// Screen position of a grid point in the default view.
    fn screen_of(canvas: &Canvas, x: i64, y: i64) -> Point {
        canvas.view.screen_from_world(GridPoint::new(x, y).to_world())
    }

    #[test]
    fn test_new_canvas_requests_first_frame() {
        let mut canvas = Canvas::default();
        assert!(canvas.take_redraw());
        assert!(!canvas.take_redraw());
        assert!(canvas.index.is_empty());
    }

    #[test]
    fn test_config_applied() {
        let config = SketchConfig {
            initial_scale: 0.5,
            max_history: 3,
            viewport_width: 100.0,
            viewport_height: 50.0,
            ..SketchConfig::default()
        };
        let canvas = Canvas::new(config);
        assert!((canvas.view.scale() - 0.5).abs() < f64::EPSILON);
        assert_eq!(canvas.view.viewport(), Size::new(100.0, 50.0));
        assert_eq!(canvas.view.offset, Vec2::new(50.0, 25.0));
    }

    #[test]
    fn test_click_point_requests_redraw() {
        let mut canvas = Canvas::default();
        canvas.take_redraw();
        let screen = screen_of(&canvas, 3, 4);
        assert_eq!(canvas.click(screen, &nothing), BrushOutcome::PointAdded(GridPoint::new(3, 4)));
        assert!(canvas.take_redraw());
    }

    #[test]
    fn test_scenario_point_line_undo() {
        let mut canvas = Canvas::default();
        let a = screen_of(&canvas, 3, 4);
        let b = screen_of(&canvas, 5, 4);

        canvas.click(a, &nothing);
        assert!(canvas.index.has_point(GridPoint::new(3, 4)));

        canvas.set_brush(BrushKind::Line);
        canvas.click(a, &nothing);
        canvas.click(b, &nothing);
        assert!(canvas.index.has_segment(GridPoint::new(3, 4), GridPoint::new(5, 4)));

        canvas.click(a, &nothing);
        let outcome = canvas.click(b, &nothing);
        assert_eq!(
            outcome,
            BrushOutcome::SegmentRemoved(Segment::new(GridPoint::new(3, 4), GridPoint::new(5, 4)))
        );
        assert_eq!(canvas.index.segment_count(), 0);

        assert_eq!(canvas.undo(), Some(Action::add(GridPoint::new(3, 4))));
        assert!(canvas.index.is_empty());
        assert_eq!(canvas.undo(), None);
    }

    #[test]
    fn test_eraser_uses_hit_test() {
        let mut canvas = Canvas::default();
        canvas.index.add_point(GridPoint::new(0, 0));
        canvas.set_brush(BrushKind::Eraser);

        let origin = |_: &SceneView<'_>, _: Point| HitTarget::Point(GridPoint::new(0, 0));
        let outcome = canvas.click(Point::new(1.0, 1.0), &origin);
        assert_eq!(outcome, BrushOutcome::Erased(HitTarget::Point(GridPoint::new(0, 0))));
        assert!(canvas.index.is_empty());
        assert!(canvas.history.is_empty());
    }

    #[test]
    fn test_brush_change_clears_preview() {
        let mut canvas = Canvas::default();
        canvas.set_brush(BrushKind::Line);
        canvas.click(screen_of(&canvas, 1, 1), &nothing);
        assert!(canvas.scene().preview.is_some());
        canvas.take_redraw();

        canvas.set_brush(BrushKind::Point);
        assert!(canvas.scene().preview.is_none());
        assert!(canvas.take_redraw());
        assert!(canvas.index.is_empty());
    }

    #[test]
    fn test_redraws_coalesce() {
        let mut canvas = Canvas::default();
        canvas.take_redraw();
        for _ in 0..10 {
            canvas.pan(Vec2::new(1.0, 0.0));
        }
        assert!(canvas.take_redraw());
        assert!(!canvas.take_redraw());

        canvas.pan(Vec2::ZERO);
        canvas.resize(canvas.view.viewport());
        assert!(!canvas.needs_redraw());
    }

    #[test]
    fn test_position_readout_flips_y() {
        let canvas = Canvas::default();
        assert_eq!(canvas.position_readout(screen_of(&canvas, 2, 7)), "2; -7");
        assert_eq!(canvas.position_readout(screen_of(&canvas, -3, -1)), "-3; 1");
        assert_eq!(canvas.position_readout(screen_of(&canvas, 0, 0)), "0; 0");
    }
}
