//! View transform for pan/zoom between screen pixels and world coordinates.

use crate::index::GridPoint;
use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Default world units per screen pixel.
pub const DEFAULT_SCALE: f64 = 0.01;

/// Default wheel sensitivity (scale change per wheel unit).
pub const DEFAULT_ZOOM_SENSITIVITY: f64 = 0.001;

/// Screen axis selector for per-axis conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

/// Round a continuous world coordinate to the nearest grid line.
///
/// Halves round towards positive infinity, so `-0.5` snaps to `0` and
/// `0.5` snaps to `1`. Out-of-range values saturate.
pub fn snap(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Maps between screen pixels and world coordinates.
///
/// `scale` is the number of world units covered by one screen pixel, and
/// `offset` is the screen position of the world origin. A world point `w`
/// sits at screen position `w / scale + offset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    /// Screen position of the world origin, in pixels.
    pub offset: Vec2,
    /// World units per screen pixel. Always positive.
    scale: f64,
    /// Smallest allowed scale.
    pub min_scale: f64,
    /// Largest allowed scale.
    pub max_scale: f64,
    /// Scale change per wheel unit.
    pub zoom_sensitivity: f64,
    /// Last known viewport size, used to keep the centre stable on resize.
    viewport: Size,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::new(Size::new(800.0, 600.0), DEFAULT_SCALE)
    }
}

impl ViewTransform {
    /// Create a view with the world origin at the centre of the viewport.
    ///
    /// A non-positive or non-finite `scale` falls back to [`DEFAULT_SCALE`].
    pub fn new(viewport: Size, scale: f64) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            DEFAULT_SCALE
        };
        Self {
            offset: Vec2::new(viewport.width / 2.0, viewport.height / 2.0),
            scale,
            min_scale: 1e-6,
            max_scale: 1e6,
            zoom_sensitivity: DEFAULT_ZOOM_SENSITIVITY,
            viewport,
        }
    }

    /// World units per screen pixel.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Current viewport size in pixels.
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Convert a single screen axis offset to a world coordinate.
    pub fn world_axis(&self, screen: f64, axis: Axis) -> f64 {
        let offset = match axis {
            Axis::X => self.offset.x,
            Axis::Y => self.offset.y,
        };
        (-offset + screen) * self.scale
    }

    /// Convert a screen point to continuous world coordinates.
    pub fn world_from_screen(&self, screen: Point) -> Point {
        Point::new(
            self.world_axis(screen.x, Axis::X),
            self.world_axis(screen.y, Axis::Y),
        )
    }

    /// Convert a screen point to the nearest grid point.
    pub fn grid_from_screen(&self, screen: Point) -> GridPoint {
        let world = self.world_from_screen(screen);
        GridPoint::new(snap(world.x), snap(world.y))
    }

    /// Convert a world point to screen coordinates.
    pub fn screen_from_world(&self, world: Point) -> Point {
        Point::new(
            world.x / self.scale + self.offset.x,
            world.y / self.scale + self.offset.y,
        )
    }

    /// Affine transform from world to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(1.0 / self.scale)
    }

    /// Affine transform from screen to world coordinates.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(self.scale) * Affine::translate(-self.offset)
    }

    /// The world rectangle currently covered by the viewport.
    pub fn visible_world_rect(&self) -> Rect {
        let origin = self.world_from_screen(Point::ZERO);
        Rect::from_origin_size(
            origin,
            Size::new(
                self.viewport.width * self.scale,
                self.viewport.height * self.scale,
            ),
        )
    }

    /// Pan by a delta in screen pixels. The delta is not scaled, so the
    /// scene tracks the pointer one-to-one at every zoom level.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
        log::trace!("pan by ({}, {}) -> offset {:?}", delta.x, delta.y, self.offset);
    }

    /// Zoom by a wheel delta, keeping the world point under `screen` fixed.
    ///
    /// Returns `false` when the scale did not change.
    pub fn zoom(&mut self, screen: Point, wheel_delta: f64) -> bool {
        let factor = 1.0 + self.zoom_sensitivity * wheel_delta;
        if !factor.is_finite() || factor <= 0.0 {
            log::warn!("ignoring wheel delta {wheel_delta}: zoom factor {factor} is not positive");
            return false;
        }

        let new_scale = (self.scale * factor).clamp(self.min_scale, self.max_scale);
        if !new_scale.is_finite() || new_scale <= 0.0 || new_scale == self.scale {
            return false;
        }

        let pre = self.world_from_screen(screen);
        self.scale = new_scale;
        self.offset = Vec2::new(
            -((pre.x / new_scale) - screen.x),
            -((pre.y / new_scale) - screen.y),
        );
        log::trace!("zoom at {screen:?} -> scale {new_scale}");
        true
    }

    /// Record a new viewport size, shifting the offset by half of the size
    /// change so the world point at the viewport centre stays put.
    pub fn resize(&mut self, size: Size) {
        let dw = size.width - self.viewport.width;
        let dh = size.height - self.viewport.height;
        if dw == 0.0 && dh == 0.0 {
            return;
        }
        self.offset += Vec2::new(dw / 2.0, dh / 2.0);
        self.viewport = size;
    }

    /// World coordinate at the centre of the viewport.
    pub fn center_world(&self) -> Point {
        self.world_from_screen(Point::new(
            self.viewport.width / 2.0,
            self.viewport.height / 2.0,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn view() -> ViewTransform {
        ViewTransform::new(Size::new(800.0, 600.0), 0.01)
    }

    #[test]
    fn test_origin_starts_at_center() {
        let v = view();
        let world = v.world_from_screen(Point::new(400.0, 300.0));
        assert!(world.x.abs() < EPS);
        assert!(world.y.abs() < EPS);
    }

    #[test]
    fn test_world_axis_formula() {
        let mut v = view();
        v.offset = Vec2::new(100.0, -50.0);
        assert!((v.world_axis(300.0, Axis::X) - 2.0).abs() < EPS);
        assert!((v.world_axis(50.0, Axis::Y) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_screen_world_roundtrip() {
        let mut v = view();
        v.offset = Vec2::new(13.0, -7.5);
        v.zoom(Point::new(10.0, 10.0), 250.0);

        let original = Point::new(123.0, 456.0);
        let back = v.screen_from_world(v.world_from_screen(original));
        assert!((back.x - original.x).abs() < 1e-9);
        assert!((back.y - original.y).abs() < 1e-9);
    }

    #[test]
    fn test_affine_matches_direct_conversion() {
        let mut v = view();
        v.zoom(Point::new(200.0, 100.0), -300.0);
        let world = Point::new(3.0, -4.0);
        let a = v.transform() * world;
        let b = v.screen_from_world(world);
        assert!((a.x - b.x).abs() < 1e-9);
        assert!((a.y - b.y).abs() < 1e-9);

        let back = v.inverse_transform() * a;
        assert!((back.x - world.x).abs() < 1e-9);
        assert!((back.y - world.y).abs() < 1e-9);
    }

    #[test]
    fn test_grid_snapping() {
        let v = view();
        // 0.01 world units per pixel: 149px right of centre is 1.49.
        assert_eq!(v.grid_from_screen(Point::new(549.0, 300.0)), GridPoint::new(1, 0));
        assert_eq!(v.grid_from_screen(Point::new(551.0, 260.0)), GridPoint::new(2, 0));
        assert_eq!(snap(-0.5), 0);
        assert_eq!(snap(0.5), 1);
        assert_eq!(snap(-1.6), -2);
    }

    #[test]
    fn test_zoom_is_pointer_anchored() {
        for &(scale, px, py, delta) in &[
            (0.01, 10.0, 20.0, 100.0),
            (0.5, 799.0, 0.0, -250.0),
            (2.0, 400.0, 300.0, 3.0),
            (0.003, -40.0, 1200.0, -999.0),
        ] {
            let mut v = ViewTransform::new(Size::new(800.0, 600.0), scale);
            v.offset = Vec2::new(37.0, -12.0);
            let pointer = Point::new(px, py);
            let before = v.world_from_screen(pointer);
            assert!(v.zoom(pointer, delta));
            let after = v.world_from_screen(pointer);
            let tol = 1e-9 * (1.0 + before.x.abs().max(before.y.abs()));
            assert!((before.x - after.x).abs() < tol, "x drift at scale {scale}");
            assert!((before.y - after.y).abs() < tol, "y drift at scale {scale}");
        }
    }

    #[test]
    fn test_zoom_scale_update() {
        let mut v = view();
        v.zoom(Point::ZERO, 100.0);
        assert!((v.scale() - 0.011).abs() < EPS);
    }

    #[test]
    fn test_zoom_rejects_non_positive_factor() {
        let mut v = view();
        let before = v.clone();
        assert!(!v.zoom(Point::new(5.0, 5.0), -1000.0));
        assert!(!v.zoom(Point::new(5.0, 5.0), -5000.0));
        assert!(!v.zoom(Point::new(5.0, 5.0), f64::NAN));
        assert_eq!(v, before);
    }

    #[test]
    fn test_zoom_clamps_and_stays_anchored() {
        let mut v = view();
        v.max_scale = 0.02;
        let pointer = Point::new(120.0, 80.0);
        let before = v.world_from_screen(pointer);
        assert!(v.zoom(pointer, 5000.0));
        assert!((v.scale() - 0.02).abs() < EPS);
        let after = v.world_from_screen(pointer);
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);

        // Already at the limit.
        assert!(!v.zoom(pointer, 10.0));
    }

    #[test]
    fn test_pan_is_reversible() {
        let mut v = view();
        let before = v.offset;
        v.pan(Vec2::new(17.25, 0.0));
        v.pan(Vec2::new(-17.25, 0.0));
        assert_eq!(v.offset.x, before.x);
        assert_eq!(v.offset.y, before.y);
    }

    #[test]
    fn test_pan_ignores_scale() {
        let mut v = view();
        v.zoom(Point::ZERO, 500.0);
        let before = v.offset;
        v.pan(Vec2::new(10.0, -4.0));
        assert!((v.offset.x - before.x - 10.0).abs() < EPS);
        assert!((v.offset.y - before.y + 4.0).abs() < EPS);
    }

    #[test]
    fn test_resize_preserves_center() {
        let mut v = view();
        v.pan(Vec2::new(33.0, -21.0));
        v.zoom(Point::new(100.0, 100.0), 120.0);
        let before = v.center_world();

        v.resize(Size::new(1024.0, 333.0));
        let after = v.center_world();
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
        assert_eq!(v.viewport(), Size::new(1024.0, 333.0));
    }

    #[test]
    fn test_visible_rect() {
        let v = view();
        let rect = v.visible_world_rect();
        assert!((rect.x0 + 4.0).abs() < EPS);
        assert!((rect.y0 + 3.0).abs() < EPS);
        assert!((rect.width() - 8.0).abs() < EPS);
        assert!((rect.height() - 6.0).abs() < EPS);
    }

    #[test]
    fn test_invalid_initial_scale_falls_back() {
        let v = ViewTransform::new(Size::new(10.0, 10.0), 0.0);
        assert!((v.scale() - DEFAULT_SCALE).abs() < EPS);
    }
}
