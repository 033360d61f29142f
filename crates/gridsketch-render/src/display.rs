//! Display-list renderer and pixel hit-testing.

use crate::renderer::{GridStyle, RenderContext, RenderResult, Renderer, RendererError};
use gridsketch_core::index::{GridPoint, Segment};
use gridsketch_core::scene::{HitTarget, HitTest, SceneView};
use kurbo::{Circle, Line, ParamCurveNearest, Point, Rect};
use peniko::Color;

/// Extra pixels around points and segments that still count as a hit.
pub const DEFAULT_HIT_TOLERANCE: f64 = 2.0;

/// Grid lines closer than this many pixels are not drawn.
const MIN_GRID_SPACING: f64 = 4.0;

/// One primitive in screen space, back to front.
#[derive(Debug, Clone)]
pub enum DisplayItem {
    /// Grid line or world axis.
    Grid { line: Line, color: Color },
    Segment { segment: Segment, line: Line, width: f64, color: Color },
    Point { point: GridPoint, circle: Circle, color: Color },
    /// Line from the first endpoint of a pending gesture to the cursor.
    Preview { line: Line, width: f64, color: Color },
}

/// Builds a screen-space display list for a host to paint, and hit-tests
/// screen pixels against the same geometry.
#[derive(Debug, Clone)]
pub struct SceneRenderer {
    items: Vec<DisplayItem>,
    /// Pixels of slack for hit-testing.
    pub hit_tolerance: f64,
    /// World-space sizes used for the last frame.
    point_radius: f64,
    line_width: f64,
    frames: u64,
}

impl Default for SceneRenderer {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            hit_tolerance: DEFAULT_HIT_TOLERANCE,
            point_radius: 0.06,
            line_width: 0.03,
            frames: 0,
        }
    }
}

impl SceneRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Display list of the last rendered frame.
    pub fn items(&self) -> &[DisplayItem] {
        &self.items
    }

    /// Number of frames rendered so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    fn push_grid(&mut self, ctx: &RenderContext, visible: Rect) {
        let view = ctx.scene.view;
        let spacing = 1.0 / view.scale();
        let viewport = Rect::from_origin_size(Point::ZERO, ctx.viewport_size);

        if ctx.grid_style == GridStyle::Lines && spacing >= MIN_GRID_SPACING {
            let max_lines = (viewport.width().max(viewport.height()) / MIN_GRID_SPACING) as i64 + 2;
            for x in grid_lines(visible.x0, visible.x1, max_lines) {
                let sx = view.screen_from_world(Point::new(x as f64, 0.0)).x;
                self.items.push(DisplayItem::Grid {
                    line: Line::new((sx, viewport.y0), (sx, viewport.y1)),
                    color: ctx.grid_color,
                });
            }
            for y in grid_lines(visible.y0, visible.y1, max_lines) {
                let sy = view.screen_from_world(Point::new(0.0, y as f64)).y;
                self.items.push(DisplayItem::Grid {
                    line: Line::new((viewport.x0, sy), (viewport.x1, sy)),
                    color: ctx.grid_color,
                });
            }
        }

        // Axes are drawn over the grid whenever they are in view.
        let origin = view.screen_from_world(Point::ZERO);
        if visible.x0 <= 0.0 && visible.x1 >= 0.0 {
            self.items.push(DisplayItem::Grid {
                line: Line::new((origin.x, viewport.y0), (origin.x, viewport.y1)),
                color: ctx.axis_color,
            });
        }
        if visible.y0 <= 0.0 && visible.y1 >= 0.0 {
            self.items.push(DisplayItem::Grid {
                line: Line::new((viewport.x0, origin.y), (viewport.x1, origin.y)),
                color: ctx.axis_color,
            });
        }
    }
}

/// Non-zero integer coordinates in `[min, max]`, or none when there are
/// more than `max_lines` of them. Far from the origin, adjacent integers
/// are no longer distinct `f64` values, so the range is counted in `i64`.
fn grid_lines(min: f64, max: f64, max_lines: i64) -> impl Iterator<Item = i64> {
    let first = min.ceil() as i64;
    let last = max.floor() as i64;
    let range = if last.saturating_sub(first) < max_lines {
        first..=last
    } else {
        log::trace!("grid of [{min}, {max}] too dense, skipped");
        1..=0
    };
    range.filter(|&c| c != 0)
}

impl Renderer for SceneRenderer {
    fn render(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        let view = ctx.scene.view;
        if ctx.viewport_size.width <= 0.0 || ctx.viewport_size.height <= 0.0 {
            return Err(RendererError::EmptyViewport(ctx.viewport_size));
        }
        if !view.offset.is_finite() || !view.scale().is_finite() {
            return Err(RendererError::NonFiniteView {
                offset: view.offset,
                scale: view.scale(),
            });
        }

        self.items.clear();
        self.point_radius = ctx.point_radius;
        self.line_width = ctx.line_width;

        let visible = view.visible_world_rect();
        self.push_grid(ctx, visible);

        let transform = view.transform();
        let width = ctx.line_width / view.scale();
        let mut segments: Vec<Segment> = ctx.scene.index.segments().collect();
        segments.sort();
        for segment in segments {
            self.items.push(DisplayItem::Segment {
                segment,
                line: transform * segment.to_line(),
                width,
                color: ctx.line_color,
            });
        }

        let radius = ctx.point_radius / view.scale();
        let mut points: Vec<GridPoint> = ctx
            .scene
            .index
            .points()
            .filter(|p| visible.inflate(ctx.point_radius, ctx.point_radius).contains(p.to_world()))
            .collect();
        points.sort();
        for point in points {
            self.items.push(DisplayItem::Point {
                point,
                circle: Circle::new(view.screen_from_world(point.to_world()), radius),
                color: ctx.point_color,
            });
        }

        if let Some((start, cursor)) = ctx.scene.preview {
            self.items.push(DisplayItem::Preview {
                line: Line::new(
                    view.screen_from_world(start.to_world()),
                    view.screen_from_world(cursor),
                ),
                width,
                color: ctx.preview_color,
            });
        }

        self.frames += 1;
        log::trace!("frame {} with {} items", self.frames, self.items.len());
        Ok(())
    }
}

impl HitTest for SceneRenderer {
    /// Points are drawn above segments, so they win ties.
    fn hit_test(&self, scene: &SceneView<'_>, screen: Point) -> HitTarget {
        let view = scene.view;
        let radius = self.point_radius / view.scale() + self.hit_tolerance;

        let nearest_point = scene
            .index
            .points()
            .map(|p| (p, view.screen_from_world(p.to_world()).distance(screen)))
            .filter(|&(_, d)| d <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        if let Some((point, _)) = nearest_point {
            return HitTarget::Point(point);
        }

        let half_width = self.line_width / view.scale() / 2.0 + self.hit_tolerance;
        let transform = view.transform();
        let nearest_segment = scene
            .index
            .segments()
            .map(|s| {
                let line = transform * s.to_line();
                (s, line.nearest(screen, 1e-9).distance_sq.sqrt())
            })
            .filter(|&(_, d)| d <= half_width)
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        match nearest_segment {
            Some((segment, _)) => HitTarget::Segment(segment),
            None => HitTarget::Nothing,
        }
    }
}
