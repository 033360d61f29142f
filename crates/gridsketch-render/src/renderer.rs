//! Renderer trait abstraction.

use gridsketch_core::canvas::Canvas;
use gridsketch_core::scene::SceneView;
use kurbo::Size;
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Viewport has no area: {0:?}")]
    EmptyViewport(Size),
    #[error("View transform is not finite (offset {offset:?}, scale {scale})")]
    NonFiniteView { offset: kurbo::Vec2, scale: f64 },
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Grid display style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridStyle {
    /// Axes only.
    None,
    /// A line at every integer world coordinate.
    #[default]
    Lines,
}

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// View, content and line preview to draw.
    pub scene: SceneView<'a>,
    /// Viewport size in pixels.
    pub viewport_size: Size,
    /// Background color.
    pub background_color: Color,
    /// Grid display style.
    pub grid_style: GridStyle,
    pub grid_color: Color,
    /// Color of the world x and y axes.
    pub axis_color: Color,
    pub point_color: Color,
    pub line_color: Color,
    /// Color of the in-progress line.
    pub preview_color: Color,
    /// Point radius in world units.
    pub point_radius: f64,
    /// Segment stroke width in world units.
    pub line_width: f64,
}

impl<'a> RenderContext<'a> {
    /// Create a render context for the canvas's current state.
    pub fn new(canvas: &'a Canvas) -> Self {
        Self::from_scene(canvas.scene())
    }

    /// Create a render context from a borrowed scene.
    pub fn from_scene(scene: SceneView<'a>) -> Self {
        Self {
            viewport_size: scene.view.viewport(),
            scene,
            background_color: Color::from_rgba8(255, 255, 255, 255),
            grid_style: GridStyle::Lines,
            grid_color: Color::from_rgba8(220, 220, 220, 255),
            axis_color: Color::from_rgba8(120, 120, 120, 255),
            point_color: Color::from_rgba8(30, 30, 30, 255),
            line_color: Color::from_rgba8(30, 30, 30, 255),
            preview_color: Color::from_rgba8(59, 130, 246, 255),
            point_radius: 0.06,
            line_width: 0.03,
        }
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the grid style.
    pub fn with_grid(mut self, style: GridStyle) -> Self {
        self.grid_style = style;
        self
    }

    /// Set the point radius in world units.
    pub fn with_point_radius(mut self, radius: f64) -> Self {
        self.point_radius = radius;
        self
    }

    /// Set the segment width in world units.
    pub fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = width;
        self
    }
}

/// Trait for rendering backends.
pub trait Renderer: Send + Sync {
    /// Draw one frame.
    fn render(&mut self, ctx: &RenderContext) -> RenderResult<()>;
}
