//! GridSketch Render Library
//!
//! Renderer abstraction for GridSketch and a display-list renderer that
//! also serves as the eraser's hit-tester.

mod display;
mod renderer;

pub use display::{DisplayItem, SceneRenderer, DEFAULT_HIT_TOLERANCE};
pub use renderer::{GridStyle, RenderContext, RenderResult, Renderer, RendererError};
