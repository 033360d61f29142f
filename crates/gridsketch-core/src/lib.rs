//! GridSketch Core Library
//!
//! Platform-agnostic view transform, grid index and brush logic for the
//! GridSketch infinite-canvas point/line editor.

pub mod brush;
pub mod canvas;
pub mod config;
pub mod history;
pub mod index;
pub mod input;
pub mod scene;
pub mod view;

pub use brush::{BrushController, BrushKind, BrushOutcome, GestureState};
pub use canvas::Canvas;
pub use config::{ConfigError, SketchConfig};
pub use history::{Action, ActionKind, ActionLog};
pub use index::{GridPoint, Segment, SpatialIndex};
pub use input::{InputResponse, InputRouter, KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use scene::{HitTarget, HitTest, SceneView};
pub use view::{Axis, ViewTransform, snap};
