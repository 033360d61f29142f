//! Routing of raw pointer/wheel/keyboard events to the canvas.

use crate::brush::BrushOutcome;
use crate::canvas::Canvas;
use crate::config::SketchConfig;
use crate::history::Action;
use crate::scene::HitTest;
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

// Use web_time for WASM compatibility
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer event in screen coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    Move {
        position: Point,
    },
    Scroll {
        position: Point,
        delta: Vec2,
    },
}

/// Keyboard event type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed(String),
    Released(String),
}

/// What handling one event did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputResponse {
    /// The visible scene changed.
    pub redraw: bool,
    /// Brush action dispatched by a click, if any.
    pub outcome: Option<BrushOutcome>,
    /// Action reverted by an undo chord, if any.
    pub undone: Option<Action>,
}

impl InputResponse {
    fn redraw(redraw: bool) -> Self {
        Self {
            redraw,
            ..Self::default()
        }
    }
}

/// A press that may still turn out to be a click.
#[derive(Debug, Clone, Copy)]
struct Press {
    button: MouseButton,
    at: Instant,
}

/// Turns raw input into view updates and brush commands.
///
/// A press released within the click timeout is a click; anything longer
/// is a drag, which pans the view as the pointer moves.
#[derive(Debug, Clone)]
pub struct InputRouter {
    /// Longest press-release interval still treated as a click.
    pub click_timeout: Duration,
    /// Current pointer position in screen coordinates.
    pub pointer_position: Point,
    /// Position of the previous drag step, for pan deltas.
    last_drag_position: Point,
    /// Currently pressed mouse buttons.
    pressed_buttons: HashSet<MouseButton>,
    /// The press that started the current gesture.
    press: Option<Press>,
    /// Current modifier keys state.
    pub modifiers: Modifiers,
}

impl Default for InputRouter {
    fn default() -> Self {
        Self::new(SketchConfig::default().click_timeout())
    }
}

impl InputRouter {
    pub fn new(click_timeout: Duration) -> Self {
        Self {
            click_timeout,
            pointer_position: Point::ZERO,
            last_drag_position: Point::ZERO,
            pressed_buttons: HashSet::new(),
            press: None,
            modifiers: Modifiers::default(),
        }
    }

    pub fn from_config(config: &SketchConfig) -> Self {
        Self::new(config.click_timeout())
    }

    /// Update modifier keys state.
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    /// Whether any button is held.
    pub fn is_dragging(&self) -> bool {
        !self.pressed_buttons.is_empty()
    }

    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.pressed_buttons.contains(&button)
    }

    /// Whether a press held for `elapsed` counts as a click.
    pub fn is_click(&self, elapsed: Duration) -> bool {
        elapsed <= self.click_timeout
    }

    /// Process a pointer event received at `now`.
    ///
    /// `hit_test` is consulted only for eraser clicks.
    pub fn handle_pointer_event(
        &mut self,
        canvas: &mut Canvas,
        event: PointerEvent,
        now: Instant,
        hit_test: &dyn HitTest,
    ) -> InputResponse {
        match event {
            PointerEvent::Down { position, button } => {
                self.pointer_position = position;
                self.last_drag_position = position;
                if !self.pressed_buttons.insert(button) {
                    // The release was never delivered (e.g. it happened
                    // outside the window); this press starts a new gesture.
                    log::debug!("{button:?} pressed again without a release");
                    self.press = Some(Press { button, at: now });
                } else if self.press.is_none() {
                    self.press = Some(Press { button, at: now });
                }
                InputResponse::default()
            }
            PointerEvent::Move { position } => {
                self.pointer_position = position;
                let mut redraw = false;
                if self.is_dragging() {
                    let delta = position - self.last_drag_position;
                    self.last_drag_position = position;
                    if delta != Vec2::ZERO {
                        canvas.pan(delta);
                        redraw = true;
                    }
                }
                redraw |= canvas.update_preview(position);
                InputResponse::redraw(redraw)
            }
            PointerEvent::Up { position, button } => {
                self.pointer_position = position;
                self.pressed_buttons.remove(&button);
                let Some(press) = self.press.filter(|p| p.button == button) else {
                    return InputResponse::default();
                };
                self.press = None;

                let elapsed = now.saturating_duration_since(press.at);
                if !self.is_click(elapsed) {
                    log::trace!("drag of {elapsed:?} ended at {position:?}");
                    return InputResponse::default();
                }
                if button != MouseButton::Left {
                    return InputResponse::default();
                }

                let outcome = canvas.click(position, hit_test);
                InputResponse {
                    redraw: outcome.needs_redraw(),
                    outcome: Some(outcome),
                    undone: None,
                }
            }
            PointerEvent::Scroll { position, delta } => {
                self.pointer_position = position;
                InputResponse::redraw(canvas.zoom(position, delta.y))
            }
        }
    }

    /// Process a key event. Undo is `Ctrl+Z` (or `Cmd+Z`), Escape cancels
    /// a pending gesture. Both work with any brush selected.
    pub fn handle_key_event(&mut self, canvas: &mut Canvas, event: KeyEvent) -> InputResponse {
        let KeyEvent::Pressed(key) = event else {
            return InputResponse::default();
        };

        if self.modifiers.command() && !self.modifiers.shift && key.eq_ignore_ascii_case("z") {
            let undone = canvas.undo();
            return InputResponse {
                redraw: undone.is_some(),
                outcome: None,
                undone,
            };
        }
        if key.eq_ignore_ascii_case("escape") {
            return InputResponse::redraw(canvas.cancel_gesture());
        }
        InputResponse::default()
    }

    /// Process a viewport resize.
    pub fn handle_resize(&mut self, canvas: &mut Canvas, size: Size) -> InputResponse {
        let changed = size != canvas.view.viewport();
        canvas.resize(size);
        InputResponse::redraw(changed)
    }

    /// Readout of the grid point under the pointer, y axis pointing up.
    pub fn position_readout(&self, canvas: &Canvas) -> String {
        canvas.position_readout(self.pointer_position)
    }
}
