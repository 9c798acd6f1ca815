//! Frame-coherent mouse state for the orbit controls.
//!
//! [`MouseState`] accumulates winit mouse events between redraws. Cursor
//! motion only counts while the left button is held. The window reads the
//! drag delta and scroll once per frame, then calls
//! [`clear_transients`](MouseState::clear_transients).

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta};

/// Pixels of a precise scroll that count as one wheel line.
const PIXELS_PER_LINE: f64 = 40.0;

#[derive(Debug, Clone, Default)]
pub struct MouseState {
    position: Option<Vec2>,
    delta: Vec2,
    left_pressed: bool,
    scroll: f32,
}

impl MouseState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a `CursorMoved` event. The first position after the cursor
    /// enters produces no delta, and neither does hovering.
    pub fn on_cursor_moved(&mut self, x: f64, y: f64) {
        let new_pos = Vec2::new(x as f32, y as f32);
        if self.left_pressed
            && let Some(previous) = self.position
        {
            self.delta += new_pos - previous;
        }
        self.position = Some(new_pos);
    }

    /// Process a `CursorLeft` event.
    pub fn on_cursor_left(&mut self) {
        self.position = None;
    }

    /// Process a `MouseInput` event. Only the left button is tracked.
    pub fn on_button(&mut self, button: MouseButton, state: ElementState) {
        if button == MouseButton::Left {
            let pressed = state == ElementState::Pressed;
            if pressed && !self.left_pressed {
                self.delta = Vec2::ZERO;
            }
            self.left_pressed = pressed;
        }
    }

    /// Process a `MouseWheel` event. Positive values scroll away from the user.
    pub fn on_scroll(&mut self, delta: MouseScrollDelta) {
        match delta {
            MouseScrollDelta::LineDelta(_x, y) => self.scroll += y,
            MouseScrollDelta::PixelDelta(pos) => self.scroll += (pos.y / PIXELS_PER_LINE) as f32,
        }
    }

    /// Reset per-frame accumulators. Call once after the frame consumed them.
    pub fn clear_transients(&mut self) {
        self.delta = Vec2::ZERO;
        self.scroll = 0.0;
    }

    /// Cursor movement in pixels with the left button held, since the last clear.
    pub fn delta(&self) -> Vec2 {
        self.delta
    }

    /// Wheel lines scrolled since the last clear.
    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    pub fn is_left_pressed(&self) -> bool {
        self.left_pressed
    }
}
