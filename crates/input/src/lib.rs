//! Input handling for the pointer and keyboard.

use glam::Vec2;
use std::collections::HashSet;

/// Rectangle of the drawing surface in window pixels, used to map the pointer
/// into normalized device coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Viewport covering a whole window of the given pixel size.
    pub fn from_size(width: u32, height: u32) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width: width as f32,
            height: height as f32,
        }
    }

    /// Map a pixel position to NDC: x grows right, y grows up, both in [-1, 1]
    /// across the viewport. Returns `None` for a degenerate viewport.
    pub fn to_ndc(&self, pixel: Vec2) -> Option<Vec2> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        Some(Vec2::new(
            ((pixel.x - self.left) / self.width) * 2.0 - 1.0,
            -((pixel.y - self.top) / self.height) * 2.0 + 1.0,
        ))
    }
}

/// Manages input state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys pressed this frame.
    keys_pressed: HashSet<KeyCode>,

    /// Mouse buttons currently held.
    mouse_held: HashSet<MouseButton>,
    /// Mouse buttons pressed this frame.
    mouse_pressed: HashSet<MouseButton>,
    /// Mouse buttons released this frame.
    mouse_released: HashSet<MouseButton>,

    /// Pointer position in window pixels; `None` before the first move or after it left the window.
    pointer: Option<Vec2>,
    /// Pointer in NDC relative to the viewport at the time of the last move.
    pointer_ndc: Option<Vec2>,
    /// Whether the pointer moved since the last `begin_frame`.
    pointer_moved: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state. Call at the start of each frame.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.mouse_pressed.clear();
        self.mouse_released.clear();
        self.pointer_moved = false;
    }

    /// Process a keyboard event. Auto-repeat presses are ignored.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState, repeat: bool) {
        if state == ElementState::Pressed && !repeat {
            self.keys_pressed.insert(key);
        }
    }

    /// Process a mouse button event.
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.mouse_held.contains(&button) {
                    self.mouse_pressed.insert(button);
                }
                self.mouse_held.insert(button);
            }
            ElementState::Released => {
                self.mouse_held.remove(&button);
                self.mouse_released.insert(button);
            }
        }
    }

    /// Process cursor position update, mapping it through the viewport it was reported against.
    pub fn process_cursor_position(&mut self, position: (f64, f64), viewport: &Viewport) {
        let pixel = Vec2::new(position.0 as f32, position.1 as f32);
        self.pointer = Some(pixel);
        self.pointer_ndc = viewport.to_ndc(pixel);
        self.pointer_moved = true;
    }

    /// The pointer left the window: nothing is under it any more.
    pub fn process_cursor_left(&mut self) {
        self.pointer = None;
        self.pointer_ndc = None;
        self.pointer_moved = true;
    }

    // Query methods

    /// Check if a key was pressed this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if a mouse button is held.
    pub fn is_mouse_held(&self, button: MouseButton) -> bool {
        self.mouse_held.contains(&button)
    }

    /// Check if a mouse button was pressed this frame.
    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool {
        self.mouse_pressed.contains(&button)
    }

    /// Check if a mouse button was released this frame.
    pub fn is_mouse_released(&self, button: MouseButton) -> bool {
        self.mouse_released.contains(&button)
    }

    /// Pointer position in window pixels.
    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    /// Pointer position in normalized device coordinates.
    pub fn pointer_ndc(&self) -> Option<Vec2> {
        self.pointer_ndc
    }

    /// Whether the pointer moved (or left) since the frame began.
    pub fn pointer_moved(&self) -> bool {
        self.pointer_moved
    }
}

// Re-export for convenience
pub use winit::event::{ElementState, MouseButton};
pub use winit::keyboard::KeyCode;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_corners_map_to_ndc_extremes() {
        let vp = Viewport::from_size(800, 600);
        assert_eq!(vp.to_ndc(Vec2::new(0.0, 0.0)), Some(Vec2::new(-1.0, 1.0)));
        assert_eq!(vp.to_ndc(Vec2::new(800.0, 600.0)), Some(Vec2::new(1.0, -1.0)));
        assert_eq!(vp.to_ndc(Vec2::new(400.0, 300.0)), Some(Vec2::ZERO));
    }

    #[test]
    fn viewport_offset_is_respected() {
        let vp = Viewport {
            left: 100.0,
            top: 50.0,
            width: 200.0,
            height: 100.0,
        };
        let ndc = vp.to_ndc(Vec2::new(150.0, 75.0)).expect("non-degenerate viewport");
        assert!((ndc.x + 0.5).abs() < 1e-6);
        assert!((ndc.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn degenerate_viewport_has_no_ndc() {
        let vp = Viewport::from_size(0, 600);
        assert!(vp.to_ndc(Vec2::new(10.0, 10.0)).is_none());
    }

    #[test]
    fn cursor_left_clears_pointer() {
        let mut input = InputState::new();
        input.process_cursor_position((10.0, 10.0), &Viewport::from_size(100, 100));
        assert!(input.pointer_ndc().is_some());
        input.process_cursor_left();
        assert!(input.pointer().is_none());
        assert!(input.pointer_ndc().is_none());
    }

    #[test]
    fn mouse_press_is_one_shot() {
        let mut input = InputState::new();
        input.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert!(input.is_mouse_pressed(MouseButton::Left));
        assert!(input.is_mouse_held(MouseButton::Left));
        input.begin_frame();
        assert!(!input.is_mouse_pressed(MouseButton::Left));
        assert!(input.is_mouse_held(MouseButton::Left));
        input.process_mouse_button(MouseButton::Left, ElementState::Released);
        assert!(input.is_mouse_released(MouseButton::Left));
        assert!(!input.is_mouse_held(MouseButton::Left));
    }

    #[test]
    fn key_repeat_is_ignored() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::Tab, ElementState::Pressed, true);
        assert!(!input.is_key_pressed(KeyCode::Tab));
        input.process_keyboard(KeyCode::Tab, ElementState::Pressed, false);
        assert!(input.is_key_pressed(KeyCode::Tab));
    }
}
