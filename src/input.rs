//! Per-frame mouse and keyboard state.
//!
//! Window events are folded into an [`InputState`] as they arrive; the frame
//! reads it once and then calls [`InputState::end_frame`], which clears the
//! per-frame parts (mouse motion and newly pressed keys).

use std::collections::HashSet;

use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

#[derive(Debug, Default)]
pub struct InputState {
    cursor: Option<PhysicalPosition<f64>>,
    motion: (f64, f64),
    buttons_down: HashSet<MouseButton>,
    keys_down: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,
}

impl InputState {
    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CursorMoved { position, .. } => self.cursor_moved(*position),
            WindowEvent::CursorLeft { .. } => self.cursor = None,
            WindowEvent::MouseInput { state, button, .. } => match state {
                ElementState::Pressed => self.press_button(*button),
                ElementState::Released => self.release_button(*button),
            },
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed if !repeat => self.press_key(*code),
                ElementState::Pressed => (),
                ElementState::Released => self.release_key(*code),
            },
            WindowEvent::Focused(false) => self.clear_held(),
            _ => (),
        }
    }

    /// Accumulates the distance to the previous cursor position.
    ///
    /// The first position after entering the window only sets the baseline.
    pub fn cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        if let Some(last) = self.cursor {
            self.motion.0 += position.x - last.x;
            self.motion.1 += position.y - last.y;
        }
        self.cursor = Some(position);
    }

    pub fn press_button(&mut self, button: MouseButton) {
        self.buttons_down.insert(button);
    }

    pub fn release_button(&mut self, button: MouseButton) {
        self.buttons_down.remove(&button);
    }

    pub fn press_key(&mut self, key: KeyCode) {
        if self.keys_down.insert(key) {
            self.keys_pressed.insert(key);
        }
    }

    pub fn release_key(&mut self, key: KeyCode) {
        self.keys_down.remove(&key);
    }

    /// Whether `button` is currently held.
    pub fn button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    /// Whether `key` went down during this frame.
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Cursor motion in physical pixels since the last [`InputState::end_frame`].
    pub fn mouse_motion(&self) -> (f64, f64) {
        self.motion
    }

    pub fn end_frame(&mut self) {
        self.motion = (0.0, 0.0);
        self.keys_pressed.clear();
    }

    // On focus loss release events may never arrive.
    fn clear_held(&mut self) {
        self.buttons_down.clear();
        self.keys_down.clear();
    }
}
