//! Input system with action-based mapping
//!
//! Sits between raw key and pointer events from the host and the actions the viewer
//! understands. Keys are identified by their physical key code strings (`"KeyW"`,
//! `"Space"`), the same names browsers and most windowing layers report.

use std::collections::{HashMap, HashSet};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Actions that can be triggered by input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputAction {
    /// Move forward (W by default)
    MoveForward,
    /// Move backward (S by default)
    MoveBackward,
    /// Strafe left (A by default)
    MoveLeft,
    /// Strafe right (D by default)
    MoveRight,
    /// Turn to the next narrative page (Space by default)
    AdvancePage,
}

/// Current state of all inputs for a frame
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Actions currently held down
    pub held: HashSet<InputAction>,
    /// Actions that were just pressed this frame
    pub just_pressed: HashSet<InputAction>,
    /// Actions that were just released this frame
    pub just_released: HashSet<InputAction>,
    /// Pointer movement for this frame, in pixels
    pub mouse_delta: Vec2,
    /// Whether the pointer is locked to the view
    pub cursor_captured: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an action is currently held
    pub fn is_held(&self, action: InputAction) -> bool {
        self.held.contains(&action)
    }

    /// Check if an action was just pressed this frame
    pub fn is_just_pressed(&self, action: InputAction) -> bool {
        self.just_pressed.contains(&action)
    }

    pub fn is_just_released(&self, action: InputAction) -> bool {
        self.just_released.contains(&action)
    }

    /// Clear frame-specific data (call at end of frame)
    pub fn clear_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
        self.mouse_delta = Vec2::ZERO;
    }

    /// Clear all input state
    pub fn clear_all(&mut self) {
        self.held.clear();
        self.clear_frame();
    }
}

/// Maps key codes to actions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputBindings {
    bindings: HashMap<String, InputAction>,
    /// Reverse lookup: action to all bound keys
    #[serde(skip)]
    reverse: HashMap<InputAction, Vec<String>>,
}

impl Default for InputBindings {
    fn default() -> Self {
        let mut bindings = Self {
            bindings: HashMap::new(),
            reverse: HashMap::new(),
        };

        bindings.bind("KeyW", InputAction::MoveForward);
        bindings.bind("KeyS", InputAction::MoveBackward);
        bindings.bind("KeyA", InputAction::MoveLeft);
        bindings.bind("KeyD", InputAction::MoveRight);
        bindings.bind("Space", InputAction::AdvancePage);

        bindings
    }
}

impl InputBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a key to an action, replacing whatever the key did before
    pub fn bind(&mut self, key: &str, action: InputAction) {
        self.unbind(key);
        self.bindings.insert(key.to_string(), action);
        self.reverse.entry(action).or_default().push(key.to_string());
    }

    pub fn unbind(&mut self, key: &str) {
        if let Some(action) = self.bindings.remove(key) {
            if let Some(keys) = self.reverse.get_mut(&action) {
                keys.retain(|k| k != key);
            }
        }
    }

    /// Get the action for a key, if any
    pub fn get_key_action(&self, key: &str) -> Option<InputAction> {
        self.bindings.get(key).copied()
    }

    /// All keys bound to an action
    pub fn keys_for(&self, action: InputAction) -> &[String] {
        self.reverse.get(&action).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Rebuild the reverse lookup table (call after deserialization)
    pub fn rebuild_reverse(&mut self) {
        self.reverse.clear();
        for (key, action) in &self.bindings {
            self.reverse.entry(*action).or_default().push(key.clone());
        }
    }
}

/// Processes raw events and keeps the input state current
#[derive(Debug)]
pub struct InputHandler {
    pub state: InputState,
    pub bindings: InputBindings,
    /// Pointer sensitivity multiplier
    pub mouse_sensitivity: f32,
    pub invert_y: bool,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    pub fn new() -> Self {
        Self::with_bindings(InputBindings::default())
    }

    pub fn with_bindings(bindings: InputBindings) -> Self {
        Self {
            state: InputState::new(),
            bindings,
            mouse_sensitivity: 1.0,
            invert_y: false,
        }
    }

    /// Handle a key press or release
    pub fn handle_key(&mut self, code: &str, pressed: bool) {
        let Some(action) = self.bindings.get_key_action(code) else {
            trace!("Ignoring unbound key {}", code);
            return;
        };

        if pressed {
            if !self.state.held.contains(&action) {
                self.state.just_pressed.insert(action);
            }
            self.state.held.insert(action);
        } else {
            self.state.held.remove(&action);
            self.state.just_released.insert(action);
        }
    }

    /// Handle pointer movement. Ignored unless the pointer is captured.
    pub fn handle_mouse_motion(&mut self, delta: (f64, f64)) {
        if self.state.cursor_captured {
            let y_mult = if self.invert_y { -1.0 } else { 1.0 };
            self.state.mouse_delta += Vec2::new(
                delta.0 as f32 * self.mouse_sensitivity,
                delta.1 as f32 * self.mouse_sensitivity * y_mult,
            );
        }
    }

    /// Clear frame-specific input data
    pub fn end_frame(&mut self) {
        self.state.clear_frame();
    }

    pub fn set_cursor_captured(&mut self, captured: bool) {
        self.state.cursor_captured = captured;
    }
}
