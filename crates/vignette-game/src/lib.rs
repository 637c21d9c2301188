//! Vignette Game - Viewer and input for the Vignette world
//!
//! Provides:
//! - Action-based input mapping over key code strings
//! - A first-person viewer with eased walking, head bob, and an overlay fade

pub mod camera;
pub mod input;

pub use camera::{ViewerConfig, ViewerController};
pub use input::{InputAction, InputBindings, InputHandler, InputState};
