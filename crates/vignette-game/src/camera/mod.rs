//! First-person viewer
//!
//! Mouse look, eased walking, and head bob for the wandering camera.

mod config;
mod controller;

pub use config::ViewerConfig;
pub use controller::ViewerController;
