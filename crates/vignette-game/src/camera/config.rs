//! Viewer configuration

use std::f32::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

/// Walking viewer configuration. Speeds and blend factors are per frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Mouse sensitivity (radians per pixel)
    pub sensitivity: f32,
    /// Pitch is clamped to `[-pitch_limit, pitch_limit]` radians
    pub pitch_limit: f32,
    /// Top walking speed in world units per frame
    pub max_speed: f32,
    /// Blend toward the target velocity while a move key is held
    pub acceleration: f32,
    /// Blend toward rest when no move key is held
    pub deceleration: f32,
    /// Resting eye height above the ground
    pub eye_height: f32,
    /// Vertical head bob at full speed
    pub bob_amplitude: f32,
    /// Bob phase advance per frame
    pub bob_rate: f32,
    /// Roll per unit of sideways velocity
    pub roll_factor: f32,
    /// Blend used for roll and eye height
    pub head_smoothing: f32,
    /// Blend used for the overlay fade
    pub ui_fade: f32,
    /// Fraction of top speed above which the viewer counts as walking
    pub walking_threshold: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            sensitivity: 0.002,
            pitch_limit: FRAC_PI_2,
            max_speed: 0.15,
            acceleration: 0.015,
            deceleration: 0.01,
            eye_height: 1.6,
            bob_amplitude: 0.05,
            bob_rate: 0.015 * 8.0,
            roll_factor: 0.5,
            head_smoothing: 0.1,
            ui_fade: 0.05,
            walking_threshold: 0.1,
        }
    }
}
