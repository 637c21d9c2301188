//! Viewer controller with mouse look, eased walking, and head bob

use glam::{Vec2, Vec3};

use crate::input::{InputAction, InputState};

use super::ViewerConfig;

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// First-person viewer that drifts across the landscape
pub struct ViewerController {
    pub config: ViewerConfig,
    /// Yaw rotation in radians (horizontal)
    pub yaw: f32,
    /// Pitch rotation in radians (vertical)
    pub pitch: f32,
    /// Head roll in radians
    roll: f32,
    position: Vec3,
    /// Horizontal velocity in world units per frame
    velocity: Vec3,
    sway_time: f32,
    /// Opacity for the story overlay; fades out while walking
    ui_opacity: f32,
}

impl ViewerController {
    pub fn new() -> Self {
        Self::with_config(ViewerConfig::default())
    }

    /// Viewer standing at the origin at eye height
    pub fn with_config(config: ViewerConfig) -> Self {
        let position = Vec3::new(0.0, config.eye_height, 0.0);
        Self {
            config,
            yaw: 0.0,
            pitch: 0.0,
            roll: 0.0,
            position,
            velocity: Vec3::ZERO,
            sway_time: 0.0,
            ui_opacity: 1.0,
        }
    }

    /// Eye position in world space
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn roll(&self) -> f32 {
        self.roll
    }

    pub fn ui_opacity(&self) -> f32 {
        self.ui_opacity
    }

    /// Current speed as a fraction of top speed
    pub fn speed_fraction(&self) -> f32 {
        self.velocity.length() / self.config.max_speed
    }

    pub fn is_walking(&self) -> bool {
        self.speed_fraction() > self.config.walking_threshold
    }

    /// Horizontal look direction
    pub fn forward(&self) -> Vec3 {
        Vec3::new(-self.yaw.sin(), 0.0, -self.yaw.cos())
    }

    /// Horizontal direction to the viewer's right
    pub fn right(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, -self.yaw.sin())
    }

    /// Handle mouse look input
    pub fn handle_mouse_look(&mut self, mouse_delta: Vec2) {
        self.yaw -= mouse_delta.x * self.config.sensitivity;
        self.pitch -= mouse_delta.y * self.config.sensitivity;
        self.pitch = self
            .pitch
            .clamp(-self.config.pitch_limit, self.config.pitch_limit);
    }

    /// Normalized horizontal movement wish from held actions
    pub fn wish_direction(&self, input: &InputState) -> Vec3 {
        let mut wish = Vec3::ZERO;
        if input.is_held(InputAction::MoveForward) {
            wish += self.forward();
        }
        if input.is_held(InputAction::MoveBackward) {
            wish -= self.forward();
        }
        if input.is_held(InputAction::MoveLeft) {
            wish -= self.right();
        }
        if input.is_held(InputAction::MoveRight) {
            wish += self.right();
        }
        wish.normalize_or_zero()
    }

    /// Step the viewer by one frame
    pub fn update(&mut self, input: &InputState) {
        if input.cursor_captured {
            self.handle_mouse_look(input.mouse_delta);
        }

        let wish = self.wish_direction(input);
        if wish != Vec3::ZERO {
            let target = wish * self.config.max_speed;
            self.velocity = self.velocity.lerp(target, self.config.acceleration);
        } else {
            self.velocity = self.velocity.lerp(Vec3::ZERO, self.config.deceleration);
        }
        self.position += self.velocity;

        let speed_fraction = self.speed_fraction();
        let walking = self.is_walking();

        let target_opacity = if walking { 0.0 } else { 1.0 };
        self.ui_opacity = lerp(self.ui_opacity, target_opacity, self.config.ui_fade);

        let smoothing = self.config.head_smoothing;
        if walking {
            self.sway_time += self.config.bob_rate;
            let strafe = self.velocity.dot(self.right());
            let target_roll = -strafe * self.config.roll_factor;

            self.position.y = self.config.eye_height
                + self.sway_time.sin() * self.config.bob_amplitude * speed_fraction;
            self.roll = lerp(self.roll, target_roll, smoothing);
        } else {
            self.position.y = lerp(self.position.y, self.config.eye_height, smoothing);
            self.roll = lerp(self.roll, 0.0, smoothing);
            self.sway_time = 0.0;
        }
    }
}

impl Default for ViewerController {
    fn default() -> Self {
        Self::new()
    }
}
