//! Wind field driving grass sway and tree tilt

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::chunk::{SwayingTree, WorldStreamer};
use crate::scene::SceneHost;
use crate::seed::DeterministicRng;
use vignette_core::Transform;

/// Shader time added per frame
const TIME_STEP: f32 = 0.01;
/// Wall-clock milliseconds to wind phase
const PHASE_PER_MS: f64 = 0.0001;
/// Maximum tree lean in radians at strength 1
const LEAN_SCALE: f32 = 0.1;
/// Spatial frequency of the lean wave across the world
const LEAN_WAVELENGTH: f32 = 0.05;

/// Current wind, shared by the grass shader and the tree pass
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    /// Accumulated shader time
    pub time: f32,
    /// Gust strength, always within `[0.2, 0.8]`
    pub strength: f32,
    /// Horizontal unit direction
    pub direction: Vec3,
}

impl Default for Wind {
    fn default() -> Self {
        Self {
            time: 0.0,
            strength: 0.5,
            direction: Vec3::X,
        }
    }
}

impl Wind {
    pub fn new() -> Self {
        Self::default()
    }

    /// Step the wind for one frame at the given wall-clock time
    pub fn advance(&mut self, now_ms: u64) {
        self.time += TIME_STEP;

        let phase = now_ms as f64 * PHASE_PER_MS;
        self.strength = (0.5 + 0.2 * phase.sin() + 0.1 * (phase * 3.5).sin()) as f32;

        let angle = (0.5 * (phase * 0.5).sin()) as f32;
        self.direction = Vec3::new(angle.cos(), 0.0, angle.sin());
    }

    /// Lean angle for a tree at a world position
    pub fn lean_at(&self, world_position: Vec3) -> f32 {
        let wave = (self.time
            + world_position.x * LEAN_WAVELENGTH
            + world_position.z * LEAN_WAVELENGTH)
            .sin();
        self.strength * LEAN_SCALE * (0.5 + 0.5 * wave)
    }

    /// Tree rotation for a world position: lean away from the wind about x and z
    pub fn tree_tilt(&self, world_position: Vec3) -> Quat {
        let lean = self.lean_at(world_position);
        Quat::from_euler(
            EulerRot::XYZ,
            self.direction.z * lean,
            0.0,
            -self.direction.x * lean,
        )
    }

    /// Assign the current tilt to one tree
    pub fn tilt_tree(&self, tree: &SwayingTree, host: &mut impl SceneHost) {
        let transform = Transform {
            rotation: self.tree_tilt(tree.world_position),
            ..Transform::from_position(tree.local_position)
        };
        host.set_transform(tree.node, transform);
    }

    /// Assign the current tilt to every resident tree. Returns how many were tilted.
    pub fn sway_trees<R: DeterministicRng>(
        &self,
        streamer: &WorldStreamer<R>,
        host: &mut impl SceneHost,
    ) -> usize {
        let mut count = 0;
        for chunk in streamer.resident_chunks() {
            for tree in &chunk.trees {
                self.tilt_tree(tree, host);
                count += 1;
            }
        }
        count
    }
}
