//! The living environment: streamed terrain, wind, and sky under one owner
//!
//! [`Environment`] holds every piece of per-scene state and the handles of the nodes it
//! keeps attached to the host. The frame loop calls [`Environment::update`] once per
//! frame and [`Environment::regenerate_world`] when the narrative turns a page.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;
use tracing::{debug, info};
use vignette_core::{Clock, EntityId, Transform};

use crate::atmosphere::{Atmosphere, AtmosphereConfig, AtmosphereState};
use crate::chunk::{ChunkConfig, StreamingDelta, WorldStreamer};
use crate::scene::{Renderable, SceneHost, SceneNode};
use crate::wind::Wind;

/// Everything needed to build an environment
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub chunks: ChunkConfig,
    pub atmosphere: AtmosphereConfig,
    /// Where the landmark statue stands
    pub landmark_position: Vec3,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            chunks: ChunkConfig::default(),
            atmosphere: AtmosphereConfig::default(),
            landmark_position: Vec3::new(0.0, 0.0, 40.0),
        }
    }
}

/// Nodes that live for the whole scene and follow the viewer
#[derive(Clone, Copy, Debug)]
struct Backdrop {
    sky: EntityId,
    stars: EntityId,
    ground: EntityId,
}

/// Nodes recreated on every world regeneration
#[derive(Clone, Copy, Debug)]
struct WorldNodes {
    root: EntityId,
    sun: EntityId,
    moon: EntityId,
    landmark: EntityId,
}

/// Summary of one frame's environment update
#[derive(Clone, Debug)]
pub struct FrameReport {
    pub atmosphere: AtmosphereState,
    pub wind: Wind,
    pub streaming: StreamingDelta,
    pub trees_swayed: usize,
}

/// Owner of streamed terrain, wind, and atmosphere for one scene
pub struct Environment {
    config: EnvironmentConfig,
    streamer: WorldStreamer,
    wind: Wind,
    atmosphere: Atmosphere,
    backdrop: Option<Backdrop>,
    world: Option<WorldNodes>,
}

impl Environment {
    pub fn new(config: EnvironmentConfig) -> Self {
        Self {
            streamer: WorldStreamer::new(config.chunks.clone()),
            atmosphere: Atmosphere::new(config.atmosphere.clone()),
            wind: Wind::new(),
            backdrop: None,
            world: None,
            config,
        }
    }

    pub fn config(&self) -> &EnvironmentConfig {
        &self.config
    }

    pub fn streamer(&self) -> &WorldStreamer {
        &self.streamer
    }

    pub fn wind(&self) -> &Wind {
        &self.wind
    }

    pub fn atmosphere(&self) -> &Atmosphere {
        &self.atmosphere
    }

    /// Scene node of the landmark, once the world is built
    pub fn landmark(&self) -> Option<EntityId> {
        self.world.map(|w| w.landmark)
    }

    /// Whether `init` has run without a matching `teardown`
    pub fn is_initialized(&self) -> bool {
        self.backdrop.is_some()
    }

    /// Attach the backdrop and build the first world around the viewer
    pub fn init(&mut self, viewer: Vec3, host: &mut impl SceneHost) -> StreamingDelta {
        if self.is_initialized() {
            self.teardown(host);
        }

        let ground_rotation = Transform::from_position_euler(Vec3::ZERO, Vec3::new(-FRAC_PI_2, 0.0, 0.0));
        self.backdrop = Some(Backdrop {
            sky: host.attach(None, SceneNode::new(Renderable::SkyDome, Transform::default())),
            stars: host.attach(None, SceneNode::new(Renderable::StarField, Transform::default())),
            ground: host.attach(None, SceneNode::new(Renderable::Ground, ground_rotation)),
        });

        self.regenerate_world(viewer, host)
    }

    /// Throw away every chunk and rebuild the world around the viewer.
    ///
    /// The result is the same as a freshly initialized environment at that position,
    /// apart from cosmetic rock and tree jitter.
    pub fn regenerate_world(&mut self, viewer: Vec3, host: &mut impl SceneHost) -> StreamingDelta {
        if let Some(world) = self.world.take() {
            host.detach(world.root);
        }
        // chunk groups went with the root
        self.streamer.forget_all();
        debug_assert_eq!(self.streamer.resident_count(), 0);

        let root = host.attach(None, SceneNode::group());
        let (sun_position, moon_position) = self
            .atmosphere
            .orbit(self.atmosphere.state().cycle, viewer);
        self.world = Some(WorldNodes {
            root,
            sun: host.attach(Some(root), SceneNode::new(Renderable::Sun, Transform::from_position(sun_position))),
            moon: host.attach(Some(root), SceneNode::new(Renderable::Moon, Transform::from_position(moon_position))),
            landmark: host.attach(
                Some(root),
                SceneNode::new(Renderable::Landmark, Transform::from_position(self.config.landmark_position)),
            ),
        });
        self.streamer.set_root(Some(root));

        let delta = self.streamer.update(viewer, host);
        info!(
            "Regenerated world around {} ({} chunks)",
            self.streamer.viewer_chunk(viewer),
            self.streamer.resident_count()
        );
        delta
    }

    /// Advance one frame: sky, wind, tree sway, chunk streaming, and backdrop anchoring.
    ///
    /// Sky and wind read `clock` once, so both see the same instant.
    pub fn update(&mut self, viewer: Vec3, clock: &impl Clock, host: &mut impl SceneHost) -> FrameReport {
        let now_ms = clock.now_ms();
        let atmosphere = *self.atmosphere.advance(now_ms, viewer);
        self.wind.advance(now_ms);
        let trees_swayed = self.wind.sway_trees(&self.streamer, host);
        let streaming = self.streamer.update(viewer, host);

        if let Some(world) = self.world {
            host.set_transform(world.sun, Transform::from_position(atmosphere.sun_position));
            host.set_transform(world.moon, Transform::from_position(atmosphere.moon_position));
        }
        if let Some(backdrop) = self.backdrop {
            self.anchor_backdrop(&backdrop, viewer, host);
        }

        FrameReport {
            atmosphere,
            wind: self.wind,
            streaming,
            trees_swayed,
        }
    }

    /// Detach everything this environment attached
    pub fn teardown(&mut self, host: &mut impl SceneHost) {
        if let Some(world) = self.world.take() {
            host.detach(world.root);
        }
        self.streamer.forget_all();
        self.streamer.set_root(None);
        if let Some(backdrop) = self.backdrop.take() {
            host.detach(backdrop.sky);
            host.detach(backdrop.stars);
            host.detach(backdrop.ground);
        }
        debug!("Environment torn down");
    }

    fn anchor_backdrop(&self, backdrop: &Backdrop, viewer: Vec3, host: &mut impl SceneHost) {
        let on_ground = Vec3::new(viewer.x, 0.0, viewer.z);
        host.set_transform(backdrop.sky, Transform::from_position(viewer));
        host.set_transform(backdrop.stars, Transform::from_position(on_ground));
        host.set_transform(
            backdrop.ground,
            Transform::from_position_euler(on_ground, Vec3::new(-FRAC_PI_2, 0.0, 0.0)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneGraph;
    use vignette_core::ManualClock;

    fn environment() -> Environment {
        Environment::new(EnvironmentConfig {
            chunks: ChunkConfig {
                cosmetic_seed: Some(21),
                ..Default::default()
            },
            ..Default::default()
        })
    }

    fn position_of(scene: &SceneGraph, kind: fn(&Renderable) -> bool) -> Vec3 {
        let (_, node) = scene
            .nodes()
            .find(|(_, node)| kind(&node.renderable))
            .expect("node present");
        node.transform.position
    }

    #[test]
    fn test_init_attaches_backdrop_and_world() {
        let mut scene = SceneGraph::new();
        let mut env = environment();
        let delta = env.init(Vec3::new(0.0, 1.6, 0.0), &mut scene);

        assert!(env.is_initialized());
        assert_eq!(delta.loaded.len(), 25);
        assert_eq!(scene.count(|r| matches!(r, Renderable::SkyDome)), 1);
        assert_eq!(scene.count(|r| matches!(r, Renderable::StarField)), 1);
        assert_eq!(scene.count(|r| matches!(r, Renderable::Ground)), 1);
        assert_eq!(scene.count(|r| matches!(r, Renderable::Sun)), 1);
        assert_eq!(scene.count(|r| matches!(r, Renderable::Moon)), 1);
        assert_eq!(scene.count(|r| matches!(r, Renderable::Landmark)), 1);
        let landmark = env.landmark().expect("world built");
        assert_eq!(scene.node(landmark).map(|n| n.transform.position), Some(Vec3::new(0.0, 0.0, 40.0)));
    }

    #[test]
    fn test_regenerate_starts_from_an_empty_registry() {
        let mut scene = SceneGraph::new();
        let mut env = environment();
        env.init(Vec3::ZERO, &mut scene);
        let before = scene.len();

        let delta = env.regenerate_world(Vec3::ZERO, &mut scene);
        assert_eq!(delta.loaded.len(), 25);
        assert!(delta.unloaded.is_empty());
        assert_eq!(env.streamer().resident_count(), 25);
        assert_eq!(scene.count(|r| matches!(r, Renderable::Sun)), 1);
        assert_eq!(scene.count(|r| matches!(r, Renderable::Landmark)), 1);
        assert_eq!(scene.count(|r| matches!(r, Renderable::Chunk(_))), 25);
        // chunk decoration counts are deterministic, so the node total is too
        assert_eq!(scene.len(), before);
    }

    #[test]
    fn test_update_anchors_backdrop_and_bodies() {
        let mut scene = SceneGraph::new();
        let mut env = environment();
        env.init(Vec3::ZERO, &mut scene);

        let viewer = Vec3::new(12.0, 1.6, -7.0);
        let report = env.update(viewer, &ManualClock::new(900_000), &mut scene);

        assert!((report.atmosphere.cycle - 0.25).abs() < 1e-6);
        assert!(report.streaming.is_empty());
        assert_eq!(report.trees_swayed, scene.count(|r| matches!(r, Renderable::Tree(_))));
        assert_eq!(position_of(&scene, |r| matches!(r, Renderable::SkyDome)), viewer);
        assert_eq!(position_of(&scene, |r| matches!(r, Renderable::StarField)), Vec3::new(12.0, 0.0, -7.0));
        assert_eq!(position_of(&scene, |r| matches!(r, Renderable::Ground)), Vec3::new(12.0, 0.0, -7.0));
        assert_eq!(position_of(&scene, |r| matches!(r, Renderable::Sun)), report.atmosphere.sun_position);
        assert_eq!(position_of(&scene, |r| matches!(r, Renderable::Moon)), report.atmosphere.moon_position);
    }

    #[test]
    fn test_update_follows_the_clock() {
        let mut scene = SceneGraph::new();
        let mut env = environment();
        env.init(Vec3::ZERO, &mut scene);

        // a quarter day past midnight is noon
        let clock = ManualClock::new(0);
        let midnight = env.update(Vec3::ZERO, &clock, &mut scene);
        assert_eq!(midnight.atmosphere.cycle, 0.0);

        clock.advance(900_000);
        let noon = env.update(Vec3::ZERO, &clock, &mut scene);
        assert!((noon.atmosphere.cycle - 0.25).abs() < 1e-6);
        assert!(noon.atmosphere.sun_position.y > midnight.atmosphere.sun_position.y);
        let mut wind = Wind::new();
        wind.advance(900_000);
        assert_eq!(noon.wind.strength, wind.strength);
        assert_eq!(noon.wind.direction, wind.direction);

        // a frozen clock leaves the sky where it was
        let again = env.update(Vec3::ZERO, &clock, &mut scene);
        assert_eq!(again.atmosphere.cycle, noon.atmosphere.cycle);
        assert_eq!(again.wind.strength, noon.wind.strength);
    }

    #[test]
    fn test_teardown_leaves_scene_empty() {
        let mut scene = SceneGraph::new();
        let mut env = environment();
        env.init(Vec3::ZERO, &mut scene);
        env.update(Vec3::new(100.0, 0.0, 0.0), &ManualClock::new(1), &mut scene);

        env.teardown(&mut scene);
        assert!(scene.is_empty());
        assert!(!env.is_initialized());
        assert_eq!(env.streamer().resident_count(), 0);
    }
}
