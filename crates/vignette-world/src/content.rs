//! Procedural chunk decoration: grass, rocks, and trees
//!
//! Every draw that decides what exists and where comes from a [`DeterministicRng`]
//! offset from the chunk seed, so a chunk regenerated after eviction is identical.
//! Rock orientation and tree sway phase are cosmetic and come from a separate
//! `StdRng`.

use std::sync::Arc;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use vignette_core::{Color, Transform};

use crate::chunk::{ChunkConfig, ChunkCoord};
use crate::seed::{DeterministicRng, SineHash};

/// Base grass color before per-blade shading
const GRASS_TINT: Color = Color::rgb(0.1, 0.8, 0.2);

const LARGEST_BELOW_ONE: f32 = 1.0 - f32::EPSILON / 2.0;

// Draw offsets from the chunk seed. Index-derived draws add the item index on top.
const GRASS_Z_OFFSET: f64 = 10000.0;
const ROCK_X_OFFSET: f64 = 100.0;
const ROCK_Z_OFFSET: f64 = 200.0;
const ROCK_SIZE_OFFSET: f64 = 300.0;
const TREE_COUNT_OFFSET: f64 = 500.0;
const TREE_X_OFFSET: f64 = 600.0;
const TREE_Z_OFFSET: f64 = 700.0;
const TREE_HEIGHT_OFFSET: f64 = 800.0;

/// One grass blade as a line segment in chunk-local space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrassBlade {
    pub base: Vec3,
    pub tip: Vec3,
    pub color: Color,
}

/// All grass blades of a chunk, drawn as one line-segment batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GrassBatch {
    pub blades: Vec<GrassBlade>,
}

/// A rock resting on the ground
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RockInstance {
    /// Chunk-local position of the rock center
    pub position: Vec3,
    /// Radius of the rock geometry
    pub size: f32,
    /// XYZ Euler rotation in radians
    pub rotation: Vec3,
    /// Vertical scale factor
    pub squash: f32,
}

impl RockInstance {
    pub fn transform(&self) -> Transform {
        Transform::from_position_euler(self.position, self.rotation)
            .with_scale(Vec3::new(1.0, self.squash, 1.0))
    }
}

/// A swayable tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeInstance {
    /// Chunk-local position of the trunk base
    pub local_position: Vec3,
    pub height: f32,
    /// Per-tree phase offset in `[0, 10)`
    pub sway_phase: f32,
}

/// Everything generated for one chunk
#[derive(Debug, Clone)]
pub struct ChunkContent {
    pub coord: ChunkCoord,
    /// World-space offset of the chunk group
    pub origin: Vec3,
    pub grass: Arc<GrassBatch>,
    pub rocks: Vec<RockInstance>,
    pub trees: Vec<TreeInstance>,
}

impl ChunkContent {
    /// World position of a tree in this chunk
    pub fn tree_world_position(&self, tree: &TreeInstance) -> Vec3 {
        self.origin + tree.local_position
    }
}

/// Generates chunk content from chunk coordinates
pub struct ChunkGenerator<R: DeterministicRng = SineHash> {
    config: ChunkConfig,
    rng: R,
    cosmetic: StdRng,
}

impl ChunkGenerator<SineHash> {
    /// Sine-hash generator with an entropy-seeded cosmetic RNG
    pub fn new(config: ChunkConfig) -> Self {
        Self::with_rng(config, SineHash, StdRng::from_entropy())
    }
}

impl<R: DeterministicRng> ChunkGenerator<R> {
    pub fn with_rng(config: ChunkConfig, rng: R, cosmetic: StdRng) -> Self {
        Self {
            config,
            rng,
            cosmetic,
        }
    }

    /// Replace the cosmetic RNG with a seeded one
    pub fn seed_cosmetic(&mut self, seed: u64) {
        self.cosmetic = StdRng::seed_from_u64(seed);
    }

    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }

    /// Generate the decoration for a chunk
    pub fn generate(&mut self, coord: ChunkCoord) -> ChunkContent {
        let seed = self.config.seed_scheme.chunk_seed(coord.x, coord.z);
        let origin = coord.world_origin(self.config.chunk_size);

        ChunkContent {
            coord,
            origin,
            grass: Arc::new(self.grass(seed)),
            rocks: self.rocks(seed),
            trees: self.trees(seed, origin),
        }
    }

    fn draw(&self, input: f64) -> f32 {
        // f64 -> f32 can round up to 1.0
        (self.rng.sample(input) as f32).min(LARGEST_BELOW_ONE)
    }

    /// Centered local offset in `[-size/2, size/2)`
    fn local_offset(&self, input: f64) -> f32 {
        (self.draw(input) - 0.5) * self.config.chunk_size
    }

    /// `floor(r * 3) + 1`
    fn count(&self, input: f64) -> usize {
        ((self.draw(input) * 3.0).floor() as usize).min(2) + 1
    }

    fn grass(&self, seed: f64) -> GrassBatch {
        let blades = (0..self.config.grass_per_chunk)
            .map(|i| {
                let i = i as f64;
                let lx = self.local_offset(seed + i);
                let lz = self.local_offset(seed + i + GRASS_Z_OFFSET);
                let height = 0.15 + self.draw(seed + i * 2.0) * 0.4;
                let sway = (self.draw(seed + i * 3.0) - 0.5) * 0.2;
                let shade = 0.4 + self.draw(seed + i * 5.0) * 0.4;

                GrassBlade {
                    base: Vec3::new(lx, 0.0, lz),
                    tip: Vec3::new(lx + sway, height, lz + sway),
                    color: GRASS_TINT.scaled(shade),
                }
            })
            .collect();

        GrassBatch { blades }
    }

    fn rocks(&mut self, seed: f64) -> Vec<RockInstance> {
        let count = self.count(seed);
        let mut rocks = Vec::with_capacity(count);

        for i in 0..count {
            let i = i as f64;
            let lx = self.local_offset(seed + i + ROCK_X_OFFSET);
            let lz = self.local_offset(seed + i + ROCK_Z_OFFSET);
            let size = 0.5 + self.draw(seed + i + ROCK_SIZE_OFFSET) * 1.5;
            let rotation = Vec3::new(
                self.cosmetic.gen::<f32>(),
                self.cosmetic.gen::<f32>(),
                self.cosmetic.gen::<f32>(),
            );

            rocks.push(RockInstance {
                position: Vec3::new(lx, size * 0.4, lz),
                size,
                rotation,
                squash: 0.6 + self.cosmetic.gen::<f32>() * 0.4,
            });
        }

        rocks
    }

    fn trees(&mut self, seed: f64, origin: Vec3) -> Vec<TreeInstance> {
        let count = self.count(seed + TREE_COUNT_OFFSET);
        let mut trees = Vec::with_capacity(count);

        for i in 0..count {
            let i = i as f64;
            let lx = self.local_offset(seed + i + TREE_X_OFFSET);
            let lz = self.local_offset(seed + i + TREE_Z_OFFSET);
            let height = 5.0 + self.draw(seed + i + TREE_HEIGHT_OFFSET) * 4.0;

            if self
                .config
                .landmark_clearing
                .contains(origin.x + lx, origin.z + lz)
            {
                continue;
            }

            trees.push(TreeInstance {
                local_position: Vec3::new(lx, 0.0, lz),
                height,
                sway_phase: self.cosmetic.gen::<f32>() * 10.0,
            });
        }

        trees
    }
}
