//! Chunk-based world streaming
//!
//! Keeps a square of decorated chunks resident around the viewer. Chunks that leave
//! the square are dropped outright; coming back regenerates them from their seed.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::debug;
use vignette_core::{EntityId, Transform};

use crate::content::{ChunkContent, ChunkGenerator};
use crate::scene::{Renderable, SceneHost, SceneNode};
use crate::seed::{ChunkSeedScheme, DeterministicRng, SineHash};

/// Grid coordinate for a chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk whose center is nearest to a world position.
    ///
    /// Halves round toward positive infinity, so a viewer exactly on a boundary belongs
    /// to the chunk on the positive side.
    pub fn from_world_pos(pos: Vec3, chunk_size: f32) -> Self {
        debug_assert!(pos.is_finite(), "viewer position must be finite: {pos:?}");
        Self {
            x: (pos.x / chunk_size + 0.5).floor() as i32,
            z: (pos.z / chunk_size + 0.5).floor() as i32,
        }
    }

    /// World-space offset of this chunk's group (its center)
    pub fn world_origin(&self, chunk_size: f32) -> Vec3 {
        Vec3::new(self.x as f32 * chunk_size, 0.0, self.z as f32 * chunk_size)
    }

    /// Chebyshev distance to another chunk coord, saturating at `u32::MAX`
    pub fn distance(&self, other: &ChunkCoord) -> u32 {
        let dx = (i64::from(self.x) - i64::from(other.x)).unsigned_abs();
        let dz = (i64::from(self.z) - i64::from(other.z)).unsigned_abs();
        u32::try_from(dx.max(dz)).unwrap_or(u32::MAX)
    }

    /// Pull this coord inward so a square of `radius` around it stays inside `i32`
    pub fn clamped(&self, radius: u32) -> Self {
        let r = i32::try_from(radius).unwrap_or(i32::MAX / 2).min(i32::MAX / 2);
        let (lo, hi) = (i32::MIN + r, i32::MAX - r);
        Self {
            x: self.x.clamp(lo, hi),
            z: self.z.clamp(lo, hi),
        }
    }

    /// All coords within `radius` on both axes, row by row.
    ///
    /// Rows and columns that would leave `i32` collapse onto the edge, so call this on a
    /// [`clamped`](Self::clamped) center to get a full square.
    pub fn square_around(&self, radius: u32) -> impl Iterator<Item = ChunkCoord> + '_ {
        let r = i32::try_from(radius).unwrap_or(i32::MAX / 2).min(i32::MAX / 2);
        (-r..=r).flat_map(move |dz| {
            (-r..=r).map(move |dx| ChunkCoord::new(self.x.saturating_add(dx), self.z.saturating_add(dz)))
        })
    }

    /// String key in `"x:z"` form
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.x, self.z)
    }
}

/// Errors from parsing a chunk key
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChunkKeyError {
    #[error("Chunk key {0:?} is missing the ':' separator")]
    MissingSeparator(String),

    #[error("Chunk key {key:?} has a non-integer component {part:?}")]
    InvalidComponent { key: String, part: String },
}

impl FromStr for ChunkCoord {
    type Err = ChunkKeyError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let (x, z) = key
            .split_once(':')
            .ok_or_else(|| ChunkKeyError::MissingSeparator(key.to_string()))?;
        let parse = |part: &str| {
            part.parse::<i32>()
                .map_err(|_| ChunkKeyError::InvalidComponent {
                    key: key.to_string(),
                    part: part.to_string(),
                })
        };
        Ok(Self::new(parse(x)?, parse(z)?))
    }
}

/// Square keep-out area where no trees are placed
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Clearing {
    pub center_x: f32,
    pub center_z: f32,
    /// Half the side length of the square
    pub half_extent: f32,
}

impl Clearing {
    pub fn contains(&self, wx: f32, wz: f32) -> bool {
        (wx - self.center_x).abs() < self.half_extent && (wz - self.center_z).abs() < self.half_extent
    }
}

impl Default for Clearing {
    /// The area around the landmark statue
    fn default() -> Self {
        Self {
            center_x: 0.0,
            center_z: 40.0,
            half_extent: 10.0,
        }
    }
}

/// Configuration for the chunk system
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkConfig {
    /// Side length of each chunk in world units
    pub chunk_size: f32,
    /// Chunks kept resident in each direction around the viewer chunk
    pub preload_radius: u32,
    /// Grass blades generated per chunk
    pub grass_per_chunk: usize,
    /// How chunk coordinates fold into a generation seed
    pub seed_scheme: ChunkSeedScheme,
    /// Tree-free area around the landmark
    pub landmark_clearing: Clearing,
    /// Fixed seed for cosmetic draws; entropy when unset
    pub cosmetic_seed: Option<u64>,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: 60.0,
            preload_radius: 2,
            grass_per_chunk: 400,
            seed_scheme: ChunkSeedScheme::Linear,
            landmark_clearing: Clearing::default(),
            cosmetic_seed: None,
        }
    }
}

/// Scene handle of a swayable tree together with what the sway pass needs
#[derive(Clone, Copy, Debug)]
pub struct SwayingTree {
    pub node: EntityId,
    /// Chunk-local position; the node's translation
    pub local_position: Vec3,
    /// World position, for spatially coherent wind phase
    pub world_position: Vec3,
    pub phase: f32,
}

/// A chunk that is currently resident and attached to the scene
pub struct ResidentChunk {
    pub content: ChunkContent,
    /// Scene group holding everything in this chunk
    pub group: EntityId,
    /// Side table of the chunk's trees
    pub trees: Vec<SwayingTree>,
}

/// What a streaming pass changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamingDelta {
    pub loaded: Vec<ChunkCoord>,
    pub unloaded: Vec<ChunkCoord>,
}

impl StreamingDelta {
    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty() && self.unloaded.is_empty()
    }
}

/// Owns the active chunk registry and keeps it matched to the viewer position
pub struct WorldStreamer<R: DeterministicRng = SineHash> {
    generator: ChunkGenerator<R>,
    /// Currently resident chunks
    resident: HashMap<ChunkCoord, ResidentChunk>,
    /// Scene node chunk groups are attached under
    root: Option<EntityId>,
}

impl WorldStreamer<SineHash> {
    /// Create a streamer with the default sine-hash generator
    pub fn new(config: ChunkConfig) -> Self {
        let mut generator = ChunkGenerator::new(config);
        if let Some(seed) = generator.config().cosmetic_seed {
            generator.seed_cosmetic(seed);
        }
        Self::with_generator(generator)
    }
}

impl<R: DeterministicRng> WorldStreamer<R> {
    pub fn with_generator(generator: ChunkGenerator<R>) -> Self {
        Self {
            generator,
            resident: HashMap::new(),
            root: None,
        }
    }

    pub fn config(&self) -> &ChunkConfig {
        self.generator.config()
    }

    /// Attach future chunk groups under this node instead of the scene root
    pub fn set_root(&mut self, root: Option<EntityId>) {
        self.root = root;
    }

    /// Get the chunk coordinate the viewer's square is centered on.
    ///
    /// Far enough out that the square would leave `i32`, the center stops at the edge.
    pub fn viewer_chunk(&self, viewer: Vec3) -> ChunkCoord {
        ChunkCoord::from_world_pos(viewer, self.config().chunk_size).clamped(self.config().preload_radius)
    }

    /// Get a resident chunk by coordinate
    pub fn get_chunk(&self, coord: &ChunkCoord) -> Option<&ResidentChunk> {
        self.resident.get(coord)
    }

    /// Iterate over all resident chunks
    pub fn resident_chunks(&self) -> impl Iterator<Item = &ResidentChunk> {
        self.resident.values()
    }

    /// Coordinates of all resident chunks
    pub fn resident_coords(&self) -> HashSet<ChunkCoord> {
        self.resident.keys().copied().collect()
    }

    /// Sorted string keys of all resident chunks
    pub fn resident_keys(&self) -> Vec<String> {
        let mut coords: Vec<_> = self.resident.keys().copied().collect();
        coords.sort();
        coords.iter().map(ChunkCoord::key).collect()
    }

    /// Number of resident chunks
    pub fn resident_count(&self) -> usize {
        self.resident.len()
    }

    /// Bring the registry in line with the viewer position.
    /// Call this each frame.
    pub fn update(&mut self, viewer: Vec3, host: &mut impl SceneHost) -> StreamingDelta {
        let center = self.viewer_chunk(viewer);
        let radius = self.config().preload_radius;
        let mut delta = StreamingDelta::default();

        let to_unload: Vec<ChunkCoord> = self
            .resident
            .keys()
            .filter(|coord| coord.distance(&center) > radius)
            .copied()
            .collect();

        for coord in to_unload {
            self.unload_chunk(coord, host);
            delta.unloaded.push(coord);
        }

        for coord in center.square_around(radius) {
            if !self.resident.contains_key(&coord) {
                self.load_chunk(coord, host);
                delta.loaded.push(coord);
            }
        }

        if !delta.is_empty() {
            debug!(
                "Streaming around {}: +{} -{} ({} resident)",
                center,
                delta.loaded.len(),
                delta.unloaded.len(),
                self.resident.len()
            );
        }

        delta
    }

    /// Detach every resident chunk and empty the registry
    pub fn clear(&mut self, host: &mut impl SceneHost) {
        for (_, chunk) in self.resident.drain() {
            host.detach(chunk.group);
        }
    }

    /// Forget every resident chunk without touching the scene.
    /// Used when the host already dropped the subtree the chunks lived in.
    pub fn forget_all(&mut self) {
        self.resident.clear();
    }

    fn load_chunk(&mut self, coord: ChunkCoord, host: &mut impl SceneHost) {
        let content = self.generator.generate(coord);

        let group = host.attach(
            self.root,
            SceneNode::new(Renderable::Chunk(coord), Transform::from_position(content.origin)),
        );
        host.attach(
            Some(group),
            SceneNode::new(Renderable::Grass(content.grass.clone()), Transform::default()),
        );
        for rock in &content.rocks {
            host.attach(Some(group), SceneNode::new(Renderable::Rock(*rock), rock.transform()));
        }

        let trees = content
            .trees
            .iter()
            .map(|tree| {
                let node = host.attach(
                    Some(group),
                    SceneNode::new(
                        Renderable::Tree(*tree),
                        Transform::from_position(tree.local_position),
                    ),
                );
                SwayingTree {
                    node,
                    local_position: tree.local_position,
                    world_position: content.tree_world_position(tree),
                    phase: tree.sway_phase,
                }
            })
            .collect();

        self.resident.insert(
            coord,
            ResidentChunk {
                content,
                group,
                trees,
            },
        );
    }

    fn unload_chunk(&mut self, coord: ChunkCoord, host: &mut impl SceneHost) {
        if let Some(chunk) = self.resident.remove(&coord) {
            host.detach(chunk.group);
        }
    }
}
