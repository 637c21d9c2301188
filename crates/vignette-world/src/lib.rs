//! Vignette World - Streamed terrain, wind, and the day/night sky
//!
//! Provides chunk-based world streaming with deterministic decoration, a wind field that
//! sways grass and trees, and a wall-clock driven atmosphere. [`Environment`] ties them
//! together behind a [`SceneHost`].

pub mod atmosphere;
pub mod chunk;
pub mod content;
pub mod environment;
pub mod scene;
pub mod seed;
pub mod wind;

pub use atmosphere::{Atmosphere, AtmosphereConfig, AtmosphereState, ClockTime, DayBand, SkyPalette};
pub use chunk::{
    ChunkConfig, ChunkCoord, ChunkKeyError, Clearing, ResidentChunk, StreamingDelta, SwayingTree,
    WorldStreamer,
};
pub use content::{ChunkContent, ChunkGenerator, GrassBatch, GrassBlade, RockInstance, TreeInstance};
pub use environment::{Environment, EnvironmentConfig, FrameReport};
pub use scene::{Renderable, SceneGraph, SceneHost, SceneNode};
pub use seed::{ChunkSeedScheme, DeterministicRng, SineHash, SplitMixHash};
pub use wind::Wind;
