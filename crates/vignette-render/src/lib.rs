//! Vignette Render - GPU-facing data for the Vignette world
//!
//! Converts world state into plain `bytemuck` structs ready for upload: grass line
//! vertices, the star point cloud, and per-frame uniform blocks. The drawing itself lives
//! with whatever implements the scene host.

pub mod scene;
pub mod stars;
pub mod vertex;

pub use scene::{FrameUniforms, GrassUniforms, LightingUniforms, SkyUniforms};
pub use stars::{StarField, StarFieldConfig};
pub use vertex::{GrassVertex, StarVertex, VertexAttribute};
