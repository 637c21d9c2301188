//! Vertex types for the grass and star batches

use bytemuck::{Pod, Zeroable};
use vignette_world::GrassBatch;

/// One attribute in an interleaved vertex layout
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexAttribute {
    pub name: &'static str,
    /// Byte offset from the start of the vertex
    pub offset: u32,
    /// Number of `f32` components
    pub components: u32,
}

/// Grass line vertex; two per blade (base then tip)
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GrassVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl GrassVertex {
    pub const LAYOUT: [VertexAttribute; 2] = [
        VertexAttribute {
            name: "position",
            offset: 0,
            components: 3,
        },
        VertexAttribute {
            name: "color",
            offset: 12,
            components: 3,
        },
    ];

    pub fn new(position: [f32; 3], color: [f32; 3]) -> Self {
        Self { position, color }
    }

    /// Line-list vertices for a grass batch. Both ends of a blade share its color.
    pub fn from_batch(batch: &GrassBatch) -> Vec<Self> {
        batch
            .blades
            .iter()
            .flat_map(|blade| {
                let color = blade.color.to_rgb_array();
                [
                    Self::new(blade.base.to_array(), color),
                    Self::new(blade.tip.to_array(), color),
                ]
            })
            .collect()
    }

    pub fn stride() -> u32 {
        std::mem::size_of::<Self>() as u32
    }
}

/// Star point vertex
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct StarVertex {
    pub position: [f32; 3],
    /// Point size in pixels
    pub size: f32,
}

impl StarVertex {
    pub const LAYOUT: [VertexAttribute; 2] = [
        VertexAttribute {
            name: "position",
            offset: 0,
            components: 3,
        },
        VertexAttribute {
            name: "size",
            offset: 12,
            components: 1,
        },
    ];

    pub fn new(position: [f32; 3], size: f32) -> Self {
        Self { position, size }
    }

    pub fn stride() -> u32 {
        std::mem::size_of::<Self>() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use vignette_core::Color;
    use vignette_world::GrassBlade;

    #[test]
    fn test_layouts_match_struct_sizes() {
        assert_eq!(GrassVertex::stride(), 24);
        assert_eq!(StarVertex::stride(), 16);
        let last = GrassVertex::LAYOUT[1];
        assert_eq!(last.offset + last.components * 4, GrassVertex::stride());
        let last = StarVertex::LAYOUT[1];
        assert_eq!(last.offset + last.components * 4, StarVertex::stride());
    }

    #[test]
    fn test_grass_batch_becomes_line_pairs() {
        let batch = GrassBatch {
            blades: vec![
                GrassBlade {
                    base: Vec3::new(1.0, 0.0, 2.0),
                    tip: Vec3::new(1.05, 0.3, 2.05),
                    color: Color::rgb(0.05, 0.4, 0.1),
                },
                GrassBlade {
                    base: Vec3::new(-4.0, 0.0, 0.0),
                    tip: Vec3::new(-4.0, 0.5, 0.0),
                    color: Color::rgb(0.06, 0.5, 0.12),
                },
            ],
        };
        let vertices = GrassVertex::from_batch(&batch);
        assert_eq!(vertices.len(), 4);
        assert_eq!(vertices[0].position, [1.0, 0.0, 2.0]);
        assert_eq!(vertices[1].position, [1.05, 0.3, 2.05]);
        assert_eq!(vertices[2].color, [0.06, 0.5, 0.12]);
        assert_eq!(vertices[2].color, vertices[3].color);

        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        assert_eq!(bytes.len(), 4 * 24);
    }
}
