//! Star field point cloud

use rand::Rng;

use crate::vertex::StarVertex;

/// Star field layout
#[derive(Clone, Copy, Debug)]
pub struct StarFieldConfig {
    pub count: usize,
    /// Stars spread over `[-half_extent, half_extent)` on x and z
    pub half_extent: f32,
    /// Stars sit in `[0, height)` on y
    pub height: f32,
    pub max_size: f32,
}

impl Default for StarFieldConfig {
    fn default() -> Self {
        Self {
            count: 5000,
            half_extent: 500.0,
            height: 500.0,
            max_size: 0.5,
        }
    }
}

/// Points for the star field, generated once and moved with the viewer
#[derive(Clone, Debug, Default)]
pub struct StarField {
    pub vertices: Vec<StarVertex>,
}

impl StarField {
    pub fn generate(config: &StarFieldConfig, rng: &mut impl Rng) -> Self {
        let vertices = (0..config.count)
            .map(|_| {
                let x = (rng.gen::<f32>() - 0.5) * 2.0 * config.half_extent;
                let y = rng.gen::<f32>() * config.height;
                let z = (rng.gen::<f32>() - 0.5) * 2.0 * config.half_extent;
                StarVertex::new([x, y, z], rng.gen::<f32>() * config.max_size)
            })
            .collect();
        Self { vertices }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_star_field_bounds() {
        let config = StarFieldConfig::default();
        let field = StarField::generate(&config, &mut StdRng::seed_from_u64(5));
        assert_eq!(field.len(), 5000);
        for star in &field.vertices {
            let [x, y, z] = star.position;
            assert!(x >= -500.0 && x <= 500.0);
            assert!(z >= -500.0 && z <= 500.0);
            assert!(y >= 0.0 && y <= 500.0);
            assert!(star.size >= 0.0 && star.size <= 0.5);
        }
    }

    #[test]
    fn test_same_seed_same_sky() {
        let config = StarFieldConfig {
            count: 64,
            ..Default::default()
        };
        let a = StarField::generate(&config, &mut StdRng::seed_from_u64(9));
        let b = StarField::generate(&config, &mut StdRng::seed_from_u64(9));
        assert_eq!(a.vertices, b.vertices);
    }
}
