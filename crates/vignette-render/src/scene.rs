//! Per-frame uniform blocks for the sky, grass, and lighting passes

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use vignette_world::{AtmosphereState, Wind};

/// Sky dome shader inputs
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct SkyUniforms {
    pub zenith: [f32; 4], // rgb = color, w = star opacity
    pub horizon: [f32; 4], // rgb = color
    pub clouds: [f32; 4], // rgb = cloud color, w = cloud density
    pub time: [f32; 4], // x = shader time, y = day cycle
}

impl SkyUniforms {
    pub fn from_atmosphere(state: &AtmosphereState) -> Self {
        let palette = &state.palette;
        Self {
            zenith: with_w(palette.zenith.to_rgb_array(), palette.star_opacity),
            horizon: with_w(palette.horizon.to_rgb_array(), 0.0),
            clouds: with_w(palette.cloud_color.to_rgb_array(), palette.cloud_density),
            time: [state.shader_time, state.cycle, 0.0, 0.0],
        }
    }
}

/// Grass sway shader inputs
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GrassUniforms {
    pub wind: [f32; 4], // xyz = direction, w = strength
    pub time: [f32; 4], // x = wind time
}

impl GrassUniforms {
    pub fn from_wind(wind: &Wind) -> Self {
        Self {
            wind: with_w(wind.direction.to_array(), wind.strength),
            time: [wind.time, 0.0, 0.0, 0.0],
        }
    }
}

/// Scene lights and fog
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct LightingUniforms {
    pub sun: [f32; 4], // xyz = position, w = intensity
    pub moon: [f32; 4], // xyz = position, w = intensity
    pub ambient: [f32; 4], // rgb = color, w = intensity
    pub fog: [f32; 4], // rgb = color, w = density
}

impl LightingUniforms {
    pub fn from_atmosphere(state: &AtmosphereState) -> Self {
        Self {
            sun: with_w(state.sun_position.to_array(), state.palette.sun_intensity),
            moon: with_w(state.moon_position.to_array(), state.palette.moon_intensity),
            ambient: with_w(state.ambient_color.to_rgb_array(), state.ambient_intensity),
            fog: with_w(state.fog_color.to_rgb_array(), state.palette.fog_density),
        }
    }

    pub fn sun_position(&self) -> Vec3 {
        Vec3::new(self.sun[0], self.sun[1], self.sun[2])
    }
}

/// All uniform blocks for one frame
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameUniforms {
    pub sky: SkyUniforms,
    pub grass: GrassUniforms,
    pub lighting: LightingUniforms,
}

impl FrameUniforms {
    pub fn gather(atmosphere: &AtmosphereState, wind: &Wind) -> Self {
        Self {
            sky: SkyUniforms::from_atmosphere(atmosphere),
            grass: GrassUniforms::from_wind(wind),
            lighting: LightingUniforms::from_atmosphere(atmosphere),
        }
    }

    /// Total bytes uploaded per frame
    pub fn byte_len(&self) -> usize {
        bytemuck::bytes_of(&self.sky).len()
            + bytemuck::bytes_of(&self.grass).len()
            + bytemuck::bytes_of(&self.lighting).len()
    }
}

fn with_w(xyz: [f32; 3], w: f32) -> [f32; 4] {
    [xyz[0], xyz[1], xyz[2], w]
}

#[cfg(test)]
mod tests {
    use super::*;
    use vignette_world::Atmosphere;

    #[test]
    fn test_gather_packs_atmosphere_and_wind() {
        let mut atmosphere = Atmosphere::default();
        let state = *atmosphere.advance(1_080_000, Vec3::new(5.0, 1.6, 5.0));
        let mut wind = Wind::new();
        wind.advance(1_080_000);

        let uniforms = FrameUniforms::gather(&state, &wind);

        // 0.3 of the day sits in the full-noon band
        assert_eq!(uniforms.lighting.sun[3], 1.5);
        assert_eq!(uniforms.lighting.moon[3], 0.0);
        assert_eq!(uniforms.sky.zenith[3], 0.0);
        assert_eq!(uniforms.lighting.sun_position(), state.sun_position);
        assert_eq!(uniforms.lighting.fog[3], 0.005);
        assert_eq!(uniforms.grass.wind[3], wind.strength);
        assert_eq!(uniforms.grass.time[0], wind.time);
        assert_eq!(uniforms.sky.time[0], state.shader_time);
        assert_eq!(uniforms.byte_len(), 4 * 16 + 2 * 16 + 4 * 16);
    }
}
