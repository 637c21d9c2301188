//! Day/night atmosphere with sun/moon orbit, sky colors, fog, and clouds
//!
//! The cycle is driven by wall-clock time, so every viewer of the same scene sees the
//! same time of day. The cycle is split into six bands; each band blends between two
//! keyframe palettes, and adjacent bands share the keyframe at their common edge.

use std::f32::consts::{PI, TAU};
use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use vignette_core::Color;

/// Ground tint mixed into the ambient light
const AMBIENT_GROUND: u32 = 0x0a220a;

/// Atmosphere timing and orbit layout
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AtmosphereConfig {
    /// Length of one full day in wall-clock milliseconds
    pub day_length_ms: u64,
    /// Distance of the sun and moon from the viewer on the orbit plane
    pub orbit_radius: f32,
    /// Z offset of the orbit plane relative to the viewer
    pub orbit_depth_offset: f32,
    /// Sky shader time added per frame
    pub shader_time_step: f32,
}

impl Default for AtmosphereConfig {
    fn default() -> Self {
        Self {
            day_length_ms: 3_600_000,
            orbit_radius: 300.0,
            orbit_depth_offset: -100.0,
            shader_time_step: 0.005,
        }
    }
}

/// Portion of the day cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayBand {
    Sunrise,
    Day,
    Sunset,
    Dusk,
    Night,
    PreDawn,
}

impl DayBand {
    pub const ALL: [DayBand; 6] = [
        Self::Sunrise,
        Self::Day,
        Self::Sunset,
        Self::Dusk,
        Self::Night,
        Self::PreDawn,
    ];

    /// Start and end of the band as cycle fractions
    pub fn range(&self) -> (f32, f32) {
        match self {
            Self::Sunrise => (0.0, 0.2),
            Self::Day => (0.2, 0.45),
            Self::Sunset => (0.45, 0.55),
            Self::Dusk => (0.55, 0.7),
            Self::Night => (0.7, 0.9),
            Self::PreDawn => (0.9, 1.0),
        }
    }

    /// Keyframes blended across this band, start then end
    pub fn keyframes(&self) -> (SkyPalette, SkyPalette) {
        match self {
            Self::Sunrise => (SkyPalette::dawn(), SkyPalette::noon()),
            Self::Day => (SkyPalette::noon(), SkyPalette::noon()),
            Self::Sunset => (SkyPalette::noon(), SkyPalette::sunset()),
            Self::Dusk => (SkyPalette::sunset(), SkyPalette::night()),
            Self::Night => (SkyPalette::night(), SkyPalette::night()),
            Self::PreDawn => (SkyPalette::night(), SkyPalette::dawn()),
        }
    }

    /// Band containing a cycle fraction, and how far into it the fraction is
    pub fn locate(cycle: f32) -> (Self, f32) {
        let band = Self::ALL
            .into_iter()
            .find(|band| cycle < band.range().1)
            .unwrap_or(Self::PreDawn);
        let (start, end) = band.range();
        let alpha = ((cycle - start) / (end - start)).clamp(0.0, 1.0);
        (band, alpha)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Sunrise => "Sunrise",
            Self::Day => "Day",
            Self::Sunset => "Sunset",
            Self::Dusk => "Dusk",
            Self::Night => "Night",
            Self::PreDawn => "Pre-dawn",
        }
    }
}

/// Everything the sky, fog, and lights take from the time of day
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkyPalette {
    /// Color at the top of the sky
    pub zenith: Color,
    /// Color at the horizon; also the fog color
    pub horizon: Color,
    pub sun_intensity: f32,
    pub moon_intensity: f32,
    pub star_opacity: f32,
    pub fog_density: f32,
    /// Cloud coverage bias; negative values thin the clouds out
    pub cloud_density: f32,
    pub cloud_color: Color,
}

impl Default for SkyPalette {
    fn default() -> Self {
        Self::noon()
    }
}

impl SkyPalette {
    pub fn night() -> Self {
        Self {
            zenith: Color::from_hex(0x020408),
            horizon: Color::from_hex(0x0a1a2a),
            sun_intensity: 0.0,
            moon_intensity: 0.5,
            star_opacity: 1.0,
            fog_density: 0.005,
            cloud_density: -0.3,
            cloud_color: Color::from_hex(0x111122),
        }
    }

    pub fn dawn() -> Self {
        Self {
            zenith: Color::from_hex(0x4ca1af),
            horizon: Color::from_hex(0xc4e0e5),
            sun_intensity: 0.0,
            moon_intensity: 0.0,
            star_opacity: 1.0,
            fog_density: 0.005,
            cloud_density: -0.2,
            cloud_color: Color::from_hex(0xffcccc),
        }
    }

    pub fn noon() -> Self {
        Self {
            zenith: Color::from_hex(0x3a7bd5),
            horizon: Color::from_hex(0x87ceeb),
            sun_intensity: 1.5,
            moon_intensity: 0.0,
            star_opacity: 0.0,
            fog_density: 0.005,
            cloud_density: 0.1,
            cloud_color: Color::WHITE,
        }
    }

    pub fn sunset() -> Self {
        Self {
            zenith: Color::from_hex(0x2d3447),
            horizon: Color::from_hex(0xff512f),
            sun_intensity: 0.0,
            moon_intensity: 0.0,
            star_opacity: 0.5,
            fog_density: 0.01,
            cloud_density: 0.2,
            cloud_color: Color::from_hex(0xffaa88),
        }
    }

    /// Linearly interpolate between two palettes
    pub fn lerp(a: &Self, b: &Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |x: f32, y: f32| x + (y - x) * t;
        Self {
            zenith: Color::lerp(&a.zenith, &b.zenith, t),
            horizon: Color::lerp(&a.horizon, &b.horizon, t),
            sun_intensity: mix(a.sun_intensity, b.sun_intensity),
            moon_intensity: mix(a.moon_intensity, b.moon_intensity),
            star_opacity: mix(a.star_opacity, b.star_opacity),
            fog_density: mix(a.fog_density, b.fog_density),
            cloud_density: mix(a.cloud_density, b.cloud_density),
            cloud_color: Color::lerp(&a.cloud_color, &b.cloud_color, t),
        }
    }

    /// Palette at a cycle fraction
    pub fn at_cycle(cycle: f32) -> Self {
        let (band, alpha) = DayBand::locate(cycle);
        let (from, to) = band.keyframes();
        Self::lerp(&from, &to, alpha)
    }

    /// Hemisphere light color: the ground tint pulled toward the horizon
    pub fn ambient_color(&self) -> Color {
        Color::lerp(&Color::from_hex(AMBIENT_GROUND), &self.horizon, 0.4)
    }

    pub fn ambient_intensity(&self) -> f32 {
        0.3 + (self.sun_intensity / 1.5) * 0.5
    }
}

/// Wall-clock time of day shown to the reader
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClockTime {
    /// 0..24
    pub hours: u32,
    pub minutes: u32,
}

impl ClockTime {
    pub fn from_cycle(cycle: f32) -> Self {
        let total_minutes = (cycle.clamp(0.0, 1.0) * 24.0 * 60.0).floor() as u32;
        Self {
            hours: (total_minutes / 60).min(23),
            minutes: total_minutes % 60,
        }
    }

    pub fn is_pm(&self) -> bool {
        self.hours >= 12
    }
}

impl fmt::Display for ClockTime {
    /// `h:mm AM` with midnight and noon shown as 12
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_hours = match self.hours % 12 {
            0 => 12,
            h => h,
        };
        let suffix = if self.is_pm() { "PM" } else { "AM" };
        write!(f, "{}:{:02} {}", display_hours, self.minutes, suffix)
    }
}

/// Result of one atmosphere step
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AtmosphereState {
    /// Position in the day, `[0, 1)`
    pub cycle: f32,
    pub band: DayBand,
    pub palette: SkyPalette,
    pub sun_position: Vec3,
    pub moon_position: Vec3,
    pub fog_color: Color,
    pub ambient_color: Color,
    pub ambient_intensity: f32,
    /// Monotonic sky shader time
    pub shader_time: f32,
    pub clock: ClockTime,
}

impl Default for AtmosphereState {
    fn default() -> Self {
        let palette = SkyPalette::at_cycle(0.0);
        Self {
            cycle: 0.0,
            band: DayBand::Sunrise,
            palette,
            sun_position: Vec3::ZERO,
            moon_position: Vec3::ZERO,
            fog_color: palette.horizon,
            ambient_color: palette.ambient_color(),
            ambient_intensity: palette.ambient_intensity(),
            shader_time: 0.0,
            clock: ClockTime::from_cycle(0.0),
        }
    }
}

/// Day/night simulator
#[derive(Clone, Debug, Default)]
pub struct Atmosphere {
    config: AtmosphereConfig,
    state: AtmosphereState,
}

impl Atmosphere {
    pub fn new(config: AtmosphereConfig) -> Self {
        Self {
            config,
            state: AtmosphereState::default(),
        }
    }

    pub fn config(&self) -> &AtmosphereConfig {
        &self.config
    }

    /// Most recent state
    pub fn state(&self) -> &AtmosphereState {
        &self.state
    }

    /// Cycle fraction for a wall-clock time
    pub fn cycle_at(&self, now_ms: u64) -> f32 {
        let day = self.config.day_length_ms.max(1);
        ((now_ms % day) as f64 / day as f64) as f32
    }

    /// Sun and moon positions for a cycle fraction, centered on the viewer
    pub fn orbit(&self, cycle: f32, viewer: Vec3) -> (Vec3, Vec3) {
        let angle = cycle * TAU - PI / 2.0;
        let place = |a: f32| {
            Vec3::new(
                viewer.x + a.cos() * self.config.orbit_radius,
                a.sin() * self.config.orbit_radius,
                viewer.z + self.config.orbit_depth_offset,
            )
        };
        (place(angle), place(angle + PI))
    }

    /// Step the atmosphere to a wall-clock time. Call once per frame.
    pub fn advance(&mut self, now_ms: u64, viewer: Vec3) -> &AtmosphereState {
        let cycle = self.cycle_at(now_ms);
        let (band, _) = DayBand::locate(cycle);
        let palette = SkyPalette::at_cycle(cycle);
        let (sun_position, moon_position) = self.orbit(cycle, viewer);

        self.state = AtmosphereState {
            cycle,
            band,
            palette,
            sun_position,
            moon_position,
            fog_color: palette.horizon,
            ambient_color: palette.ambient_color(),
            ambient_intensity: palette.ambient_intensity(),
            shader_time: self.state.shader_time + self.config.shader_time_step,
            clock: ClockTime::from_cycle(cycle),
        };
        &self.state
    }
}
