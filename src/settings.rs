//! Vignette settings with persistence
//!
//! Settings are saved to `~/.config/vignette/settings.toml`

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use vignette_game::ViewerConfig;
use vignette_world::EnvironmentConfig;

/// All settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VignetteSettings {
    pub world: EnvironmentConfig,
    pub viewer: ViewerConfig,
    pub simulation: SimulationSettings,
}

impl VignetteSettings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("vignette"))
    }

    /// Get the settings file path
    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("Could not determine config directory");
            return Self::default();
        };

        if !path.exists() {
            info!("No settings file found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => match Self::parse(&content) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse settings: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read settings file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Parse settings from TOML; missing sections and fields keep their defaults
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Save settings to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let Some(dir) = Self::config_dir() else {
            anyhow::bail!("Could not determine config directory");
        };

        let path = dir.join("settings.toml");

        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }
}

/// Headless run settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Target frames per second
    pub frame_rate: u32,
    /// Stop after this many frames; run until interrupted when unset
    pub max_frames: Option<u64>,
    /// Frames between page turns (each regenerates the world)
    pub page_interval_frames: u64,
    /// Frames between progress log lines
    pub report_interval_frames: u64,
    /// Write the effective settings back to disk on start
    pub write_defaults: bool,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            frame_rate: 60,
            max_frames: Some(3600),
            page_interval_frames: 900,
            report_interval_frames: 120,
            write_defaults: false,
        }
    }
}

impl SimulationSettings {
    /// Wall-clock duration of one frame
    pub fn frame_duration(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / f64::from(self.frame_rate.max(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_round_trip_through_toml() {
        let settings = VignetteSettings::default();
        let text = toml::to_string_pretty(&settings).unwrap();
        let parsed = VignetteSettings::parse(&text).unwrap();
        assert_eq!(parsed.world.chunks.chunk_size, 60.0);
        assert_eq!(parsed.world.atmosphere.day_length_ms, 3_600_000);
        assert_eq!(parsed.simulation.max_frames, Some(3600));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let parsed = VignetteSettings::parse(
            r#"
            [world.chunks]
            preload_radius = 3
            seed_scheme = "Paired"

            [simulation]
            frame_rate = 30
            "#,
        )
        .unwrap();
        assert_eq!(parsed.world.chunks.preload_radius, 3);
        assert_eq!(parsed.world.chunks.seed_scheme, vignette_world::ChunkSeedScheme::Paired);
        assert_eq!(parsed.world.chunks.grass_per_chunk, 400);
        assert_eq!(parsed.viewer.max_speed, 0.15);
        assert_eq!(parsed.simulation.frame_rate, 30);
        assert_eq!(parsed.simulation.page_interval_frames, 900);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        assert!(VignetteSettings::parse("[world.chunks]\nchunk_size = \"wide\"").is_err());
    }
}
