//! Runtime settings
//!
//! Read from a JSON file on startup. Every field is optional in the file and
//! falls back to the values in `consts`.

use std::fs;
use std::path::Path;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::{BACKDROP_SCALE, STARS_DENSITY, WINDOW_HEIGHT, WINDOW_WIDTH};
use crate::error::ConfigError;
use crate::sim::SpawnerConfig;

/// Visible area in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: WINDOW_WIDTH,
            height: WINDOW_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn size(&self) -> DVec2 {
        DVec2::new(self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed; drawn at random (and logged) when absent
    pub seed: Option<u64>,
    pub viewport: Viewport,
    /// Fraction of lit pixels in a stars tile
    pub stars_density: f64,
    pub backdrop_scale: f64,

    // === Debug ===
    /// Overlay collision rectangles for the player and power-ups
    pub show_collision_boxes: bool,

    // === Spawners ===
    pub planets: SpawnerConfig,
    pub powerups: SpawnerConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            viewport: Viewport::default(),
            stars_density: STARS_DENSITY,
            backdrop_scale: BACKDROP_SCALE,
            show_collision_boxes: false,
            planets: SpawnerConfig::planets(),
            powerups: SpawnerConfig::powerups(),
        }
    }
}

impl Settings {
    /// Load and validate settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings =
            serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let Viewport { width, height } = self.viewport;
        if !(width.is_finite() && height.is_finite() && width >= 1.0 && height >= 1.0) {
            return Err(ConfigError::Invalid {
                field: "viewport",
                reason: format!("{width}x{height} is not a usable size"),
            });
        }
        if !(0.0..=1.0).contains(&self.stars_density) {
            return Err(ConfigError::Invalid {
                field: "stars_density",
                reason: format!("{} is outside [0, 1]", self.stars_density),
            });
        }
        if !(self.backdrop_scale.is_finite() && self.backdrop_scale > 0.0) {
            return Err(ConfigError::Invalid {
                field: "backdrop_scale",
                reason: format!("must be positive, got {}", self.backdrop_scale),
            });
        }
        self.planets.validate()?;
        self.powerups.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("skydrift-{}-{name}.json", std::process::id()))
    }

    #[test]
    fn test_defaults_validate() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.viewport.size(), DVec2::new(800.0, 600.0));
        assert_eq!(settings.planets, SpawnerConfig::planets());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{ "seed": 42, "show_collision_boxes": true }"#).unwrap();
        assert_eq!(settings.seed, Some(42));
        assert!(settings.show_collision_boxes);
        assert_eq!(settings.stars_density, STARS_DENSITY);
        assert_eq!(settings.powerups, SpawnerConfig::powerups());
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("roundtrip");
        let mut settings = Settings::default();
        settings.seed = Some(7);
        settings.planets.spawn_probability = 0.4;

        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Settings::load(temp_path("does-not-exist")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let path = temp_path("garbage");
        fs::write(&path, "{ not json").unwrap();
        let err = Settings::load(&path).unwrap_err();
        let _ = fs::remove_file(&path);
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut settings = Settings::default();
        settings.stars_density = 2.0;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::Invalid { field: "stars_density", .. })
        ));

        let mut settings = Settings::default();
        settings.viewport.width = 0.0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.powerups.max_influence = -1.0;
        assert!(settings.validate().is_err());
    }
}
