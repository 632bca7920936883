//! Application configuration.
//!
//! Loaded from `showroom.toml` next to the executable when present,
//! otherwise every field falls back to its default. Parse or read errors
//! are logged and never fatal.

use std::fs;
use std::path::Path;

use cgmath::Vector3;
use log::warn;
use serde::{Deserialize, Serialize};

const DEFAULT_CONFIG_PATH: &str = "showroom.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub camera: CameraConfig,
    pub animation: AnimationConfig,
    pub assets: AssetConfig,
    pub sky: SkyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Default eye position, returned to when a focus closes.
    pub default_eye: [f32; 3],
    /// Default orbit target.
    pub default_target: [f32; 3],
    pub fov_degrees: f32,
    pub znear: f32,
    pub zfar: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Focus / reset tween duration in seconds. The section reveal fires at
    /// half of this, so changing it keeps the two in sync.
    pub duration_secs: f32,
    /// One-shot flourish played once the room model has loaded.
    pub entry_duration_secs: f32,
    /// Far-out eye position the entry flourish starts from.
    pub entry_eye: [f32; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub room_model: String,
    pub bird_model: String,
    pub music: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyConfig {
    /// Daytime clear colour (linear RGB).
    pub day: [f32; 3],
    /// Night-mode clear colour.
    pub night: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            default_eye: [18.0, 12.0, 18.0],
            default_target: [0.0, 0.0, 0.0],
            fov_degrees: 35.0,
            znear: 0.1,
            zfar: 100.0,
            min_distance: 5.0,
            max_distance: 50.0,
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration_secs: 1.5,
            entry_duration_secs: 2.0,
            entry_eye: [50.0, 50.0, 50.0],
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            room_model: "assets/room.obj".to_string(),
            bird_model: "assets/birds.obj".to_string(),
            music: "assets/ambient.ogg".to_string(),
        }
    }
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            // 0x87ceeb sky blue / 0x051a14 deep forest night.
            day: [0.53, 0.81, 0.92],
            night: [0.02, 0.10, 0.08],
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            animation: AnimationConfig::default(),
            assets: AssetConfig::default(),
            sky: SkyConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load configuration from an explicit path, falling back to defaults on
    /// errors. A missing file at the default path is expected and only noted
    /// at debug level.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<AppConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    AppConfig::default()
                }
            },
            Err(err) => {
                if err.kind() == std::io::ErrorKind::NotFound {
                    log::debug!("No config at {}. Using defaults", path.display());
                } else {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                }
                AppConfig::default()
            }
        }
    }

    pub fn default_eye(&self) -> Vector3<f32> {
        Vector3::from(self.camera.default_eye)
    }

    pub fn default_target(&self) -> Vector3<f32> {
        Vector3::from(self.camera.default_target)
    }

    pub fn entry_eye(&self) -> Vector3<f32> {
        Vector3::from(self.animation.entry_eye)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_original_tuning() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.camera.default_eye, [18.0, 12.0, 18.0]);
        assert_eq!(cfg.animation.duration_secs, 1.5);
        assert_eq!(cfg.camera.max_distance, 50.0);
    }

    #[test]
    fn partial_file_keeps_defaults_for_the_rest() {
        let mut file = tempfile_path("partial");
        writeln!(file.1, "[animation]\nduration_secs = 0.75").unwrap();
        let cfg = AppConfig::load_from_path(&file.0);
        assert_eq!(cfg.animation.duration_secs, 0.75);
        assert_eq!(cfg.camera.default_eye, [18.0, 12.0, 18.0]);
        std::fs::remove_file(&file.0).ok();
    }

    #[test]
    fn garbled_file_falls_back_to_defaults() {
        let mut file = tempfile_path("garbled");
        writeln!(file.1, "this is not toml {{{{").unwrap();
        let cfg = AppConfig::load_from_path(&file.0);
        assert_eq!(cfg.animation.duration_secs, 1.5);
        std::fs::remove_file(&file.0).ok();
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = AppConfig::load_from_path(Path::new("does-not-exist.toml"));
        assert_eq!(cfg.camera.fov_degrees, 35.0);
    }

    #[test]
    fn round_trips_through_toml() {
        let mut cfg = AppConfig::default();
        cfg.animation.duration_secs = 2.5;
        cfg.sky.day = [0.1, 0.2, 0.3];
        let text = toml::to_string(&cfg).unwrap();
        let back: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.animation.duration_secs, 2.5);
        assert_eq!(back.sky.day, [0.1, 0.2, 0.3]);
    }

    fn tempfile_path(tag: &str) -> (std::path::PathBuf, std::fs::File) {
        let path = std::env::temp_dir().join(format!("showroom-config-{tag}-{}.toml", std::process::id()));
        let file = std::fs::File::create(&path).unwrap();
        (path, file)
    }
}
