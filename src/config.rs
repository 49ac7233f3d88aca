//! Graphics configuration, stored as JSON

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::surface::SurfaceKind;

pub const DEFAULT_WIDTH: u32 = 640;
pub const DEFAULT_HEIGHT: u32 = 480;

/// Largest framebuffer edge accepted by `validate`
pub const MAX_DIMENSION: u32 = 4096;

/// Everything needed to bring up a `Graphics` context (and optionally a window)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphicsConfig {
    pub width: u32,
    pub height: u32,
    /// Framebuffer representation
    pub backend: SurfaceKind,
    /// Window title
    pub title: String,
    pub vsync: bool,
    /// Integer window scale factor
    pub scale: u32,
}

impl GraphicsConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Same configuration with a different backend
    pub fn with_backend(mut self, backend: SurfaceKind) -> Self {
        self.backend = backend;
        self
    }

    /// Reject configurations no framebuffer can be built for
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err(format!(
                "invalid framebuffer size {}x{}",
                self.width, self.height
            ));
        }
        if self.width > MAX_DIMENSION || self.height > MAX_DIMENSION {
            return Err(format!(
                "framebuffer size {}x{} exceeds {}x{}",
                self.width, self.height, MAX_DIMENSION, MAX_DIMENSION
            ));
        }
        if self.scale == 0 {
            return Err("window scale must be at least 1".to_string());
        }
        Ok(())
    }

    /// Window size after scaling
    pub fn window_size(&self) -> (u32, u32) {
        (self.width * self.scale, self.height * self.scale)
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(path, json).map_err(|e| e.to_string())
    }

    /// Load configuration from a JSON file; missing fields take defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| e.to_string())?;
        let config: Self = serde_json::from_str(&json).map_err(|e| e.to_string())?;
        log::debug!("loaded graphics config from {}", path.display());
        Ok(config)
    }

    /// Load `path` if it exists and parses, otherwise fall back to defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load_or_warn(path).0
    }

    /// Like `load_or_default`, but also hands back why an existing file was
    /// ignored so a caller without a logger can show it
    pub fn load_or_warn(path: impl AsRef<Path>) -> (Self, Option<String>) {
        let path = path.as_ref();
        if !path.exists() {
            return (Self::default(), None);
        }
        match Self::load(path) {
            Ok(config) => (config, None),
            Err(e) => {
                let warning = format!("ignoring {}: {}", path.display(), e);
                log::warn!("{}", warning);
                (Self::default(), Some(warning))
            }
        }
    }
}

impl Default for GraphicsConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            backend: SurfaceKind::Indexed,
            title: "Patater GUI Kit".to_string(),
            vsync: true,
            scale: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("guikit-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_defaults() {
        let config = GraphicsConfig::default();
        assert_eq!((config.width, config.height), (640, 480));
        assert_eq!(config.backend, SurfaceKind::Indexed);
        assert!(config.vsync);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_sizes() {
        assert!(GraphicsConfig::new(0, 480).validate().is_err());
        assert!(GraphicsConfig::new(640, 0).validate().is_err());
        assert!(GraphicsConfig::new(MAX_DIMENSION + 1, 10).validate().is_err());
        let mut config = GraphicsConfig::new(320, 200);
        config.scale = 0;
        assert!(config.validate().is_err());
        config.scale = 2;
        assert!(config.validate().is_ok());
        assert_eq!(config.window_size(), (640, 400));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GraphicsConfig =
            serde_json::from_str(r#"{ "width": 320, "backend": "planar" }"#).unwrap();
        assert_eq!(config.width, 320);
        assert_eq!(config.height, DEFAULT_HEIGHT);
        assert_eq!(config.backend, SurfaceKind::Planar);
        assert_eq!(config.scale, 1);
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("config.json");
        let mut config = GraphicsConfig::new(320, 240).with_backend(SurfaceKind::Planar);
        config.title = "test".to_string();
        config.save(&path).unwrap();
        let loaded = GraphicsConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_or_default_on_garbage() {
        let path = temp_path("garbage.json");
        std::fs::write(&path, "not json").unwrap();
        let config = GraphicsConfig::load_or_default(&path);
        std::fs::remove_file(&path).ok();
        assert_eq!(config, GraphicsConfig::default());
        assert_eq!(
            GraphicsConfig::load_or_default(temp_path("missing.json")),
            GraphicsConfig::default()
        );
    }

    #[test]
    fn test_load_or_warn_reports_bad_file() {
        let path = temp_path("bad.json");
        std::fs::write(&path, "{ \"width\": ").unwrap();
        let (config, warning) = GraphicsConfig::load_or_warn(&path);
        std::fs::remove_file(&path).ok();
        assert_eq!(config, GraphicsConfig::default());
        let warning = warning.unwrap();
        assert!(warning.contains("bad.json"), "{}", warning);

        let (_, warning) = GraphicsConfig::load_or_warn(temp_path("absent.json"));
        assert!(warning.is_none());

        let path = temp_path("good.json");
        GraphicsConfig::new(320, 200).save(&path).unwrap();
        let (config, warning) = GraphicsConfig::load_or_warn(&path);
        std::fs::remove_file(&path).ok();
        assert_eq!(config.width, 320);
        assert!(warning.is_none());
    }
}
