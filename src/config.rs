//! User configuration persistence
//!
//! Stores preferences in `~/.config/panel-drag/config.yaml`

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::draggable::DEFAULT_ORIGIN;
use crate::geometry::PanelPosition;

/// Configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelDragConfig {
    /// Where panels without an explicit position start
    #[serde(default = "default_origin")]
    pub default_origin: PanelPosition,
    /// Save panel positions to disk when a drag ends
    #[serde(default = "default_persist_positions")]
    pub persist_positions: bool,
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    #[serde(default = "default_window_height")]
    pub window_height: u32,
}

fn default_origin() -> PanelPosition {
    DEFAULT_ORIGIN
}

fn default_persist_positions() -> bool {
    true
}

fn default_window_width() -> u32 {
    1024
}

fn default_window_height() -> u32 {
    768
}

impl Default for PanelDragConfig {
    fn default() -> Self {
        Self {
            default_origin: default_origin(),
            persist_positions: default_persist_positions(),
            window_width: default_window_width(),
            window_height: default_window_height(),
        }
    }
}

impl PanelDragConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from a specific file, falling back to defaults on any error
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str::<Self>(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config.sanitized()
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Replace values the panels cannot work with by their defaults
    fn sanitized(mut self) -> Self {
        if !self.default_origin.is_finite() {
            tracing::warn!(
                origin = ?self.default_origin,
                "Ignoring non-finite default_origin in config, using {:?}",
                DEFAULT_ORIGIN
            );
            self.default_origin = DEFAULT_ORIGIN;
        }
        self
    }

    /// Record the window size for the next run. Returns whether it changed.
    pub fn set_window_size(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 || (width, height) == (self.window_width, self.window_height)
        {
            return false;
        }
        self.window_width = width;
        self.window_height = height;
        true
    }

    /// Save config to disk
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    /// Save config to a specific file, creating its directory if needed
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PanelDragConfig::default();
        assert_eq!(config.default_origin, PanelPosition::new(24.0, 24.0));
        assert!(config.persist_positions);
        assert_eq!((config.window_width, config.window_height), (1024, 768));
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: PanelDragConfig = serde_yaml::from_str("persist_positions: false\n").unwrap();
        assert!(!config.persist_positions);
        assert_eq!(config.default_origin, DEFAULT_ORIGIN);
        assert_eq!(config.window_width, 1024);
    }

    #[test]
    fn test_yaml_origin() {
        let yaml = "default_origin:\n  left: 100\n  top: 60\n";
        let config: PanelDragConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.default_origin, PanelPosition::new(100.0, 60.0));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.yaml");
        let config = PanelDragConfig {
            default_origin: PanelPosition::new(10.0, 20.0),
            persist_positions: false,
            window_width: 640,
            window_height: 480,
        };

        config.save_to(&path).unwrap();
        assert_eq!(PanelDragConfig::load_from(&path), config);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = PanelDragConfig::load_from(&dir.path().join("absent.yaml"));
        assert_eq!(config, PanelDragConfig::default());
    }

    #[test]
    fn test_non_finite_origin_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "default_origin:\n  left: .nan\n  top: 24\nwindow_width: 800\n",
        )
        .unwrap();

        let config = PanelDragConfig::load_from(&path);
        assert_eq!(config.default_origin, DEFAULT_ORIGIN);
        assert_eq!(config.window_width, 800, "other fields are kept");

        std::fs::write(&path, "default_origin:\n  left: 10\n  top: -.inf\n").unwrap();
        assert_eq!(PanelDragConfig::load_from(&path).default_origin, DEFAULT_ORIGIN);
    }

    #[test]
    fn test_set_window_size() {
        let mut config = PanelDragConfig::default();
        assert!(!config.set_window_size(1024, 768));
        assert!(!config.set_window_size(0, 600), "minimized size is ignored");
        assert!(config.set_window_size(1280, 720));
        assert_eq!((config.window_width, config.window_height), (1280, 720));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        config.save_to(&path).unwrap();
        assert_eq!(PanelDragConfig::load_from(&path).window_width, 1280);
    }

    #[test]
    fn test_invalid_yaml_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "window_width: [not, a, number]\n").unwrap();
        assert_eq!(PanelDragConfig::load_from(&path), PanelDragConfig::default());
    }
}
