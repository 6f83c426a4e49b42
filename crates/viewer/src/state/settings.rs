//! Application settings

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::i18n::Lang;

/// Model source and placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    /// glTF / GLB file loaded at startup
    pub path: PathBuf,
    /// Uniform scale applied to the model root
    pub scale: f32,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("assets/model/boy-model.glb"),
            scale: 1.5,
        }
    }
}

/// Viewport settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportSettings {
    /// Background color RGB
    pub background_color: [u8; 3],
    /// Show ground grid
    pub grid_visible: bool,
    /// Ambient light intensity
    pub ambient: f32,
    /// Directional light position (the light points at the origin)
    pub light_position: [f32; 3],
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            background_color: [30, 30, 35],
            grid_visible: true,
            ambient: 0.5,
            light_position: [5.0, 5.0, 5.0],
        }
    }
}

/// UI settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiSettings {
    /// Font size in points
    pub font_size: f32,
    #[serde(default)]
    pub language: Lang,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            language: Lang::default(),
        }
    }
}

/// All application settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewerSettings {
    #[serde(default)]
    pub model: ModelSettings,
    #[serde(default)]
    pub viewport: ViewportSettings,
    #[serde(default)]
    pub ui: UiSettings,
}

impl ViewerSettings {
    /// Platform config file location
    fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "model-viewer", "model-viewer")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from the config dir, or return default if missing or unreadable
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        Self::load_from(&path).unwrap_or_else(|e| {
            tracing::warn!("{e}; using default settings");
            Self::default()
        })
    }

    /// Save settings to the config dir
    pub fn save(&self) {
        if let Some(path) = Self::config_path() {
            if let Err(e) = self.save_to(&path) {
                tracing::warn!("{e}");
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, String> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read settings {}: {e}", path.display()))?;
        serde_json::from_str(&json)
            .map_err(|e| format!("Failed to parse settings {}: {e}", path.display()))
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .map_err(|e| format!("Failed to create {}: {e}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {e}"))?;
        std::fs::write(path, json)
            .map_err(|e| format!("Failed to write settings {}: {e}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_settings_path(tag: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("model-viewer-settings-{tag}-{}", uuid::Uuid::new_v4()))
            .join("settings.json")
    }

    #[test]
    fn test_defaults() {
        let settings = ViewerSettings::default();
        assert_eq!(settings.model.scale, 1.5);
        assert_eq!(settings.viewport.ambient, 0.5);
        assert_eq!(settings.viewport.light_position, [5.0, 5.0, 5.0]);
        assert_eq!(settings.ui.language, Lang::En);
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_settings_path("roundtrip");
        let mut settings = ViewerSettings::default();
        settings.model.path = PathBuf::from("/models/girl.glb");
        settings.ui.language = Lang::Ru;

        settings.save_to(&path).unwrap();
        let loaded = ViewerSettings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings: ViewerSettings =
            serde_json::from_str(r#"{"model": {"path": "a.glb", "scale": 2.0}}"#).unwrap();
        assert_eq!(settings.model.path, PathBuf::from("a.glb"));
        assert_eq!(settings.viewport, ViewportSettings::default());
        assert_eq!(settings.ui, UiSettings::default());
    }

    #[test]
    fn test_load_errors() {
        let path = temp_settings_path("missing");
        assert!(ViewerSettings::load_from(&path).is_err());

        let path = temp_settings_path("corrupt");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();
        let err = ViewerSettings::load_from(&path).unwrap_err();
        assert!(err.contains("Failed to parse"));
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
