use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::layers::LayerCatalog;

/// Environment variable naming a JSON config file
pub const CONFIG_ENV: &str = "TRAIT_SKETCH_CONFIG";

/// Upper bound of the stroke width slider
pub const MAX_STROKE_WIDTH: f32 = 100.0;

/// Largest canvas side; must stay within what a GPU texture can hold
pub const MAX_CANVAS_SIDE: u32 = 4096;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Editor settings. Missing fields fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Canvas size in pixels, also the size of the exported image
    pub canvas_size: [u32; 2],
    pub stroke_width: f32,
    pub stroke_color: String,
    pub background_color: String,
    pub hair: String,
    pub body: String,
    /// Directory holding `<layer id>.png` files
    pub asset_dir: PathBuf,
    pub export_dir: PathBuf,
    pub export_file_name: String,
    /// Optional layer catalog manifest; the built-in catalog is used otherwise
    pub catalog_path: Option<PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_size: [600, 600],
            stroke_width: 12.0,
            stroke_color: "#000".to_owned(),
            background_color: "transparent".to_owned(),
            hair: "y_kraken_hair_01".to_owned(),
            body: "x_kaiju_01".to_owned(),
            asset_dir: PathBuf::from("assets"),
            export_dir: PathBuf::from("."),
            export_file_name: "traits.png".to_owned(),
            catalog_path: None,
        }
    }
}

impl EditorConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        let config = Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Load from the file named by `TRAIT_SKETCH_CONFIG`, or use defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => {
                log::info!("Loading config from {:?}", path);
                Self::load(Path::new(&path))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let [width, height] = self.canvas_size;
        if width == 0 || height == 0 {
            return Err(ConfigError::Invalid(format!(
                "canvas_size must be positive, got {}x{}",
                width, height
            )));
        }
        if width > MAX_CANVAS_SIDE || height > MAX_CANVAS_SIDE {
            return Err(ConfigError::Invalid(format!(
                "canvas_size {}x{} exceeds {}x{}",
                width, height, MAX_CANVAS_SIDE, MAX_CANVAS_SIDE
            )));
        }
        if self.export_file_name.trim().is_empty() {
            return Err(ConfigError::Invalid("export_file_name is empty".to_owned()));
        }
        Ok(())
    }

    pub fn catalog(&self) -> Result<LayerCatalog, ConfigError> {
        let Some(path) = &self.catalog_path else {
            return Ok(LayerCatalog::builtin());
        };
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        LayerCatalog::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })
    }

    pub fn canvas_vec2(&self) -> egui::Vec2 {
        egui::vec2(self.canvas_size[0] as f32, self.canvas_size[1] as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EditorConfig::from_json(r#"{"stroke_width": 30, "hair": "x_kong_hair_01"}"#)
            .unwrap();
        assert_eq!(config.stroke_width, 30.0);
        assert_eq!(config.hair, "x_kong_hair_01");
        assert_eq!(config.body, EditorConfig::default().body);
        assert_eq!(config.canvas_size, [600, 600]);
    }

    #[test]
    fn test_validate_rejects_empty_canvas() {
        let config = EditorConfig {
            canvas_size: [0, 600],
            ..EditorConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        assert!(EditorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_oversized_canvas() {
        let huge = EditorConfig::from_json(r#"{"canvas_size": [70000, 70000]}"#).unwrap();
        assert!(matches!(huge.validate(), Err(ConfigError::Invalid(_))));

        let largest = EditorConfig {
            canvas_size: [MAX_CANVAS_SIDE, MAX_CANVAS_SIDE],
            ..EditorConfig::default()
        };
        assert!(largest.validate().is_ok());
    }

    #[test]
    fn test_load_validates() {
        let path = std::env::temp_dir().join(format!("trait_sketch_config_{}.json", std::process::id()));
        std::fs::write(&path, r#"{"canvas_size": [5000, 10]}"#).unwrap();
        let result = EditorConfig::load(&path);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = EditorConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("here.json"));
    }

    #[test]
    fn test_default_catalog_is_builtin() {
        assert_eq!(EditorConfig::default().catalog().unwrap(), LayerCatalog::builtin());
    }
}
