//! Configuration file support for vectorpaint.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/vectorpaint/config.toml`. Settings include default shape style,
//! canvas size, clipping highlight appearance, document persistence and handle display.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod types;

pub use enums::{ColorSpec, DocumentCompression};
pub use types::{CanvasConfig, ClippingConfig, DocumentConfig, DrawingConfig, UiConfig};

use crate::clip::ClippingManager;
use crate::draw::Style;
use anyhow::{Context, Result};
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Largest canvas width or height accepted from the config file or the command line.
pub const MAX_CANVAS_SIDE: u32 = 16384;

/// Main configuration structure containing all user settings.
///
/// # Example TOML
/// ```toml
/// [drawing]
/// default_border_color = "black"
/// default_thickness = 2
///
/// [canvas]
/// width = 1024
/// height = 768
///
/// [clipping]
/// highlight_color = "red"
///
/// [document]
/// compression = "auto"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Default style for shapes
    #[serde(default)]
    pub drawing: DrawingConfig,

    /// Output surface size and background
    #[serde(default)]
    pub canvas: CanvasConfig,

    /// Clipped segment highlighting
    #[serde(default)]
    pub clipping: ClippingConfig,

    /// Document persistence limits and compression
    #[serde(default)]
    pub document: DocumentConfig,

    /// Handle overlay preferences
    #[serde(default)]
    pub ui: UiConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value and a warning is logged.
    ///
    /// Validated ranges:
    /// - `default_thickness`, `highlight_thickness`: 1 - 20
    /// - `canvas.width`, `canvas.height`: 1 - 16384
    /// - `backup_retention`: 0 - 1
    /// - `handle_radius`: 1 - 10
    pub fn validate_and_clamp(&mut self) {
        if !(1..=20).contains(&self.drawing.default_thickness) {
            log::warn!(
                "Invalid default_thickness {}, clamping to 1-20 range",
                self.drawing.default_thickness
            );
            self.drawing.default_thickness = self.drawing.default_thickness.clamp(1, 20);
        }

        if !(1..=20).contains(&self.clipping.highlight_thickness) {
            log::warn!(
                "Invalid highlight_thickness {}, clamping to 1-20 range",
                self.clipping.highlight_thickness
            );
            self.clipping.highlight_thickness = self.clipping.highlight_thickness.clamp(1, 20);
        }

        for (name, side) in [
            ("width", &mut self.canvas.width),
            ("height", &mut self.canvas.height),
        ] {
            if !(1..=MAX_CANVAS_SIDE).contains(side) {
                log::warn!(
                    "Invalid canvas {} {}, clamping to 1-{} range",
                    name,
                    side,
                    MAX_CANVAS_SIDE
                );
                *side = (*side).clamp(1, MAX_CANVAS_SIDE);
            }
        }

        if self.document.backup_retention > 1 {
            log::warn!(
                "backup_retention {} is not supported, keeping a single backup",
                self.document.backup_retention
            );
            self.document.backup_retention = 1;
        }

        if self.document.max_file_size_bytes == 0 {
            log::warn!("max_file_size_bytes must be positive, using 1");
            self.document.max_file_size_bytes = 1;
        }

        if !(1..=10).contains(&self.ui.handle_radius) {
            log::warn!(
                "Invalid handle_radius {}, clamping to 1-10 range",
                self.ui.handle_radius
            );
            self.ui.handle_radius = self.ui.handle_radius.clamp(1, 10);
        }

        // Unknown color names
        let mut colors = vec![
            ("drawing.default_border_color", &mut self.drawing.default_border_color),
            ("canvas.background", &mut self.canvas.background),
            ("clipping.highlight_color", &mut self.clipping.highlight_color),
        ];
        if let Some(fill) = self.drawing.default_fill_color.as_mut() {
            colors.push(("drawing.default_fill_color", fill));
        }
        for (field, spec) in colors {
            if !spec.is_known() {
                log::warn!("Unknown color {:?} for {}, falling back to black", spec, field);
                *spec = ColorSpec::Name("black".to_string());
            }
        }
    }

    /// Style new shapes start with.
    pub fn default_style(&self) -> Style {
        Style {
            border_color: self.drawing.default_border_color.to_color(),
            fill_color: self
                .drawing
                .default_fill_color
                .as_ref()
                .map(ColorSpec::to_color),
            texture: None,
            thickness: self.drawing.default_thickness,
            antialiasing: self.drawing.antialiasing,
        }
    }

    /// Clipping manager carrying the configured highlight appearance.
    pub fn clipping_manager(&self) -> ClippingManager {
        ClippingManager::new(
            self.clipping.highlight_color.to_color(),
            self.clipping.highlight_thickness,
        )
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/vectorpaint/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("vectorpaint");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Loads configuration from `config_path`, or returns defaults if the file does not exist.
    ///
    /// All loaded values are validated and clamped to acceptable ranges.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or contains invalid TOML.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Saves the current configuration to the default location.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created, the config cannot be
    /// serialized or the file cannot be written.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        self.save_to(&config_path)
    }

    /// Serializes the config as TOML into `config_path`, creating parent directories.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let config_str = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, config_str)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        info!("Saved config to {}", config_path.display());
        Ok(())
    }

    /// Writes the commented example config to `config_path`.
    ///
    /// # Errors
    /// Returns an error if a file already exists at the target path or it cannot be written.
    pub fn create_default_file(config_path: &Path) -> Result<()> {
        if config_path.exists() {
            return Err(anyhow::anyhow!(
                "Config file already exists at {}",
                config_path.display()
            ));
        }

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let default_config = include_str!("../../config.example.toml");
        fs::write(config_path, default_config)?;

        info!("Created default config at {}", config_path.display());
        Ok(())
    }

    /// JSON schema describing the config file.
    pub fn json_schema() -> serde_json::Value {
        let schema = schemars::schema_for!(Config);
        serde_json::to_value(&schema).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::{BLACK, RED, WHITE};

    #[test]
    fn empty_file_yields_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.drawing.default_thickness, 1);
        assert_eq!(config.canvas.width, 800);
        assert_eq!(config.canvas.background.to_color(), WHITE);
        assert_eq!(config.clipping.highlight_color.to_color(), RED);
        assert_eq!(config.clipping.highlight_thickness, 3);
        assert_eq!(config.document.compression, DocumentCompression::Off);
        assert_eq!(config.document.max_shapes, 10_000);
        assert!(!config.ui.show_handles);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let mut config: Config = toml::from_str(
            r#"
            [drawing]
            default_thickness = 0

            [canvas]
            width = 0
            height = 100000

            [document]
            backup_retention = 5

            [ui]
            handle_radius = 50
            "#,
        )
        .unwrap();
        config.validate_and_clamp();
        assert_eq!(config.drawing.default_thickness, 1);
        assert_eq!(config.canvas.width, 1);
        assert_eq!(config.canvas.height, MAX_CANVAS_SIDE);
        assert_eq!(config.document.backup_retention, 1);
        assert_eq!(config.ui.handle_radius, 10);
    }

    #[test]
    fn unknown_color_names_are_replaced() {
        let mut config: Config = toml::from_str(
            r#"
            [drawing]
            default_border_color = "chartreuse"
            default_fill_color = [0, 255, 0]
            "#,
        )
        .unwrap();
        config.validate_and_clamp();
        let style = config.default_style();
        assert_eq!(style.border_color, BLACK);
        assert_eq!(style.fill_color, Some(crate::draw::Color::rgb(0, 255, 0)));
    }

    #[test]
    fn example_config_parses() {
        let config: Config = toml::from_str(include_str!("../../config.example.toml")).unwrap();
        assert_eq!(config.document.compression, DocumentCompression::Auto);
    }

    #[test]
    fn load_from_missing_file_uses_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config::load_from(&temp.path().join("config.toml")).unwrap();
        assert_eq!(config.canvas.height, 600);
    }

    #[test]
    fn save_then_load_round_trips() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.canvas.width = 320;
        config.document.compression = DocumentCompression::On;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.canvas.width, 320);
        assert_eq!(loaded.document.compression, DocumentCompression::On);
    }

    #[test]
    fn create_default_file_refuses_to_overwrite() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        Config::create_default_file(&path).unwrap();
        assert!(Config::create_default_file(&path).is_err());
    }

    #[test]
    fn schema_lists_sections() {
        let schema = Config::json_schema();
        let properties = &schema["properties"];
        for section in ["drawing", "canvas", "clipping", "document", "ui"] {
            assert!(properties.get(section).is_some(), "missing {section}");
        }
    }
}
