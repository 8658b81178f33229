//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treevis/treevis.toml`
//! 3. Local config: `<dir>/.treevis.toml`
//! 4. Environment variables: `TREEVIS_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;

/// Spacing passed to the layout engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    /// Horizontal distance between neighbouring leaves
    pub x_spacing: f64,
    /// Vertical distance between levels
    pub y_spacing: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            x_spacing: 50.0,
            y_spacing: 100.0,
        }
    }
}

/// Visual style of the SVG renderer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StyleConfig {
    pub node_radius: f64,
    /// Space around the drawing
    pub margin: f64,
    pub fill_node: String,
    pub stroke_node: String,
    pub edge_color: String,
    pub stroke_width: f64,
    pub fill_text: String,
    pub font_size: f64,
    pub font_family: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            node_radius: 20.0,
            margin: 40.0,
            fill_node: "#ffffff".into(),
            stroke_node: "#333333".into(),
            edge_color: "#555555".into(),
            stroke_width: 1.5,
            fill_text: "#000000".into(),
            font_size: 12.0,
            font_family: "sans-serif".into(),
        }
    }
}

/// Raw layout config for intermediate parsing (`None` → not specified).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLayoutConfig {
    pub x_spacing: Option<f64>,
    pub y_spacing: Option<f64>,
}

/// Raw style config for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawStyleConfig {
    pub node_radius: Option<f64>,
    pub margin: Option<f64>,
    pub fill_node: Option<String>,
    pub stroke_node: Option<String>,
    pub edge_color: Option<String>,
    pub stroke_width: Option<f64>,
    pub fill_text: Option<String>,
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub layout: RawLayoutConfig,
    pub style: RawStyleConfig,
}

impl LayoutConfig {
    fn merge(&self, overlay: &RawLayoutConfig) -> Self {
        Self {
            x_spacing: overlay.x_spacing.unwrap_or(self.x_spacing),
            y_spacing: overlay.y_spacing.unwrap_or(self.y_spacing),
        }
    }
}

impl StyleConfig {
    fn merge(&self, overlay: &RawStyleConfig) -> Self {
        Self {
            node_radius: overlay.node_radius.unwrap_or(self.node_radius),
            margin: overlay.margin.unwrap_or(self.margin),
            fill_node: overlay
                .fill_node
                .clone()
                .unwrap_or_else(|| self.fill_node.clone()),
            stroke_node: overlay
                .stroke_node
                .clone()
                .unwrap_or_else(|| self.stroke_node.clone()),
            edge_color: overlay
                .edge_color
                .clone()
                .unwrap_or_else(|| self.edge_color.clone()),
            stroke_width: overlay.stroke_width.unwrap_or(self.stroke_width),
            fill_text: overlay
                .fill_text
                .clone()
                .unwrap_or_else(|| self.fill_text.clone()),
            font_size: overlay.font_size.unwrap_or(self.font_size),
            font_family: overlay
                .font_family
                .clone()
                .unwrap_or_else(|| self.font_family.clone()),
        }
    }
}

/// Unified configuration for treevis.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub layout: LayoutConfig,
    pub style: StyleConfig,
}

/// Get the XDG config directory for treevis.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treevis").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treevis.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".treevis.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay a raw config; specified values win.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            layout: self.layout.merge(&overlay.layout),
            style: self.style.merge(&overlay.style),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.treevis.toml`
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/treevis/treevis.toml`
    /// 3. Local config: `<local_dir>/.treevis.toml`
    /// 4. Environment variables: `TREEVIS_*` prefix, `__` between section and key
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_with_overrides(local_dir, &RawSettings::default())
    }

    /// Like [`Settings::load`], with `overrides` (e.g. command-line flags)
    /// layered above the environment. Validation sees the final values only.
    pub fn load_with_overrides(
        local_dir: Option<&Path>,
        overrides: &RawSettings,
    ) -> Result<Self, ApplicationError> {
        let global = global_config_path().filter(|p| p.exists());
        let local = local_dir.map(local_config_path).filter(|p| p.exists());
        Self::load_from_with_overrides(global.as_deref(), local.as_deref(), overrides)
    }

    /// Load from explicit file paths; missing paths are skipped by the caller.
    pub fn load_from(
        global: Option<&Path>,
        local: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        Self::load_from_with_overrides(global, local, &RawSettings::default())
    }

    pub fn load_from_with_overrides(
        global: Option<&Path>,
        local: Option<&Path>,
        overrides: &RawSettings,
    ) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        for path in [global, local].into_iter().flatten() {
            debug!(path = %path.display(), "merging config file");
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        current = Self::apply_env_overrides(current)?;
        current = current.merge_with(overrides);
        current.validate()?;
        Ok(current)
    }

    /// Apply TREEVIS_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("TREEVIS")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_float("layout.x_spacing") {
            settings.layout.x_spacing = val;
        }
        if let Ok(val) = config.get_float("layout.y_spacing") {
            settings.layout.y_spacing = val;
        }
        if let Ok(val) = config.get_float("style.node_radius") {
            settings.style.node_radius = val;
        }
        if let Ok(val) = config.get_float("style.margin") {
            settings.style.margin = val;
        }
        if let Ok(val) = config.get_string("style.fill_node") {
            settings.style.fill_node = val;
        }
        if let Ok(val) = config.get_string("style.stroke_node") {
            settings.style.stroke_node = val;
        }
        if let Ok(val) = config.get_string("style.edge_color") {
            settings.style.edge_color = val;
        }
        if let Ok(val) = config.get_float("style.stroke_width") {
            settings.style.stroke_width = val;
        }
        if let Ok(val) = config.get_string("style.fill_text") {
            settings.style.fill_text = val;
        }
        if let Ok(val) = config.get_float("style.font_size") {
            settings.style.font_size = val;
        }
        if let Ok(val) = config.get_string("style.font_family") {
            settings.style.font_family = val;
        }

        Ok(settings)
    }

    /// Reject values the layout and renderer cannot use.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        let positive = [
            ("layout.x_spacing", self.layout.x_spacing),
            ("layout.y_spacing", self.layout.y_spacing),
            ("style.font_size", self.style.font_size),
        ];
        let non_negative = [
            ("style.node_radius", self.style.node_radius),
            ("style.margin", self.style.margin),
            ("style.stroke_width", self.style.stroke_width),
        ];

        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ApplicationError::Config {
                    message: format!("{name} must be positive, got {value}"),
                });
            }
        }
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ApplicationError::Config {
                    message: format!("{name} must not be negative, got {value}"),
                });
            }
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r##"# treevis configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/treevis/treevis.toml
#   Local:  <dir>/.treevis.toml
#   Env:    TREEVIS_* environment variables, e.g. TREEVIS_LAYOUT__X_SPACING=80

[layout]
# Horizontal distance between neighbouring leaves
# x_spacing = 50.0
# Vertical distance between levels
# y_spacing = 100.0

[style]
# node_radius = 20.0
# margin = 40.0
# fill_node = "#ffffff"
# stroke_node = "#333333"
# edge_color = "#555555"
# stroke_width = 1.5
# fill_text = "#000000"
# font_size = 12.0
# font_family = "sans-serif"
"##
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
