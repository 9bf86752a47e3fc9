//! Configuration file management
//!
//! Loads TOML configuration files and provides pipeline settings.
//! Lookup order: --config flag, GLYPHSHEET_CONFIG, ./glyphsheet.toml,
//! ~/.config/glyphsheet/config.toml, then built-in defaults.

use crate::constants;
use crate::error::GlyphsheetError;
use crate::font::AtlasLayout;
use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "GLYPHSHEET_CONFIG";

/// Project-local config file name
pub const LOCAL_CONFIG_FILE: &str = "glyphsheet.toml";

/// Pipeline settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input and output locations
    pub paths: PathConfig,
    /// Font chain files and sizes
    pub fonts: FontConfig,
    /// Atlas grid geometry
    pub grid: GridConfig,
    /// Rasterization settings
    pub render: RenderConfig,
}

/// Path settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Directory holding source tables, fonts and artifacts
    pub resources_dir: PathBuf,
    /// Source table extension (without dot)
    pub table_extension: String,
    /// Extracted character list
    pub charset_file: PathBuf,
    /// Atlas image
    pub output_file: PathBuf,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            resources_dir: PathBuf::from("resources"),
            table_extension: constants::TABLE_EXTENSION.to_string(),
            charset_file: PathBuf::from("unique_chinese_chars.txt"),
            output_file: PathBuf::from("font.png"),
        }
    }
}

/// Font chain settings
///
/// Priority order is always primary -> secondary -> generic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Compact pixel font, sized to match the cell
    pub primary: PathBuf,
    pub primary_size: f32,
    /// Larger pixel font, scaled down into the cell
    pub secondary: PathBuf,
    pub secondary_size: f32,
    /// Generic CJK font (smoothed; binarized before scaling)
    pub generic: PathBuf,
    pub generic_size: f32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            primary: PathBuf::from("fusion-pixel-10px-monospaced-zh_hans.ttf"),
            primary_size: 10.0,
            secondary: PathBuf::from("fusion-pixel-12px-monospaced-zh_hans.ttf"),
            secondary_size: 12.0,
            generic: PathBuf::from("WenQuanYi.Bitmap.Song.12px.ttf"),
            generic_size: 12.0,
        }
    }
}

/// Grid settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub cell_width: u32,
    pub cell_height: u32,
    /// Cells per row
    pub columns: u32,
    /// Gap between cells
    pub gap: u32,
    /// Top/left margin
    pub margin: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_width: constants::CELL_WIDTH,
            cell_height: constants::CELL_HEIGHT,
            columns: constants::COLUMNS,
            gap: constants::GAP,
            margin: constants::MARGIN,
        }
    }
}

impl GridConfig {
    pub fn layout(&self) -> AtlasLayout {
        AtlasLayout {
            cell_width: self.cell_width,
            cell_height: self.cell_height,
            columns: self.columns,
            gap: self.gap,
            margin: self.margin,
        }
    }
}

/// Rasterization settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Scratch canvas side in pixels
    pub working_size: u32,
    /// Alpha threshold for binarizing the generic font (0-255)
    pub alpha_threshold: u8,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            working_size: constants::WORKING_SIZE,
            alpha_threshold: constants::ALPHA_THRESHOLD,
        }
    }
}

impl Config {
    /// Find the config file to use, if any
    ///
    /// Returns None if using built-in defaults
    pub fn config_path() -> Option<PathBuf> {
        // 1. GLYPHSHEET_CONFIG environment variable
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let p = Path::new(&path);
            if p.exists() {
                return Some(p.to_path_buf());
            }
            warn!("{} points to a missing file: {}", CONFIG_ENV, path);
        }

        // 2. Project-local config
        let local = Path::new(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Some(local.to_path_buf());
        }

        // 3. User config: ~/.config/glyphsheet/config.toml
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("glyphsheet").join("config.toml");
            if config_path.exists() {
                return Some(config_path);
            }
        }

        None
    }

    /// Load configuration
    ///
    /// An explicitly given path must load. A discovered config that fails
    /// to load falls back to built-in defaults with a warning.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = if let Some(path) = explicit {
            let config = Self::load_from_file(path)?;
            info!("Loaded config: {}", path.display());
            config
        } else if let Some(path) = Self::config_path() {
            match Self::load_from_file(&path) {
                Ok(config) => {
                    info!("Loaded config: {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("Failed to load config {}: {:#}", path.display(), e);
                    Self::default()
                }
            }
        } else {
            info!("Using built-in default config");
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Load settings from specified path
    fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Reject settings the grid math cannot work with
    pub fn validate(&self) -> std::result::Result<(), GlyphsheetError> {
        let grid = &self.grid;
        if grid.cell_width == 0 || grid.cell_height == 0 {
            return Err(GlyphsheetError::InvalidConfig(format!(
                "cell size must be non-zero (got {}x{})",
                grid.cell_width, grid.cell_height
            )));
        }
        if grid.columns == 0 {
            return Err(GlyphsheetError::InvalidConfig(
                "columns must be non-zero".to_string(),
            ));
        }
        if grid.layout().checked_dimensions(0).is_none() {
            return Err(GlyphsheetError::InvalidConfig(format!(
                "atlas width overflows: margin {} + {} columns x ({} + {})",
                grid.margin, grid.columns, grid.cell_width, grid.gap
            )));
        }
        let working = self.render.working_size;
        if working < grid.cell_width || working < grid.cell_height {
            return Err(GlyphsheetError::InvalidConfig(format!(
                "working_size {} is smaller than the {}x{} cell",
                working, grid.cell_width, grid.cell_height
            )));
        }
        let sizes = [
            self.fonts.primary_size,
            self.fonts.secondary_size,
            self.fonts.generic_size,
        ];
        if sizes.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(GlyphsheetError::InvalidConfig(
                "font sizes must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve a file name against resources_dir (absolute paths pass through)
    pub fn resource(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.paths.resources_dir.join(path)
        }
    }

    pub fn charset_path(&self) -> PathBuf {
        self.resource(&self.paths.charset_file)
    }

    pub fn output_path(&self) -> PathBuf {
        self.resource(&self.paths.output_file)
    }

    /// Write the default config as TOML (template generation)
    pub fn write_default_config(path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            anyhow::bail!(
                "Config file already exists: {} (use --force to overwrite)",
                path.display()
            );
        }
        let content = toml::to_string_pretty(&Self::default())
            .context("Failed to serialize default config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        info!("Wrote default config: {}", path.display());
        Ok(())
    }
}
